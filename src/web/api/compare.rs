use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::forecast::{Comparison, ComparisonStats, ForecastPoint};
use crate::geojson::FeatureCollection;
use crate::web::api::error::ApiResult;
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub points: Vec<ForecastPoint>,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub features: FeatureCollection<Comparison>,
    pub stats: ComparisonStats,
}

pub async fn compare(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> ApiResult<Json<CompareResponse>> {
    let report = state.pipeline.compare(&request.points).await?;
    let stats = report.stats;

    Ok(Json(CompareResponse {
        features: report.into_feature_collection(),
        stats,
    }))
}
