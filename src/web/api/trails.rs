use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::buckets::{samples_from_triplets, RawTriplet, Sample, HOURS};
use crate::geojson::FeatureCollection;
use crate::index::BBox;
use crate::neighbor::NeighborResult;
use crate::tracks::SegmentProperties;
use crate::trails::{PairJob, SessionStatus, TrailSession};
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::state::AppState;

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub hour: u8,
    pub accepted: usize,
    pub linked_pairs: Vec<u8>,
}

pub async fn ingest_hour(
    State(state): State<AppState>,
    Path(hour): Path<u8>,
    Json(raw): Json<Vec<RawTriplet>>,
) -> ApiResult<Json<IngestResponse>> {
    let samples = samples_from_triplets(hour, Utc::now(), &raw);
    let accepted = samples.len();

    let jobs = state.session.write().await.insert_bucket(hour, samples)?;

    // Detached so a dropped request cannot strand a pair half way.
    let session = state.session.clone();
    let linked_pairs = tokio::spawn(link_pairs(session, jobs)).await?;

    Ok(Json(IngestResponse {
        hour,
        accepted,
        linked_pairs,
    }))
}

async fn link_pairs(session: Arc<RwLock<TrailSession>>, jobs: Vec<PairJob>) -> Vec<u8> {
    let mut linked_pairs = Vec::with_capacity(jobs.len());
    for job in jobs {
        let pair_hour = job.pair_hour;
        match tokio::task::spawn_blocking(move || job.run()).await {
            Ok(pair) => {
                session.write().await.apply_pair(pair);
                linked_pairs.push(pair_hour);
            }
            Err(e) => log::error!("linking hour pair {} failed: {}", pair_hour, e),
        }
    }
    linked_pairs
}

#[derive(Debug, Deserialize)]
pub struct SegmentsQuery {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
    #[serde(default)]
    pub max_hours: Option<u8>,
}

pub async fn segments(
    State(state): State<AppState>,
    Query(query): Query<SegmentsQuery>,
) -> ApiResult<Json<FeatureCollection<SegmentProperties>>> {
    if query.min_lon > query.max_lon || query.min_lat > query.max_lat {
        return Err(ApiError::Validation("bounding box corners are inverted".into()));
    }
    let bbox = BBox::new(query.min_lon, query.min_lat, query.max_lon, query.max_lat);
    let max_hours = query.max_hours.unwrap_or(HOURS);

    let session = state.session.read().await;
    let features = session
        .visible_segments(&bbox, max_hours)
        .into_iter()
        .map(|s| s.to_feature())
        .collect();

    Ok(Json(FeatureCollection::new(features)))
}

#[derive(Debug, Deserialize)]
pub struct NeighborQuery {
    pub lat: f64,
    pub lon: f64,
    pub hour: u8,
}

pub async fn neighbor(
    State(state): State<AppState>,
    Query(query): Query<NeighborQuery>,
) -> ApiResult<Json<NeighborResult>> {
    if query.hour >= HOURS {
        return Err(ApiError::Validation(format!("hour {} out of range", query.hour)));
    }
    let point = Sample::new(query.lat, query.lon, 0.0, Utc::now(), query.hour);

    let session = state.session.read().await;
    Ok(Json(session.resolve_neighbor(&point)))
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub session: SessionStatus,
    pub forecast_cache_entries: usize,
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let session = state.session.read().await.status();
    Json(StatusResponse {
        session,
        forecast_cache_entries: state.pipeline.cache().len(),
    })
}
