use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::api::compare as compare_handlers;
use super::api::trails as trail_handlers;
use super::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/hours/{hour}", post(trail_handlers::ingest_hour))
        .route("/api/segments", get(trail_handlers::segments))
        .route("/api/neighbor", get(trail_handlers::neighbor))
        .route("/api/status", get(trail_handlers::status))
        .route("/api/compare", post(compare_handlers::compare))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(state: AppState) -> std::io::Result<()> {
    let bind_addr = state.config.web.bind.clone();
    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}
