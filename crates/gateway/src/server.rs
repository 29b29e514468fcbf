use std::net::SocketAddr;

use {
    axum::{
        Router,
        response::Json,
        routing::{get, post},
    },
    tower_http::trace::TraceLayer,
    tracing::info,
};

use crate::{audit_routes, listing_routes, state::AppState, webhook_routes};

/// Build the API router (shared between production startup and tests).
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route(
            "/api/listings/{id}/publish",
            post(listing_routes::publish_handler),
        )
        .route(
            "/api/listings/{id}/delist",
            post(listing_routes::delist_handler),
        )
        .route(
            "/api/webhooks/{platform}",
            post(webhook_routes::ingest_handler),
        )
        .route("/api/audit", get(audit_routes::query_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the task is cancelled.
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "crosslist gateway listening");
    axum::serve(listener, app).await
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
