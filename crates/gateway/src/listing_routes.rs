//! Publish and delist endpoints.

use {
    axum::{
        extract::{Path, State},
        response::Json,
    },
    serde::Deserialize,
    serde_json::{Value, json},
};

use crosslist_sync::{DispatchOutcome, PublishOutcome};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub platforms: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DelistRequest {
    pub platform: String,
}

/// `POST /api/listings/{id}/publish` — dispatch the listing to each
/// requested platform. Results are reported per platform so a partial
/// cross-post stays visible; the HTTP status is 200 regardless.
pub async fn publish_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PublishRequest>,
) -> Json<Value> {
    let mut results = serde_json::Map::new();
    for platform in &req.platforms {
        let value = match state.dispatcher.dispatch_publish(&id, platform).await {
            DispatchOutcome::Enqueued => json!({ "status": "queued" }),
            DispatchOutcome::Completed(outcome) => outcome_json(&outcome),
        };
        results.insert(platform.clone(), value);
    }
    Json(json!({ "results": Value::Object(results) }))
}

/// `POST /api/listings/{id}/delist` — remove one channel. Always inline.
pub async fn delist_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<DelistRequest>,
) -> Json<Value> {
    let outcome = state.dispatcher.delist(&id, &req.platform).await;
    Json(outcome_json(&outcome))
}

fn outcome_json(outcome: &PublishOutcome) -> Value {
    serde_json::to_value(outcome)
        .unwrap_or_else(|_| json!({ "success": false, "error": "serialization failed" }))
}
