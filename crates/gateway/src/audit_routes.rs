//! Audit trail query endpoint.

use {
    axum::{
        extract::{Query, State},
        http::StatusCode,
        response::Json,
    },
    serde::Deserialize,
    serde_json::{Value, json},
    tracing::warn,
};

use {
    crosslist_channels::{AuditEventType, AuditQuery},
    crosslist_common::Platform,
};

use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AuditParams {
    pub listing_id: Option<String>,
    pub platform: Option<String>,
    pub event_type: Option<String>,
    pub cursor: Option<i64>,
    pub limit: Option<u32>,
}

/// `GET /api/audit` — cursor-paginated audit events, newest first.
pub async fn query_handler(
    State(state): State<AppState>,
    Query(params): Query<AuditParams>,
) -> (StatusCode, Json<Value>) {
    let platform = match params.platform.as_deref() {
        None => None,
        Some(name) => match Platform::parse(name) {
            Some(platform) => Some(platform),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Unsupported platform" })),
                );
            },
        },
    };
    let event_type = match params.event_type.as_deref() {
        None => None,
        Some(name) => match AuditEventType::parse(name) {
            Some(event_type) => Some(event_type),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": format!("unknown event type: {name}") })),
                );
            },
        },
    };

    let query = AuditQuery {
        listing_id: params.listing_id,
        platform,
        event_type,
        cursor: params.cursor,
        limit: params.limit.unwrap_or(0),
    };

    match state.audit.query(query).await {
        Ok(page) => {
            let body = serde_json::to_value(&page)
                .unwrap_or_else(|_| json!({ "events": [], "error": "serialization failed" }));
            (StatusCode::OK, Json(body))
        },
        Err(e) => {
            warn!(error = %e, "audit query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "audit query failed" })),
            )
        },
    }
}
