//! Marketplace webhook intake.

use {
    axum::{
        body::Bytes,
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        response::Json,
    },
    serde::Deserialize,
    serde_json::{Value, json},
    sha2::{Digest, Sha256},
    tracing::warn,
};

use crate::state::AppState;

const SIGNATURE_HEADER: &str = "x-crosslist-signature";

#[derive(Debug, Deserialize)]
struct WebhookPayload {
    /// The platform's own listing identifier.
    listing_id: String,
    event_type: String,
    /// Event-specific fields (e.g. `new_price`).
    #[serde(flatten)]
    rest: Value,
}

/// `POST /api/webhooks/{platform}` — ingest one marketplace event.
///
/// 401 bad signature, 400 malformed payload or unsupported platform,
/// 404 when the external id resolves to nothing (the source may retry
/// later), 200 once the event was applied.
pub async fn ingest_handler(
    State(state): State<AppState>,
    Path(platform): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    if let Some(secret) = &state.webhook_secret {
        let presented = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !verify_signature(&body, presented, secret) {
            warn!(platform, "webhook rejected: bad signature");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "error": "invalid signature" })),
            );
        }
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(platform, error = %e, "webhook rejected: malformed payload");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": "malformed payload" })),
            );
        },
    };

    let outcome = state
        .reconciler
        .handle_sync_event(
            &platform,
            &payload.listing_id,
            &payload.event_type,
            &payload.rest,
        )
        .await;

    let status = match outcome.error.as_deref() {
        None => StatusCode::OK,
        Some("Listing not found for platform id") => StatusCode::NOT_FOUND,
        Some("Unsupported platform") => StatusCode::BAD_REQUEST,
        Some(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = serde_json::to_value(&outcome)
        .unwrap_or_else(|_| json!({ "success": false, "error": "serialization failed" }));
    (status, Json(body))
}

/// Hex SHA-256 over `secret || body`.
pub fn compute_signature(secret: &str, body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(body);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn verify_signature(body: &[u8], presented: &str, secret: &str) -> bool {
    let expected = compute_signature(secret, body);
    constant_time_eq(&expected, presented)
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_round_trip() {
        let body = br#"{"listing_id":"ebay_1","event_type":"sold"}"#;
        let sig = compute_signature("s3cret", body);
        assert!(verify_signature(body, &sig, "s3cret"));
        assert!(!verify_signature(body, &sig, "other"));
        assert!(!verify_signature(b"tampered", &sig, "s3cret"));
    }

    #[test]
    fn constant_time_eq_rejects_length_mismatch() {
        assert!(!constant_time_eq("abc", "abcd"));
        assert!(constant_time_eq("abc", "abc"));
    }
}
