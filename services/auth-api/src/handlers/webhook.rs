//! Pub/Sub push webhook handler
//!
//! Verifies the Google-signed push token before touching the body, parses
//! the push envelope with strict base64 decoding, and suppresses replayed
//! deliveries by fingerprint. Verification happens first so malformed
//! bodies from unauthenticated senders never reach the parser.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Pub/Sub push envelope
#[derive(Debug, Clone, Deserialize)]
pub struct PushEnvelope {
    pub message: PushMessage,
    #[serde(default)]
    pub subscription: Option<String>,
}

/// The message inside a push envelope
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    /// Base64-encoded payload
    pub data: String,
    pub message_id: String,
    pub publish_time: String,
}

/// Webhook acknowledgement
#[derive(Debug, Serialize)]
pub struct PushAck {
    pub status: &'static str,
}

/// POST /api/webhooks/pubsub
///
/// Pub/Sub acks on any 2xx; duplicates are acked without reprocessing so
/// the subscription does not retry them forever.
pub async fn pubsub_push(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<PushAck>> {
    // Push authentication token arrives as a bearer header; verification is
    // fail-closed and never throws
    let token = bearer_token(&headers).ok_or(ApiError::Forbidden)?;
    if !state.push.verify(token).await {
        return Err(ApiError::Forbidden);
    }

    let envelope: PushEnvelope = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("invalid push envelope: {e}")))?;

    if envelope.message.data.is_empty() {
        return Err(ApiError::BadRequest("missing message data".to_string()));
    }

    let payload = decode_message_data(&envelope.message.data)
        .map_err(|e| ApiError::BadRequest(format!("invalid message data: {e}")))?;

    let fingerprint = message_fingerprint(
        &envelope.message.message_id,
        &envelope.message.publish_time,
        envelope.message.data.len(),
    );

    if state.replay.contains_key(&fingerprint) {
        tracing::debug!(
            message_id = %envelope.message.message_id,
            "Replayed push delivery acked without reprocessing"
        );
        return Ok(Json(PushAck {
            status: "duplicate",
        }));
    }
    state.replay.insert(fingerprint, ()).await;

    tracing::info!(
        message_id = %envelope.message.message_id,
        subscription = envelope.subscription.as_deref().unwrap_or("-"),
        payload_bytes = payload.len(),
        "Push delivery accepted"
    );

    Ok(Json(PushAck { status: "ok" }))
}

/// Extract the bearer token from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
}

/// Decode the base64 message payload, rejecting sloppy encodings
fn decode_message_data(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    BASE64.decode(data)
}

/// Fingerprint for replay suppression
///
/// SHA-256 over message id, publish time, and the encoded payload length.
fn message_fingerprint(message_id: &str, publish_time: &str, data_len: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{message_id}{publish_time}{data_len}").as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_parses_camel_case() {
        let body = serde_json::json!({
            "message": {
                "data": "eyJlbWFpbEFkZHJlc3MiOiJ1c2VyQGV4YW1wbGUuY29tIn0=",
                "messageId": "136969346945",
                "publishTime": "2024-10-02T15:01:23.045123456Z"
            },
            "subscription": "projects/p/subscriptions/s"
        });
        let envelope: PushEnvelope = serde_json::from_value(body).unwrap();
        assert_eq!(envelope.message.message_id, "136969346945");
        assert_eq!(
            envelope.subscription.as_deref(),
            Some("projects/p/subscriptions/s")
        );
    }

    #[test]
    fn test_strict_base64_rejects_garbage() {
        assert!(decode_message_data("!!!not-base64!!!").is_err());
    }

    #[test]
    fn test_payload_decodes() {
        let decoded = decode_message_data("eyJoaXN0b3J5SWQiOjQyfQ==").unwrap();
        assert_eq!(decoded, br#"{"historyId":42}"#);
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let a = message_fingerprint("m1", "2024-10-02T15:01:23Z", 64);
        let b = message_fingerprint("m1", "2024-10-02T15:01:23Z", 64);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_fingerprint_varies_by_component() {
        let base = message_fingerprint("m1", "t1", 10);
        assert_ne!(base, message_fingerprint("m2", "t1", 10));
        assert_ne!(base, message_fingerprint("m1", "t2", 10));
        assert_ne!(base, message_fingerprint("m1", "t1", 11));
    }
}
