//! Deepgram error payloads shared by the listen and speak endpoints.
//!
//! Deepgram reports failures as small JSON documents, but the shape differs
//! between endpoints and API generations:
//!
//! ```json
//! {"err_code": "INVALID_AUTH", "err_msg": "Invalid credentials.", "request_id": "..."}
//! {"category": "INVALID_JSON", "message": "Invalid JSON submitted.", "details": "..."}
//! {"err": "bad request"}
//! ```
//!
//! [`DeepgramErrorResponse`] keeps the raw document and extracts the most
//! specific human-readable message it can find.

use http::{HeaderMap, StatusCode};
use serde_json::Value;

use crate::errors::NodeError;

/// Response header carrying Deepgram's request id.
pub const REQUEST_ID_HEADER: &str = "dg-request-id";

/// Fields inspected, in order, for an error message.
const MESSAGE_FIELDS: [&str; 6] = ["err_msg", "message", "error", "err", "reason", "details"];

/// A parsed Deepgram error document.
#[derive(Debug, Clone, PartialEq)]
pub struct DeepgramErrorResponse {
    document: Value,
}

impl DeepgramErrorResponse {
    /// Parse an error body. Returns `None` when the body is not JSON.
    pub fn from_slice(body: &[u8]) -> Option<Self> {
        serde_json::from_slice::<Value>(body)
            .ok()
            .map(|document| Self { document })
    }

    /// The most specific message in the document, or the compact JSON text
    /// when no known message field is present.
    pub fn message(&self) -> String {
        if let Value::Object(map) = &self.document {
            for field in MESSAGE_FIELDS {
                if let Some(Value::String(msg)) = map.get(field) {
                    if !msg.trim().is_empty() {
                        return msg.clone();
                    }
                }
            }
        }
        self.document.to_string()
    }

    /// Request id embedded in the body, if any.
    pub fn request_id(&self) -> Option<&str> {
        self.document.get("request_id").and_then(Value::as_str)
    }
}

/// Request id from the response headers.
pub fn request_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .or_else(|| headers.get("x-request-id"))
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// ` [request_id: ...]` suffix, empty when no id is known.
pub fn request_id_suffix(request_id: Option<&str>) -> String {
    request_id
        .map(|id| format!(" [request_id: {id}]"))
        .unwrap_or_default()
}

/// Map a non-success HTTP status and its body to a [`NodeError`].
pub fn classify_http_failure(
    status: StatusCode,
    body: &[u8],
    header_request_id: Option<&str>,
) -> NodeError {
    let parsed = DeepgramErrorResponse::from_slice(body);

    let detail = match &parsed {
        Some(error_response) => error_response.message(),
        None => {
            let text = String::from_utf8_lossy(body);
            let text = text.trim();
            if text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("no response body")
                    .to_string()
            } else {
                text.to_string()
            }
        }
    };

    let request_id = header_request_id.or_else(|| parsed.as_ref().and_then(|p| p.request_id()));
    let suffix = request_id_suffix(request_id);

    let message = match status.as_u16() {
        401 | 403 => format!("Authentication failed: {detail}"),
        402 => format!("Insufficient account balance: {detail}"),
        413 => format!("Payload too large: {detail}"),
        429 => format!("Rate limit exceeded: {detail}"),
        500..=599 => format!("Server error: {detail}"),
        _ => detail,
    };

    NodeError::ProviderError(format!(
        "Deepgram API Error ({}): {message}{suffix}",
        status.as_u16()
    ))
}
