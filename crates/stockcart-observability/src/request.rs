//! Request correlation.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::Span;

/// Unique identifier of one request, attached to its span.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random request ID.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 12] = rand::thread_rng().gen();
        Self(format!("req_{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Span wrapping one cart operation.
pub fn request_span(request_id: &RequestId, operation: &'static str, buyer_id: &str) -> Span {
    tracing::info_span!(
        "cart_request",
        request_id = %request_id,
        op = operation,
        buyer_id = buyer_id
    )
}
