//! Responses returned by a leader's config API.

use serde::Deserialize;

/// Body of a config API response.
///
/// Only the `error` field is inspected. It is kept as raw JSON so that a
/// non-string value can be detected instead of failing to decode.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    error: Option<serde_json::Value>,
}

impl ApiResponse {
    /// Decode a response body. Bodies that are not a JSON object decode to
    /// an empty response.
    pub fn from_slice(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// The error message, if the body carries one as a string.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().and_then(|e| e.as_str())
    }
}
