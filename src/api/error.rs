use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request failed with status code {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Build a status error from a non-success response body.
    ///
    /// The backend reports failures as `{"detail": "..."}`; anything else is
    /// passed through as-is, or replaced by the status reason when empty.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| value.get("detail").map(detail_text));

        let message = match detail {
            Some(detail) => detail,
            None if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("Unknown status")
                .to_string(),
            None => body.trim().to_string(),
        };

        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

// Validation failures carry a structured detail instead of a string
fn detail_text(detail: &serde_json::Value) -> String {
    match detail.as_str() {
        Some(text) => text.to_string(),
        None => detail.to_string(),
    }
}
