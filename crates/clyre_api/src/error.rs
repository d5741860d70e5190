use ndjson_stream::NdjsonError;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClyreApiError {
    #[error("access token is required")]
    MissingAccessToken,

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status} {message}")]
    Status { status: StatusCode, message: String },

    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(StatusCode),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Stream(#[from] NdjsonError),

    #[error("request was cancelled")]
    Cancelled,
}

impl ClyreApiError {
    /// HTTP status carried by the error, when the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } | Self::UnexpectedStatus(status) => Some(*status),
            Self::Request(error) => error.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Cancellation is a normal way for a stream to end, not a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    detail: Option<Value>,
    error: Option<ErrorPayloadFields>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorPayloadFields {
    message: Option<String>,
}

impl ErrorPayload {
    fn message(&self) -> Option<String> {
        let detail = self.detail.as_ref().and_then(|detail| match detail {
            Value::String(text) => non_empty(text),
            Value::Null => None,
            other => Some(other.to_string()),
        });

        detail
            .or_else(|| {
                self.error
                    .as_ref()
                    .and_then(|error| error.message.as_deref())
                    .and_then(non_empty)
            })
            .or_else(|| self.message.as_deref().and_then(non_empty))
    }
}

/// Turn an error response body into a human-readable message.
///
/// Understands `{"detail": ...}` bodies, `{"error": {"message": ...}}` bodies, and bare
/// `{"message": ...}` bodies; otherwise falls back to the raw body or the canonical reason.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) {
        if let Some(message) = payload.message() {
            return message;
        }
    }

    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}
