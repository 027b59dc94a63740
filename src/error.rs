use axum::http::StatusCode;
use thiserror::Error;

/// Message returned to callers when a handler fault is recovered.
pub const INTERNAL_FAULT_MESSAGE: &str = "internal server error";

/// Error types produced while serving an extraction request.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Invalid inbound request parameters
    #[error("{0}")]
    Validation(String),
    /// Inbound request used a verb the endpoint does not serve
    #[error("unexpected method '{0}'")]
    MethodNotAllowed(String),
    /// Outbound request could not be constructed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Transient transport failure talking to the remote host
    #[error("HTTP error: {0}")]
    Transport(String),
    /// Remote host answered with a status worth retrying
    #[error("upstream returned {status} for {url}")]
    UpstreamStatus { status: u16, url: String },
    /// Retry attempts exceeded
    #[error("Retry attempts exceeded after {attempts} tries: {last_error}")]
    RetryExceeded { attempts: usize, last_error: String },
    /// The request deadline fired or the request was abandoned
    #[error("request cancelled: {0}")]
    Cancelled(String),
    /// The extraction collaborator rejected the document
    #[error("Extraction error: {0}")]
    Extraction(String),
    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
    /// A handler panicked; the detail stays in the server log
    #[error("internal fault: {0}")]
    InternalFault(String),
    /// Invalid configuration value
    #[error("Config error: {0}")]
    Config(String),
}

impl ExtractError {
    /// Default retry classification for outbound fetches.
    pub fn is_retryable(&self) -> bool {
        match self {
            ExtractError::Transport(_) => true,
            ExtractError::UpstreamStatus { .. } => true,
            ExtractError::Validation(_) => false,
            ExtractError::MethodNotAllowed(_) => false,
            ExtractError::InvalidRequest(_) => false,
            ExtractError::RetryExceeded { .. } => false,
            ExtractError::Cancelled(_) => false,
            ExtractError::Extraction(_) => false,
            ExtractError::Json(_) => false,
            ExtractError::InternalFault(_) => false,
            ExtractError::Config(_) => false,
        }
    }

    /// Status code used when the error ends a request.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExtractError::Validation(_) | ExtractError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ExtractError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text that is safe to echo back to the caller.
    pub fn public_message(&self) -> String {
        match self {
            ExtractError::InternalFault(_) => INTERNAL_FAULT_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Converts reqwest errors, keeping construction failures terminal
impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ExtractError::InvalidRequest(err.to_string())
        } else {
            ExtractError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ExtractError {
    fn from(err: serde_json::Error) -> Self {
        ExtractError::Json(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}
