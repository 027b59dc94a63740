use axum::body::Body;
use axum::http::{header, request::Parts, HeaderValue, StatusCode};
use axum::response::Response;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

use super::context::RequestContext;

/// Wire-level result: `results` on success, `message` on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T = serde_json::Value> {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ResponseEnvelope<T> {
    pub fn success(results: T) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            results: Some(results),
            message: None,
        }
    }

    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            results: None,
            message: Some(message.into()),
        }
    }
}

/// Builds a response carrying an already-encoded JSON body.
pub fn json_response(status: StatusCode, body: Vec<u8>) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

/// Default error renderer: `{"status": <code>, "message": <text>}`.
pub fn render_json_error(
    ctx: &RequestContext,
    _parts: &Parts,
    err: &ExtractError,
    status: StatusCode,
) -> Response {
    let envelope: ResponseEnvelope = ResponseEnvelope::failure(status, err.public_message());
    match serde_json::to_vec(&envelope) {
        Ok(body) => json_response(status, body),
        Err(encode_err) => {
            log::error!(
                "[{}] failed to encode error envelope: {encode_err}",
                ctx.correlation_id()
            );
            json_response(status, Vec::new())
        }
    }
}
