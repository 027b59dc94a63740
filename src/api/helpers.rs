use axum::http::StatusCode;

use crate::dispatch::HandlerError;
use crate::error::ExtractError;

pub fn bad_request(msg: impl Into<String>) -> HandlerError {
    HandlerError::new(StatusCode::BAD_REQUEST, ExtractError::Validation(msg.into()))
}

pub fn method_not_allowed(method: impl Into<String>) -> HandlerError {
    HandlerError::new(
        StatusCode::METHOD_NOT_ALLOWED,
        ExtractError::MethodNotAllowed(method.into()),
    )
}

pub fn internal_error(err: ExtractError) -> HandlerError {
    HandlerError::new(StatusCode::INTERNAL_SERVER_ERROR, err)
}
