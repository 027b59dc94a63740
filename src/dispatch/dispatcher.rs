use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{request::Parts, Request, StatusCode};
use axum::response::Response;
use futures::FutureExt;

use crate::error::ExtractError;

use super::body::InboundRequest;
use super::context::RequestContext;

/// Failure reported by a handler: the status to send and the cause.
#[derive(Debug)]
pub struct HandlerError {
    pub status: StatusCode,
    pub error: ExtractError,
}

impl HandlerError {
    pub fn new(status: StatusCode, error: ExtractError) -> Self {
        Self { status, error }
    }
}

impl From<ExtractError> for HandlerError {
    fn from(error: ExtractError) -> Self {
        Self {
            status: error.status_code(),
            error,
        }
    }
}

pub type HandlerResult = Result<Response, HandlerError>;

/// Anything with the `(context, request) -> response | (status, error)`
/// shape can be dispatched.
///
/// On `Ok` the handler has produced the complete success response. On `Err`
/// the dispatcher renders the body through its error callback.
#[async_trait]
pub trait ApiHandler<B: Send + 'static>: Send + Sync {
    async fn handle(&self, ctx: &RequestContext, request: &mut InboundRequest<B>)
        -> HandlerResult;
}

/// Runs handlers inside a recovery boundary.
#[derive(Clone, Debug, Default)]
pub struct Dispatcher {
    deadline: Option<Duration>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels each request's context after `deadline`.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub async fn dispatch<B, H, E>(&self, request: Request<B>, handler: &H, on_error: E) -> Response
    where
        B: Send + 'static,
        H: ApiHandler<B> + ?Sized,
        E: Fn(&RequestContext, &Parts, &ExtractError, StatusCode) -> Response,
    {
        let (parts, body) = request.into_parts();
        let target = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());
        let ctx = RequestContext::new(parts.method.clone(), target, self.deadline);
        let id = ctx.correlation_id();

        log::info!("[{id}] {} {}", ctx.method(), ctx.target());

        let mut request = InboundRequest::new(parts, body, id);
        let outcome = AssertUnwindSafe(handler.handle(&ctx, &mut request))
            .catch_unwind()
            .await;

        let outcome = match outcome {
            Ok(result) => result,
            Err(payload) => {
                let detail = panic_message(&*payload);
                log::error!("[{id}] handler panic: {detail}");
                Err(HandlerError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ExtractError::InternalFault(detail),
                ))
            }
        };

        request.body.close();

        match outcome {
            Ok(response) => response,
            Err(HandlerError { status, error }) => {
                log::error!("[{id}] {error}");
                let mut response = on_error(&ctx, &request.parts, &error, status);
                *response.status_mut() = status;
                response
            }
        }
    }
}

/// Dispatches with a default [`Dispatcher`] (no deadline).
pub async fn dispatch<B, H, E>(request: Request<B>, handler: &H, on_error: E) -> Response
where
    B: Send + 'static,
    H: ApiHandler<B> + ?Sized,
    E: Fn(&RequestContext, &Parts, &ExtractError, StatusCode) -> Response,
{
    Dispatcher::new().dispatch(request, handler, on_error).await
}

/// Textual form of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(err) = payload.downcast_ref::<ExtractError>() {
        err.to_string()
    } else {
        "unknown panic".to_string()
    }
}
