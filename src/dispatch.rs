//! Inbound request dispatch: per-request context, panic containment,
//! guaranteed body release and the JSON response envelope.

#[path = "dispatch/context.rs"]
mod context;

#[path = "dispatch/body.rs"]
mod body;

#[path = "dispatch/envelope.rs"]
mod envelope;

#[path = "dispatch/dispatcher.rs"]
mod dispatcher;

pub use body::{InboundRequest, ScopedBody};
pub use context::RequestContext;
pub use dispatcher::{
    dispatch, panic_message, ApiHandler, Dispatcher, HandlerError, HandlerResult,
};
pub use envelope::{json_response, render_json_error, ResponseEnvelope};
