//! HTTP surface: `GET /api/extract?method=&type=&url=`.

#[path = "api/state.rs"]
mod state;

#[path = "api/helpers.rs"]
mod helpers;

#[path = "api/handlers.rs"]
mod handlers;

use axum::{extract::State, routing::any, Router};
use axum::{extract::Request, response::Response};

use crate::dispatch::render_json_error;

pub use handlers::{ExtractHandler, ExtractParams, ExtractStage, ExtractTarget};
pub use state::ServerState;

pub const EXTRACT_PATH: &str = "/api/extract";

/// Router serving the extraction endpoint.
///
/// Every verb is routed to the handler so that wrong methods still get the
/// JSON envelope instead of the router's empty 405.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route(EXTRACT_PATH, any(handle_extract))
        .with_state(state)
}

async fn handle_extract(State(state): State<ServerState>, request: Request) -> Response {
    let handler = ExtractHandler::new(state.clone());
    state
        .dispatcher()
        .dispatch(request, &handler, render_json_error)
        .await
}
