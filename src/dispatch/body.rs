use axum::http::{request::Parts, Method};
use uuid::Uuid;

/// Request body released exactly once.
///
/// The dispatcher closes the body when the handler is done; if the dispatch
/// future is dropped first, `Drop` does it instead. A closed body stays
/// closed.
pub struct ScopedBody<B> {
    body: Option<B>,
    correlation_id: Uuid,
}

impl<B> ScopedBody<B> {
    pub(crate) fn new(body: B, correlation_id: Uuid) -> Self {
        Self {
            body: Some(body),
            correlation_id,
        }
    }

    pub fn get_ref(&self) -> Option<&B> {
        self.body.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.body.is_none()
    }

    /// Releases the body; returns `false` when it was already released.
    pub(crate) fn close(&mut self) -> bool {
        match self.body.take() {
            Some(body) => {
                drop(body);
                log::debug!("[{}] request body closed", self.correlation_id);
                true
            }
            None => false,
        }
    }
}

impl<B> Drop for ScopedBody<B> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Inbound request as seen by a handler.
pub struct InboundRequest<B> {
    pub(super) parts: Parts,
    pub(super) body: ScopedBody<B>,
}

impl<B> InboundRequest<B> {
    pub(crate) fn new(parts: Parts, body: B, correlation_id: Uuid) -> Self {
        Self {
            parts,
            body: ScopedBody::new(body, correlation_id),
        }
    }

    pub fn parts(&self) -> &Parts {
        &self.parts
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn body(&self) -> &ScopedBody<B> {
        &self.body
    }
}
