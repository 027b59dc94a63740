use std::time::Duration;

use axum::http::Method;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// State owned by exactly one in-flight request.
///
/// Dropping the context cancels its token, so outbound work started on
/// behalf of the request stops once dispatch returns. The type is not
/// `Clone`; hand out [`cancellation_token`](Self::cancellation_token)
/// instead.
#[derive(Debug)]
pub struct RequestContext {
    correlation_id: Uuid,
    method: Method,
    target: String,
    cancel: CancellationToken,
    deadline: Option<Instant>,
    timer: Option<JoinHandle<()>>,
}

impl RequestContext {
    /// Creates a context; with a `deadline` the token fires after that long.
    ///
    /// Must be called from within a tokio runtime when a deadline is set.
    pub fn new(method: Method, target: impl Into<String>, deadline: Option<Duration>) -> Self {
        let cancel = CancellationToken::new();
        let timer = deadline.map(|limit| {
            let token = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(limit).await;
                token.cancel();
            })
        });

        Self {
            correlation_id: Uuid::new_v4(),
            method,
            target: target.into(),
            cancel,
            deadline: deadline.map(|limit| Instant::now() + limit),
            timer,
        }
    }

    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request target as received (path and query).
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Token that fires when the request is cancelled, times out, or ends.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for RequestContext {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
