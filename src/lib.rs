//! Resilient document extraction over HTTP.
//!
//! The crate is split into two reusable pieces and one endpoint built on
//! them:
//! - [`backoff`]: retry-with-backoff executor for flaky outbound calls,
//! - [`dispatch`]: inbound request dispatcher with panic containment and
//!   guaranteed body release,
//! - [`api`]: the `/api/extract` endpoint that fetches a document through
//!   [`fetch`] and hands it to an [`extract::ArticleExtractor`].

pub mod api;
pub mod backoff;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod fetch;

pub use error::ExtractError;
