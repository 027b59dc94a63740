use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header::HeaderMap, Method, Url};

use crate::error::ExtractError;

/// Remote document fully read into memory.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub status: u16,
    /// URL after redirects.
    pub final_url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Outbound transport used by the extraction endpoint.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, method: Method, url: Url) -> Result<FetchedDocument, ExtractError>;
}

/// Hands out one fetcher per inbound request so no client state (cookies in
/// particular) leaks between unrelated fetches.
pub trait FetcherFactory: Send + Sync {
    fn for_request(&self) -> Result<Box<dyn Fetcher>, ExtractError>;
}
