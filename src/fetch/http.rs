use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{cookie::Jar, redirect, Method, StatusCode, Url};

use crate::config::FetchConfig;
use crate::error::ExtractError;

use super::traits::{FetchedDocument, Fetcher, FetcherFactory};

/// Builds a `reqwest` client with its own cookie jar for every request.
#[derive(Clone, Debug)]
pub struct HttpFetcherFactory {
    config: FetchConfig,
}

impl HttpFetcherFactory {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }
}

impl FetcherFactory for HttpFetcherFactory {
    fn for_request(&self) -> Result<Box<dyn Fetcher>, ExtractError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(self.config.user_agent.as_str())
            .redirect(redirect::Policy::limited(self.config.max_redirects))
            .cookie_provider(Arc::new(Jar::default()));
        if let Some(timeout) = self.config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ExtractError::Config(format!("failed to build HTTP client: {err}")))?;
        Ok(Box::new(HttpFetcher::new(client)))
    }
}

/// Fetcher backed by a single `reqwest::Client`.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, method: Method, url: Url) -> Result<FetchedDocument, ExtractError> {
        let response = self.client.request(method.clone(), url.clone()).send().await?;
        let status = response.status();
        log::debug!("{method} {url} HTTP status: {status}");

        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ExtractError::UpstreamStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let final_url = response.url().clone();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(FetchedDocument {
            status: status.as_u16(),
            final_url,
            headers,
            body,
        })
    }
}
