use std::sync::Arc;

use crate::backoff::BackoffPolicy;
use crate::config::{AppConfig, ConfigError};
use crate::dispatch::Dispatcher;
use crate::extract::{ArticleExtractor, SimpleExtractor};
use crate::fetch::{FetcherFactory, HttpFetcherFactory};

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct ServerState {
    fetchers: Arc<dyn FetcherFactory>,
    extractor: Arc<dyn ArticleExtractor>,
    policy: BackoffPolicy,
    dispatcher: Dispatcher,
}

impl ServerState {
    pub fn new(
        fetchers: Arc<dyn FetcherFactory>,
        extractor: Arc<dyn ArticleExtractor>,
        policy: BackoffPolicy,
    ) -> Self {
        Self {
            fetchers,
            extractor,
            policy,
            dispatcher: Dispatcher::new(),
        }
    }

    /// Wires the HTTP fetcher and the default extractor from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let policy = config.backoff.to_policy()?;
        let state = Self::new(
            Arc::new(HttpFetcherFactory::new(config.fetch.clone())),
            Arc::new(SimpleExtractor::new()),
            policy,
        );
        Ok(state.with_dispatcher(Dispatcher::new().with_deadline(config.request.deadline())))
    }

    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn fetchers(&self) -> &dyn FetcherFactory {
        self.fetchers.as_ref()
    }

    pub fn extractor(&self) -> &dyn ArticleExtractor {
        self.extractor.as_ref()
    }

    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}
