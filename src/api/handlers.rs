use std::fmt;

use async_trait::async_trait;
use axum::extract::Query;
use axum::http::{request::Parts, Method, StatusCode};
use reqwest::Url;

use crate::backoff::BackoffExecutor;
use crate::dispatch::{
    json_response, ApiHandler, HandlerError, HandlerResult, InboundRequest, RequestContext,
    ResponseEnvelope,
};
use crate::extract::ExtractionResult;
use crate::fetch::FetchedDocument;

use super::helpers::{bad_request, internal_error, method_not_allowed};
use super::state::ServerState;

/// Query string of the extraction endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractParams {
    pub method: Option<String>,
    pub content_type: Option<String>,
    pub url: Option<String>,
}

impl ExtractParams {
    /// Collects the known keys; a repeated key keeps its first value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "method" => &mut params.method,
                "type" => &mut params.content_type,
                "url" => &mut params.url,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// Validated outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractTarget {
    pub method: Method,
    pub content_type: Option<String>,
    pub url: Url,
}

/// Stages a request moves through, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtractStage {
    Validating,
    Fetching,
    Extracting,
    Rendering,
}

impl fmt::Display for ExtractStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExtractStage::Validating => "validating",
            ExtractStage::Fetching => "fetching",
            ExtractStage::Extracting => "extracting",
            ExtractStage::Rendering => "rendering",
        };
        f.write_str(name)
    }
}

/// Fetches the target URL with retries and returns the extracted article.
pub struct ExtractHandler {
    state: ServerState,
}

impl ExtractHandler {
    pub fn new(state: ServerState) -> Self {
        Self { state }
    }

    /// Checks the inbound verb and turns the query into an [`ExtractTarget`].
    pub fn validate(parts: &Parts) -> Result<ExtractTarget, HandlerError> {
        if parts.method != Method::GET {
            return Err(method_not_allowed(parts.method.as_str()));
        }

        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|err| bad_request(format!("invalid query string: {err}")))?;
        let params = ExtractParams::from_pairs(pairs);

        let method = match params.method.as_deref().filter(|m| !m.is_empty()) {
            None => Method::GET,
            Some(raw) => Method::from_bytes(raw.to_ascii_uppercase().as_bytes())
                .map_err(|_| bad_request(format!("invalid method '{raw}'")))?,
        };

        let raw_url = params
            .url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| bad_request("missing url parameter"))?;
        let url = Url::parse(raw_url.trim())
            .map_err(|err| bad_request(format!("invalid url '{raw_url}': {err}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(bad_request(format!(
                "unsupported url scheme '{}'",
                url.scheme()
            )));
        }

        Ok(ExtractTarget {
            method,
            content_type: params.content_type,
            url,
        })
    }

    async fn fetch(
        &self,
        ctx: &RequestContext,
        target: &ExtractTarget,
    ) -> Result<FetchedDocument, HandlerError> {
        let fetcher = self.state.fetchers().for_request().map_err(internal_error)?;
        let executor = BackoffExecutor::new(self.state.policy().clone())
            .with_cancellation(ctx.cancellation_token());

        executor
            .execute(|| fetcher.fetch(target.method.clone(), target.url.clone()))
            .await
            .map_err(internal_error)
    }

    fn extract(
        &self,
        ctx: &RequestContext,
        target: &ExtractTarget,
        document: &FetchedDocument,
    ) -> Result<ExtractionResult, HandlerError> {
        let result = self
            .state
            .extractor()
            .extract(&document.body, &document.final_url)
            .map_err(internal_error)?
            .with_content_type(target.content_type.clone());

        log::info!(
            "[{}] contentType={}",
            ctx.correlation_id(),
            result.content_type.as_deref().unwrap_or_default()
        );
        Ok(result)
    }

    fn render(result: ExtractionResult) -> HandlerResult {
        let body = serde_json::to_vec(&ResponseEnvelope::success(result))
            .map_err(|err| internal_error(err.into()))?;
        Ok(json_response(StatusCode::OK, body))
    }
}

fn enter(ctx: &RequestContext, stage: ExtractStage) {
    log::debug!("[{}] {stage}", ctx.correlation_id());
}

#[async_trait]
impl<B: Send + 'static> ApiHandler<B> for ExtractHandler {
    async fn handle(&self, ctx: &RequestContext, request: &mut InboundRequest<B>) -> HandlerResult {
        enter(ctx, ExtractStage::Validating);
        let target = Self::validate(request.parts())?;

        enter(ctx, ExtractStage::Fetching);
        let document = self.fetch(ctx, &target).await?;
        log::debug!(
            "[{}] fetched {} bytes from {} (status {})",
            ctx.correlation_id(),
            document.body.len(),
            document.final_url,
            document.status
        );

        enter(ctx, ExtractStage::Extracting);
        let result = self.extract(ctx, &target, &document)?;

        enter(ctx, ExtractStage::Rendering);
        Self::render(result)
    }
}
