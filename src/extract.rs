#[path = "extract/result.rs"]
mod result;

#[path = "extract/simple.rs"]
mod simple;

use reqwest::Url;

use crate::error::ExtractError;

pub use result::ExtractionResult;
pub use simple::SimpleExtractor;

/// Turns a fetched document into article text.
pub trait ArticleExtractor: Send + Sync {
    fn extract(&self, document: &[u8], url: &Url) -> Result<ExtractionResult, ExtractError>;
}
