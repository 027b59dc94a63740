use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Extracted article, serialized as the `results` of a success envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    pub url: String,
    pub content: String,
    /// Caller-supplied hint, attached verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl ExtractionResult {
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: None,
            date: None,
            url: url.into(),
            content: content.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }
}
