use chrono::{DateTime, Utc};
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;

use super::{ArticleExtractor, ExtractionResult};

const CONTENT_ROOTS: [&str; 3] = ["article", "main", "body"];
const DATE_SOURCES: [(&str, &str); 4] = [
    (r#"meta[property="article:published_time"]"#, "content"),
    (r#"meta[name="date"]"#, "content"),
    (r#"meta[itemprop="datePublished"]"#, "content"),
    ("time[datetime]", "datetime"),
];

/// Title, publication date and paragraph text; no boilerplate scoring.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleExtractor;

impl SimpleExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ArticleExtractor for SimpleExtractor {
    fn extract(&self, document: &[u8], url: &Url) -> Result<ExtractionResult, ExtractError> {
        let html = String::from_utf8_lossy(document);
        if html.trim().is_empty() {
            return Err(ExtractError::Extraction(format!("empty document at {url}")));
        }

        let parsed = Html::parse_document(&html);
        let title = first_text(&parsed, "title")?;
        let date = published_date(&parsed)?;
        let content = main_text(&parsed)?;

        if title.is_none() && content.is_empty() {
            return Err(ExtractError::Extraction(format!(
                "no text content found at {url}"
            )));
        }

        Ok(ExtractionResult {
            title,
            date,
            ..ExtractionResult::new(url.as_str(), content)
        })
    }
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css)
        .map_err(|err| ExtractError::Extraction(format!("invalid selector {css}: {err}")))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn first_text(document: &Html, css: &str) -> Result<Option<String>, ExtractError> {
    let sel = selector(css)?;
    Ok(document
        .select(&sel)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty()))
}

fn published_date(document: &Html) -> Result<Option<DateTime<Utc>>, ExtractError> {
    for (css, attr) in DATE_SOURCES {
        let sel = selector(css)?;
        let parsed = document
            .select(&sel)
            .filter_map(|el| el.value().attr(attr))
            .find_map(|raw| DateTime::parse_from_rfc3339(raw.trim()).ok());
        if let Some(date) = parsed {
            return Ok(Some(date.with_timezone(&Utc)));
        }
    }
    Ok(None)
}

fn main_text(document: &Html) -> Result<String, ExtractError> {
    let paragraphs = selector("p")?;
    for css in CONTENT_ROOTS {
        let sel = selector(css)?;
        let Some(root) = document.select(&sel).next() else {
            continue;
        };

        let text: Vec<String> = root
            .select(&paragraphs)
            .map(element_text)
            .filter(|p| !p.is_empty())
            .collect();
        if !text.is_empty() {
            return Ok(text.join("\n\n"));
        }

        let fallback = element_text(root);
        if !fallback.is_empty() {
            return Ok(fallback);
        }
    }
    Ok(String::new())
}
