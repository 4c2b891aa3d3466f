//! Article text extraction from HTML pages.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{header, Client};
use scraper::{ElementRef, Html, Node, Selector};

use crate::provider::{ContentExtractor, BROWSER_USER_AGENT};

/// Content fetches give up after this long.
pub const CONTENT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Tried in order; the first selector that matches wins.
const ARTICLE_SELECTORS: &[&str] = &[
    "article",
    "[role=\"article\"]",
    ".article-content",
    ".article-body",
    ".story-content",
    "main",
    "#article-body",
    ".caas-body",
];

/// Subtrees whose text is never article content.
const SKIPPED_TAGS: &[&str] = &["script", "style", "nav", "header", "footer", "iframe", "noscript"];
const SKIPPED_CLASSES: &[&str] = &["advertisement", "ads"];

/// Fetches a page and pulls out its main article text.
pub struct HtmlContentExtractor {
    client: Client,
}

impl HtmlContentExtractor {
    pub fn new() -> Self {
        Self::with_timeout(CONTENT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }
}

impl Default for HtmlContentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn is_skipped(element: &scraper::node::Element) -> bool {
    SKIPPED_TAGS.contains(&element.name()) || element.classes().any(|c| SKIPPED_CLASSES.contains(&c))
}

/// Text of `root`, excluding skipped subtrees.
fn visible_text(root: ElementRef<'_>) -> String {
    let mut parts = Vec::new();
    for node in root.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != root.id())
            .filter_map(|ancestor| ancestor.value().as_element())
            .any(is_skipped);
        if !hidden {
            parts.push(&**text);
        }
    }
    parts.join(" ")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts the main article text from an HTML document.
pub fn extract_article_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    for selector_str in ARTICLE_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let text = collapse_whitespace(&visible_text(element));
            if !text.is_empty() {
                return Some(text);
            }
        }
    }

    // Fallback to paragraph text if no container matched
    let selector = Selector::parse("p").ok()?;
    let text = document
        .select(&selector)
        .filter(|p| {
            !p.ancestors()
                .filter_map(|ancestor| ancestor.value().as_element())
                .any(is_skipped)
        })
        .map(|p| collapse_whitespace(&visible_text(p)))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}

#[async_trait]
impl ContentExtractor for HtmlContentExtractor {
    async fn extract_content(&self, url: &str) -> Option<String> {
        let response = match self
            .client
            .get(url)
            .header(header::ACCEPT, "text/html")
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!("Content fetch for {} returned HTTP {}", url, response.status());
                return None;
            }
            Err(e) => {
                debug!("Content fetch for {} failed: {}", url, e);
                return None;
            }
        };
        let html = response.text().await.ok()?;
        extract_article_text(&html)
    }
}
