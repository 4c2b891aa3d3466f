//! Best-effort per-item enrichment.
//!
//! Nothing here can fail: a page that cannot be fetched or a text the
//! classifier cannot score leaves the corresponding field unset.

use futures::stream::{self, StreamExt};
use log::debug;

use marketlens_market_data::article::{estimate_read_time, extract_metrics, summarize};
use marketlens_market_data::{ContentExtractor, NewsItem, SentimentClassifier};

/// Article pages fetched at once per request.
pub const ENRICH_CONCURRENCY: usize = 4;

/// Fills in content-derived fields of `item`.
///
/// Sentiment is scored on the article body when one was extracted, otherwise
/// on the headline and provider snippet.
pub async fn enrich_item(
    mut item: NewsItem,
    extractor: &dyn ContentExtractor,
    classifier: &dyn SentimentClassifier,
) -> NewsItem {
    let content = extractor
        .extract_content(&item.link)
        .await
        .filter(|text| !text.trim().is_empty());

    if content.is_none() {
        debug!("No article body for {}", item.link);
    }

    let sentiment_input = match &content {
        Some(body) => body.clone(),
        None => format!("{} {}", item.title, item.summary),
    };
    item.sentiment = classifier.classify(&sentiment_input).await;

    if let Some(body) = content.as_deref() {
        item.metrics = extract_metrics(body);
        item.estimated_read_time = estimate_read_time(body);
    }
    item.summary = summarize(&item.title, &item.summary, content.as_deref());
    item
}

/// Enriches `items` concurrently, preserving their order.
pub async fn enrich_all(
    items: Vec<NewsItem>,
    extractor: &dyn ContentExtractor,
    classifier: &dyn SentimentClassifier,
) -> Vec<NewsItem> {
    stream::iter(items)
        .map(|item| enrich_item(item, extractor, classifier))
        .buffered(ENRICH_CONCURRENCY)
        .collect()
        .await
}
