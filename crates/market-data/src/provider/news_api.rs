//! NewsAPI news source.
//!
//! Searches `{symbol} stock` across a fixed set of wire-service and finance
//! domains for the past seven days. Articles from paywalled outlets are
//! dropped.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::DataError;
use crate::models::{NewsItem, SourceReliability};
use crate::provider::NewsSource;

const BASE_URL: &str = "https://newsapi.org/v2/everything";
const DOMAINS: &str = "reuters.com,apnews.com,finance.yahoo.com,investing.com,seekingalpha.com/news";
const LOOKBACK_DAYS: i64 = 7;

/// Phrases marking paywalled or promotional content.
const PREMIUM_INDICATORS: &[&str] = &[
    "subscription required",
    "subscribers only",
    "premium",
    "benzinga",
    "motley fool",
    "zacks",
    "seeking alpha premium",
];

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    title: Option<String>,
    url: Option<String>,
    source: NewsApiSourceName,
    published_at: Option<DateTime<Utc>>,
    description: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSourceName {
    name: Option<String>,
}

impl NewsApiArticle {
    fn is_premium(&self) -> bool {
        [&self.title, &self.description, &self.content]
            .into_iter()
            .flatten()
            .map(|text| text.to_lowercase())
            .any(|text| PREMIUM_INDICATORS.iter().any(|p| text.contains(p)))
    }
}

/// Reuters and AP are treated as primary sources.
fn reliability_for(publisher: &str) -> SourceReliability {
    let publisher = publisher.to_lowercase();
    if publisher.contains("reuters") || publisher.contains("ap") {
        SourceReliability::High
    } else {
        SourceReliability::Medium
    }
}

pub struct NewsApiSource {
    client: Client,
    api_key: String,
}

impl NewsApiSource {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, api_key }
    }

    fn map_articles(symbol: &str, response: NewsApiResponse) -> Result<Vec<NewsItem>, DataError> {
        if response.status != "ok" {
            let message = response
                .message
                .unwrap_or_else(|| "NewsAPI request failed".to_string());
            // rateLimited is transient, everything else (bad key, bad params) is not.
            let retryable = response.code.as_deref() == Some("rateLimited");
            return Err(DataError::api(message, if retryable { 429 } else { 400 }, retryable));
        }

        let items = response
            .articles
            .into_iter()
            .filter(|article| !article.is_premium())
            .filter_map(|article| {
                let title = article.title.filter(|t| !t.trim().is_empty())?;
                let link = article.url?;
                let publisher = article.source.name.unwrap_or_else(|| "NewsAPI".to_string());
                let mut item = NewsItem::new(
                    title,
                    link,
                    publisher.clone(),
                    article.published_at.unwrap_or_else(Utc::now),
                    reliability_for(&publisher),
                );
                item.summary = article
                    .description
                    .filter(|d| !d.trim().is_empty())
                    .or(article.content.filter(|c| !c.trim().is_empty()).map(|c| truncate_snippet(&c)))
                    .unwrap_or_default();
                item.related_tickers = vec![symbol.to_string()];
                Some(item)
            })
            .collect();
        Ok(items)
    }
}

/// NewsAPI truncates `content` with a "[+123 chars]" marker; cut to 300 chars.
fn truncate_snippet(content: &str) -> String {
    let head: String = content.chars().take(300).collect();
    format!("{}...", head)
}

#[async_trait]
impl NewsSource for NewsApiSource {
    fn id(&self) -> &'static str {
        "NEWS_API"
    }

    async fn search_news(&self, symbol: &str) -> Result<Vec<NewsItem>, DataError> {
        if self.api_key.is_empty() {
            debug!("NewsAPI key not configured; skipping");
            return Ok(Vec::new());
        }

        let query = format!("{} stock", symbol);
        let from = (Utc::now() - chrono::Duration::days(LOOKBACK_DAYS)).to_rfc3339();
        let response = self
            .client
            .get(BASE_URL)
            .query(&[
                ("q", query.as_str()),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("domains", DOMAINS),
                ("from", from.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body: NewsApiResponse = response.json().await.map_err(|e| {
            if status.is_success() {
                DataError::from(e)
            } else {
                DataError::from_status(status, format!("NewsAPI failed: HTTP {}", status))
            }
        })?;
        let items = Self::map_articles(symbol, body)?;
        debug!("NewsAPI returned {} items for {}", items.len(), symbol);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> NewsApiResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_premium_articles_are_dropped() {
        let response = parse(
            r#"{"status": "ok", "articles": [
                {"title": "Apple announces buyback", "url": "https://r/1", "source": {"name": "Reuters"},
                 "publishedAt": "2024-06-01T12:00:00Z", "description": "Apple said..."},
                {"title": "3 reasons to buy Apple", "url": "https://m/2", "source": {"name": "Motley Fool"},
                 "publishedAt": "2024-06-01T13:00:00Z", "description": "The Motley Fool thinks..."},
                {"title": "Apple outlook", "url": "https://s/3", "source": {"name": "Investing.com"},
                 "publishedAt": "2024-06-01T14:00:00Z", "content": "Subscribers only. Read more"}
            ]}"#,
        );
        let items = NewsApiSource::map_articles("AAPL", response).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Apple announces buyback");
        assert_eq!(items[0].summary, "Apple said...");
    }

    #[test]
    fn test_reliability_by_publisher() {
        assert_eq!(reliability_for("Reuters"), SourceReliability::High);
        assert_eq!(reliability_for("AP News"), SourceReliability::High);
        assert_eq!(reliability_for("Investing.com"), SourceReliability::Medium);
    }

    #[test]
    fn test_error_status_maps_to_api_error() {
        let response = parse(r#"{"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid"}"#);
        let err = NewsApiSource::map_articles("AAPL", response).unwrap_err();
        assert_eq!(err, DataError::api("Your API key is invalid", 400, false));

        let response = parse(r#"{"status": "error", "code": "rateLimited", "message": "Too many requests"}"#);
        let err = NewsApiSource::map_articles("AAPL", response).unwrap_err();
        assert_eq!(err.retry_class(), crate::errors::RetryClass::WithBackoff);
    }

    #[test]
    fn test_content_snippet_fallback() {
        let response = parse(
            r#"{"status": "ok", "articles": [
                {"title": "Apple", "url": "https://r/1", "source": {"name": "Reuters"},
                 "publishedAt": "2024-06-01T12:00:00Z", "content": "Short body"}
            ]}"#,
        );
        let items = NewsApiSource::map_articles("AAPL", response).unwrap();
        assert_eq!(items[0].summary, "Short body...");
    }

    #[tokio::test]
    async fn test_missing_key_yields_no_items() {
        let source = NewsApiSource::new(String::new(), Duration::from_secs(1));
        assert!(source.search_news("AAPL").await.unwrap().is_empty());
    }
}
