use std::sync::Arc;

use log::{info, warn};
use serde_json::json;

use marketlens_cache::{cache_key, ttl, CacheCoordinator};
use marketlens_market_data::{
    validate_symbol, with_retry, ContentExtractor, NewsItem, NewsSource, RetryConfig,
    SentimentClassifier,
};

use super::enrich::enrich_all;
use super::merge::merge_news;
use crate::errors::{log_error, DataError, Result};

/// Aggregates news from two independent sources behind the shared cache.
pub struct NewsService {
    cache: Arc<CacheCoordinator>,
    primary: Arc<dyn NewsSource>,
    secondary: Arc<dyn NewsSource>,
    extractor: Arc<dyn ContentExtractor>,
    classifier: Arc<dyn SentimentClassifier>,
    retry: RetryConfig,
}

impl NewsService {
    pub fn new(
        cache: Arc<CacheCoordinator>,
        primary: Arc<dyn NewsSource>,
        secondary: Arc<dyn NewsSource>,
        extractor: Arc<dyn ContentExtractor>,
        classifier: Arc<dyn SentimentClassifier>,
    ) -> Self {
        Self {
            cache,
            primary,
            secondary,
            extractor,
            classifier,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Deduplicated, enriched news for `symbol`, newest first.
    ///
    /// Only an invalid symbol is an error. When neither source answers the
    /// result is empty and nothing is cached, so the next request tries again.
    pub async fn get_company_news(&self, symbol: &str) -> Result<Vec<NewsItem>> {
        validate_symbol(symbol)?;
        let key = cache_key("news", &[symbol]);

        match self
            .cache
            .get_cached_data(&key, ttl::NEWS, || self.aggregate(symbol))
            .await
        {
            Ok(items) => Ok(items),
            Err(err) => {
                warn!("No news source answered for {}: {}", symbol, err);
                Ok(Vec::new())
            }
        }
    }

    async fn aggregate(&self, symbol: &str) -> Result<Vec<NewsItem>> {
        let (primary, secondary) = futures::join!(
            self.fetch_source(self.primary.as_ref(), symbol),
            self.fetch_source(self.secondary.as_ref(), symbol),
        );

        let (primary, secondary) = match (primary, secondary) {
            (Err(_), Err(last)) => return Err(last),
            (primary, secondary) => (primary.unwrap_or_default(), secondary.unwrap_or_default()),
        };

        let merged = merge_news(primary, secondary);
        info!("Aggregated {} news items for {}", merged.len(), symbol);
        Ok(enrich_all(merged, self.extractor.as_ref(), self.classifier.as_ref()).await)
    }

    async fn fetch_source(&self, source: &dyn NewsSource, symbol: &str) -> Result<Vec<NewsItem>> {
        with_retry(&self.retry, || source.search_news(symbol))
            .await
            .inspect_err(|err: &DataError| {
                log_error(
                    err,
                    json!({
                        "symbol": symbol,
                        "source": source.id(),
                        "service": "get_company_news",
                    }),
                );
            })
    }
}
