use std::sync::Arc;

use futures::future::join_all;
use log::warn;
use serde_json::json;

use marketlens_cache::{cache_key, ttl, CacheCoordinator};
use marketlens_market_data::{with_retry, QuoteProvider, RetryConfig, StockQuote};

use super::model::{MarketIndex, MARKET_INDICES, TRENDING_SYMBOLS};
use crate::errors::{log_error, DataError, Result};

/// Dashboard-wide market data. Symbols are fixed, so no validation applies.
pub struct MarketService {
    cache: Arc<CacheCoordinator>,
    quotes: Arc<dyn QuoteProvider>,
    retry: RetryConfig,
}

impl MarketService {
    pub fn new(cache: Arc<CacheCoordinator>, quotes: Arc<dyn QuoteProvider>) -> Self {
        Self {
            cache,
            quotes,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub async fn get_indices(&self) -> Result<Vec<MarketIndex>> {
        let key = cache_key("market", &["indices"]);
        self.cache
            .get_cached_data(&key, ttl::MARKET, || self.fetch_indices())
            .await
    }

    pub async fn get_trending(&self) -> Result<Vec<StockQuote>> {
        let key = cache_key("market", &["trending"]);
        self.cache
            .get_cached_data(&key, ttl::MARKET, || {
                self.fetch_quotes(&TRENDING_SYMBOLS, "get_trending")
            })
            .await
    }

    async fn fetch_indices(&self) -> Result<Vec<MarketIndex>> {
        let symbols: Vec<&str> = MARKET_INDICES.iter().map(|(symbol, _)| *symbol).collect();
        let quotes = self.fetch_quotes(&symbols, "get_indices").await?;
        Ok(MARKET_INDICES
            .iter()
            .filter_map(|(symbol, name)| {
                quotes
                    .iter()
                    .find(|quote| quote.symbol == *symbol)
                    .map(|quote| MarketIndex::from_quote(name, quote))
            })
            .collect())
    }

    /// Quotes for `symbols` in order, skipping the ones that fail.
    /// Errors only when every symbol failed.
    async fn fetch_quotes(&self, symbols: &[&str], service: &str) -> Result<Vec<StockQuote>> {
        let results = join_all(
            symbols
                .iter()
                .map(|symbol| with_retry(&self.retry, move || self.quotes.get_quote(symbol))),
        )
        .await;

        let mut quotes = Vec::with_capacity(results.len());
        let mut last_error: Option<DataError> = None;
        for (symbol, result) in symbols.iter().zip(results) {
            match result {
                Ok(quote) => quotes.push(quote),
                Err(err) => {
                    log_error(&err, json!({ "symbol": symbol, "service": service }));
                    last_error = Some(err);
                }
            }
        }

        match last_error {
            Some(err) if quotes.is_empty() => Err(err),
            Some(_) => {
                warn!("{}: {} of {} quotes unavailable", service, symbols.len() - quotes.len(), symbols.len());
                Ok(quotes)
            }
            None => Ok(quotes),
        }
    }
}
