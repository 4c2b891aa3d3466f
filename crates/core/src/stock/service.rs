use std::sync::Arc;

use log::debug;
use serde_json::json;

use marketlens_cache::{cache_key, ttl, CacheCoordinator};
use marketlens_market_data::{validate_symbol, with_retry, QuoteProvider, RetryConfig, StockQuote};

use super::model::{QuoteFundamentals, StockData};
use crate::errors::{log_error, DataError, Result};
use crate::news::NewsService;

/// Serves quotes and stock snapshots through the shared cache.
pub struct StockService {
    cache: Arc<CacheCoordinator>,
    quotes: Arc<dyn QuoteProvider>,
    news: Arc<NewsService>,
    retry: RetryConfig,
}

impl StockService {
    pub fn new(cache: Arc<CacheCoordinator>, quotes: Arc<dyn QuoteProvider>, news: Arc<NewsService>) -> Self {
        Self {
            cache,
            quotes,
            news,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Latest quote for `symbol`, cached for a minute.
    pub async fn get_quote(&self, symbol: &str) -> Result<StockQuote> {
        self.load_quote(symbol)
            .await
            .inspect_err(|err| log_error(err, json!({ "symbol": symbol, "service": "get_quote" })))
    }

    /// Quote, profile, statistics, dividends and news for `symbol`, fetched
    /// concurrently and cached together for five minutes.
    ///
    /// Any failing branch other than news fails the whole snapshot. Validation
    /// and upstream API errors surface as-is; anything else is reported as an
    /// API error 500, retryable when the cause was network related.
    pub async fn get_stock_data(&self, symbol: &str) -> Result<StockData> {
        self.load_stock_data(symbol).await.map_err(|err| {
            log_error(&err, json!({ "symbol": symbol, "service": "get_stock_data" }));
            snapshot_error(err, symbol)
        })
    }

    async fn load_quote(&self, symbol: &str) -> Result<StockQuote> {
        validate_symbol(symbol)?;
        let key = cache_key("quote", &[symbol]);
        self.cache
            .get_cached_data(&key, ttl::QUOTE, || {
                with_retry(&self.retry, || self.quotes.get_quote(symbol))
            })
            .await
    }

    async fn load_stock_data(&self, symbol: &str) -> Result<StockData> {
        validate_symbol(symbol)?;
        let key = cache_key("stock", &[symbol]);
        self.cache
            .get_cached_data(&key, ttl::STOCK, || self.fetch_stock_data(symbol))
            .await
    }

    async fn fetch_stock_data(&self, symbol: &str) -> Result<StockData> {
        debug!("Fetching stock snapshot for {} from {}", symbol, self.quotes.id());

        let (quote, mut profile, statistics, dividend_info, news) = futures::try_join!(
            with_retry(&self.retry, || self.quotes.get_quote(symbol)),
            with_retry(&self.retry, || self.quotes.get_profile(symbol)),
            with_retry(&self.retry, || self.quotes.get_statistics(symbol)),
            with_retry(&self.retry, || self.quotes.get_dividend_info(symbol)),
            self.news.get_company_news(symbol),
        )?;

        if profile.long_name.is_none() {
            profile.long_name = quote.name.clone();
        }
        let fundamentals = QuoteFundamentals::from_quote(&quote, &statistics.key_statistics);

        Ok(StockData {
            quote,
            profile,
            financials: statistics.financials,
            key_statistics: statistics.key_statistics,
            dividend_info,
            fundamentals,
            news,
        })
    }
}

fn snapshot_error(err: DataError, symbol: &str) -> DataError {
    match err {
        DataError::Validation(_) | DataError::Api { .. } => err,
        other => {
            let retryable = matches!(other, DataError::Network(_))
                || other.to_string().to_lowercase().contains("network");
            DataError::api(format!("Failed to fetch stock data for {}", symbol), 500, retryable)
        }
    }
}
