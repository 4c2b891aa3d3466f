use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use marketlens_cache::{cache_key, ttl, CacheCoordinator};
use marketlens_market_data::{
    validate_symbol, with_retry, BalanceSheet, CashFlowStatement, CompanyOverview, EarningsReport,
    FundamentalsProvider, IncomeStatement, RetryConfig,
};

use super::model::Fundamentals;
use crate::errors::{log_error, Result};

/// Serves fundamentals through the shared cache. Each dataset has its own
/// key prefix so they expire independently.
pub struct FundamentalsService {
    cache: Arc<CacheCoordinator>,
    provider: Arc<dyn FundamentalsProvider>,
    retry: RetryConfig,
}

impl FundamentalsService {
    pub fn new(cache: Arc<CacheCoordinator>, provider: Arc<dyn FundamentalsProvider>) -> Self {
        Self {
            cache,
            provider,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub async fn get_company_overview(&self, symbol: &str) -> Result<CompanyOverview> {
        self.cached("overview", symbol, || self.provider.get_overview(symbol))
            .await
    }

    pub async fn get_income_statement(&self, symbol: &str) -> Result<Vec<IncomeStatement>> {
        self.cached("income", symbol, || self.provider.get_income_statement(symbol))
            .await
    }

    pub async fn get_balance_sheet(&self, symbol: &str) -> Result<Vec<BalanceSheet>> {
        self.cached("balance", symbol, || self.provider.get_balance_sheet(symbol))
            .await
    }

    pub async fn get_cash_flow(&self, symbol: &str) -> Result<Vec<CashFlowStatement>> {
        self.cached("cashflow", symbol, || self.provider.get_cash_flow(symbol))
            .await
    }

    pub async fn get_earnings(&self, symbol: &str) -> Result<Vec<EarningsReport>> {
        self.cached("earnings", symbol, || self.provider.get_earnings(symbol))
            .await
    }

    /// Fetches all five datasets concurrently; the first failure wins.
    pub async fn get_all(&self, symbol: &str) -> Result<Fundamentals> {
        let (overview, income_statement, balance_sheet, cash_flow, earnings) = futures::try_join!(
            self.get_company_overview(symbol),
            self.get_income_statement(symbol),
            self.get_balance_sheet(symbol),
            self.get_cash_flow(symbol),
            self.get_earnings(symbol),
        )?;
        Ok(Fundamentals {
            overview,
            income_statement,
            balance_sheet,
            cash_flow,
            earnings,
        })
    }

    async fn cached<T, F, Fut>(&self, prefix: &'static str, symbol: &str, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let result = match validate_symbol(symbol) {
            Ok(()) => {
                let key = cache_key(prefix, &[symbol]);
                self.cache
                    .get_cached_data(&key, ttl::FUNDAMENTAL, || with_retry(&self.retry, fetch))
                    .await
            }
            Err(err) => Err(err),
        };
        result.inspect_err(|err| {
            log_error(
                err,
                json!({ "symbol": symbol, "service": "fundamentals", "dataset": prefix }),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DataError;
    use crate::test_support::{cache_harness, fast_retry, CacheHarness, MockFundamentalsProvider};

    async fn fixture() -> (FundamentalsService, Arc<MockFundamentalsProvider>, CacheHarness) {
        let harness = cache_harness().await;
        let provider = Arc::new(MockFundamentalsProvider::default());
        let service = FundamentalsService::new(harness.cache.clone(), provider.clone())
            .with_retry_config(fast_retry());
        (service, provider, harness)
    }

    #[tokio::test]
    async fn test_overview_cached_for_a_day() {
        let (service, provider, harness) = fixture().await;

        let overview = service.get_company_overview("AAPL").await.unwrap();
        assert_eq!(overview.name.as_deref(), Some("AAPL Inc."));

        harness.clock.advance(chrono::Duration::hours(23));
        service.get_company_overview("AAPL").await.unwrap();
        assert_eq!(provider.calls.count("overview"), 1);

        harness.clock.advance(chrono::Duration::hours(2));
        service.get_company_overview("AAPL").await.unwrap();
        assert_eq!(provider.calls.count("overview"), 2);
    }

    #[tokio::test]
    async fn test_datasets_use_distinct_keys() {
        let (service, _provider, harness) = fixture().await;

        service.get_all("AAPL").await.unwrap();

        for key in ["overview_aapl", "income_aapl", "balance_aapl", "cashflow_aapl", "earnings_aapl"] {
            assert!(harness.memory.get(key).is_some(), "{}", key);
        }
    }

    #[tokio::test]
    async fn test_get_all_fetches_each_dataset_once() {
        let (service, provider, _harness) = fixture().await;

        let all = service.get_all("MSFT").await.unwrap();
        service.get_all("MSFT").await.unwrap();

        assert_eq!(all.income_statement[0].total_revenue, Some(383_285_000_000.0));
        for method in ["overview", "income", "balance", "cashflow", "earnings"] {
            assert_eq!(provider.calls.count(method), 1, "{}", method);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_is_retried_then_surfaced() {
        let (service, provider, _harness) = fixture().await;
        *provider.fail_with.lock().unwrap() = Some(DataError::api("API call frequency exceeded", 429, true));

        let err = service.get_earnings("AAPL").await.unwrap_err();

        assert_eq!(err.status_code(), Some(429));
        assert_eq!(provider.calls.count("earnings"), 3);
    }

    #[tokio::test]
    async fn test_invalid_symbol() {
        let (service, provider, _harness) = fixture().await;

        let err = service.get_all("12").await.unwrap_err();

        assert_eq!(err, DataError::validation("Invalid stock symbol format"));
        assert_eq!(provider.calls.count("overview"), 0);
    }
}
