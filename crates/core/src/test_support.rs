//! Fakes shared by the service tests.
//!
//! Every fake records how often it was called so tests can assert on cache
//! and retry behavior without touching the network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use marketlens_cache::{CacheCoordinator, FsStorage, InMemoryCache, ManualClock, PersistentCache};
use marketlens_market_data::{
    BalanceSheet, CashFlowStatement, CompanyOverview, CompanyProfile, ContentExtractor, DataError,
    DividendInfo, EarningsReport, FundamentalsProvider, IncomeStatement, NewsItem, NewsSource,
    QuoteProvider, RetryConfig, Sentiment, SentimentClassifier, SourceReliability,
    StatisticsSnapshot, StockQuote,
};
use tempfile::TempDir;

pub(crate) struct CacheHarness {
    pub cache: Arc<CacheCoordinator>,
    pub memory: Arc<InMemoryCache>,
    pub clock: Arc<ManualClock>,
    _dir: TempDir,
}

pub(crate) async fn cache_harness() -> CacheHarness {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::default());
    let memory = Arc::new(InMemoryCache::with_clock(clock.clone()));
    let storage = FsStorage::open(dir.path()).await.unwrap();
    let persistent = PersistentCache::new(Arc::new(storage));
    let cache = Arc::new(CacheCoordinator::new(memory.clone(), persistent, clock.clone()));
    CacheHarness {
        cache,
        memory,
        clock,
        _dir: dir,
    }
}

/// Short delays so paused-clock tests stay readable.
pub(crate) fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_retries: 3,
        initial_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(40),
        factor: 2.0,
    }
}

pub(crate) fn at(hour: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
}

pub(crate) fn news(title: &str, hour: u32) -> NewsItem {
    NewsItem::new(
        title,
        format!("https://news.example/{}", title.to_lowercase().replace(' ', "-")),
        "Example Wire",
        at(hour),
        SourceReliability::Medium,
    )
}

#[derive(Default)]
pub(crate) struct CallLog {
    calls: Mutex<HashMap<String, usize>>,
}

impl CallLog {
    pub fn record(&self, name: &str) {
        *self.calls.lock().unwrap().entry(name.to_string()).or_default() += 1;
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().get(name).copied().unwrap_or(0)
    }
}

// =========================================================================
// Quote provider
// =========================================================================

#[derive(Default)]
pub(crate) struct MockQuoteProvider {
    quotes: Mutex<HashMap<String, StockQuote>>,
    /// Errors returned, in order, before calls start succeeding.
    failures: Mutex<HashMap<String, Vec<DataError>>>,
    pub calls: CallLog,
}

impl MockQuoteProvider {
    pub fn with_quotes(quotes: &[(&str, f64)]) -> Self {
        let provider = Self::default();
        for (symbol, price) in quotes {
            let mut quote = StockQuote::new(*symbol, *price);
            quote.name = Some(format!("{} Inc.", symbol));
            quote.market_cap = Some(price * 1_000_000.0);
            quote.trailing_pe = Some(25.0);
            quote.eps = Some(price / 25.0);
            provider.quotes.lock().unwrap().insert(symbol.to_string(), quote);
        }
        provider
    }

    /// Queues `errors` for every call to `method` (`quote`, `profile`, ...).
    pub fn fail(&self, method: &str, errors: Vec<DataError>) {
        self.failures.lock().unwrap().insert(method.to_string(), errors);
    }

    fn call(&self, method: &str, symbol: &str) -> Result<StockQuote, DataError> {
        self.calls.record(method);
        self.calls.record(&format!("{}:{}", method, symbol));
        if let Some(queue) = self.failures.lock().unwrap().get_mut(method) {
            if !queue.is_empty() {
                return Err(queue.remove(0));
            }
        }
        self.quotes
            .lock()
            .unwrap()
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::not_found(symbol))
    }
}

#[async_trait]
impl QuoteProvider for MockQuoteProvider {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    async fn get_quote(&self, symbol: &str) -> Result<StockQuote, DataError> {
        self.call("quote", symbol)
    }

    async fn get_profile(&self, symbol: &str) -> Result<CompanyProfile, DataError> {
        self.call("profile", symbol)?;
        Ok(CompanyProfile {
            sector: Some("Technology".to_string()),
            ..Default::default()
        })
    }

    async fn get_statistics(&self, symbol: &str) -> Result<StatisticsSnapshot, DataError> {
        self.call("statistics", symbol)?;
        let mut snapshot = StatisticsSnapshot::default();
        snapshot.key_statistics.beta = Some(1.2);
        snapshot.key_statistics.forward_pe = Some(28.5);
        snapshot.financials.profit_margins = Some(0.25);
        Ok(snapshot)
    }

    async fn get_dividend_info(&self, symbol: &str) -> Result<DividendInfo, DataError> {
        self.call("dividends", symbol)?;
        Ok(DividendInfo {
            dividend_yield: Some(0.005),
            ..Default::default()
        })
    }
}

// =========================================================================
// Fundamentals provider
// =========================================================================

#[derive(Default)]
pub(crate) struct MockFundamentalsProvider {
    pub fail_with: Mutex<Option<DataError>>,
    pub calls: CallLog,
}

impl MockFundamentalsProvider {
    fn call(&self, method: &str) -> Result<(), DataError> {
        self.calls.record(method);
        match self.fail_with.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn statement_date() -> String {
    "2023-09-30".to_string()
}

#[async_trait]
impl FundamentalsProvider for MockFundamentalsProvider {
    fn id(&self) -> &'static str {
        "MOCK_FUNDAMENTALS"
    }

    async fn get_overview(&self, symbol: &str) -> Result<CompanyOverview, DataError> {
        self.call("overview")?;
        Ok(CompanyOverview {
            symbol: symbol.to_string(),
            name: Some(format!("{} Inc.", symbol)),
            ..Default::default()
        })
    }

    async fn get_income_statement(&self, _symbol: &str) -> Result<Vec<IncomeStatement>, DataError> {
        self.call("income")?;
        Ok(vec![IncomeStatement {
            fiscal_date_ending: statement_date(),
            total_revenue: Some(383_285_000_000.0),
            ..Default::default()
        }])
    }

    async fn get_balance_sheet(&self, _symbol: &str) -> Result<Vec<BalanceSheet>, DataError> {
        self.call("balance")?;
        Ok(vec![BalanceSheet {
            fiscal_date_ending: statement_date(),
            ..Default::default()
        }])
    }

    async fn get_cash_flow(&self, _symbol: &str) -> Result<Vec<CashFlowStatement>, DataError> {
        self.call("cashflow")?;
        Ok(vec![CashFlowStatement {
            fiscal_date_ending: statement_date(),
            ..Default::default()
        }])
    }

    async fn get_earnings(&self, _symbol: &str) -> Result<Vec<EarningsReport>, DataError> {
        self.call("earnings")?;
        Ok(Vec::new())
    }
}

// =========================================================================
// News collaborators
// =========================================================================

pub(crate) struct MockNewsSource {
    id: &'static str,
    items: Vec<NewsItem>,
    fail_with: Option<DataError>,
    pub calls: CallLog,
}

impl MockNewsSource {
    pub fn with_items(id: &'static str, items: Vec<NewsItem>) -> Self {
        Self {
            id,
            items,
            fail_with: None,
            calls: CallLog::default(),
        }
    }

    pub fn failing(id: &'static str, err: DataError) -> Self {
        Self {
            id,
            items: Vec::new(),
            fail_with: Some(err),
            calls: CallLog::default(),
        }
    }
}

#[async_trait]
impl NewsSource for MockNewsSource {
    fn id(&self) -> &'static str {
        self.id
    }

    async fn search_news(&self, _symbol: &str) -> Result<Vec<NewsItem>, DataError> {
        self.calls.record("search");
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(self.items.clone()),
        }
    }
}

/// Serves canned article bodies by link.
#[derive(Default)]
pub(crate) struct MockExtractor {
    pages: HashMap<String, String>,
}

impl MockExtractor {
    pub fn with_page(mut self, link: &str, body: &str) -> Self {
        self.pages.insert(link.to_string(), body.to_string());
        self
    }
}

#[async_trait]
impl ContentExtractor for MockExtractor {
    async fn extract_content(&self, url: &str) -> Option<String> {
        self.pages.get(url).cloned()
    }
}

/// Labels text containing "record" positive, "plunge" negative, and
/// refuses to score anything containing "???".
#[derive(Default)]
pub(crate) struct KeywordClassifier {
    pub seen: Mutex<Vec<String>>,
}

#[async_trait]
impl SentimentClassifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Option<Sentiment> {
        self.seen.lock().unwrap().push(text.to_string());
        let lower = text.to_lowercase();
        if lower.contains("???") {
            None
        } else if lower.contains("record") {
            Some(Sentiment::Positive)
        } else if lower.contains("plunge") {
            Some(Sentiment::Negative)
        } else {
            Some(Sentiment::Neutral)
        }
    }
}
