use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use chrono::{TimeZone, Utc};
use marketlens_ai::{CompletionService, FakeCompletionService};
use marketlens_market_data::{
    BalanceSheet, CashFlowStatement, CompanyOverview, CompanyProfile, ContentExtractor, DataError,
    DividendInfo, EarningsReport, FundamentalsProvider, IncomeStatement, NewsItem, NewsSource,
    QuoteProvider, Sentiment, SentimentClassifier, SourceReliability, StatisticsSnapshot,
    StockQuote,
};
use marketlens_server::{api::app_router, build_state_with, config::Config, AppState, Providers};
use tempfile::TempDir;
use tower::ServiceExt;

pub struct FakeQuotes {
    quotes: HashMap<String, StockQuote>,
    pub quote_calls: AtomicUsize,
}

impl FakeQuotes {
    pub fn new(quotes: &[(&str, f64)]) -> Self {
        Self {
            quotes: quotes
                .iter()
                .map(|(s, p)| (s.to_string(), StockQuote::new(*s, *p)))
                .collect(),
            quote_calls: AtomicUsize::new(0),
        }
    }

    fn lookup(&self, symbol: &str) -> Result<StockQuote, DataError> {
        self.quotes
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::not_found(symbol))
    }
}

#[async_trait]
impl QuoteProvider for FakeQuotes {
    fn id(&self) -> &'static str {
        "FAKE"
    }

    async fn get_quote(&self, symbol: &str) -> Result<StockQuote, DataError> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        self.lookup(symbol)
    }

    async fn get_profile(&self, symbol: &str) -> Result<CompanyProfile, DataError> {
        self.lookup(symbol)?;
        Ok(CompanyProfile::default())
    }

    async fn get_statistics(&self, symbol: &str) -> Result<StatisticsSnapshot, DataError> {
        self.lookup(symbol)?;
        Ok(StatisticsSnapshot::default())
    }

    async fn get_dividend_info(&self, symbol: &str) -> Result<DividendInfo, DataError> {
        self.lookup(symbol)?;
        Ok(DividendInfo::default())
    }
}

pub struct FakeFundamentals;

#[async_trait]
impl FundamentalsProvider for FakeFundamentals {
    fn id(&self) -> &'static str {
        "FAKE_FUNDAMENTALS"
    }

    async fn get_overview(&self, symbol: &str) -> Result<CompanyOverview, DataError> {
        Ok(CompanyOverview {
            symbol: symbol.to_string(),
            ..Default::default()
        })
    }

    async fn get_income_statement(&self, _: &str) -> Result<Vec<IncomeStatement>, DataError> {
        Ok(Vec::new())
    }

    async fn get_balance_sheet(&self, _: &str) -> Result<Vec<BalanceSheet>, DataError> {
        Ok(Vec::new())
    }

    async fn get_cash_flow(&self, _: &str) -> Result<Vec<CashFlowStatement>, DataError> {
        Ok(Vec::new())
    }

    async fn get_earnings(&self, _: &str) -> Result<Vec<EarningsReport>, DataError> {
        Ok(Vec::new())
    }
}

pub struct FakeNews(pub Vec<NewsItem>);

#[async_trait]
impl NewsSource for FakeNews {
    fn id(&self) -> &'static str {
        "FAKE_NEWS"
    }

    async fn search_news(&self, _: &str) -> Result<Vec<NewsItem>, DataError> {
        Ok(self.0.clone())
    }
}

pub struct NoContent;

#[async_trait]
impl ContentExtractor for NoContent {
    async fn extract_content(&self, _: &str) -> Option<String> {
        None
    }
}

pub struct Neutral;

#[async_trait]
impl SentimentClassifier for Neutral {
    async fn classify(&self, _: &str) -> Option<Sentiment> {
        Some(Sentiment::Neutral)
    }
}

pub fn headline(title: &str, hour: u32) -> NewsItem {
    NewsItem::new(
        title,
        format!("https://news.example/{}", hour),
        "Example Wire",
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap(),
        SourceReliability::High,
    )
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub quotes: Arc<FakeQuotes>,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new(completion: Arc<dyn CompletionService>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut vars = HashMap::new();
        vars.insert("ML_CACHE_DIR", dir.path().display().to_string());
        let mut config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();
        config.request_timeout = Duration::from_secs(5);

        let quotes = Arc::new(FakeQuotes::new(&[
            ("AAPL", 190.5),
            ("META", 500.0),
            ("AMZN", 180.0),
            ("MSFT", 420.0),
            ("NVDA", 120.0),
            ("^GSPC", 5300.0),
            ("^DJI", 39000.0),
            ("^IXIC", 17000.0),
            ("^RUT", 2050.0),
        ]));
        let providers = Providers {
            quotes: quotes.clone(),
            fundamentals: Arc::new(FakeFundamentals),
            primary_news: Arc::new(FakeNews(vec![headline("Apple hits record", 9)])),
            secondary_news: Arc::new(FakeNews(vec![
                headline("APPLE HITS RECORD", 8),
                headline("Supplier update", 10),
            ])),
            extractor: Arc::new(NoContent),
            classifier: Arc::new(Neutral),
            completion,
        };
        let state = build_state_with(&config, providers).await.unwrap();
        let router = app_router(state.clone(), &config);
        Self {
            router,
            state,
            quotes,
            _dir: dir,
        }
    }

    pub async fn with_reply(reply: &str) -> (Self, Arc<FakeCompletionService>) {
        let fake = Arc::new(FakeCompletionService::with_reply(reply));
        (Self::new(fake.clone()).await, fake)
    }

    pub async fn send(&self, method: &str, uri: &str) -> (u16, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status().as_u16();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into()));
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (u16, serde_json::Value) {
        self.send("GET", uri).await
    }
}
