//! Boundary traits for upstream collaborators.
//!
//! Every call may fail with a [`DataError`]; implementations must never report
//! failure as an empty success, so the retry executor can classify it.

use async_trait::async_trait;

use crate::errors::DataError;
use crate::models::{
    BalanceSheet, CashFlowStatement, CompanyOverview, CompanyProfile, DividendInfo,
    EarningsReport, IncomeStatement, NewsItem, Sentiment, StatisticsSnapshot, StockQuote,
};

/// Source of prices, company profiles and valuation statistics.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use marketlens_market_data::provider::QuoteProvider;
///
/// struct FixedQuotes;
///
/// #[async_trait]
/// impl QuoteProvider for FixedQuotes {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     async fn get_quote(&self, symbol: &str) -> Result<StockQuote, DataError> {
///         Ok(StockQuote::new(symbol, 100.0))
///     }
///
///     // ... profile, statistics and dividend methods
/// }
/// ```
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Constant identifier such as "YAHOO", used in logs.
    fn id(&self) -> &'static str;

    /// Fetch the latest quote.
    ///
    /// # Errors
    ///
    /// A symbol the provider does not know yields a non-retryable
    /// `DataError::Api` with status 404.
    async fn get_quote(&self, symbol: &str) -> Result<StockQuote, DataError>;

    async fn get_profile(&self, symbol: &str) -> Result<CompanyProfile, DataError>;

    /// Key statistics and financial data in one call.
    async fn get_statistics(&self, symbol: &str) -> Result<StatisticsSnapshot, DataError>;

    async fn get_dividend_info(&self, symbol: &str) -> Result<DividendInfo, DataError>;
}

/// Source of company fundamentals.
#[async_trait]
pub trait FundamentalsProvider: Send + Sync {
    fn id(&self) -> &'static str;

    async fn get_overview(&self, symbol: &str) -> Result<CompanyOverview, DataError>;

    /// Annual statements, most recent first.
    async fn get_income_statement(&self, symbol: &str) -> Result<Vec<IncomeStatement>, DataError>;

    async fn get_balance_sheet(&self, symbol: &str) -> Result<Vec<BalanceSheet>, DataError>;

    async fn get_cash_flow(&self, symbol: &str) -> Result<Vec<CashFlowStatement>, DataError>;

    /// Quarterly reports, most recent first.
    async fn get_earnings(&self, symbol: &str) -> Result<Vec<EarningsReport>, DataError>;
}

/// An independent news feed.
///
/// Items come back un-enriched: `summary` holds the provider snippet (possibly
/// empty), `sentiment` and `metrics` are unset.
#[async_trait]
pub trait NewsSource: Send + Sync {
    fn id(&self) -> &'static str;

    async fn search_news(&self, symbol: &str) -> Result<Vec<NewsItem>, DataError>;
}

/// Fetches the readable text of an article.
///
/// Best-effort: `None` is an expected outcome, not an error.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract_content(&self, url: &str) -> Option<String>;
}

/// Classifies text polarity. `None` when the text cannot be scored.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Option<Sentiment>;
}
