//! Marketlens Market Data Crate
//!
//! This crate provides the upstream-facing half of the data acquisition layer:
//! a typed error taxonomy, a backoff retry executor, and the providers that
//! fetch quotes, fundamentals and news.
//!
//! # Overview
//!
//! - Error taxonomy: validation / api / network / unknown, each with a stable tag
//! - Retry: exponential backoff that never retries permanent failures
//! - Providers: Yahoo Finance (quotes, news), Alpha Vantage (fundamentals),
//!   NewsAPI (news), HTML content extraction, lexicon sentiment
//!
//! # Architecture
//!
//! ```text
//! +--------------------+
//! |  marketlens-core   |  (services, caching)
//! +--------------------+
//!           |
//!           v
//! +--------------------+     +------------------+
//! |    with_retry()    | --> |    DataError     |  (classified failures)
//! +--------------------+     +------------------+
//!           |
//!           v
//! +--------------------+
//! |  Provider traits   |  (QuoteProvider, FundamentalsProvider, NewsSource, ...)
//! +--------------------+
//!           |
//!           v
//! +--------------------+
//! |  HTTP upstreams    |  (Yahoo, Alpha Vantage, NewsAPI, article pages)
//! +--------------------+
//! ```

pub mod article;
pub mod errors;
pub mod models;
pub mod provider;
pub mod retry;
pub mod validation;

pub use errors::{format_error_response, log_error, DataError, ErrorResponse, RetryClass};
pub use models::{
    ArticleMetric, BalanceSheet, CashFlowStatement, CompanyOverview, CompanyProfile, DividendInfo,
    EarningsReport, FinancialData, IncomeStatement, KeyStatistics, MetricKind, NewsItem, Sentiment,
    SourceReliability, StatisticsSnapshot, StockQuote,
};
pub use provider::alpha_vantage::AlphaVantageProvider;
pub use provider::content::HtmlContentExtractor;
pub use provider::news_api::NewsApiSource;
pub use provider::sentiment::LexiconSentimentClassifier;
pub use provider::yahoo::{YahooNewsSource, YahooProvider};
pub use provider::{ContentExtractor, FundamentalsProvider, NewsSource, QuoteProvider, SentimentClassifier};
pub use retry::{with_retry, RetryConfig, Retryable};
pub use validation::validate_symbol;
