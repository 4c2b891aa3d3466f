//! Market data models
//!
//! - `quote` - Latest price snapshot (StockQuote)
//! - `profile` - Company profile, statistics and dividend data from the quote provider
//! - `fundamentals` - Company overview and periodic statements from the fundamentals provider
//! - `news` - Aggregated news items with sentiment and extracted metrics

mod fundamentals;
mod news;
mod profile;
mod quote;

pub use fundamentals::{BalanceSheet, CashFlowStatement, CompanyOverview, EarningsReport, IncomeStatement};
pub use news::{ArticleMetric, MetricKind, NewsItem, Sentiment, SourceReliability};
pub use profile::{CompanyProfile, DividendInfo, FinancialData, KeyStatistics, StatisticsSnapshot};
pub use quote::StockQuote;
