//! The slice of a stock snapshot sent to the model.
//!
//! News is reduced to its headline fields so that re-enrichment of the same
//! stories does not change the fingerprint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use marketlens_core::{QuoteFundamentals, StockData};
use marketlens_market_data::{CompanyProfile, DividendInfo, FinancialData, KeyStatistics};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSection {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
    pub previous_close: Option<f64>,
    pub open: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub market_cap: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Headline {
    pub title: String,
    pub link: String,
    pub publisher: String,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPayload {
    pub quote: QuoteSection,
    pub profile: CompanyProfile,
    pub financials: FinancialData,
    pub key_stats: KeyStatistics,
    pub fundamentals: QuoteFundamentals,
    pub dividend_info: DividendInfo,
    pub news: Vec<Headline>,
}

impl AnalysisPayload {
    pub fn symbol(&self) -> &str {
        &self.quote.symbol
    }
}

impl From<&StockData> for AnalysisPayload {
    fn from(data: &StockData) -> Self {
        let quote = &data.quote;
        Self {
            quote: QuoteSection {
                symbol: quote.symbol.clone(),
                price: quote.price,
                change: quote.change,
                change_percent: quote.change_percent,
                volume: quote.volume,
                previous_close: quote.previous_close,
                open: quote.open,
                day_high: quote.day_high,
                day_low: quote.day_low,
                fifty_two_week_high: quote.fifty_two_week_high,
                fifty_two_week_low: quote.fifty_two_week_low,
                market_cap: quote.market_cap.or(data.fundamentals.market_cap),
            },
            profile: data.profile.clone(),
            financials: data.financials.clone(),
            key_stats: data.key_statistics.clone(),
            fundamentals: data.fundamentals.clone(),
            dividend_info: data.dividend_info.clone(),
            news: data
                .news
                .iter()
                .map(|item| Headline {
                    title: item.title.clone(),
                    link: item.link.clone(),
                    publisher: item.publisher.clone(),
                    published_at: item.published_at,
                })
                .collect(),
        }
    }
}
