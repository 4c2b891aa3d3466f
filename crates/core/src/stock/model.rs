use serde::{Deserialize, Serialize};

use marketlens_market_data::{
    CompanyProfile, DividendInfo, FinancialData, KeyStatistics, NewsItem, StockQuote,
};

/// Valuation figures lifted from the quote.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteFundamentals {
    pub market_cap: Option<f64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<f64>,
    pub eps: Option<f64>,
}

impl QuoteFundamentals {
    pub fn from_quote(quote: &StockQuote, key_statistics: &KeyStatistics) -> Self {
        Self {
            market_cap: quote.market_cap,
            trailing_pe: quote.trailing_pe,
            forward_pe: quote.forward_pe.or(key_statistics.forward_pe),
            eps: quote.eps.or(key_statistics.trailing_eps),
        }
    }
}

/// Everything the dashboard shows for one symbol, fetched in one fan-out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockData {
    pub quote: StockQuote,
    pub profile: CompanyProfile,
    pub financials: FinancialData,
    pub key_statistics: KeyStatistics,
    pub dividend_info: DividendInfo,
    pub fundamentals: QuoteFundamentals,
    pub news: Vec<NewsItem>,
}
