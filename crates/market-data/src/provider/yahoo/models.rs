//! Yahoo Finance API response models.
//!
//! quoteSummary wraps numbers as `{"raw": 123.45, "fmt": "123.45"}` or sends an
//! empty object when no value exists; both land in [`YahooRawValue`].

use serde::Deserialize;

/// Main response wrapper for quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResponse {
    pub quote_summary: YahooQuoteSummary,
}

#[derive(Debug, Deserialize)]
pub struct YahooQuoteSummary {
    pub result: Option<Vec<YahooQuoteSummaryResult>>,
    pub error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
pub struct YahooApiError {
    pub code: Option<String>,
    pub description: Option<String>,
}

/// Individual result from quoteSummary API. Only requested modules are present.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResult {
    pub price: Option<YahooPriceData>,
    pub summary_detail: Option<YahooSummaryDetail>,
    pub default_key_statistics: Option<YahooKeyStatistics>,
    pub financial_data: Option<YahooFinancialData>,
    pub asset_profile: Option<YahooAssetProfile>,
}

/// Number with raw and formatted values
#[derive(Debug, Deserialize, Clone, Default)]
pub struct YahooRawValue {
    pub raw: Option<f64>,
}

pub(crate) fn raw(value: &Option<YahooRawValue>) -> Option<f64> {
    value.as_ref().and_then(|v| v.raw).filter(|v| v.is_finite())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooPriceData {
    pub symbol: Option<String>,
    pub currency: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub regular_market_price: Option<YahooRawValue>,
    pub regular_market_change: Option<YahooRawValue>,
    pub regular_market_change_percent: Option<YahooRawValue>,
    pub regular_market_volume: Option<YahooRawValue>,
    pub regular_market_previous_close: Option<YahooRawValue>,
    pub regular_market_open: Option<YahooRawValue>,
    pub regular_market_day_high: Option<YahooRawValue>,
    pub regular_market_day_low: Option<YahooRawValue>,
    pub market_cap: Option<YahooRawValue>,
    pub regular_market_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooSummaryDetail {
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<YahooRawValue>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<YahooRawValue>,
    pub dividend_yield: Option<YahooRawValue>,
    pub dividend_rate: Option<YahooRawValue>,
    pub payout_ratio: Option<YahooRawValue>,
    /// Epoch seconds in `raw`
    pub ex_dividend_date: Option<YahooRawValue>,
    pub fifty_two_week_high: Option<YahooRawValue>,
    pub fifty_two_week_low: Option<YahooRawValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooKeyStatistics {
    pub beta: Option<YahooRawValue>,
    pub price_to_book: Option<YahooRawValue>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<YahooRawValue>,
    pub trailing_eps: Option<YahooRawValue>,
    pub forward_eps: Option<YahooRawValue>,
    pub enterprise_value: Option<YahooRawValue>,
    pub peg_ratio: Option<YahooRawValue>,
    pub book_value: Option<YahooRawValue>,
    pub profit_margins: Option<YahooRawValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooFinancialData {
    pub total_cash: Option<YahooRawValue>,
    pub total_debt: Option<YahooRawValue>,
    pub total_revenue: Option<YahooRawValue>,
    pub operating_margins: Option<YahooRawValue>,
    pub profit_margins: Option<YahooRawValue>,
    pub gross_margins: Option<YahooRawValue>,
    pub return_on_equity: Option<YahooRawValue>,
    pub return_on_assets: Option<YahooRawValue>,
    pub revenue_growth: Option<YahooRawValue>,
    pub operating_cashflow: Option<YahooRawValue>,
    pub free_cashflow: Option<YahooRawValue>,
    pub current_ratio: Option<YahooRawValue>,
    pub debt_to_equity: Option<YahooRawValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooAssetProfile {
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub long_business_summary: Option<String>,
    pub full_time_employees: Option<u64>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Response of the v1 search endpoint, used for news.
#[derive(Debug, Deserialize)]
pub struct YahooSearchResponse {
    #[serde(default)]
    pub news: Vec<YahooNewsArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooNewsArticle {
    pub title: Option<String>,
    pub link: Option<String>,
    pub publisher: Option<String>,
    /// Epoch seconds
    pub provider_publish_time: Option<i64>,
    #[serde(default)]
    pub related_tickers: Vec<String>,
}
