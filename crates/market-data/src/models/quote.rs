use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest price snapshot for a symbol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockQuote {
    pub symbol: String,

    /// Display name, when the provider supplies one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_low: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_pe: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_pe: Option<f64>,
    /// Trailing twelve-month earnings per share
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eps: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_low: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Market time of the price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl StockQuote {
    /// A quote with only the required fields set.
    pub fn new(symbol: impl Into<String>, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            name: None,
            price,
            change: 0.0,
            change_percent: 0.0,
            volume: 0,
            previous_close: None,
            open: None,
            day_high: None,
            day_low: None,
            market_cap: None,
            trailing_pe: None,
            forward_pe: None,
            eps: None,
            fifty_two_week_high: None,
            fifty_two_week_low: None,
            currency: None,
            timestamp: None,
        }
    }
}
