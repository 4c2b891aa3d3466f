use std::str::FromStr;

use serde::{Deserialize, Serialize};

use marketlens_market_data::{DataError, StockQuote};

/// Tracked indices as `(provider symbol, display name)`.
pub const MARKET_INDICES: [(&str, &str); 4] = [
    ("^GSPC", "S&P 500"),
    ("^DJI", "Dow Jones"),
    ("^IXIC", "Nasdaq"),
    ("^RUT", "Russell 2000"),
];

pub const TRENDING_SYMBOLS: [&str; 5] = ["AAPL", "META", "AMZN", "MSFT", "NVDA"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketIndex {
    pub name: String,
    pub symbol: String,
    pub value: f64,
    pub change: f64,
    pub change_percent: f64,
}

impl MarketIndex {
    pub fn from_quote(name: &str, quote: &StockQuote) -> Self {
        Self {
            name: name.to_string(),
            symbol: quote.symbol.clone(),
            value: quote.price,
            change: quote.change,
            change_percent: quote.change_percent,
        }
    }
}

/// Which overview a caller asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarketView {
    Indices,
    Trending,
}

impl FromStr for MarketView {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "indices" => Ok(Self::Indices),
            "trending" => Ok(Self::Trending),
            _ => Err(DataError::validation("Invalid request type")),
        }
    }
}
