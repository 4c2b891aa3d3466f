use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::DataError;

lazy_static! {
    /// Letters, dots and hyphens only: AAPL, BRK.B, RDS-A.
    static ref SYMBOL_REGEX: Regex = Regex::new(r"^[A-Za-z.-]+$").expect("Invalid regex pattern");
}

/// Rejects malformed ticker symbols before any network activity.
pub fn validate_symbol(symbol: &str) -> Result<(), DataError> {
    if symbol.is_empty() {
        return Err(DataError::validation("Stock symbol is required"));
    }
    if !SYMBOL_REGEX.is_match(symbol) {
        return Err(DataError::validation("Invalid stock symbol format"));
    }
    Ok(())
}
