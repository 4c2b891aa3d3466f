//! Parsing the model's sectioned reply into a structured analysis.
//!
//! The reply is expected to look like:
//!
//! ```text
//! MARKET_SUMMARY: ...
//! TRADING_ACTIVITY: ...
//! ...
//! SENTIMENT_SCORE: 72
//! ```
//!
//! Headers may be wrapped in markdown emphasis and a section body may span
//! several lines. Anything before the first header is ignored.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Section {
    MarketSummary,
    TradingActivity,
    FinancialHealth,
    TechnicalSignals,
    RiskFactors,
    GrowthDrivers,
    SentimentScore,
}

static SECTION_HEADERS: Lazy<HashMap<&'static str, Section>> = Lazy::new(|| {
    HashMap::from([
        ("MARKET_SUMMARY", Section::MarketSummary),
        ("TRADING_ACTIVITY", Section::TradingActivity),
        ("FINANCIAL_HEALTH", Section::FinancialHealth),
        ("TECHNICAL_SIGNALS", Section::TechnicalSignals),
        ("RISK_FACTORS", Section::RiskFactors),
        ("GROWTH_DRIVERS", Section::GrowthDrivers),
        ("SENTIMENT_SCORE", Section::SentimentScore),
    ])
});

/// Recommendation band for a 0-100 sentiment score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "Strong Sell")]
    StrongSell,
    Sell,
    Hold,
    Buy,
    #[serde(rename = "Strong Buy")]
    StrongBuy,
}

impl Rating {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=20 => Rating::StrongSell,
            21..=40 => Rating::Sell,
            41..=60 => Rating::Hold,
            61..=80 => Rating::Buy,
            _ => Rating::StrongBuy,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredAnalysis {
    pub market_summary: Option<String>,
    pub trading_activity: Option<String>,
    pub financial_health: Option<String>,
    pub technical_signals: Option<String>,
    pub risk_factors: Option<String>,
    pub growth_drivers: Option<String>,
    pub sentiment_score: Option<u8>,
    pub rating: Option<Rating>,
    /// The unparsed reply.
    pub raw: String,
}

/// Splits a header line into its section and the text that follows it.
fn split_header(line: &str) -> Option<(Section, &str)> {
    let trimmed = line.trim_start_matches(|c: char| c == '#' || c == '*' || c.is_whitespace());
    let name_len = trimmed
        .find(|c: char| !(c.is_ascii_uppercase() || c == '_'))
        .unwrap_or(trimmed.len());
    let section = *SECTION_HEADERS.get(&trimmed[..name_len])?;
    let rest = trimmed[name_len..].trim_start_matches(|c: char| c == '*' || c == ':' || c.is_whitespace());
    Some((section, rest))
}

fn parse_score(text: &str) -> Option<u8> {
    let digits: String = text
        .trim_start()
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<u8>().ok().filter(|score| *score <= 100)
}

pub fn parse_analysis(raw: &str) -> StructuredAnalysis {
    let mut bodies: HashMap<Section, Vec<&str>> = HashMap::new();
    let mut current: Option<Section> = None;

    for line in raw.lines() {
        if let Some((section, rest)) = split_header(line) {
            current = Some(section);
            let body = bodies.entry(section).or_default();
            if !rest.trim().is_empty() {
                body.push(rest.trim());
            }
        } else if let Some(section) = current {
            if !line.trim().is_empty() {
                bodies.entry(section).or_default().push(line.trim());
            }
        }
    }

    let mut take = |section: Section| {
        bodies
            .remove(&section)
            .map(|lines| lines.join("\n"))
            .filter(|text| !text.is_empty())
    };

    let sentiment_score = take(Section::SentimentScore).and_then(|text| parse_score(&text));

    StructuredAnalysis {
        market_summary: take(Section::MarketSummary),
        trading_activity: take(Section::TradingActivity),
        financial_health: take(Section::FinancialHealth),
        technical_signals: take(Section::TechnicalSignals),
        risk_factors: take(Section::RiskFactors),
        growth_drivers: take(Section::GrowthDrivers),
        sentiment_score,
        rating: sentiment_score.map(Rating::from_score),
        raw: raw.to_string(),
    }
}
