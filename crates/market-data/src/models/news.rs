use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// How much weight a publisher's reporting deserves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceReliability {
    High,
    Medium,
    Low,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// "shares rose by 4.2%"
    PercentageChange,
    /// "price target of $250"
    PriceTarget,
    /// "$3.2 billion"
    FinancialMetric,
}

/// A figure quoted in an article, with the text around it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArticleMetric {
    #[serde(rename = "type")]
    pub kind: MetricKind,
    pub value: f64,
    pub context: String,
    /// Verb of a percentage change ("rose", "fell", ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    /// Scale word of a money amount ("million", "billion", "trillion")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// A news story about a symbol.
///
/// Sources produce bare items; enrichment fills in sentiment, metrics and
/// read time. Items are immutable once cached.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub publisher: String,
    pub published_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    pub source_reliability: SourceReliability,
    /// Provider snippet; may be empty until enrichment applies fallbacks
    pub summary: String,
    #[serde(default)]
    pub metrics: Vec<ArticleMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_read_time: Option<u32>,
    #[serde(default)]
    pub related_tickers: Vec<String>,
}

impl NewsItem {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        publisher: impl Into<String>,
        published_at: DateTime<Utc>,
        source_reliability: SourceReliability,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            publisher: publisher.into(),
            published_at,
            sentiment: None,
            source_reliability,
            summary: String::new(),
            metrics: Vec::new(),
            estimated_read_time: None,
            related_tickers: Vec::new(),
        }
    }
}
