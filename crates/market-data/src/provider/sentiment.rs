//! Lexicon-based sentiment scoring.
//!
//! Each token is looked up in an AFINN-style word list (scores -5..=5). The
//! text score is the sum divided by the token count; above 0.2 is positive,
//! below -0.2 negative.

use std::collections::HashMap;

use async_trait::async_trait;
use lazy_static::lazy_static;

use crate::models::Sentiment;
use crate::provider::SentimentClassifier;

const POSITIVE_THRESHOLD: f64 = 0.2;
const NEGATIVE_THRESHOLD: f64 = -0.2;

/// AFINN-style scores, weighted towards market vocabulary.
const LEXICON: &[(&str, i8)] = &[
    ("beat", 2),
    ("beats", 2),
    ("boost", 2),
    ("boosted", 2),
    ("bullish", 3),
    ("gain", 2),
    ("gained", 2),
    ("gains", 2),
    ("good", 3),
    ("great", 3),
    ("growth", 2),
    ("grew", 2),
    ("improve", 2),
    ("improved", 2),
    ("jump", 2),
    ("jumped", 2),
    ("outperform", 2),
    ("outperformed", 2),
    ("positive", 2),
    ("profit", 2),
    ("profitable", 2),
    ("rally", 2),
    ("rallied", 2),
    ("record", 1),
    ("rise", 1),
    ("rose", 1),
    ("soar", 3),
    ("soared", 3),
    ("strong", 2),
    ("surge", 3),
    ("surged", 3),
    ("upgrade", 2),
    ("upgraded", 2),
    ("win", 4),
    ("wins", 4),
    ("bankrupt", -3),
    ("bankruptcy", -3),
    ("bad", -3),
    ("bearish", -3),
    ("crash", -3),
    ("crashed", -3),
    ("cut", -1),
    ("cuts", -1),
    ("decline", -2),
    ("declined", -2),
    ("downgrade", -2),
    ("downgraded", -2),
    ("drop", -1),
    ("dropped", -1),
    ("fail", -2),
    ("failed", -2),
    ("fall", -1),
    ("fell", -1),
    ("fraud", -4),
    ("lawsuit", -2),
    ("layoffs", -2),
    ("loss", -3),
    ("losses", -3),
    ("lost", -3),
    ("miss", -2),
    ("missed", -2),
    ("negative", -2),
    ("plunge", -3),
    ("plunged", -3),
    ("probe", -1),
    ("recession", -2),
    ("risk", -2),
    ("slump", -2),
    ("slumped", -2),
    ("tumble", -2),
    ("tumbled", -2),
    ("underperform", -2),
    ("weak", -2),
    ("worst", -3),
];

lazy_static! {
    static ref SCORES: HashMap<&'static str, i8> = LEXICON.iter().copied().collect();
}

/// Scores text against the built-in word list.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconSentimentClassifier;

impl LexiconSentimentClassifier {
    /// Mean per-token score, or `None` for text without words.
    pub fn score(&self, text: &str) -> Option<f64> {
        let mut tokens = 0usize;
        let mut total = 0i64;
        for token in text
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|t| !t.is_empty())
        {
            tokens += 1;
            let token = token.to_lowercase();
            total += i64::from(SCORES.get(token.as_str()).copied().unwrap_or(0));
        }
        (tokens > 0).then(|| total as f64 / tokens as f64)
    }

    pub fn label(score: f64) -> Sentiment {
        if score > POSITIVE_THRESHOLD {
            Sentiment::Positive
        } else if score < NEGATIVE_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

#[async_trait]
impl SentimentClassifier for LexiconSentimentClassifier {
    async fn classify(&self, text: &str) -> Option<Sentiment> {
        self.score(text).map(Self::label)
    }
}
