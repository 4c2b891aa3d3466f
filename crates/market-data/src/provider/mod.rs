//! Upstream collaborators and their implementations.
//!
//! This module contains:
//! - The boundary traits every upstream implements (`QuoteProvider`,
//!   `FundamentalsProvider`, `NewsSource`, `ContentExtractor`, `SentimentClassifier`)
//! - Concrete implementations (Yahoo Finance, Alpha Vantage, NewsAPI, HTML
//!   extraction, lexicon sentiment)
//!
//! # Architecture
//!
//! The traits are designed to be:
//! - **Provider-agnostic**: services in `marketlens-core` only see the traits
//! - **Classifiable**: every failure is a [`DataError`](crate::errors::DataError)
//!   so the retry executor can decide whether to try again
//! - **Substitutable**: tests swap in in-memory fakes

mod traits;

pub mod alpha_vantage;
pub mod content;
pub mod news_api;
pub mod sentiment;
pub mod yahoo;

pub use traits::{ContentExtractor, FundamentalsProvider, NewsSource, QuoteProvider, SentimentClassifier};

/// Browser user agent sent to upstreams that reject bare HTTP clients.
pub(crate) const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
