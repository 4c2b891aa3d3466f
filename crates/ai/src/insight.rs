//! Memoized stock insights.
//!
//! ```text
//! get_insights(symbol, payload)
//!     |
//!  fingerprint(payload) == memo[symbol].content_hash ?
//!     |-- yes --> cached StructuredAnalysis
//!     |-- no  --> complete() --> parse_analysis() --> memo[symbol] = {hash, result}
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info};
use serde::Serialize;

use marketlens_core::StockData;

use crate::analysis::{parse_analysis, StructuredAnalysis};
use crate::completion::{CompletionRequest, CompletionService};
use crate::error::AiError;
use crate::memo::{fingerprint, AnalysisCache};
use crate::payload::AnalysisPayload;
use crate::prompt::{user_prompt, NO_INSIGHTS, SYSTEM_PROMPT};

/// Sampling parameters for insight generation.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightConfig {
    /// Lower keeps the sections factual.
    pub temperature: f64,
    pub max_tokens: u64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 800,
        }
    }
}

#[async_trait]
pub trait InsightServiceTrait: Send + Sync {
    async fn get_stock_insights(&self, data: &StockData) -> Result<StructuredAnalysis, AiError>;
}

pub struct InsightService {
    completion: Arc<dyn CompletionService>,
    memo: AnalysisCache,
    config: InsightConfig,
}

impl InsightService {
    pub fn new(completion: Arc<dyn CompletionService>, memo: AnalysisCache) -> Self {
        Self {
            completion,
            memo,
            config: InsightConfig::default(),
        }
    }

    pub fn with_config(mut self, config: InsightConfig) -> Self {
        self.config = config;
        self
    }

    /// Analysis of `payload` for `symbol`. The model is only called when the
    /// payload differs from the one behind the remembered result.
    pub async fn get_insights<T: Serialize + Sync>(
        &self,
        symbol: &str,
        payload: &T,
    ) -> Result<StructuredAnalysis, AiError> {
        if symbol.trim().is_empty() {
            return Err(AiError::invalid_input("Stock symbol is required"));
        }
        let content_hash = fingerprint(payload)?;
        if let Some(cached) = self.memo.lookup(symbol, &content_hash) {
            debug!("Using cached analysis for {}", symbol);
            return Ok(cached);
        }

        let request = CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            prompt: user_prompt(symbol, &serde_json::to_string_pretty(payload)?),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let reply = self
            .completion
            .complete(&request)
            .await
            .inspect_err(|e| error!("Error generating stock insights for {}: {}", symbol, e))?;
        let reply = if reply.trim().is_empty() {
            NO_INSIGHTS.to_string()
        } else {
            reply
        };

        let analysis = parse_analysis(&reply);
        info!("Generated new analysis for {}", symbol);
        self.memo.store(symbol, content_hash, analysis.clone());
        Ok(analysis)
    }
}

#[async_trait]
impl InsightServiceTrait for InsightService {
    async fn get_stock_insights(&self, data: &StockData) -> Result<StructuredAnalysis, AiError> {
        let payload = AnalysisPayload::from(data);
        self.get_insights(payload.symbol(), &payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Rating;
    use crate::completion::FakeCompletionService;
    use marketlens_core::QuoteFundamentals;
    use marketlens_market_data::{StockQuote, SourceReliability, NewsItem};
    use serde_json::json;

    const REPLY: &str = "MARKET_SUMMARY: Up on the day.\nSENTIMENT_SCORE: 65";

    fn service(fake: &Arc<FakeCompletionService>) -> InsightService {
        InsightService::new(fake.clone(), AnalysisCache::default())
    }

    fn stock_data(price: f64) -> StockData {
        let quote = StockQuote::new("AAPL", price);
        StockData {
            fundamentals: QuoteFundamentals::default(),
            quote,
            profile: Default::default(),
            financials: Default::default(),
            key_statistics: Default::default(),
            dividend_info: Default::default(),
            news: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_identical_payload_calls_model_once() {
        let fake = Arc::new(FakeCompletionService::with_reply(REPLY));
        let service = service(&fake);
        let payload = json!({ "quote": { "symbol": "AAPL", "price": 190.0 } });

        let first = service.get_insights("AAPL", &payload).await.unwrap();
        let second = service.get_insights("AAPL", &payload).await.unwrap();

        assert_eq!(fake.calls(), 1);
        assert_eq!(first, second);
        assert_eq!(first.rating, Some(Rating::Buy));
    }

    #[tokio::test]
    async fn test_changed_field_calls_model_again() {
        let fake = Arc::new(FakeCompletionService::with_reply(REPLY));
        let service = service(&fake);

        service.get_insights("AAPL", &json!({ "price": 190.0 })).await.unwrap();
        service.get_insights("AAPL", &json!({ "price": 190.5 })).await.unwrap();
        assert_eq!(fake.calls(), 2);

        // Only the latest fingerprint is remembered.
        service.get_insights("AAPL", &json!({ "price": 190.0 })).await.unwrap();
        assert_eq!(fake.calls(), 3);
    }

    #[tokio::test]
    async fn test_memo_is_per_symbol() {
        let fake = Arc::new(FakeCompletionService::with_reply(REPLY));
        let service = service(&fake);
        let payload = json!({ "price": 100.0 });

        service.get_insights("AAPL", &payload).await.unwrap();
        service.get_insights("MSFT", &payload).await.unwrap();

        assert_eq!(fake.calls(), 2);
    }

    #[tokio::test]
    async fn test_request_parameters() {
        let fake = Arc::new(FakeCompletionService::with_reply(REPLY));
        service(&fake)
            .get_insights("AAPL", &json!({ "price": 1.0 }))
            .await
            .unwrap();

        let request = fake.last_request().unwrap();
        assert_eq!(request.temperature, 0.3);
        assert_eq!(request.max_tokens, 800);
        assert_eq!(request.system, SYSTEM_PROMPT);
        assert!(request.prompt.starts_with("Stock analysis for AAPL:\n"));
    }

    #[tokio::test]
    async fn test_failure_is_not_memoized() {
        let fake = Arc::new(FakeCompletionService::failing());
        let service = service(&fake);
        let payload = json!({ "price": 1.0 });

        assert!(service.get_insights("AAPL", &payload).await.is_err());
        assert!(service.get_insights("AAPL", &payload).await.is_err());
        assert_eq!(fake.calls(), 2);
    }

    #[tokio::test]
    async fn test_blank_symbol_is_rejected_without_calling_model() {
        let fake = Arc::new(FakeCompletionService::with_reply(REPLY));
        let err = service(&fake)
            .get_insights(" ", &json!({ "price": 1.0 }))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::InvalidInput(_)));
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_reply_falls_back() {
        let fake = Arc::new(FakeCompletionService::with_reply("  "));
        let analysis = service(&fake)
            .get_insights("AAPL", &json!({}))
            .await
            .unwrap();
        assert_eq!(analysis.raw, NO_INSIGHTS);
    }

    #[tokio::test]
    async fn test_news_enrichment_does_not_change_fingerprint() {
        let fake = Arc::new(FakeCompletionService::with_reply(REPLY));
        let service = service(&fake);

        let mut data = stock_data(190.0);
        data.news.push(NewsItem::new(
            "Apple hits record high",
            "https://news.example/a",
            "Reuters",
            chrono::Utc::now(),
            SourceReliability::High,
        ));
        service.get_stock_insights(&data).await.unwrap();

        data.news[0].summary = "Shares rose.".to_string();
        data.news[0].estimated_read_time = Some(2);
        service.get_stock_insights(&data).await.unwrap();
        assert_eq!(fake.calls(), 1);

        let moved = stock_data(191.0);
        service.get_stock_insights(&moved).await.unwrap();
        assert_eq!(fake.calls(), 2);
    }
}
