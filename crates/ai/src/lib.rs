//! Marketlens AI - memoized LLM stock insights using rig-core.
//!
//! # Architecture
//!
//! - `completion`: The completion boundary and its rig-core OpenAI implementation
//! - `memo`: Per-symbol fingerprint memo, bounded by LRU eviction
//! - `insight`: Fingerprint, consult the memo, complete, parse, remember
//! - `analysis`: Parses the sectioned reply into `StructuredAnalysis`
//! - `payload`: The stock snapshot fields sent to the model
//! - `prompt`: Prompt text
//!
//! # Example
//!
//! ```ignore
//! use marketlens_ai::{AnalysisCache, InsightService, OpenAiCompletionService};
//!
//! let completion = Arc::new(OpenAiCompletionService::new(api_key, "gpt-4o-mini"));
//! let insights = InsightService::new(completion, AnalysisCache::new(256));
//!
//! // Only the first call reaches the model while the snapshot is unchanged.
//! let analysis = insights.get_stock_insights(&stock_data).await?;
//! ```

pub mod analysis;
pub mod completion;
pub mod error;
pub mod insight;
pub mod memo;
pub mod payload;
pub mod prompt;

pub use analysis::{parse_analysis, Rating, StructuredAnalysis};
pub use completion::{
    CompletionRequest, CompletionService, FakeCompletionService, OpenAiCompletionService,
    DEFAULT_MODEL,
};
pub use error::AiError;
pub use insight::{InsightConfig, InsightService, InsightServiceTrait};
pub use memo::{fingerprint, AnalysisCache, AnalysisCacheEntry};
pub use payload::AnalysisPayload;
