use std::sync::Arc;

use marketlens_ai::{
    AnalysisCache, CompletionService, InsightService, InsightServiceTrait, OpenAiCompletionService,
};
use marketlens_cache::{CacheCoordinator, FsStorage, InMemoryCache, PersistentCache, SystemClock};
use marketlens_core::{FundamentalsService, MarketService, NewsService, StockService};
use marketlens_market_data::{
    AlphaVantageProvider, ContentExtractor, FundamentalsProvider, HtmlContentExtractor,
    LexiconSentimentClassifier, NewsApiSource, NewsSource, QuoteProvider, SentimentClassifier,
    YahooNewsSource, YahooProvider,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LogFormat};

pub struct AppState {
    pub cache: Arc<CacheCoordinator>,
    pub stock_service: Arc<StockService>,
    pub fundamentals_service: Arc<FundamentalsService>,
    pub news_service: Arc<NewsService>,
    pub market_service: Arc<MarketService>,
    pub insight_service: Arc<dyn InsightServiceTrait>,
}

/// Upstream collaborators behind the services.
pub struct Providers {
    pub quotes: Arc<dyn QuoteProvider>,
    pub fundamentals: Arc<dyn FundamentalsProvider>,
    pub primary_news: Arc<dyn NewsSource>,
    pub secondary_news: Arc<dyn NewsSource>,
    pub extractor: Arc<dyn ContentExtractor>,
    pub classifier: Arc<dyn SentimentClassifier>,
    pub completion: Arc<dyn CompletionService>,
}

impl Providers {
    pub fn from_config(config: &Config) -> Self {
        let timeout = config.upstream_timeout;
        Self {
            quotes: Arc::new(YahooProvider::new(timeout)),
            fundamentals: Arc::new(AlphaVantageProvider::new(
                config.alpha_vantage_api_key.clone(),
                timeout,
            )),
            primary_news: Arc::new(YahooNewsSource::new(timeout)),
            secondary_news: Arc::new(NewsApiSource::new(config.news_api_key.clone(), timeout)),
            extractor: Arc::new(HtmlContentExtractor::new()),
            classifier: Arc::new(LexiconSentimentClassifier),
            completion: Arc::new(OpenAiCompletionService::new(
                config.openai_api_key.clone(),
                config.openai_model.clone(),
            )),
        }
    }
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    build_state_with(config, Providers::from_config(config)).await
}

/// Wires the cache and services around the given providers.
pub async fn build_state_with(config: &Config, providers: Providers) -> anyhow::Result<Arc<AppState>> {
    let storage = FsStorage::open(&config.cache_dir).await?;
    tracing::info!("Persistent cache directory: {}", config.cache_dir.display());

    let memory: Arc<InMemoryCache> = Arc::new(InMemoryCache::new());
    let cache = Arc::new(CacheCoordinator::new(
        memory,
        PersistentCache::new(Arc::new(storage)),
        Arc::new(SystemClock),
    ));

    let news_service = Arc::new(NewsService::new(
        cache.clone(),
        providers.primary_news,
        providers.secondary_news,
        providers.extractor,
        providers.classifier,
    ));
    let stock_service = Arc::new(StockService::new(
        cache.clone(),
        providers.quotes.clone(),
        news_service.clone(),
    ));
    let fundamentals_service = Arc::new(FundamentalsService::new(
        cache.clone(),
        providers.fundamentals,
    ));
    let market_service = Arc::new(MarketService::new(cache.clone(), providers.quotes));
    let insight_service: Arc<dyn InsightServiceTrait> = Arc::new(InsightService::new(
        providers.completion,
        AnalysisCache::new(config.insight_cache_capacity),
    ));

    Ok(Arc::new(AppState {
        cache,
        stock_service,
        fundamentals_service,
        news_service,
        market_service,
        insight_service,
    }))
}
