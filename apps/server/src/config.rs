use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use anyhow::Context;
use marketlens_ai::DEFAULT_MODEL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub cache_dir: PathBuf,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub upstream_timeout: Duration,
    pub cache_sweep_interval: Duration,
    pub insight_cache_capacity: usize,
    pub log_format: LogFormat,
    pub alpha_vantage_api_key: String,
    pub news_api_key: String,
    pub openai_api_key: String,
    pub openai_model: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any variable source. Unset or unparsable
    /// numbers fall back to their defaults; a bad listen address is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let number = |key: &str, default: u64| parse_or(lookup(key), default);

        let listen_addr: SocketAddr = var("ML_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid ML_LISTEN_ADDR")?;
        let cors_allow = var("ML_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let log_format = match var("ML_LOG_FORMAT", "text").to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };
        let openai_model = lookup("OPENAI_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            listen_addr,
            cache_dir: PathBuf::from(var("ML_CACHE_DIR", "./.cache")),
            cors_allow,
            request_timeout: Duration::from_millis(number("ML_REQUEST_TIMEOUT_MS", 30_000)),
            upstream_timeout: Duration::from_millis(number("ML_UPSTREAM_TIMEOUT_MS", 10_000)),
            cache_sweep_interval: Duration::from_secs(number("ML_CACHE_SWEEP_SECS", 60).max(1)),
            insight_cache_capacity: parse_or(lookup("ML_INSIGHT_CACHE_CAPACITY"), 256),
            log_format,
            alpha_vantage_api_key: var("ALPHA_VANTAGE_API_KEY", ""),
            news_api_key: var("NEWS_API_KEY", ""),
            openai_api_key: var("OPENAI_API_KEY", ""),
            openai_model,
        })
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
