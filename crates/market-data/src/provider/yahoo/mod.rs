//! Yahoo Finance provider.
//!
//! Quotes, company profiles, valuation statistics and dividend data come from
//! the quoteSummary API, which needs a crumb/cookie pair. News comes from the
//! unauthenticated search API.

mod models;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use log::{debug, warn};
use reqwest::{header, Client, StatusCode};
use urlencoding::encode;

use crate::errors::DataError;
use crate::models::{
    CompanyProfile, DividendInfo, FinancialData, KeyStatistics, NewsItem, SourceReliability,
    StatisticsSnapshot, StockQuote,
};
use crate::provider::{NewsSource, QuoteProvider, BROWSER_USER_AGENT};

use models::{raw, YahooQuoteSummaryResponse, YahooQuoteSummaryResult, YahooSearchResponse};

const PROVIDER_ID: &str = "YAHOO";
const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const SEARCH_URL: &str = "https://query1.finance.yahoo.com/v1/finance/search";

/// Upper bound on stories requested from the search endpoint.
const NEWS_COUNT: u32 = 10;

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Global cache for Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

fn crumb_read() -> RwLockReadGuard<'static, Option<CrumbData>> {
    YAHOO_CRUMB.read().unwrap_or_else(|poisoned| {
        warn!("Yahoo crumb lock was poisoned, recovering");
        poisoned.into_inner()
    })
}

fn crumb_write() -> RwLockWriteGuard<'static, Option<CrumbData>> {
    YAHOO_CRUMB
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(BROWSER_USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

fn epoch_seconds(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance quote provider.
pub struct YahooProvider {
    client: Client,
}

impl YahooProvider {
    /// Create a provider whose requests fail after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
        }
    }

    // ========================================================================
    // Crumb/Cookie Authentication
    // ========================================================================

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, DataError> {
        if let Some(crumb) = crumb_read().as_ref() {
            return Ok(crumb.clone());
        }
        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, DataError> {
        // Step 1: Get cookie from fc.yahoo.com
        let response = self.client.get("https://fc.yahoo.com").send().await?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| DataError::api("Failed to parse Yahoo cookie", 502, true))?;

        // Step 2: Get crumb using cookie
        let response = self
            .client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::COOKIE, &cookie)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(DataError::from_status(
                response.status(),
                format!("Failed to get Yahoo crumb: HTTP {}", response.status()),
            ));
        }
        let crumb = response.text().await?;

        let crumb_data = CrumbData { cookie, crumb };
        *crumb_write() = Some(crumb_data.clone());
        Ok(crumb_data)
    }

    /// Clear the cached crumb (used when authentication fails)
    fn clear_crumb(&self) {
        *crumb_write() = None;
    }

    // ========================================================================
    // quoteSummary
    // ========================================================================

    /// Fetch the given quoteSummary modules for `symbol`.
    async fn quote_summary(
        &self,
        symbol: &str,
        modules: &[&str],
    ) -> Result<YahooQuoteSummaryResult, DataError> {
        let crumb = self.ensure_crumb().await?;
        let url = format!(
            "{}/{}?modules={}&crumb={}",
            QUOTE_SUMMARY_URL,
            encode(symbol),
            modules.join(","),
            encode(&crumb.crumb)
        );
        debug!("Yahoo quoteSummary {} [{}]", symbol, modules.join(","));

        let response = self
            .client
            .get(&url)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                self.clear_crumb();
                // Retryable: the next attempt fetches a fresh crumb.
                return Err(DataError::api("Yahoo authentication expired", 401, true));
            }
            StatusCode::NOT_FOUND => return Err(DataError::not_found(symbol)),
            status if !status.is_success() => {
                return Err(DataError::from_status(
                    status,
                    format!("Yahoo quoteSummary failed for {}: HTTP {}", symbol, status),
                ));
            }
            _ => {}
        }

        let data: YahooQuoteSummaryResponse = response.json().await?;
        if let Some(error) = data.quote_summary.error {
            if error.code.as_deref() == Some("Not Found") {
                return Err(DataError::not_found(symbol));
            }
            return Err(DataError::api(
                error
                    .description
                    .unwrap_or_else(|| format!("Yahoo quoteSummary failed for {}", symbol)),
                502,
                true,
            ));
        }

        data.quote_summary
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| DataError::not_found(symbol))
    }

    fn map_quote(symbol: &str, result: YahooQuoteSummaryResult) -> Result<StockQuote, DataError> {
        let price = result.price.ok_or_else(|| DataError::not_found(symbol))?;
        let last = raw(&price.regular_market_price).ok_or_else(|| DataError::not_found(symbol))?;

        let mut quote = StockQuote::new(price.symbol.unwrap_or_else(|| symbol.to_string()), last);
        quote.name = price.long_name.or(price.short_name);
        quote.change = raw(&price.regular_market_change).unwrap_or(0.0);
        // Yahoo reports a fraction; expose a percentage.
        quote.change_percent = raw(&price.regular_market_change_percent).unwrap_or(0.0) * 100.0;
        quote.volume = raw(&price.regular_market_volume)
            .filter(|v| *v >= 0.0)
            .map_or(0, |v| v as u64);
        quote.previous_close = raw(&price.regular_market_previous_close);
        quote.open = raw(&price.regular_market_open);
        quote.day_high = raw(&price.regular_market_day_high);
        quote.day_low = raw(&price.regular_market_day_low);
        quote.market_cap = raw(&price.market_cap);
        quote.currency = price.currency;
        quote.timestamp = price.regular_market_time.and_then(epoch_seconds);

        if let Some(detail) = result.summary_detail {
            quote.trailing_pe = raw(&detail.trailing_pe);
            quote.forward_pe = raw(&detail.forward_pe);
            quote.fifty_two_week_high = raw(&detail.fifty_two_week_high);
            quote.fifty_two_week_low = raw(&detail.fifty_two_week_low);
        }
        if let Some(stats) = result.default_key_statistics {
            quote.eps = raw(&stats.trailing_eps);
            if quote.forward_pe.is_none() {
                quote.forward_pe = raw(&stats.forward_pe);
            }
        }
        Ok(quote)
    }
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_quote(&self, symbol: &str) -> Result<StockQuote, DataError> {
        let result = self
            .quote_summary(symbol, &["price", "summaryDetail", "defaultKeyStatistics"])
            .await?;
        Self::map_quote(symbol, result)
    }

    async fn get_profile(&self, symbol: &str) -> Result<CompanyProfile, DataError> {
        let result = self.quote_summary(symbol, &["assetProfile"]).await?;
        let profile = result
            .asset_profile
            .ok_or_else(|| DataError::not_found(symbol))?;
        Ok(CompanyProfile {
            long_name: None,
            long_business_summary: profile.long_business_summary,
            sector: profile.sector,
            industry: profile.industry,
            website: profile.website,
            full_time_employees: profile.full_time_employees,
            city: profile.city,
            country: profile.country,
        })
    }

    async fn get_statistics(&self, symbol: &str) -> Result<StatisticsSnapshot, DataError> {
        let result = self
            .quote_summary(symbol, &["defaultKeyStatistics", "financialData"])
            .await?;

        let key_statistics = result
            .default_key_statistics
            .map(|s| KeyStatistics {
                beta: raw(&s.beta),
                price_to_book: raw(&s.price_to_book),
                forward_pe: raw(&s.forward_pe),
                trailing_eps: raw(&s.trailing_eps),
                forward_eps: raw(&s.forward_eps),
                enterprise_value: raw(&s.enterprise_value),
                peg_ratio: raw(&s.peg_ratio),
                book_value: raw(&s.book_value),
                profit_margins: raw(&s.profit_margins),
            })
            .unwrap_or_default();

        let financials = result
            .financial_data
            .map(|f| FinancialData {
                total_cash: raw(&f.total_cash),
                total_debt: raw(&f.total_debt),
                total_revenue: raw(&f.total_revenue),
                operating_margins: raw(&f.operating_margins),
                profit_margins: raw(&f.profit_margins),
                gross_margins: raw(&f.gross_margins),
                return_on_equity: raw(&f.return_on_equity),
                return_on_assets: raw(&f.return_on_assets),
                revenue_growth: raw(&f.revenue_growth),
                operating_cashflow: raw(&f.operating_cashflow),
                free_cashflow: raw(&f.free_cashflow),
                current_ratio: raw(&f.current_ratio),
                debt_to_equity: raw(&f.debt_to_equity),
            })
            .unwrap_or_default();

        Ok(StatisticsSnapshot {
            key_statistics,
            financials,
        })
    }

    async fn get_dividend_info(&self, symbol: &str) -> Result<DividendInfo, DataError> {
        let result = self.quote_summary(symbol, &["summaryDetail"]).await?;
        Ok(result
            .summary_detail
            .map(|d| DividendInfo {
                dividend_yield: raw(&d.dividend_yield),
                dividend_rate: raw(&d.dividend_rate),
                payout_ratio: raw(&d.payout_ratio),
                ex_dividend_date: raw(&d.ex_dividend_date).and_then(|secs| epoch_seconds(secs as i64)),
            })
            .unwrap_or_default())
    }
}

// ============================================================================
// Yahoo News
// ============================================================================

/// News from the Yahoo Finance search endpoint.
pub struct YahooNewsSource {
    client: Client,
}

impl YahooNewsSource {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
        }
    }

    fn map_articles(symbol: &str, response: YahooSearchResponse) -> Vec<NewsItem> {
        response
            .news
            .into_iter()
            .filter_map(|article| {
                let title = article.title.filter(|t| !t.trim().is_empty())?;
                let link = article.link?;
                let published_at = article
                    .provider_publish_time
                    .and_then(epoch_seconds)
                    .unwrap_or_else(Utc::now);
                let mut item = NewsItem::new(
                    title,
                    link,
                    article.publisher.unwrap_or_else(|| "Yahoo Finance".to_string()),
                    published_at,
                    SourceReliability::High,
                );
                item.related_tickers = if article.related_tickers.is_empty() {
                    vec![symbol.to_string()]
                } else {
                    article.related_tickers
                };
                Some(item)
            })
            .collect()
    }
}

#[async_trait]
impl NewsSource for YahooNewsSource {
    fn id(&self) -> &'static str {
        "YAHOO_NEWS"
    }

    async fn search_news(&self, symbol: &str) -> Result<Vec<NewsItem>, DataError> {
        let url = format!(
            "{}?q={}&quotesCount=0&newsCount={}",
            SEARCH_URL,
            encode(symbol),
            NEWS_COUNT
        );
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(DataError::from_status(
                response.status(),
                format!("Yahoo news search failed for {}: HTTP {}", symbol, response.status()),
            ));
        }
        let data: YahooSearchResponse = response.json().await?;
        let items = Self::map_articles(symbol, data);
        debug!("Yahoo news returned {} items for {}", items.len(), symbol);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(json: &str) -> YahooQuoteSummaryResult {
        let response: YahooQuoteSummaryResponse = serde_json::from_str(json).unwrap();
        response.quote_summary.result.unwrap().into_iter().next().unwrap()
    }

    #[test]
    fn test_map_quote() {
        let result = summary(
            r#"{"quoteSummary": {"result": [{
                "price": {
                    "symbol": "AAPL",
                    "shortName": "Apple",
                    "regularMarketPrice": {"raw": 191.5},
                    "regularMarketChange": {"raw": 2.5},
                    "regularMarketChangePercent": {"raw": 0.0132},
                    "regularMarketVolume": {"raw": 1000},
                    "marketCap": {"raw": 2.9e12}
                },
                "summaryDetail": {"trailingPE": {"raw": 29.8}, "forwardPE": {}},
                "defaultKeyStatistics": {"trailingEps": {"raw": 6.42}, "forwardPE": {"raw": 27.1}}
            }], "error": null}}"#,
        );
        let quote = YahooProvider::map_quote("AAPL", result).unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.name.as_deref(), Some("Apple"));
        assert_eq!(quote.price, 191.5);
        assert!((quote.change_percent - 1.32).abs() < 1e-9);
        assert_eq!(quote.volume, 1000);
        assert_eq!(quote.trailing_pe, Some(29.8));
        assert_eq!(quote.forward_pe, Some(27.1));
        assert_eq!(quote.eps, Some(6.42));
    }

    #[test]
    fn test_map_quote_without_price_is_not_found() {
        let err = YahooProvider::map_quote("ZZZZ", YahooQuoteSummaryResult::default()).unwrap_err();
        assert_eq!(err, DataError::not_found("ZZZZ"));
    }

    #[test]
    fn test_map_news_articles() {
        let response: YahooSearchResponse = serde_json::from_str(
            r#"{"news": [
                {"title": "Apple hits record high", "link": "https://a", "publisher": "Reuters", "providerPublishTime": 1717243200},
                {"title": "", "link": "https://b"},
                {"title": "No link"}
            ]}"#,
        )
        .unwrap();
        let items = YahooNewsSource::map_articles("AAPL", response);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].publisher, "Reuters");
        assert_eq!(items[0].source_reliability, SourceReliability::High);
        assert_eq!(items[0].related_tickers, vec!["AAPL".to_string()]);
        assert_eq!(items[0].published_at.timestamp(), 1717243200);
    }

    #[test]
    fn test_provider_id() {
        let provider = YahooProvider::new(Duration::from_secs(1));
        assert_eq!(QuoteProvider::id(&provider), "YAHOO");
    }
}
