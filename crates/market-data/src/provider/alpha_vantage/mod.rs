//! Alpha Vantage fundamentals provider.
//!
//! This module provides company fundamentals from the Alpha Vantage API:
//! - Company overview via OVERVIEW
//! - Annual statements via INCOME_STATEMENT, BALANCE_SHEET and CASH_FLOW
//! - Quarterly earnings via EARNINGS
//!
//! Note: Alpha Vantage free tier is limited to 5 API calls per minute.
//! Numbers arrive as strings; "None", "-" and empty strings map to `None`.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::errors::DataError;
use crate::models::{BalanceSheet, CashFlowStatement, CompanyOverview, EarningsReport, IncomeStatement};
use crate::provider::FundamentalsProvider;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER_ID: &str = "ALPHA_VANTAGE";

/// Alpha Vantage fundamentals provider.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
}

// ============================================================================
// Response structures for Alpha Vantage API
// ============================================================================

/// Fields present on every Alpha Vantage payload when something went wrong.
#[derive(Debug, Default, Deserialize)]
struct ApiNotice {
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

/// OVERVIEW response for company fundamentals
#[derive(Debug, Deserialize)]
struct CompanyOverviewResponse {
    #[serde(rename = "Symbol")]
    symbol: Option<String>,
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Description")]
    description: Option<String>,
    #[serde(rename = "Exchange")]
    exchange: Option<String>,
    #[serde(rename = "Currency")]
    currency: Option<String>,
    #[serde(rename = "Country")]
    country: Option<String>,
    #[serde(rename = "Sector")]
    sector: Option<String>,
    #[serde(rename = "Industry")]
    industry: Option<String>,
    #[serde(rename = "MarketCapitalization")]
    market_capitalization: Option<String>,
    #[serde(rename = "EBITDA")]
    ebitda: Option<String>,
    #[serde(rename = "PERatio")]
    pe_ratio: Option<String>,
    #[serde(rename = "PEGRatio")]
    peg_ratio: Option<String>,
    #[serde(rename = "BookValue")]
    book_value: Option<String>,
    #[serde(rename = "DividendPerShare")]
    dividend_per_share: Option<String>,
    #[serde(rename = "DividendYield")]
    dividend_yield: Option<String>,
    #[serde(rename = "EPS")]
    eps: Option<String>,
    #[serde(rename = "ProfitMargin")]
    profit_margin: Option<String>,
    #[serde(rename = "OperatingMarginTTM")]
    operating_margin_ttm: Option<String>,
    #[serde(rename = "ReturnOnAssetsTTM")]
    return_on_assets_ttm: Option<String>,
    #[serde(rename = "ReturnOnEquityTTM")]
    return_on_equity_ttm: Option<String>,
    #[serde(rename = "RevenueTTM")]
    revenue_ttm: Option<String>,
    #[serde(rename = "QuarterlyEarningsGrowthYOY")]
    quarterly_earnings_growth_yoy: Option<String>,
    #[serde(rename = "QuarterlyRevenueGrowthYOY")]
    quarterly_revenue_growth_yoy: Option<String>,
    #[serde(rename = "AnalystTargetPrice")]
    analyst_target_price: Option<String>,
    #[serde(rename = "Beta")]
    beta: Option<String>,
    #[serde(rename = "52WeekHigh")]
    week_52_high: Option<String>,
    #[serde(rename = "52WeekLow")]
    week_52_low: Option<String>,

    #[serde(flatten)]
    notice: ApiNotice,
}

#[derive(Debug, Deserialize)]
struct AnnualReportsResponse<T> {
    #[serde(rename = "annualReports", default = "Vec::new")]
    annual_reports: Vec<T>,
    #[serde(flatten)]
    notice: ApiNotice,
}

#[derive(Debug, Deserialize)]
struct EarningsResponse {
    #[serde(rename = "quarterlyEarnings", default)]
    quarterly_earnings: Vec<RawEarnings>,
    #[serde(flatten)]
    notice: ApiNotice,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIncomeStatement {
    fiscal_date_ending: String,
    reported_currency: Option<String>,
    total_revenue: Option<String>,
    gross_profit: Option<String>,
    cost_of_revenue: Option<String>,
    operating_income: Option<String>,
    operating_expenses: Option<String>,
    research_and_development: Option<String>,
    net_income: Option<String>,
    ebit: Option<String>,
    ebitda: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBalanceSheet {
    fiscal_date_ending: String,
    reported_currency: Option<String>,
    total_assets: Option<String>,
    total_current_assets: Option<String>,
    cash_and_cash_equivalents_at_carrying_value: Option<String>,
    inventory: Option<String>,
    total_liabilities: Option<String>,
    total_current_liabilities: Option<String>,
    total_shareholder_equity: Option<String>,
    retained_earnings: Option<String>,
    common_stock_shares_outstanding: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCashFlow {
    fiscal_date_ending: String,
    reported_currency: Option<String>,
    operating_cashflow: Option<String>,
    capital_expenditures: Option<String>,
    cashflow_from_investment: Option<String>,
    cashflow_from_financing: Option<String>,
    dividend_payout: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEarnings {
    fiscal_date_ending: String,
    reported_date: Option<String>,
    #[serde(rename = "reportedEPS")]
    reported_eps: Option<String>,
    #[serde(rename = "estimatedEPS")]
    estimated_eps: Option<String>,
    surprise: Option<String>,
    surprise_percentage: Option<String>,
}

/// Parse a string field as f64, handling "None" and "-" values
fn parse_f64(s: &Option<String>) -> Option<f64> {
    s.as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "None" && *v != "-")
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty() && v != "None")
}

impl From<RawIncomeStatement> for IncomeStatement {
    fn from(r: RawIncomeStatement) -> Self {
        Self {
            total_revenue: parse_f64(&r.total_revenue),
            gross_profit: parse_f64(&r.gross_profit),
            cost_of_revenue: parse_f64(&r.cost_of_revenue),
            operating_income: parse_f64(&r.operating_income),
            operating_expenses: parse_f64(&r.operating_expenses),
            research_and_development: parse_f64(&r.research_and_development),
            net_income: parse_f64(&r.net_income),
            ebit: parse_f64(&r.ebit),
            ebitda: parse_f64(&r.ebitda),
            fiscal_date_ending: r.fiscal_date_ending,
            reported_currency: r.reported_currency,
        }
    }
}

impl From<RawBalanceSheet> for BalanceSheet {
    fn from(r: RawBalanceSheet) -> Self {
        Self {
            total_assets: parse_f64(&r.total_assets),
            total_current_assets: parse_f64(&r.total_current_assets),
            cash_and_cash_equivalents: parse_f64(&r.cash_and_cash_equivalents_at_carrying_value),
            inventory: parse_f64(&r.inventory),
            total_liabilities: parse_f64(&r.total_liabilities),
            total_current_liabilities: parse_f64(&r.total_current_liabilities),
            total_shareholder_equity: parse_f64(&r.total_shareholder_equity),
            retained_earnings: parse_f64(&r.retained_earnings),
            shares_outstanding: parse_f64(&r.common_stock_shares_outstanding),
            fiscal_date_ending: r.fiscal_date_ending,
            reported_currency: r.reported_currency,
        }
    }
}

impl From<RawCashFlow> for CashFlowStatement {
    fn from(r: RawCashFlow) -> Self {
        let operating_cashflow = parse_f64(&r.operating_cashflow);
        let capital_expenditures = parse_f64(&r.capital_expenditures);
        Self {
            free_cash_flow: operating_cashflow
                .zip(capital_expenditures)
                .map(|(ocf, capex)| ocf - capex.abs()),
            operating_cashflow,
            capital_expenditures,
            cashflow_from_investment: parse_f64(&r.cashflow_from_investment),
            cashflow_from_financing: parse_f64(&r.cashflow_from_financing),
            dividend_payout: parse_f64(&r.dividend_payout),
            fiscal_date_ending: r.fiscal_date_ending,
            reported_currency: r.reported_currency,
        }
    }
}

impl From<RawEarnings> for EarningsReport {
    fn from(r: RawEarnings) -> Self {
        Self {
            reported_eps: parse_f64(&r.reported_eps),
            estimated_eps: parse_f64(&r.estimated_eps),
            surprise: parse_f64(&r.surprise),
            surprise_percentage: parse_f64(&r.surprise_percentage),
            fiscal_date_ending: r.fiscal_date_ending,
            reported_date: non_empty(r.reported_date),
        }
    }
}

impl CompanyOverviewResponse {
    fn into_overview(self, symbol: &str) -> CompanyOverview {
        CompanyOverview {
            symbol: self.symbol.unwrap_or_else(|| symbol.to_string()),
            name: non_empty(self.name),
            description: non_empty(self.description),
            exchange: non_empty(self.exchange),
            currency: non_empty(self.currency),
            country: non_empty(self.country),
            sector: non_empty(self.sector),
            industry: non_empty(self.industry),
            market_capitalization: parse_f64(&self.market_capitalization),
            ebitda: parse_f64(&self.ebitda),
            pe_ratio: parse_f64(&self.pe_ratio),
            peg_ratio: parse_f64(&self.peg_ratio),
            book_value: parse_f64(&self.book_value),
            dividend_per_share: parse_f64(&self.dividend_per_share),
            dividend_yield: parse_f64(&self.dividend_yield),
            eps: parse_f64(&self.eps),
            profit_margin: parse_f64(&self.profit_margin),
            operating_margin_ttm: parse_f64(&self.operating_margin_ttm),
            return_on_assets_ttm: parse_f64(&self.return_on_assets_ttm),
            return_on_equity_ttm: parse_f64(&self.return_on_equity_ttm),
            revenue_ttm: parse_f64(&self.revenue_ttm),
            quarterly_earnings_growth_yoy: parse_f64(&self.quarterly_earnings_growth_yoy),
            quarterly_revenue_growth_yoy: parse_f64(&self.quarterly_revenue_growth_yoy),
            analyst_target_price: parse_f64(&self.analyst_target_price),
            beta: parse_f64(&self.beta),
            week_52_high: parse_f64(&self.week_52_high),
            week_52_low: parse_f64(&self.week_52_low),
        }
    }
}

impl AlphaVantageProvider {
    /// Create a new Alpha Vantage provider with the given API key.
    pub fn new(api_key: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, api_key }
    }

    /// Make a request to the Alpha Vantage API.
    async fn fetch(&self, function: &str, symbol: &str) -> Result<String, DataError> {
        if self.api_key.is_empty() {
            return Err(DataError::api("Alpha Vantage API key is not configured", 503, false));
        }
        let params = [("function", function), ("symbol", symbol), ("apikey", self.api_key.as_str())];
        let url = reqwest::Url::parse_with_params(BASE_URL, &params)
            .map_err(|e| DataError::unknown(format!("Failed to build URL: {}", e)))?;

        debug!(
            "Alpha Vantage request: {}",
            url.as_str().replace(&self.api_key, "***")
        );

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DataError::from_status(
                status,
                format!("{} {} failed: HTTP {}", PROVIDER_ID, function, status),
            ));
        }
        Ok(response.text().await?)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, function: &str, symbol: &str) -> Result<T, DataError> {
        let body = self.fetch(function, symbol).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Check for API-level errors in the response.
    fn check_api_error(notice: &ApiNotice, symbol: &str) -> Result<(), DataError> {
        if let Some(ref msg) = notice.error_message {
            if msg.contains("Invalid API call") || msg.contains("not found") {
                return Err(DataError::not_found(symbol));
            }
            return Err(DataError::api(msg.clone(), 502, false));
        }

        // "Note" and "Information" usually indicate rate limiting
        for msg in [&notice.note, &notice.information].into_iter().flatten() {
            if msg.contains("API call frequency") || msg.contains("rate limit") {
                return Err(DataError::api(msg.clone(), 429, true));
            }
            warn!("Alpha Vantage notice: {}", msg);
        }

        Ok(())
    }

    async fn fetch_annual<R, T>(&self, function: &str, symbol: &str) -> Result<Vec<T>, DataError>
    where
        R: DeserializeOwned,
        T: From<R>,
    {
        let response: AnnualReportsResponse<R> = self.fetch_json(function, symbol).await?;
        Self::check_api_error(&response.notice, symbol)?;
        Ok(response.annual_reports.into_iter().map(T::from).collect())
    }
}

#[async_trait]
impl FundamentalsProvider for AlphaVantageProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_overview(&self, symbol: &str) -> Result<CompanyOverview, DataError> {
        let response: CompanyOverviewResponse = self.fetch_json("OVERVIEW", symbol).await?;
        Self::check_api_error(&response.notice, symbol)?;
        // An unknown symbol yields `{}`.
        if response.symbol.is_none() && response.name.is_none() {
            return Err(DataError::not_found(symbol));
        }
        Ok(response.into_overview(symbol))
    }

    async fn get_income_statement(&self, symbol: &str) -> Result<Vec<IncomeStatement>, DataError> {
        self.fetch_annual::<RawIncomeStatement, _>("INCOME_STATEMENT", symbol).await
    }

    async fn get_balance_sheet(&self, symbol: &str) -> Result<Vec<BalanceSheet>, DataError> {
        self.fetch_annual::<RawBalanceSheet, _>("BALANCE_SHEET", symbol).await
    }

    async fn get_cash_flow(&self, symbol: &str) -> Result<Vec<CashFlowStatement>, DataError> {
        self.fetch_annual::<RawCashFlow, _>("CASH_FLOW", symbol).await
    }

    async fn get_earnings(&self, symbol: &str) -> Result<Vec<EarningsReport>, DataError> {
        let response: EarningsResponse = self.fetch_json("EARNINGS", symbol).await?;
        Self::check_api_error(&response.notice, symbol)?;
        Ok(response.quarterly_earnings.into_iter().map(EarningsReport::from).collect())
    }
}
