//! Fundamentals from the fundamentals provider.
//!
//! Amounts are in the statement's reporting currency. Fields the provider
//! reports as "None" or leaves empty are `None`.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyOverview {
    pub symbol: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub exchange: Option<String>,
    pub currency: Option<String>,
    pub country: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_capitalization: Option<f64>,
    pub ebitda: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub book_value: Option<f64>,
    pub dividend_per_share: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub eps: Option<f64>,
    pub profit_margin: Option<f64>,
    pub operating_margin_ttm: Option<f64>,
    pub return_on_assets_ttm: Option<f64>,
    pub return_on_equity_ttm: Option<f64>,
    pub revenue_ttm: Option<f64>,
    pub quarterly_earnings_growth_yoy: Option<f64>,
    pub quarterly_revenue_growth_yoy: Option<f64>,
    pub analyst_target_price: Option<f64>,
    pub beta: Option<f64>,
    pub week_52_high: Option<f64>,
    pub week_52_low: Option<f64>,
}

/// One annual income statement.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    pub fiscal_date_ending: String,
    pub reported_currency: Option<String>,
    pub total_revenue: Option<f64>,
    pub gross_profit: Option<f64>,
    pub cost_of_revenue: Option<f64>,
    pub operating_income: Option<f64>,
    pub operating_expenses: Option<f64>,
    pub research_and_development: Option<f64>,
    pub net_income: Option<f64>,
    pub ebit: Option<f64>,
    pub ebitda: Option<f64>,
}

/// One annual balance sheet.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    pub fiscal_date_ending: String,
    pub reported_currency: Option<String>,
    pub total_assets: Option<f64>,
    pub total_current_assets: Option<f64>,
    pub cash_and_cash_equivalents: Option<f64>,
    pub inventory: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub total_current_liabilities: Option<f64>,
    pub total_shareholder_equity: Option<f64>,
    pub retained_earnings: Option<f64>,
    pub shares_outstanding: Option<f64>,
}

/// One annual cash-flow statement.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowStatement {
    pub fiscal_date_ending: String,
    pub reported_currency: Option<String>,
    pub operating_cashflow: Option<f64>,
    pub capital_expenditures: Option<f64>,
    pub cashflow_from_investment: Option<f64>,
    pub cashflow_from_financing: Option<f64>,
    pub dividend_payout: Option<f64>,
    /// Operating cash flow less capital expenditures
    pub free_cash_flow: Option<f64>,
}

/// One quarterly earnings report.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsReport {
    pub fiscal_date_ending: String,
    pub reported_date: Option<String>,
    #[serde(rename = "reportedEPS")]
    pub reported_eps: Option<f64>,
    #[serde(rename = "estimatedEPS")]
    pub estimated_eps: Option<f64>,
    pub surprise: Option<f64>,
    pub surprise_percentage: Option<f64>,
}
