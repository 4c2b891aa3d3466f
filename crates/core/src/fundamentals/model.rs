use serde::{Deserialize, Serialize};

use marketlens_market_data::{
    BalanceSheet, CashFlowStatement, CompanyOverview, EarningsReport, IncomeStatement,
};

/// All five fundamentals datasets for one symbol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fundamentals {
    pub overview: CompanyOverview,
    pub income_statement: Vec<IncomeStatement>,
    pub balance_sheet: Vec<BalanceSheet>,
    pub cash_flow: Vec<CashFlowStatement>,
    pub earnings: Vec<EarningsReport>,
}
