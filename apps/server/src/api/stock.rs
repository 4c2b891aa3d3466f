use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use marketlens_ai::StructuredAnalysis;
use marketlens_core::{Fundamentals, StockData};
use marketlens_market_data::{NewsItem, StockQuote};

use crate::{error::ApiResult, main_lib::AppState};

fn normalize(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

async fn get_stock(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<StockData>> {
    let data = state.stock_service.get_stock_data(&normalize(&ticker)).await?;
    Ok(Json(data))
}

async fn get_quote(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<StockQuote>> {
    let quote = state.stock_service.get_quote(&normalize(&ticker)).await?;
    Ok(Json(quote))
}

async fn get_fundamentals(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Fundamentals>> {
    let fundamentals = state.fundamentals_service.get_all(&normalize(&ticker)).await?;
    Ok(Json(fundamentals))
}

async fn get_news(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<NewsItem>>> {
    let news = state.news_service.get_company_news(&normalize(&ticker)).await?;
    Ok(Json(news))
}

/// Analysis of the current snapshot. The model is only consulted when the
/// snapshot changed since the last analysis of this symbol.
async fn get_insights(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<StructuredAnalysis>> {
    let data = state.stock_service.get_stock_data(&normalize(&ticker)).await?;
    let analysis = state.insight_service.get_stock_insights(&data).await?;
    Ok(Json(analysis))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stock/{ticker}", get(get_stock))
        .route("/stock/{ticker}/quote", get(get_quote))
        .route("/stock/{ticker}/fundamentals", get(get_fundamentals))
        .route("/stock/{ticker}/news", get(get_news))
        .route("/stock/{ticker}/insights", get(get_insights))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(" aapl "), "AAPL");
        assert_eq!(normalize("brk.b"), "BRK.B");
    }
}
