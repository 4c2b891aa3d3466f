use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use marketlens_core::{MarketIndex, MarketView};
use marketlens_market_data::StockQuote;
use serde::{Deserialize, Serialize};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Debug, Deserialize)]
struct MarketQuery {
    #[serde(rename = "type")]
    view: Option<String>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MarketResponse {
    Indices(Vec<MarketIndex>),
    Trending(Vec<StockQuote>),
}

async fn get_market(
    Query(query): Query<MarketQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MarketResponse>> {
    let view: MarketView = query.view.as_deref().unwrap_or_default().parse()?;
    let response = match view {
        MarketView::Indices => MarketResponse::Indices(state.market_service.get_indices().await?),
        MarketView::Trending => MarketResponse::Trending(state.market_service.get_trending().await?),
    };
    Ok(Json(response))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/market", get(get_market))
}
