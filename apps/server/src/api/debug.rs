//! Cache inspection for operators.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use futures::FutureExt;
use marketlens_cache::CacheReport;
use serde::Deserialize;
use serde_json::json;

use crate::main_lib::AppState;

#[derive(Debug, Deserialize)]
struct InvalidateQuery {
    key: Option<String>,
}

async fn get_cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheReport> {
    Json(state.cache.get_cache_stats().await)
}

async fn invalidate_cache(
    Query(query): Query<InvalidateQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(key) = query.key.filter(|k| !k.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Cache key is required" })),
        )
            .into_response();
    };

    // Invalidation swallows storage errors, so only a panic reaches the 500 arm.
    match AssertUnwindSafe(state.cache.invalidate_cache(&key))
        .catch_unwind()
        .await
    {
        Ok(()) => Json(json!({ "message": format!("Cache invalidated for key: {}", key) }))
            .into_response(),
        Err(_) => {
            tracing::error!("Cache invalidation panicked for key {}", key);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to invalidate cache" })),
            )
                .into_response()
        }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/debug/cache", get(get_cache_stats).delete(invalidate_cache))
}
