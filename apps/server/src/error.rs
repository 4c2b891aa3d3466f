use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use marketlens_ai::AiError;
use marketlens_market_data::{DataError, ErrorResponse};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Data(#[from] DataError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorResponse,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Data(DataError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Data(DataError::Api { status_code, .. }) => StatusCode::from_u16(*status_code)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            ApiError::Data(DataError::Network(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Data(DataError::Unknown(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let ApiError::Data(e) = &self;
        let error = e.to_response();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), "{}", error.message);
        }
        (status, Json(ErrorBody { error })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        ApiError::Data(err.into())
    }
}
