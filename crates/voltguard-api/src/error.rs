//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use voltguard_core::Error as CoreError;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error(transparent)]
  Core(#[from] CoreError),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthorized => {
        return (
          StatusCode::UNAUTHORIZED,
          [(header::WWW_AUTHENTICATE, "Bearer")],
          Json(json!({ "error": "unauthorized" })),
        )
          .into_response();
      }
      ApiError::Core(e) => {
        let status = match e {
          CoreError::Validation(_) => StatusCode::BAD_REQUEST,
          CoreError::Forbidden => StatusCode::FORBIDDEN,
          CoreError::AssetNotFound(_) => StatusCode::NOT_FOUND,
          CoreError::InvalidState(_) => StatusCode::CONFLICT,
          CoreError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
          CoreError::Store(_) | CoreError::Serialization(_) => {
            tracing::error!(error = %e, "internal error");
            StatusCode::INTERNAL_SERVER_ERROR
          }
        };
        (status, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
