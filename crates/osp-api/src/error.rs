//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Client errors carry their message to the caller as plain text. Store
//! failures and timeouts are logged and reported with a generic message.

use std::time::Duration;

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

const GENERIC_FAILURE: &str = "internal server error";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),

  /// A server-side failure whose message is safe to show to clients. The
  /// cause is logged where the error is raised.
  #[error("{0}")]
  Internal(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("store call exceeded {0:?}")]
  Timeout(Duration),
}

impl From<osp_core::Error> for ApiError {
  fn from(e: osp_core::Error) -> Self {
    if e.is_client_error() {
      ApiError::BadRequest(e.to_string())
    } else {
      ApiError::Store(Box::new(e))
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
      ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
      ApiError::Internal(msg) => {
        (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response()
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store operation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE).into_response()
      }
      ApiError::Timeout(limit) => {
        tracing::error!(?limit, "store operation timed out");
        (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE).into_response()
      }
    }
  }
}
