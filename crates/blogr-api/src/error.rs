//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use blogr_core::store::StoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a backend error onto a response class: missing records become 404,
  /// uniqueness violations 409, anything else 500.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    use blogr_core::Error as Core;
    match e.domain() {
      Some(Core::EntryNotFound(_) | Core::UserNotFound(_)) => Self::NotFound(e.to_string()),
      Some(Core::DuplicateTitle(_) | Core::DuplicateUserName(_)) => {
        Self::Conflict(e.to_string())
      }
      None => {
        tracing::warn!(error = %e, "store failure");
        Self::Store(Box::new(e))
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
