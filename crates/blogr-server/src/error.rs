//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use blogr_api::ApiError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("password hashing failed: {0}")]
  PasswordHash(String),
  #[error(transparent)]
  Api(#[from] ApiError),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "error": "authentication required" })),
        )
          .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"blogr\""),
        );
        res
      }
      Error::BadRequest(msg) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
      }
      Error::PasswordHash(msg) => {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": msg }))).into_response()
      }
      Error::Api(e) => e.into_response(),
    }
  }
}
