//! HTTP server for Blogr.
//!
//! Wraps the entry API from `blogr-api` with Basic authentication, the access
//! control list in [`auth`], and author registration.

pub mod auth;
pub mod error;
pub mod settings;

pub use error::Error;
pub use settings::ServerConfig;

use std::sync::Arc;

use axum::{
  Json, Router,
  extract::State,
  http::StatusCode,
  middleware,
  response::IntoResponse,
  routing::post,
};
use blogr_api::ApiError;
use blogr_core::{
  store::{EntryStore, UserStore},
  user::{MAX_NAME_CHARS, NewUser, PublicUser},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through the server's own handlers and middleware.
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), config: Arc::clone(&self.config) }
  }
}

// ─── Registration ────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /register`.
#[derive(Debug, Deserialize)]
pub struct Registration {
  pub name:     String,
  pub password: String,
}

/// `POST /register`: creates an author and returns 201 with its public
/// fields. A taken name is a 409.
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<Registration>,
) -> Result<impl IntoResponse, Error>
where
  S: UserStore + 'static,
{
  let name = body.name.trim().to_owned();
  if name.is_empty() {
    return Err(Error::BadRequest("name must not be empty".into()));
  }
  if name.chars().count() > MAX_NAME_CHARS {
    return Err(Error::BadRequest(format!(
      "name must be at most {MAX_NAME_CHARS} characters"
    )));
  }
  if body.password.is_empty() {
    return Err(Error::BadRequest("password must not be empty".into()));
  }

  let password_hash = auth::hash_password_blocking(body.password).await?;
  let user = state
    .store
    .add_user(NewUser { name, password_hash })
    .await
    .map_err(ApiError::from_store)?;
  tracing::info!(id = user.id, name = %user.name, "user registered");

  Ok((StatusCode::CREATED, Json(PublicUser::from(user))))
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full application router: the entry API behind [`auth::authorize`]
/// plus the open registration endpoint, with request tracing.
///
/// The authorization layer runs only for matched routes, so unknown paths
/// are 404 whether or not the caller is signed in.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: EntryStore + UserStore + 'static,
{
  let entries = blogr_api::api_router(Arc::clone(&state.store), state.config.page_size)
    .route_layer(middleware::from_fn_with_state(state.clone(), auth::authorize::<S>));

  Router::new()
    .route("/register", post(register::<S>))
    .with_state(state)
    .merge(entries)
    .layer(TraceLayer::new_for_http())
}
