//! Handlers for `/entries` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/entries` | Newest first; optional `?page=N` |
//! | `GET`   | `/entries/{id}` | 404 if not found |
//! | `GET`   | `/entries/{id}/{slug}` | Redirects to the canonical path when the slug is stale |
//! | `POST`  | `/entries` | Body: [`EntryBody`]; returns 201 + [`EntryView`] |
//! | `PATCH` | `/entries/{id}` | Body: [`EntryUpdate`]; fields left out are untouched |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{StatusCode, header},
  response::{IntoResponse, Redirect, Response},
};
use blogr_core::{
  entry::{Entry, EntryUpdate, MAX_TITLE_CHARS, NewEntry},
  paginate::Page,
  store::EntryStore,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

// ─── Views ───────────────────────────────────────────────────────────────────

/// An entry together with the values derived from it for display.
#[derive(Debug, Clone, Serialize)]
pub struct EntryView {
  #[serde(flatten)]
  pub entry:            Entry,
  pub slug:             String,
  pub created_in_words: String,
  /// Canonical path of the entry.
  pub url:              String,
}

impl EntryView {
  pub fn new(entry: Entry, now: DateTime<Utc>) -> Self {
    Self {
      slug: entry.slug(),
      created_in_words: entry.created_in_words(now),
      url: entry.canonical_path(),
      entry,
    }
  }
}

// ─── Input cleanup ───────────────────────────────────────────────────────────

/// Trim surrounding whitespace and enforce the title bounds.
fn clean_title(title: &str) -> Result<String, ApiError> {
  let title = title.trim();
  if title.is_empty() {
    return Err(ApiError::BadRequest("title must not be empty".into()));
  }
  if title.chars().count() > MAX_TITLE_CHARS {
    return Err(ApiError::BadRequest(format!(
      "title must be at most {MAX_TITLE_CHARS} characters"
    )));
  }
  Ok(title.to_owned())
}

fn clean_body(body: &str) -> String { body.trim().to_owned() }

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// 1-based page number; out-of-range values are clamped.
  pub page: Option<i64>,
}

/// `GET /entries[?page=N]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Page<EntryView>>, ApiError>
where
  S: EntryStore,
{
  let page = state
    .store
    .page_by_recency(params.page.unwrap_or(1), state.page_size)
    .await
    .map_err(ApiError::from_store)?;

  let now = Utc::now();
  Ok(Json(page.map(|e| EntryView::new(e, now))))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

async fn fetch<S: EntryStore>(store: &S, id: i64) -> Result<Entry, ApiError> {
  store
    .get(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("entry {id} not found")))
}

/// `GET /entries/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<EntryView>, ApiError>
where
  S: EntryStore,
{
  let entry = fetch(state.store.as_ref(), id).await?;
  Ok(Json(EntryView::new(entry, Utc::now())))
}

/// `GET /entries/{id}/{slug}`: a stale or mistyped slug redirects to the
/// canonical path; the id alone decides which entry is served.
pub async fn get_by_slug<S>(
  State(state): State<ApiState<S>>,
  Path((id, slug)): Path<(i64, String)>,
) -> Result<Response, ApiError>
where
  S: EntryStore,
{
  let entry = fetch(state.store.as_ref(), id).await?;
  if entry.slug() != slug {
    return Ok(Redirect::permanent(&entry.canonical_path()).into_response());
  }
  Ok(Json(EntryView::new(entry, Utc::now())).into_response())
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /entries`.
#[derive(Debug, Deserialize)]
pub struct EntryBody {
  pub title: String,
  #[serde(default)]
  pub body:  String,
}

/// `POST /entries`: returns 201, a `Location` header, and the stored entry.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<EntryBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EntryStore,
{
  let input = NewEntry {
    title: clean_title(&body.title)?,
    body:  clean_body(&body.body),
  };

  let entry = state
    .store
    .create(input)
    .await
    .map_err(ApiError::from_store)?;
  tracing::info!(id = entry.id, title = %entry.title, "entry created");

  let location = entry.canonical_path();
  Ok((
    StatusCode::CREATED,
    [(header::LOCATION, location)],
    Json(EntryView::new(entry, Utc::now())),
  ))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PATCH /entries/{id}`: body: `{"title": "...", "body": "..."}`, both
/// optional.
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<EntryUpdate>,
) -> Result<Json<EntryView>, ApiError>
where
  S: EntryStore,
{
  let update = EntryUpdate {
    title: body.title.as_deref().map(clean_title).transpose()?,
    body:  body.body.as_deref().map(clean_body),
  };

  let entry = state
    .store
    .update(id, update)
    .await
    .map_err(ApiError::from_store)?;
  tracing::info!(id = entry.id, "entry updated");

  Ok(Json(EntryView::new(entry, Utc::now())))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn title_is_trimmed() {
    assert_eq!(clean_title("  Hello  ").unwrap(), "Hello");
  }

  #[test]
  fn blank_title_is_rejected() {
    assert!(matches!(clean_title(" \t "), Err(ApiError::BadRequest(_))));
  }

  #[test]
  fn title_length_counts_code_points() {
    let at_limit = "é".repeat(MAX_TITLE_CHARS);
    assert!(clean_title(&at_limit).is_ok());
    let over = "é".repeat(MAX_TITLE_CHARS + 1);
    assert!(matches!(clean_title(&over), Err(ApiError::BadRequest(_))));
  }
}
