//! JSON REST API for Blogr entries.
//!
//! Exposes an axum [`Router`] backed by any [`blogr_core::store::EntryStore`].
//! Authentication and access control are the caller's responsibility; the
//! server crate layers them over this router.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = Router::new().merge(blogr_api::api_router(store.clone(), page_size));
//! ```

pub mod entries;
pub mod error;

use std::{num::NonZeroUsize, sync::Arc};

use axum::{Router, routing::get};
use blogr_core::store::EntryStore;

pub use error::ApiError;

/// State shared by the entry handlers.
pub struct ApiState<S> {
  pub store:     Arc<S>,
  /// Entries per page on `GET /entries`.
  pub page_size: NonZeroUsize,
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), page_size: self.page_size }
  }
}

/// Build the entry API router for `store`.
///
/// The returned `Router<()>` can be merged or nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>, page_size: NonZeroUsize) -> Router<()>
where
  S: EntryStore + 'static,
{
  Router::new()
    .route("/entries", get(entries::list::<S>).post(entries::create::<S>))
    .route("/entries/{id}", get(entries::get_one::<S>).patch(entries::update::<S>))
    .route("/entries/{id}/{slug}", get(entries::get_by_slug::<S>))
    .with_state(ApiState { store, page_size })
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use blogr_core::{entry::NewEntry, memory::MemoryStore};
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  fn app(store: &MemoryStore) -> Router {
    api_router(Arc::new(store.clone()), NonZeroUsize::new(5).unwrap())
  }

  async fn send(store: &MemoryStore, method: &str, uri: &str, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    app(store).oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn seed(store: &MemoryStore, n: usize) {
    for i in 1..=n {
      store.create(NewEntry::new(format!("Post {i}"), "")).await.unwrap();
    }
  }

  // ── Create ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_returns_201_with_slug() {
    let store = MemoryStore::new();
    let resp = send(
      &store,
      "POST",
      "/entries",
      Some(json!({ "title": "Hello World", "body": "First post" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp.headers().get(header::LOCATION).unwrap().to_str().unwrap().to_owned();

    let body = json_body(resp).await;
    assert_eq!(body["slug"], "hello-world");
    assert_eq!(body["title"], "Hello World");
    assert_eq!(body["created_in_words"], "less than a minute");
    assert_eq!(body["url"], location);
    assert_eq!(location, format!("/entries/{}/hello-world", body["id"]));
  }

  #[tokio::test]
  async fn duplicate_title_returns_409() {
    let store = MemoryStore::new();
    let entry = json!({ "title": "Hello World", "body": "First post" });
    send(&store, "POST", "/entries", Some(entry.clone())).await;
    let resp = send(&store, "POST", "/entries", Some(entry)).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert!(json_body(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn blank_title_returns_400() {
    let store = MemoryStore::new();
    let resp = send(&store, "POST", "/entries", Some(json!({ "title": "   " }))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn create_trims_input() {
    let store = MemoryStore::new();
    let resp = send(
      &store,
      "POST",
      "/entries",
      Some(json!({ "title": "  Spaced  ", "body": "\n text \n" })),
    )
    .await;
    let body = json_body(resp).await;
    assert_eq!(body["title"], "Spaced");
    assert_eq!(body["body"], "text");
  }

  // ── Read ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_missing_returns_404() {
    let store = MemoryStore::new();
    let resp = send(&store, "GET", "/entries/9", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn canonical_slug_serves_entry() {
    let store = MemoryStore::new();
    let e = store.create(NewEntry::new("Hello World", "")).await.unwrap();
    let resp = send(&store, "GET", &format!("/entries/{}/hello-world", e.id), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["id"], e.id);
  }

  #[tokio::test]
  async fn stale_slug_redirects() {
    let store = MemoryStore::new();
    let e = store.create(NewEntry::new("Hello World", "")).await.unwrap();
    let resp = send(&store, "GET", &format!("/entries/{}/old-title", e.id), None).await;
    assert_eq!(resp.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(
      resp.headers().get(header::LOCATION).unwrap(),
      &format!("/entries/{}/hello-world", e.id)
    );
  }

  #[tokio::test]
  async fn non_ascii_slug_redirect_is_encoded_and_resolves() {
    let store = MemoryStore::new();
    let e = store.create(NewEntry::new("Crème Brûlée", "")).await.unwrap();

    let resp = send(&store, "GET", &format!("/entries/{}/old", e.id), None).await;
    assert_eq!(resp.status(), StatusCode::PERMANENT_REDIRECT);
    let location = resp.headers().get(header::LOCATION).unwrap().to_str().unwrap().to_owned();
    assert_eq!(location, format!("/entries/{}/cr%C3%A8me-br%C3%BBl%C3%A9e", e.id));

    let resp = send(&store, "GET", &location, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["slug"], "crème-brûlée");
    assert_eq!(body["url"], location);
  }

  // ── List ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_pages_newest_first() {
    let store = MemoryStore::new();
    seed(&store, 12).await;

    let first = json_body(send(&store, "GET", "/entries", None).await).await;
    assert_eq!(first["page"], 1);
    assert_eq!(first["total_pages"], 3);
    assert_eq!(first["total_items"], 12);
    assert_eq!(first["items"][0]["title"], "Post 12");

    let third = json_body(send(&store, "GET", "/entries?page=3", None).await).await;
    assert_eq!(third["items"].as_array().unwrap().len(), 2);
    assert_eq!(third["items"][1]["title"], "Post 1");

    let clamped = json_body(send(&store, "GET", "/entries?page=99", None).await).await;
    assert_eq!(clamped, third);
  }

  #[tokio::test]
  async fn list_of_empty_store() {
    let store = MemoryStore::new();
    let body = json_body(send(&store, "GET", "/entries", None).await).await;
    assert_eq!(body["total_pages"], 0);
    assert_eq!(body["items"], json!([]));
  }

  // ── Update ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn patch_updates_given_fields() {
    let store = MemoryStore::new();
    let e = store.create(NewEntry::new("Hello World", "First post")).await.unwrap();
    let resp = send(
      &store,
      "PATCH",
      &format!("/entries/{}", e.id),
      Some(json!({ "body": "Edited" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["title"], "Hello World");
    assert_eq!(body["body"], "Edited");
  }

  #[tokio::test]
  async fn patch_with_own_title_succeeds() {
    let store = MemoryStore::new();
    let e = store.create(NewEntry::new("Hello World", "")).await.unwrap();
    let resp = send(
      &store,
      "PATCH",
      &format!("/entries/{}", e.id),
      Some(json!({ "title": "Hello World" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn patch_conflict_and_missing() {
    let store = MemoryStore::new();
    store.create(NewEntry::new("Taken", "")).await.unwrap();
    let e = store.create(NewEntry::new("Mine", "")).await.unwrap();

    let conflict = send(
      &store,
      "PATCH",
      &format!("/entries/{}", e.id),
      Some(json!({ "title": "Taken" })),
    )
    .await;
    assert_eq!(conflict.status(), StatusCode::CONFLICT);

    let missing = send(&store, "PATCH", "/entries/999", Some(json!({ "body": "x" }))).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
  }
}
