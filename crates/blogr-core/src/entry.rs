//! Blog entries and the requests that create or change them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{humanize::humanize, slug::slugify};

/// Longest accepted title, in Unicode code points.
pub const MAX_TITLE_CHARS: usize = 255;

/// A single blog post.
///
/// `id` and `created` are assigned by the store and never change; `edited`
/// moves forward whenever the title or body changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
  pub id:      i64,
  /// Unique across all entries (exact, case-sensitive match).
  pub title:   String,
  pub body:    String,
  pub created: DateTime<Utc>,
  pub edited:  DateTime<Utc>,
}

impl Entry {
  /// URL fragment derived from the title. Empty when the title has no
  /// alphanumerics.
  pub fn slug(&self) -> String { slugify(&self.title) }

  /// How long ago the entry was created, e.g. "about 3 hours".
  pub fn created_in_words(&self, now: DateTime<Utc>) -> String {
    humanize(self.created, now)
  }

  /// `/entries/{id}/{slug}`, or `/entries/{id}` when the slug is empty.
  ///
  /// The slug segment is percent-encoded, so the path is plain ASCII even
  /// when the title is not.
  pub fn canonical_path(&self) -> String {
    let slug = self.slug();
    if slug.is_empty() {
      format!("/entries/{}", self.id)
    } else {
      format!("/entries/{}/{}", self.id, urlencoding::encode(&slug))
    }
  }
}

/// Input to [`crate::store::EntryStore::create`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewEntry {
  pub title: String,
  #[serde(default)]
  pub body:  String,
}

impl NewEntry {
  pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
    Self { title: title.into(), body: body.into() }
  }
}

/// Input to [`crate::store::EntryStore::update`]. `None` leaves the field as
/// it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EntryUpdate {
  pub title: Option<String>,
  pub body:  Option<String>,
}

impl EntryUpdate {
  pub fn title(title: impl Into<String>) -> Self {
    Self { title: Some(title.into()), body: None }
  }

  pub fn body(body: impl Into<String>) -> Self {
    Self { title: None, body: Some(body.into()) }
  }

  pub fn is_empty(&self) -> bool { self.title.is_none() && self.body.is_none() }

  /// Apply this update to `entry`, stamping `edited` with `now` if any field
  /// actually changed. Returns whether the entry changed.
  pub fn apply(self, entry: &mut Entry, now: DateTime<Utc>) -> bool {
    let mut changed = false;
    if let Some(title) = self.title
      && title != entry.title
    {
      entry.title = title;
      changed = true;
    }
    if let Some(body) = self.body
      && body != entry.body
    {
      entry.body = body;
      changed = true;
    }
    if changed {
      entry.edited = now;
    }
    changed
  }
}

/// Sort entries newest first; equal `created` timestamps fall back to the
/// higher `id` first.
pub fn sort_by_recency(entries: &mut [Entry]) {
  entries.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
}
