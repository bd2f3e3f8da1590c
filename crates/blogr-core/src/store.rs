//! The `EntryStore` and `UserStore` traits.
//!
//! Implemented by storage backends ([`crate::memory::MemoryStore`],
//! `blogr-store-sqlite`). The HTTP layers depend on these traits, never on a
//! concrete backend, so the store handle is always injected by the caller.

use std::{future::Future, num::NonZeroUsize};

use crate::{
  Error,
  entry::{Entry, EntryUpdate, NewEntry},
  paginate::{Page, paginate},
  user::{NewUser, User},
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Bound on backend error types.
///
/// Lets callers recognise catalog failures (missing entry, duplicate title)
/// inside an error whose concrete type they do not know.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The catalog error this failure represents, or `None` for backend
  /// failures such as a lost connection.
  fn domain(&self) -> Option<&Error>;
}

impl StoreError for Error {
  fn domain(&self) -> Option<&Error> { Some(self) }
}

// ─── Entries ─────────────────────────────────────────────────────────────────

/// Abstraction over an entry catalog backend.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers on a multi-threaded runtime.
pub trait EntryStore: Send + Sync {
  type Error: StoreError;

  /// Persist a new entry. Fails with [`Error::DuplicateTitle`] if another
  /// entry already has exactly this title. `created` and `edited` are set by
  /// the store.
  fn create(
    &self,
    input: NewEntry,
  ) -> impl Future<Output = Result<Entry, Self::Error>> + Send + '_;

  /// Change the title and/or body of an entry.
  ///
  /// Fails with [`Error::EntryNotFound`] for an unknown id and with
  /// [`Error::DuplicateTitle`] if the new title belongs to a *different*
  /// entry. Re-submitting an entry's own title is not a conflict.
  fn update(
    &self,
    id: i64,
    update: EntryUpdate,
  ) -> impl Future<Output = Result<Entry, Self::Error>> + Send + '_;

  /// Retrieve an entry by id. Returns `None` if not found.
  fn get(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Entry>, Self::Error>> + Send + '_;

  /// Every entry, newest first; ties on `created` go to the higher id.
  fn list_by_recency(
    &self,
  ) -> impl Future<Output = Result<Vec<Entry>, Self::Error>> + Send + '_;

  /// One page of [`EntryStore::list_by_recency`].
  ///
  /// The default materialises the full listing; backends that can page
  /// natively should override it.
  fn page_by_recency(
    &self,
    page: i64,
    page_size: NonZeroUsize,
  ) -> impl Future<Output = Result<Page<Entry>, Self::Error>> + Send + '_ {
    async move {
      let entries = self.list_by_recency().await?;
      Ok(paginate(entries, page, page_size))
    }
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

pub trait UserStore: Send + Sync {
  type Error: StoreError;

  /// Fails with [`Error::DuplicateUserName`] if the name is taken.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn user_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Stamp `last_logged` with the current time.
  fn record_login(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;
}
