//! [`MemoryStore`], an in-process implementation of the store traits.
//!
//! Used by tests and by embedders that do not need persistence. A single
//! write lock serialises mutations, which is what keeps titles and user names
//! unique.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
  Error, Result,
  entry::{Entry, EntryUpdate, NewEntry, sort_by_recency},
  store::{EntryStore, UserStore},
  user::{NewUser, User},
};

#[derive(Default)]
struct Inner {
  entries:    Vec<Entry>,
  users:      Vec<User>,
  next_entry: i64,
  next_user:  i64,
}

/// Cloning is cheap; clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }
}

impl EntryStore for MemoryStore {
  type Error = Error;

  async fn create(&self, input: NewEntry) -> Result<Entry> {
    let mut inner = self.inner.write().await;
    if inner.entries.iter().any(|e| e.title == input.title) {
      return Err(Error::DuplicateTitle(input.title));
    }

    inner.next_entry += 1;
    let now = Utc::now();
    let entry = Entry {
      id:      inner.next_entry,
      title:   input.title,
      body:    input.body,
      created: now,
      edited:  now,
    };
    inner.entries.push(entry.clone());
    Ok(entry)
  }

  async fn update(&self, id: i64, update: EntryUpdate) -> Result<Entry> {
    let mut inner = self.inner.write().await;

    if let Some(title) = &update.title
      && inner.entries.iter().any(|e| e.id != id && &e.title == title)
    {
      // Only a conflict if the target exists; a missing id wins.
      if inner.entries.iter().any(|e| e.id == id) {
        return Err(Error::DuplicateTitle(title.clone()));
      }
    }

    let entry = inner
      .entries
      .iter_mut()
      .find(|e| e.id == id)
      .ok_or(Error::EntryNotFound(id))?;
    update.apply(entry, Utc::now());
    Ok(entry.clone())
  }

  async fn get(&self, id: i64) -> Result<Option<Entry>> {
    let inner = self.inner.read().await;
    Ok(inner.entries.iter().find(|e| e.id == id).cloned())
  }

  async fn list_by_recency(&self) -> Result<Vec<Entry>> {
    let mut entries = self.inner.read().await.entries.clone();
    sort_by_recency(&mut entries);
    Ok(entries)
  }
}

impl UserStore for MemoryStore {
  type Error = Error;

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let mut inner = self.inner.write().await;
    if inner.users.iter().any(|u| u.name == input.name) {
      return Err(Error::DuplicateUserName(input.name));
    }

    inner.next_user += 1;
    let user = User {
      id:            inner.next_user,
      name:          input.name,
      password_hash: input.password_hash,
      last_logged:   Utc::now(),
    };
    inner.users.push(user.clone());
    Ok(user)
  }

  async fn user_by_name(&self, name: &str) -> Result<Option<User>> {
    let inner = self.inner.read().await;
    Ok(inner.users.iter().find(|u| u.name == name).cloned())
  }

  async fn record_login(&self, id: i64) -> Result<User> {
    let mut inner = self.inner.write().await;
    let user = inner
      .users
      .iter_mut()
      .find(|u| u.id == id)
      .ok_or(Error::UserNotFound(id))?;
    user.last_logged = Utc::now();
    Ok(user.clone())
  }
}
