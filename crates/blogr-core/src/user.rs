//! Registered authors.
//!
//! The catalog stores users but never interprets the password hash; hashing
//! and verification belong to the authentication layer.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Longest accepted user name, in Unicode code points.
pub const MAX_NAME_CHARS: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
  pub id:            i64,
  /// Unique login name.
  pub name:          String,
  /// Opaque, verifiable hash (a PHC string in practice).
  pub password_hash: String,
  pub last_logged:   DateTime<Utc>,
}

/// The fields of a [`User`] that are safe to hand to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
  pub id:          i64,
  pub name:        String,
  pub last_logged: DateTime<Utc>,
}

impl From<User> for PublicUser {
  fn from(u: User) -> Self {
    Self { id: u.id, name: u.name, last_logged: u.last_logged }
  }
}

/// Input to [`crate::store::UserStore::add_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name:          String,
  pub password_hash: String,
}
