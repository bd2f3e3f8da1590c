//! Error types for `blogr-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("entry not found: {0}")]
  EntryNotFound(i64),

  #[error("an entry titled {0:?} already exists")]
  DuplicateTitle(String),

  #[error("user not found: {0}")]
  UserNotFound(i64),

  #[error("user name {0:?} is already taken")]
  DuplicateUserName(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
