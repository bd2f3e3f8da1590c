//! Error type for `blogr-store-sqlite`.

use blogr_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] blogr_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl StoreError for Error {
  fn domain(&self) -> Option<&blogr_core::Error> {
    match self {
      Self::Core(e) => Some(e),
      _ => None,
    }
  }
}
