//! Conversions between domain types and their SQLite column representations.
//!
//! Timestamps are stored as RFC 3339 strings with microsecond precision and a
//! `Z` suffix, so lexical order in SQL equals chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use blogr_core::{entry::Entry, user::User};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

/// Current time truncated to what [`encode_dt`] keeps, so a value returned
/// from a write equals the value read back later.
pub fn now() -> DateTime<Utc> {
  let now = Utc::now();
  DateTime::from_timestamp_micros(now.timestamp_micros()).unwrap_or(now)
}

// ─── Constraint violations ───────────────────────────────────────────────────

/// Whether `e` is a UNIQUE constraint failure.
pub fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const ENTRY_COLUMNS: &str = "id, title, body, created, edited";

/// Raw values read directly from an `entries` row.
pub struct RawEntry {
  pub id:      i64,
  pub title:   String,
  pub body:    String,
  pub created: String,
  pub edited:  String,
}

impl RawEntry {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:      row.get(0)?,
      title:   row.get(1)?,
      body:    row.get(2)?,
      created: row.get(3)?,
      edited:  row.get(4)?,
    })
  }

  pub fn into_entry(self) -> Result<Entry> {
    Ok(Entry {
      id:      self.id,
      title:   self.title,
      body:    self.body,
      created: decode_dt(&self.created)?,
      edited:  decode_dt(&self.edited)?,
    })
  }
}

pub const USER_COLUMNS: &str = "id, name, password, last_logged";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:          i64,
  pub name:        String,
  pub password:    String,
  pub last_logged: String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      name:        row.get(1)?,
      password:    row.get(2)?,
      last_logged: row.get(3)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            self.id,
      name:          self.name,
      password_hash: self.password,
      last_logged:   decode_dt(&self.last_logged)?,
    })
  }
}
