//! [`SqliteStore`], the SQLite implementation of [`EntryStore`] and
//! [`UserStore`].

use std::{num::NonZeroUsize, path::Path};

use blogr_core::{
  entry::{Entry, EntryUpdate, NewEntry},
  paginate::{Page, PageWindow},
  store::{EntryStore, UserStore},
  user::{NewUser, User},
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{ENTRY_COLUMNS, RawEntry, RawUser, USER_COLUMNS, encode_dt, is_unique_violation, now},
  schema::SCHEMA,
};

/// Outcome of an update attempted inside a connection closure.
enum Update {
  Done(RawEntry),
  Missing,
  Duplicate(String),
}

/// Outcome of an insert: the new rowid, or the value that collided with a
/// UNIQUE index.
type Insert = std::result::Result<i64, String>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Blogr store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fetch_user(&self, id: i64) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
              rusqlite::params![id],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }
}

// ─── EntryStore impl ─────────────────────────────────────────────────────────

impl EntryStore for SqliteStore {
  type Error = Error;

  async fn create(&self, input: NewEntry) -> Result<Entry> {
    let now    = now();
    let at_str = encode_dt(now);
    let title  = input.title.clone();
    let body   = input.body.clone();

    let outcome: Insert = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO entries (title, body, created, edited) VALUES (?1, ?2, ?3, ?3)",
          rusqlite::params![title, body, at_str],
        );
        match inserted {
          Ok(_) => Ok(Ok(conn.last_insert_rowid())),
          Err(e) if is_unique_violation(&e) => Ok(Err(title)),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    match outcome {
      Ok(id) => Ok(Entry {
        id,
        title: input.title,
        body: input.body,
        created: now,
        edited: now,
      }),
      Err(title) => Err(blogr_core::Error::DuplicateTitle(title).into()),
    }
  }

  async fn update(&self, id: i64, update: EntryUpdate) -> Result<Entry> {
    let edited_str = encode_dt(now());

    let outcome: Update = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let current = tx
          .query_row(
            &format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?1"),
            rusqlite::params![id],
            RawEntry::from_row,
          )
          .optional()?;
        let Some(current) = current else {
          return Ok(Update::Missing);
        };

        let title = update.title.unwrap_or_else(|| current.title.clone());
        let body  = update.body.unwrap_or_else(|| current.body.clone());
        if title == current.title && body == current.body {
          return Ok(Update::Done(current));
        }

        let updated = tx.execute(
          "UPDATE entries SET title = ?1, body = ?2, edited = ?3 WHERE id = ?4",
          rusqlite::params![title, body, edited_str, id],
        );
        match updated {
          Ok(_) => {}
          Err(e) if is_unique_violation(&e) => return Ok(Update::Duplicate(title)),
          Err(e) => return Err(e.into()),
        }
        tx.commit()?;

        Ok(Update::Done(RawEntry { title, body, edited: edited_str, ..current }))
      })
      .await?;

    match outcome {
      Update::Done(raw) => raw.into_entry(),
      Update::Missing => Err(blogr_core::Error::EntryNotFound(id).into()),
      Update::Duplicate(title) => Err(blogr_core::Error::DuplicateTitle(title).into()),
    }
  }

  async fn get(&self, id: i64) -> Result<Option<Entry>> {
    let raw: Option<RawEntry> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?1"),
              rusqlite::params![id],
              RawEntry::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEntry::into_entry).transpose()
  }

  async fn list_by_recency(&self) -> Result<Vec<Entry>> {
    let raws: Vec<RawEntry> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ENTRY_COLUMNS} FROM entries ORDER BY created DESC, id DESC"
        ))?;
        let rows = stmt
          .query_map([], RawEntry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntry::into_entry).collect()
  }

  async fn page_by_recency(&self, page: i64, page_size: NonZeroUsize) -> Result<Page<Entry>> {
    let (window, raws): (PageWindow, Vec<RawEntry>) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let total: i64 = tx.query_row("SELECT COUNT(*) FROM entries", [], |r| r.get(0))?;
        let window = PageWindow::new(usize::try_from(total).unwrap_or(0), page, page_size);

        let rows = {
          let mut stmt = tx.prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entries
             ORDER BY created DESC, id DESC
             LIMIT ?1 OFFSET ?2"
          ))?;
          stmt
            .query_map(
              rusqlite::params![window.page_size as i64, window.offset() as i64],
              RawEntry::from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        tx.commit()?;

        Ok((window, rows))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(RawEntry::into_entry)
      .collect::<Result<Vec<_>>>()?;
    Ok(window.with_items(items))
  }
}

// ─── UserStore impl ──────────────────────────────────────────────────────────

impl UserStore for SqliteStore {
  type Error = Error;

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let now      = now();
    let at_str   = encode_dt(now);
    let name     = input.name.clone();
    let password = input.password_hash.clone();

    let outcome: Insert = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO users (name, password, last_logged) VALUES (?1, ?2, ?3)",
          rusqlite::params![name, password, at_str],
        );
        match inserted {
          Ok(_) => Ok(Ok(conn.last_insert_rowid())),
          Err(e) if is_unique_violation(&e) => Ok(Err(name)),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    match outcome {
      Ok(id) => Ok(User {
        id,
        name: input.name,
        password_hash: input.password_hash,
        last_logged: now,
      }),
      Err(name) => Err(blogr_core::Error::DuplicateUserName(name).into()),
    }
  }

  async fn user_by_name(&self, name: &str) -> Result<Option<User>> {
    let name = name.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE name = ?1"),
              rusqlite::params![name],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn record_login(&self, id: i64) -> Result<User> {
    let at_str = encode_dt(now());

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users SET last_logged = ?1 WHERE id = ?2",
          rusqlite::params![at_str, id],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(blogr_core::Error::UserNotFound(id).into());
    }
    self
      .fetch_user(id)
      .await?
      .ok_or(Error::Core(blogr_core::Error::UserNotFound(id)))
  }
}
