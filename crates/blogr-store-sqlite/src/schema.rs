//! SQL schema for the Blogr SQLite store.
//!
//! Executed once at connection startup. There is no migration step; the
//! statements are idempotent.

/// Full schema DDL.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS entries (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    title    TEXT NOT NULL,
    body     TEXT NOT NULL DEFAULT '',
    created  TEXT NOT NULL,   -- RFC 3339 UTC, fixed width; sorts lexically
    edited   TEXT NOT NULL
);

-- The storage-level guard for title uniqueness under concurrent writers.
CREATE UNIQUE INDEX IF NOT EXISTS entries_title_idx ON entries(title);
CREATE INDEX IF NOT EXISTS entries_recency_idx ON entries(created DESC, id DESC);

CREATE TABLE IF NOT EXISTS users (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT NOT NULL,
    password     TEXT NOT NULL,   -- argon2 PHC string
    last_logged  TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS users_name_idx ON users(name);

PRAGMA user_version = 1;
";
