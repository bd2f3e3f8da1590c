//! Runtime configuration, layered from an optional TOML file and `BLOGR_*`
//! environment variables.

use std::{
  num::NonZeroUsize,
  path::{Path, PathBuf},
};

use blogr_core::paginate::DEFAULT_PAGE_SIZE;
use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  /// SQLite database file; a leading `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  /// Entries per page on the index listing.
  #[serde(default = "default_page_size")]
  pub page_size:  NonZeroUsize,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 6543 }

fn default_store_path() -> PathBuf { PathBuf::from("blogr.sqlite3") }

fn default_page_size() -> NonZeroUsize { DEFAULT_PAGE_SIZE }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       default_host(),
      port:       default_port(),
      store_path: default_store_path(),
      page_size:  default_page_size(),
    }
  }
}

impl ServerConfig {
  /// Read `path` (if it exists) and overlay `BLOGR_*` environment variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("BLOGR"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// `store_path` with a leading `~` expanded to the user's home directory.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
