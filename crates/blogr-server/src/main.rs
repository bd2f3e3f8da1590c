//! blogr-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, and serves the Blogr JSON API over HTTP.
//!
//! # Adding an author from the shell
//!
//! ```text
//! cargo run -p blogr-server -- --add-user alice
//! ```
//!
//! The password is read from stdin.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use blogr_core::{store::UserStore, user::NewUser};
use blogr_server::{AppState, ServerConfig, auth};
use blogr_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Blogr server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Register an author with a password read from stdin, then exit.
  #[arg(long, value_name = "NAME")]
  add_user: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store_path = server_cfg.resolved_store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Helper mode: add an author and exit.
  if let Some(name) = cli.add_user {
    let password = read_password()?;
    if password.is_empty() {
      anyhow::bail!("password must not be empty");
    }
    let password_hash = auth::hash_password_blocking(password).await?;
    let user = store
      .add_user(NewUser { name: name.trim().to_owned(), password_hash })
      .await
      .context("failed to add user")?;
    println!("added user {} (id {})", user.name, user.id);
    return Ok(());
  }

  let address = server_cfg.address();
  let state = AppState {
    store:  Arc::new(store),
    config: Arc::new(server_cfg),
  };
  let app = blogr_server::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a single line from stdin as the password.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}
