//! helpdesk server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered under
//! `HELPDESK_*` environment variables, opens the configured store, and
//! serves the JSON API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use helpdesk_api::ApiState;
use helpdesk_core::{memory::MemoryStore, store::SupportStore};
use helpdesk_server::{ServerConfig, StoreBackend, app, expand_tilde, seed, services};
use helpdesk_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Helpdesk case and support person API")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config).context("failed to load configuration")?;

  match server_cfg.store {
    StoreBackend::Memory => run(MemoryStore::new(), server_cfg).await,
    StoreBackend::Sqlite => {
      let store_path = expand_tilde(&server_cfg.store_path);
      if let Some(parent) = store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
          .with_context(|| format!("failed to create {parent:?}"))?;
      }
      let store = SqliteStore::open(&store_path)
        .await
        .with_context(|| format!("failed to open store at {store_path:?}"))?;
      run(store, server_cfg).await
    }
  }
}

async fn run<S: SupportStore + 'static>(store: S, server_cfg: ServerConfig) -> anyhow::Result<()> {
  let (cases, persons) = services(Arc::new(store), &server_cfg);

  if server_cfg.seed_demo_data {
    seed::seed_demo_cases(&cases)
      .await
      .context("failed to seed demo cases")?;
  }

  let app = app(ApiState::new(cases, persons));
  let address = server_cfg.address();

  tracing::info!(store = server_cfg.store.system(), "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
