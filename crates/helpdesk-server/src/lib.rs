//! Process bootstrap for the helpdesk server: configuration, service wiring
//! and the outer router.

pub mod seed;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{Router, routing::get};
use helpdesk_api::{ApiState, api_router};
use helpdesk_core::{
  observe::TracingObserver,
  service::{CaseService, PersonService},
  store::SupportStore,
  validate::AssignmentPolicy,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
  /// Process-local; everything is lost on exit.
  #[default]
  Memory,
  Sqlite,
}

impl StoreBackend {
  /// Value reported as `db.system` in service telemetry.
  pub fn system(self) -> &'static str {
    match self {
      Self::Memory => "memory",
      Self::Sqlite => "sqlite",
    }
  }
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `HELPDESK_*` environment variables. Every field has a default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store:             StoreBackend,
  /// SQLite file; only read when `store = "sqlite"`.
  pub store_path:        PathBuf,
  /// Load the demo cases into an empty store at startup.
  pub seed_demo_data:    bool,
  pub assignment_policy: AssignmentPolicy,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:              "127.0.0.1".to_owned(),
      port:              8080,
      store:             StoreBackend::Memory,
      store_path:        PathBuf::from("~/.local/share/helpdesk/helpdesk.db"),
      seed_demo_data:    true,
      assignment_policy: AssignmentPolicy::Permissive,
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `HELPDESK_*` environment
  /// variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("HELPDESK"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Wiring ──────────────────────────────────────────────────────────────────

/// Build the services over `store` as configured.
pub fn services<S: SupportStore>(
  store: Arc<S>,
  config: &ServerConfig,
) -> (CaseService<S>, PersonService<S>) {
  let observer = Arc::new(TracingObserver::new(config.store.system()));
  let cases = CaseService::new(store.clone())
    .with_policy(config.assignment_policy)
    .with_observer(observer.clone());
  let persons = PersonService::new(store).with_observer(observer);
  (cases, persons)
}

/// The full application: health probe, API routes and request tracing.
pub fn app<S: SupportStore + 'static>(state: ApiState<S>) -> Router {
  Router::new()
    .route("/", get(health))
    .merge(api_router(state))
    .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str { "Helpdesk API is running" }
