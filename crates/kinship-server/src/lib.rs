//! HTTP server assembly for Kinship.
//!
//! Mounts the JSON API under `/api`, serves the landing page at `/`, and
//! wraps everything in request tracing.

use std::path::{Path, PathBuf};

use axum::{Router, response::Html, routing::get};
use kinship_api::{AppState, api_router};
use kinship_core::store::RegistryStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

const INDEX_HTML: &str = include_str!("../assets/index.html");

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl ServerConfig {
  /// Layer defaults, the optional TOML file at `file`, `KINSHIP_*`
  /// environment variables, and finally the platform's `PORT`.
  pub fn load(file: &Path) -> Result<Self, config::ConfigError> {
    Self::from_sources(file, std::env::var("PORT").ok())
  }

  fn from_sources(file: &Path, port: Option<String>) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 80)?
      .set_default("store_path", "kinship.db")?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("KINSHIP"))
      .set_override_option("port", port)?
      .build()?
      .try_deserialize()
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn app<S>(state: AppState<S>) -> Router
where
  S: RegistryStore + 'static,
{
  Router::new()
    .route("/", get(index))
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}

async fn index() -> Html<&'static str> { Html(INDEX_HTML) }
