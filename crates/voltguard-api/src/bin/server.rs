//! voltguard-api server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus the
//! `VOLTGUARD_*` environment, opens the SQLite store and local document
//! storage, and serves the JSON API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use voltguard_api::{AppState, ServerConfig, TokenVerifier};
use voltguard_core::authz::OrgRolePolicy;
use voltguard_service::{AssetService, LocalFileStorage, SystemClock};
use voltguard_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "Voltguard compliance tracker server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
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

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("VOLTGUARD"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", server_cfg.store_path)
    })?;
  let files = LocalFileStorage::new(&server_cfg.docs_dir);

  let service = AssetService::new(
    store,
    files,
    Box::new(OrgRolePolicy),
    Box::new(SystemClock),
  );
  let state = AppState {
    service:  Arc::new(service),
    verifier: Arc::new(TokenVerifier::new(server_cfg.token_secret.clone())),
  };

  let app = voltguard_api::router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
