//! JSON REST API for Voltguard.
//!
//! Exposes an axum [`Router`] over an
//! [`AssetService`](voltguard_service::AssetService) built from any
//! [`AssetStore`] and [`FileStorage`]. All routes require a bearer token
//! from the identity provider; see [`token`].
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", voltguard_api::router(state))
//! ```

pub mod assets;
pub mod documents;
pub mod error;
pub mod token;
pub mod transfer;

#[cfg(test)]
mod tests;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use voltguard_core::store::AssetStore;
use voltguard_service::{AssetService, FileStorage};

pub use error::ApiError;
pub use token::TokenVerifier;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// `VOLTGUARD_*` environment.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:         String,
  pub port:         u16,
  /// SQLite database file.
  pub store_path:   PathBuf,
  /// Root directory for certification document blobs.
  pub docs_dir:     PathBuf,
  /// Shared secret the identity provider signs tokens with.
  pub token_secret: String,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S: AssetStore, F: FileStorage> {
  pub service:  Arc<AssetService<S, F>>,
  pub verifier: Arc<TokenVerifier>,
}

impl<S: AssetStore, F: FileStorage> Clone for AppState<S, F> {
  fn clone(&self) -> Self {
    Self {
      service:  self.service.clone(),
      verifier: self.verifier.clone(),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised router for `state`.
pub fn router<S, F>(state: AppState<S, F>) -> Router
where
  S: AssetStore + 'static,
  F: FileStorage + 'static,
{
  Router::new()
    // Assets
    .route(
      "/assets",
      get(assets::list::<S, F>).post(assets::create::<S, F>),
    )
    .route(
      "/assets/{id}",
      get(assets::get_one::<S, F>)
        .patch(assets::update::<S, F>)
        .delete(assets::delete::<S, F>),
    )
    .route("/assets/{id}/fail", post(assets::fail::<S, F>))
    .route("/assets/{id}/testing", post(assets::testing::<S, F>))
    // Documents
    .route(
      "/assets/{id}/documents",
      get(documents::list::<S, F>).post(documents::upload::<S, F>),
    )
    .route("/documents/bulk", post(documents::bulk::<S, F>))
    // Per-user listing
    .route("/users/{user_id}/assets", get(assets::by_user::<S, F>))
    // Bulk transfer
    .route("/import", post(transfer::import::<S, F>))
    .route("/export", get(transfer::export::<S, F>))
    .with_state(state)
}
