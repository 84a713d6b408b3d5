//! Error taxonomy for `voltguard-core`.
//!
//! Every layer funnels into this enum so callers can classify failures
//! uniformly: validation and authorization problems are never retried,
//! `RateLimited` is transient, and `Store` covers any other backend failure.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed or missing input; surfaced inline, never retried.
  #[error("validation failed: {0}")]
  Validation(String),

  /// The caller lacks permission for this org/role/assignment combination.
  /// Deliberately carries no detail about the denied resource.
  #[error("forbidden")]
  Forbidden,

  /// No asset with this id is visible under the caller's scope. Identical
  /// for "does not exist" and "exists in another org".
  #[error("asset not found: {0}")]
  AssetNotFound(Uuid),

  /// A lifecycle transition was requested from a state that does not
  /// permit it (e.g. failing an already-failed asset).
  #[error("invalid state: {0}")]
  InvalidState(String),

  /// An upstream collaborator signalled too many requests. Retried with
  /// backoff by the service layer before being surfaced.
  #[error("rate limited by upstream service")]
  RateLimited,

  /// Any other backing-store failure. Detail is logged server-side; the
  /// message here is safe to surface.
  #[error("store error: {0}")]
  Store(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
