//! SQLite backend for the Voltguard asset store.
//!
//! Implements [`voltguard_core::store::AssetStore`] over a single SQLite
//! file (or `:memory:` for tests). Tenant isolation is structural: every
//! statement is keyed by `org_id`.

mod encode;
mod error;
mod schema;
mod store;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use store::SqliteStore;
