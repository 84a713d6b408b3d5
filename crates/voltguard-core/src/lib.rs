//! Domain types and trait seams for the Voltguard compliance tracker.
//!
//! Pure types only: no HTTP, no database. Storage, identity, and blob
//! backends implement the traits defined here; everything else in the
//! workspace builds on this crate.

// Traits use native `async fn` / `impl Future` methods; the advisory lint
// about missing `Send` bounds does not apply since the bounds are explicit.
#![allow(async_fn_in_trait)]

pub mod asset;
pub mod authz;
pub mod document;
pub mod error;
pub mod identity;
pub mod status;
pub mod store;

pub use error::{Error, Result};
