//! The Voltguard lifecycle service.
//!
//! Orchestrates the certification tracker's business rules over the
//! abstractions in [`voltguard_core`]: an [`AssetStore`] backend, a
//! [`FileStorage`] for document blobs, an [`AuthorizationPolicy`] gate and
//! a [`Clock`]. HTTP lives a layer up in `voltguard-api`.
//!
//! [`AssetStore`]: voltguard_core::store::AssetStore
//! [`AuthorizationPolicy`]: voltguard_core::authz::AuthorizationPolicy

pub mod clock;
pub mod files;
pub mod members;
pub mod retry;
mod service;


pub use clock::{Clock, FixedClock, SystemClock};
pub use files::{FileStorage, LocalFileStorage, StoredFile};
pub use members::MembershipService;
pub use service::{
  AssetService, BulkUploadFailure, BulkUploadOutcome, ImportOutcome,
};
