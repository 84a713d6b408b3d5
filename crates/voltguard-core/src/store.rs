//! The `AssetStore` trait.
//!
//! Implemented by storage backends (e.g. `voltguard-store-sqlite`). The
//! lifecycle service depends on this abstraction, not on any concrete
//! backend. Every method is keyed by `org_id`: a backend must never return
//! or touch a row outside the given org.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use crate::{asset::Asset, document::CertificationDocument};

/// Abstraction over the tracker's record store.
pub trait AssetStore: Send + Sync {
  type Error: std::error::Error
    + Into<crate::Error>
    + Send
    + Sync
    + 'static;

  // ── Assets ────────────────────────────────────────────────────────────

  /// Persist a fully-built asset. Fails on a duplicate
  /// `(org_id, serial_number)` pair.
  fn insert_asset(
    &self,
    asset: Asset,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retrieve one asset within `org_id`. Returns `None` if the id does not
  /// exist in that org — including when it exists in another org.
  fn get_asset(
    &self,
    org_id: Uuid,
    asset_id: Uuid,
  ) -> impl Future<Output = Result<Option<Asset>, Self::Error>> + Send + '_;

  /// List assets in `org_id`, optionally restricted to one assignee.
  fn list_assets(
    &self,
    org_id: Uuid,
    assigned_to: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<Asset>, Self::Error>> + Send + '_;

  /// Look up an asset by serial number within `org_id`.
  fn find_by_serial<'a>(
    &'a self,
    org_id: Uuid,
    serial_number: &'a str,
  ) -> impl Future<Output = Result<Option<Asset>, Self::Error>> + Send + 'a;

  /// Overwrite an existing asset row, keyed by `(org_id, asset_id)`.
  /// Fails if no such row exists.
  fn update_asset(
    &self,
    asset: Asset,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete an asset and, by cascade, its certification documents.
  /// Fails if no such row exists.
  fn delete_asset(
    &self,
    org_id: Uuid,
    asset_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Certification ─────────────────────────────────────────────────────

  /// Apply a certification atomically: write the updated asset row and
  /// insert its new document in one transaction. Either both are
  /// persisted or neither is.
  fn record_certification(
    &self,
    asset: Asset,
    document: CertificationDocument,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Documents for one asset, ordered by upload time.
  fn list_documents(
    &self,
    org_id: Uuid,
    asset_id: Uuid,
  ) -> impl Future<Output = Result<Vec<CertificationDocument>, Self::Error>>
  + Send
  + '_;
}
