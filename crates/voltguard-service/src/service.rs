//! The asset lifecycle service.
//!
//! Every operation takes an explicit [`Caller`] and runs the authorization
//! policy before touching the store. Status is a derived projection: reads
//! re-evaluate the date-based statuses against the clock, and only the
//! dedicated transitions may set the sticky ones.

use bytes::Bytes;
use serde::Serialize;
use uuid::Uuid;
use voltguard_core::{
  Error, Result,
  asset::{Asset, AssetPatch, CertStatus, NewAsset},
  authz::{Action, AuthorizationPolicy},
  document::CertificationDocument,
  identity::Caller,
  status::{compute_status, next_certification_date},
  store::AssetStore,
};
use voltguard_csv::RowError;

use crate::{
  clock::Clock,
  files::{FileStorage, StoredFile},
};

// ─── Reports ─────────────────────────────────────────────────────────────────

/// Outcome of a CSV import: rows either became assets or produced a
/// line-tagged error. Never all-or-nothing.
#[derive(Debug, Serialize)]
pub struct ImportOutcome {
  pub created: usize,
  pub errors:  Vec<RowError>,
}

#[derive(Debug, Serialize)]
pub struct BulkUploadFailure {
  pub asset_id: Uuid,
  pub message:  String,
}

/// Per-asset outcome of a bulk document upload. Assets that fail
/// authorization or lookup are skipped, not fatal.
#[derive(Debug, Serialize)]
pub struct BulkUploadOutcome {
  pub applied: Vec<Uuid>,
  pub failed:  Vec<BulkUploadFailure>,
}

// ─── Service ─────────────────────────────────────────────────────────────────

pub struct AssetService<S, F> {
  store:  S,
  files:  F,
  policy: Box<dyn AuthorizationPolicy>,
  clock:  Box<dyn Clock>,
}

impl<S: AssetStore, F: FileStorage> AssetService<S, F> {
  pub fn new(
    store: S,
    files: F,
    policy: Box<dyn AuthorizationPolicy>,
    clock: Box<dyn Clock>,
  ) -> Self {
    Self { store, files, policy, clock }
  }

  // ── CRUD ──────────────────────────────────────────────────────────────

  /// Create an asset in the caller's org. Any role may create; the org is
  /// stamped from the caller, never from the payload.
  pub async fn create_asset(
    &self,
    caller: &Caller,
    new: NewAsset,
  ) -> Result<Asset> {
    let asset = self.build_asset(caller.org_id, new)?;
    self
      .store
      .insert_asset(asset.clone())
      .await
      .map_err(Into::into)?;
    tracing::info!(
      asset_id = %asset.asset_id,
      org_id = %asset.org_id,
      "asset created"
    );
    Ok(asset)
  }

  pub async fn get_asset(
    &self,
    caller: &Caller,
    asset_id: Uuid,
  ) -> Result<Asset> {
    let asset = self.load_visible(caller, asset_id).await?;
    Ok(self.refreshed(asset))
  }

  /// Assets the caller may see: all of the org for admins, the caller's
  /// own assignments for members.
  pub async fn list_assets(&self, caller: &Caller) -> Result<Vec<Asset>> {
    let assigned_to =
      if caller.is_admin() { None } else { Some(caller.user_id) };
    let assets = self
      .store
      .list_assets(caller.org_id, assigned_to)
      .await
      .map_err(Into::into)?;
    Ok(assets.into_iter().map(|a| self.refreshed(a)).collect())
  }

  /// Assets assigned to one user. Members may only ask about themselves.
  pub async fn get_assets_by_user(
    &self,
    caller: &Caller,
    user_id: Uuid,
  ) -> Result<Vec<Asset>> {
    if !caller.is_admin() && user_id != caller.user_id {
      return Err(Error::Forbidden);
    }
    let assets = self
      .store
      .list_assets(caller.org_id, Some(user_id))
      .await
      .map_err(Into::into)?;
    Ok(assets.into_iter().map(|a| self.refreshed(a)).collect())
  }

  /// Apply a partial update. Status and the failure/testing fields are not
  /// patchable; changing `last_certification_date` re-derives the due date
  /// and status unless a sticky status has the clock frozen.
  pub async fn update_asset(
    &self,
    caller: &Caller,
    asset_id: Uuid,
    patch: AssetPatch,
  ) -> Result<Asset> {
    if patch.is_empty() {
      return Err(Error::Validation("empty patch".into()));
    }
    let mut asset = self.load_authorized(caller, asset_id, Action::Update).await?;

    if let Some(serial) = patch.serial_number {
      let serial = serial.trim().to_string();
      if serial.is_empty() {
        return Err(Error::Validation("serial_number must not be empty".into()));
      }
      // Pre-check the org-wide uniqueness so every backend reports the
      // collision as a validation error, not just ones with a constraint.
      if serial != asset.serial_number
        && self
          .store
          .find_by_serial(caller.org_id, &serial)
          .await
          .map_err(Into::into)?
          .is_some()
      {
        return Err(Error::Validation(format!(
          "serial number {serial:?} is already in use"
        )));
      }
      asset.serial_number = serial;
    }
    if let Some(class) = patch.asset_class {
      asset.asset_class = class;
    }
    if let Some(size) = patch.glove_size {
      asset.glove_size = Some(size);
    }
    if let Some(color) = patch.glove_color {
      asset.glove_color = Some(color);
    }
    if let Some(assignment) = patch.assigned_user_id {
      asset.assigned_user_id = assignment;
    }
    if let Some(issued) = patch.issue_date {
      asset.issue_date = issued;
    }
    if let Some(last) = patch.last_certification_date {
      asset.last_certification_date = last;
      // A sticky status freezes the derived fields until the next
      // certification document restarts the cycle.
      if !asset.status.is_sticky() {
        asset.next_certification_date = next_certification_date(last);
        asset.status =
          compute_status(asset.next_certification_date, self.clock.today());
      }
    }

    self
      .store
      .update_asset(asset.clone())
      .await
      .map_err(Into::into)?;
    Ok(self.refreshed(asset))
  }

  pub async fn delete_asset(
    &self,
    caller: &Caller,
    asset_id: Uuid,
  ) -> Result<()> {
    self.load_authorized(caller, asset_id, Action::Delete).await?;
    self
      .store
      .delete_asset(caller.org_id, asset_id)
      .await
      .map_err(Into::into)?;
    tracing::info!(%asset_id, org_id = %caller.org_id, "asset deleted");
    Ok(())
  }

  // ── Lifecycle transitions ─────────────────────────────────────────────

  /// Mark an asset as failed inspection. Requires a reason; fails if the
  /// asset already is failed.
  pub async fn mark_as_failed(
    &self,
    caller: &Caller,
    asset_id: Uuid,
    reason: Option<String>,
  ) -> Result<Asset> {
    let mut asset =
      self.load_authorized(caller, asset_id, Action::Transition).await?;
    let reason = reason
      .map(|r| r.trim().to_string())
      .filter(|r| !r.is_empty())
      .ok_or_else(|| Error::Validation("failure reason required".into()))?;
    if asset.status == CertStatus::Failed {
      return Err(Error::InvalidState("asset is already failed".into()));
    }

    asset.status = CertStatus::Failed;
    asset.failure_date = Some(self.clock.today());
    asset.failure_reason = Some(reason);
    asset.testing_start_date = None;

    self
      .store
      .update_asset(asset.clone())
      .await
      .map_err(Into::into)?;
    tracing::info!(%asset_id, "asset marked failed");
    Ok(asset)
  }

  /// Send an asset off for lab testing. Refused for failed assets and for
  /// assets already in testing.
  pub async fn mark_as_in_testing(
    &self,
    caller: &Caller,
    asset_id: Uuid,
  ) -> Result<Asset> {
    let mut asset =
      self.load_authorized(caller, asset_id, Action::Transition).await?;
    match asset.status {
      CertStatus::Failed => {
        return Err(Error::InvalidState(
          "a failed asset cannot enter testing".into(),
        ));
      }
      CertStatus::InTesting => {
        return Err(Error::InvalidState("asset is already in testing".into()));
      }
      _ => {}
    }

    asset.status = CertStatus::InTesting;
    asset.testing_start_date = Some(self.clock.today());

    self
      .store
      .update_asset(asset.clone())
      .await
      .map_err(Into::into)?;
    tracing::info!(%asset_id, "asset sent to testing");
    Ok(asset)
  }

  // ── Certification documents ───────────────────────────────────────────

  /// Attach a certification document and restart the asset's cycle as of
  /// today. Clears any sticky status. Asset row and document row are
  /// written in one store transaction.
  pub async fn upload_document(
    &self,
    caller: &Caller,
    asset_id: Uuid,
    file_name: &str,
    contents: Bytes,
  ) -> Result<(Asset, CertificationDocument)> {
    let asset =
      self.load_authorized(caller, asset_id, Action::UploadDocument).await?;

    let stored = self
      .files
      .put(caller.org_id, asset_id, file_name, &contents)
      .await?;
    // `applied_to_assets` stays empty for single uploads; it is the bulk
    // audit linkage.
    let (asset, document) =
      self.certify(caller, asset, file_name, stored, Vec::new());

    self
      .store
      .record_certification(asset.clone(), document.clone())
      .await
      .map_err(Into::into)?;
    tracing::info!(%asset_id, document_id = %document.document_id,
      "certification recorded");
    Ok((asset, document))
  }

  /// Apply one certification document to several assets. Each asset is
  /// authorized and certified independently; failures are reported per
  /// asset and do not abort the batch.
  pub async fn bulk_upload_document(
    &self,
    caller: &Caller,
    asset_ids: &[Uuid],
    file_name: &str,
    contents: Bytes,
  ) -> Result<BulkUploadOutcome> {
    if asset_ids.is_empty() {
      return Err(Error::Validation("no assets given".into()));
    }

    let mut applied = Vec::new();
    let mut failed = Vec::new();
    for &asset_id in asset_ids {
      let result = async {
        let asset = self
          .load_authorized(caller, asset_id, Action::UploadDocument)
          .await?;
        let stored = self
          .files
          .put(caller.org_id, asset_id, file_name, &contents)
          .await?;
        let (asset, document) =
          self.certify(caller, asset, file_name, stored, asset_ids.to_vec());
        self
          .store
          .record_certification(asset, document)
          .await
          .map_err(Into::into)
      }
      .await;

      match result {
        Ok(()) => applied.push(asset_id),
        Err(e) => failed.push(BulkUploadFailure {
          asset_id,
          message: e.to_string(),
        }),
      }
    }

    tracing::info!(
      applied = applied.len(),
      failed = failed.len(),
      "bulk certification finished"
    );
    Ok(BulkUploadOutcome { applied, failed })
  }

  pub async fn list_documents(
    &self,
    caller: &Caller,
    asset_id: Uuid,
  ) -> Result<Vec<CertificationDocument>> {
    self.load_visible(caller, asset_id).await?;
    self
      .store
      .list_documents(caller.org_id, asset_id)
      .await
      .map_err(Into::into)
  }

  // ── Bulk transfer ─────────────────────────────────────────────────────

  /// Import assets from CSV text. Admin only. Parse failures and duplicate
  /// serials are reported per line; valid rows are still created.
  pub async fn import_csv(
    &self,
    caller: &Caller,
    input: &str,
  ) -> Result<ImportOutcome> {
    if !caller.is_admin() {
      return Err(Error::Forbidden);
    }

    let import = voltguard_csv::parse_assets(input).map_err(Error::from)?;
    let mut created = 0;
    let mut errors = import.errors;

    for row in import.rows {
      let asset = match self.build_asset(caller.org_id, row.asset) {
        Ok(asset) => asset,
        Err(Error::Validation(message)) => {
          errors.push(RowError { line: row.line, message });
          continue;
        }
        Err(e) => return Err(e),
      };
      match self.store.insert_asset(asset).await.map_err(Into::into) {
        Ok(()) => created += 1,
        Err(Error::Validation(message)) => {
          errors.push(RowError { line: row.line, message });
        }
        Err(e) => return Err(e),
      }
    }

    errors.sort_by_key(|e| e.line);
    tracing::info!(created, errors = errors.len(), "csv import finished");
    Ok(ImportOutcome { created, errors })
  }

  /// Export the caller's visible assets as CSV, statuses re-derived as of
  /// today.
  pub async fn export_csv(&self, caller: &Caller) -> Result<String> {
    let assets = self.list_assets(caller).await?;
    Ok(voltguard_csv::serialize_assets(&assets))
  }

  // ── Internals ─────────────────────────────────────────────────────────

  /// Fetch an asset the caller is allowed to read. A missing asset and a
  /// read the policy denies are indistinguishable to the caller.
  async fn load_visible(
    &self,
    caller: &Caller,
    asset_id: Uuid,
  ) -> Result<Asset> {
    let asset = self
      .store
      .get_asset(caller.org_id, asset_id)
      .await
      .map_err(Into::into)?
      .ok_or(Error::AssetNotFound(asset_id))?;
    if !self.policy.can_access(caller, &asset, Action::Read) {
      return Err(Error::AssetNotFound(asset_id));
    }
    Ok(asset)
  }

  /// [`Self::load_visible`], then gate `action`. Denials of a visible
  /// asset are `Forbidden`.
  async fn load_authorized(
    &self,
    caller: &Caller,
    asset_id: Uuid,
    action: Action,
  ) -> Result<Asset> {
    let asset = self.load_visible(caller, asset_id).await?;
    if action != Action::Read
      && !self.policy.can_access(caller, &asset, action)
    {
      return Err(Error::Forbidden);
    }
    Ok(asset)
  }

  fn build_asset(&self, org_id: Uuid, new: NewAsset) -> Result<Asset> {
    let serial_number = new.serial_number.trim().to_string();
    if serial_number.is_empty() {
      return Err(Error::Validation("serial_number must not be empty".into()));
    }

    let today = self.clock.today();
    if new.last_certification_date > today {
      return Err(Error::Validation(
        "last_certification_date cannot be in the future".into(),
      ));
    }
    let next = next_certification_date(new.last_certification_date);
    Ok(Asset {
      asset_id: Uuid::new_v4(),
      org_id,
      serial_number,
      asset_class: new.asset_class,
      glove_size: new.glove_size,
      glove_color: new.glove_color,
      assigned_user_id: new.assigned_user_id,
      issue_date: new.issue_date.unwrap_or(today),
      last_certification_date: new.last_certification_date,
      next_certification_date: next,
      status: compute_status(next, today),
      failure_date: None,
      failure_reason: None,
      testing_start_date: None,
      created_at: self.clock.now(),
    })
  }

  /// Restart an asset's certification cycle as of today and build the
  /// matching document record.
  fn certify(
    &self,
    caller: &Caller,
    mut asset: Asset,
    file_name: &str,
    stored: StoredFile,
    applied_to_assets: Vec<Uuid>,
  ) -> (Asset, CertificationDocument) {
    let today = self.clock.today();
    asset.last_certification_date = today;
    asset.next_certification_date = next_certification_date(today);
    asset.status = compute_status(asset.next_certification_date, today);
    asset.failure_date = None;
    asset.failure_reason = None;
    asset.testing_start_date = None;

    let document = CertificationDocument {
      document_id: Uuid::new_v4(),
      asset_id: asset.asset_id,
      org_id: asset.org_id,
      file_name: file_name.to_string(),
      file_url: stored.file_url,
      content_hash: stored.content_hash,
      upload_date: self.clock.now(),
      uploaded_by: caller.user_id,
      applied_to_assets,
    };
    (asset, document)
  }

  /// Re-derive the date-based status projection. Sticky statuses pass
  /// through untouched.
  fn refreshed(&self, mut asset: Asset) -> Asset {
    if !asset.status.is_sticky() {
      asset.status =
        compute_status(asset.next_certification_date, self.clock.today());
    }
    asset
  }
}
