//! The authorization gate.
//!
//! Access rules live in an explicit, swappable component invoked by the
//! service before every store call, rather than in declarative row policies
//! inside the storage engine.

use crate::{
  asset::{Asset, CertStatus},
  identity::Caller,
};

/// What the caller is trying to do with an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Read,
  Update,
  Delete,
  /// `mark_as_failed` / `mark_as_in_testing`.
  Transition,
  UploadDocument,
}

/// A yes/no gate consulted before every store access.
pub trait AuthorizationPolicy: Send + Sync {
  fn can_access(&self, caller: &Caller, asset: &Asset, action: Action) -> bool;
}

// ─── Default policy ──────────────────────────────────────────────────────────

/// The org/role/assignment rules of the tracker:
///
/// - nothing crosses an org boundary, for anyone;
/// - admins may do everything within their org;
/// - members may read and update assets assigned to them, and upload
///   certification documents to those assets unless the asset is failed;
/// - delete and the lifecycle transitions are admin-only.
pub struct OrgRolePolicy;

impl AuthorizationPolicy for OrgRolePolicy {
  fn can_access(&self, caller: &Caller, asset: &Asset, action: Action) -> bool {
    if asset.org_id != caller.org_id {
      return false;
    }
    if caller.is_admin() {
      return true;
    }

    let assigned_to_caller = asset.assigned_user_id == Some(caller.user_id);
    match action {
      Action::Read | Action::Update => assigned_to_caller,
      Action::UploadDocument => {
        assigned_to_caller && asset.status != CertStatus::Failed
      }
      Action::Delete | Action::Transition => false,
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
