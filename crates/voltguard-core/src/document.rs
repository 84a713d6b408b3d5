//! Certification documents — the proof records attached to an asset.
//!
//! Documents are immutable once created. They are removed only by cascading
//! deletion of the owning asset; there is no edit or detach operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored certification document, exclusively owned by one asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificationDocument {
  pub document_id:       Uuid,
  pub asset_id:          Uuid,
  pub org_id:            Uuid,
  pub file_name:         String,
  /// Opaque storage reference returned by the file-storage collaborator.
  pub file_url:          String,
  /// SHA-256 hex digest of the uploaded bytes.
  pub content_hash:      String,
  pub upload_date:       DateTime<Utc>,
  pub uploaded_by:       Uuid,
  /// For bulk-applied documents, every asset id the same file was applied
  /// to (including this document's own `asset_id`); empty for single
  /// uploads. Audit display only.
  #[serde(default)]
  pub applied_to_assets: Vec<Uuid>,
}
