//! Error type for `voltguard-store-sqlite`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] voltguard_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown enum value in column {column}: {value:?}")]
  UnknownEnumValue { column: &'static str, value: String },

  /// `(org_id, serial_number)` uniqueness violated.
  #[error("serial number {0:?} already exists in this org")]
  DuplicateSerial(String),

  /// Write addressed to an asset row that does not exist in the org.
  #[error("asset not found: {0}")]
  AssetNotFound(Uuid),
}

impl From<Error> for voltguard_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(inner) => inner,
      Error::AssetNotFound(id) => voltguard_core::Error::AssetNotFound(id),
      Error::DuplicateSerial(serial) => voltguard_core::Error::Validation(
        format!("serial number {serial:?} is already in use"),
      ),
      other => voltguard_core::Error::Store(other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
