//! Error types for `voltguard-csv`.
//!
//! Whole-file problems (no header, missing required columns) are errors;
//! per-row problems are reported as [`crate::RowError`] values instead so a
//! single bad line never discards the rest of the file.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("input has no header row")]
  MissingHeader,

  /// Required columns absent from the header. The whole file is rejected
  /// before any row is processed.
  #[error("missing required columns: {}", .0.join(", "))]
  MissingColumns(Vec<String>),
}

impl From<Error> for voltguard_core::Error {
  fn from(e: Error) -> Self {
    voltguard_core::Error::Validation(e.to_string())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
