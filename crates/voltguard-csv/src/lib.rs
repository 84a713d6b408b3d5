//! CSV bulk transfer for Voltguard.
//!
//! Converts between delimited text and [`voltguard_core`] asset types. Pure
//! synchronous; no HTTP or database dependencies. The import side maps a
//! header row onto the known columns and reports malformed rows per line;
//! the export side emits a fixed column order with RFC-4180-style quoting.
//!
//! # Quick start
//!
//! ```no_run
//! let input = "serial_number,asset_class,last_certification_date\n\
//!              G-100,Class 1,2024-01-15\n";
//! let import = voltguard_csv::parse_assets(input).unwrap();
//! println!("{} rows, {} errors", import.rows.len(), import.errors.len());
//! ```

pub mod error;
mod export;
mod import;

pub use error::{Error, Result};
use voltguard_core::asset::{Asset, NewAsset};

// ─── Public types ────────────────────────────────────────────────────────────

/// One successfully parsed data row, tagged with its 1-based line number.
#[derive(Debug, Clone)]
pub struct ImportedRow {
  pub line:  usize,
  pub asset: NewAsset,
}

/// A data row that could not be parsed. The rest of the file is unaffected.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RowError {
  /// 1-based line number within the input (the header is line 1).
  pub line:    usize,
  pub message: String,
}

/// The result of parsing an import file: the good rows and the per-row
/// failures, in input order.
#[derive(Debug, Default)]
pub struct CsvImport {
  pub rows:   Vec<ImportedRow>,
  pub errors: Vec<RowError>,
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Parse an asset import file.
///
/// Header matching is case-insensitive and underscore-insensitive
/// (`serialNumber` and `serial_number` are the same column). Returns an
/// error if any required column (`serial_number`, `asset_class`,
/// `last_certification_date`) is absent; per-row problems land in
/// [`CsvImport::errors`] instead.
pub fn parse_assets(input: &str) -> Result<CsvImport> {
  import::parse(input)
}

/// Serialize assets in the fixed export column order, quoting any field
/// containing a delimiter, quote, or newline.
pub fn serialize_assets(assets: &[Asset]) -> String {
  export::serialize(assets)
}
