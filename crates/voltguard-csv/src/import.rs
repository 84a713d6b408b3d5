//! Import-file parser.
//!
//! Pipeline:
//!   raw &str
//!     └─ logical lines (CRLF tolerated)
//!          └─ split_record()       → quoted-field aware split
//!               └─ header mapping  → ColumnMap
//!                    └─ per-row conversion → NewAsset or RowError

use chrono::NaiveDate;
use uuid::Uuid;
use voltguard_core::asset::{AssetClass, GloveColor, GloveSize, NewAsset};

use crate::{
  CsvImport, ImportedRow, RowError,
  error::{Error, Result},
};

// ─── Field splitting ─────────────────────────────────────────────────────────

/// Split one record on `,`, honouring double-quoted fields with `""`
/// escapes. Tolerates unterminated quotes by consuming to end of line.
fn split_record(line: &str) -> Vec<String> {
  let mut fields = Vec::new();
  let mut field = String::new();
  let mut chars = line.chars().peekable();
  let mut in_quotes = false;

  while let Some(c) = chars.next() {
    match c {
      '"' if in_quotes => {
        if chars.peek() == Some(&'"') {
          chars.next();
          field.push('"');
        } else {
          in_quotes = false;
        }
      }
      '"' if field.is_empty() => in_quotes = true,
      ',' if !in_quotes => {
        fields.push(std::mem::take(&mut field));
      }
      _ => field.push(c),
    }
  }
  fields.push(field);
  fields
}

/// Normalise a header cell: lowercase, underscores and whitespace removed,
/// so `serialNumber`, `Serial_Number` and `serial number` all match.
fn normalize_header(s: &str) -> String {
  s.chars()
    .filter(|c| !c.is_whitespace() && *c != '_')
    .collect::<String>()
    .to_ascii_lowercase()
}

// ─── Header mapping ──────────────────────────────────────────────────────────

struct ColumnMap {
  serial_number:           usize,
  asset_class:             usize,
  last_certification_date: usize,
  glove_size:              Option<usize>,
  glove_color:             Option<usize>,
  assigned_user_id:        Option<usize>,
  issue_date:              Option<usize>,
  width:                   usize,
}

fn map_header(cells: &[String]) -> Result<ColumnMap> {
  let find = |name: &str| {
    cells
      .iter()
      .position(|c| normalize_header(c) == name)
  };

  let serial_number = find("serialnumber");
  let asset_class = find("assetclass");
  let last_certification_date = find("lastcertificationdate");

  let mut missing = Vec::new();
  if serial_number.is_none() {
    missing.push("serial_number".to_string());
  }
  if asset_class.is_none() {
    missing.push("asset_class".to_string());
  }
  if last_certification_date.is_none() {
    missing.push("last_certification_date".to_string());
  }
  if !missing.is_empty() {
    return Err(Error::MissingColumns(missing));
  }

  Ok(ColumnMap {
    serial_number: serial_number.unwrap(),
    asset_class: asset_class.unwrap(),
    last_certification_date: last_certification_date.unwrap(),
    glove_size: find("glovesize"),
    glove_color: find("glovecolor"),
    assigned_user_id: find("assigneduserid"),
    issue_date: find("issuedate"),
    width: cells.len(),
  })
}

// ─── Row conversion ──────────────────────────────────────────────────────────

fn parse_date(field: &str, value: &str) -> std::result::Result<NaiveDate, String> {
  NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
    .map_err(|_| format!("{field}: invalid date {value:?} (expected YYYY-MM-DD)"))
}

fn row_to_asset(
  map: &ColumnMap,
  cells: &[String],
) -> std::result::Result<NewAsset, String> {
  let cell = |i: usize| cells[i].trim();
  let opt_cell = |i: Option<usize>| i.map(|i| cell(i)).filter(|s| !s.is_empty());

  let serial_number = cell(map.serial_number);
  if serial_number.is_empty() {
    return Err("serial_number is empty".to_string());
  }

  let class_raw = cell(map.asset_class);
  let asset_class = AssetClass::parse_label(class_raw)
    .ok_or_else(|| format!("asset_class: unknown class {class_raw:?}"))?;

  let last_certification_date = parse_date(
    "last_certification_date",
    cell(map.last_certification_date),
  )?;

  let glove_size = opt_cell(map.glove_size)
    .map(|s| {
      GloveSize::parse_label(s)
        .ok_or_else(|| format!("glove_size: unknown size {s:?}"))
    })
    .transpose()?;

  let glove_color = opt_cell(map.glove_color)
    .map(|s| {
      GloveColor::parse_label(s)
        .ok_or_else(|| format!("glove_color: unknown color {s:?}"))
    })
    .transpose()?;

  let assigned_user_id = opt_cell(map.assigned_user_id)
    .map(|s| {
      Uuid::parse_str(s)
        .map_err(|_| format!("assigned_user_id: invalid uuid {s:?}"))
    })
    .transpose()?;

  let issue_date = opt_cell(map.issue_date)
    .map(|s| parse_date("issue_date", s))
    .transpose()?;

  Ok(NewAsset {
    serial_number: serial_number.to_string(),
    asset_class,
    last_certification_date,
    glove_size,
    glove_color,
    assigned_user_id,
    issue_date,
  })
}

// ─── Entry point ─────────────────────────────────────────────────────────────

pub(crate) fn parse(input: &str) -> Result<CsvImport> {
  let mut lines = input
    .lines()
    .map(|l| l.strip_suffix('\r').unwrap_or(l))
    .enumerate();

  let header_cells = loop {
    match lines.next() {
      Some((_, l)) if l.trim().is_empty() => continue,
      Some((_, l)) => break split_record(l),
      None => return Err(Error::MissingHeader),
    }
  };
  let map = map_header(&header_cells)?;

  let mut import = CsvImport::default();
  for (idx, line) in lines {
    if line.trim().is_empty() {
      continue;
    }
    let line_no = idx + 1;
    let cells = split_record(line);

    if cells.len() != map.width {
      import.errors.push(RowError {
        line:    line_no,
        message: format!(
          "expected {} columns, found {}",
          map.width,
          cells.len()
        ),
      });
      continue;
    }

    match row_to_asset(&map, &cells) {
      Ok(asset) => import.rows.push(ImportedRow { line: line_no, asset }),
      Err(message) => import.errors.push(RowError { line: line_no, message }),
    }
  }

  Ok(import)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
