//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, calendar dates are `YYYY-MM-DD`, UUIDs
//! are hyphenated lowercase strings, enums use their serde labels, and
//! `applied_to_assets` is a compact JSON array.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;
use voltguard_core::{
  asset::{Asset, AssetClass, CertStatus, GloveColor, GloveSize},
  document::CertificationDocument,
};

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> / NaiveDate ───────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── AssetClass ──────────────────────────────────────────────────────────────

pub fn encode_asset_class(c: AssetClass) -> &'static str {
  match c {
    AssetClass::Class00 => "class_00",
    AssetClass::Class0 => "class_0",
    AssetClass::Class1 => "class_1",
    AssetClass::Class2 => "class_2",
    AssetClass::Class3 => "class_3",
    AssetClass::Class4 => "class_4",
  }
}

pub fn decode_asset_class(s: &str) -> Result<AssetClass> {
  match s {
    "class_00" => Ok(AssetClass::Class00),
    "class_0" => Ok(AssetClass::Class0),
    "class_1" => Ok(AssetClass::Class1),
    "class_2" => Ok(AssetClass::Class2),
    "class_3" => Ok(AssetClass::Class3),
    "class_4" => Ok(AssetClass::Class4),
    other => Err(Error::UnknownEnumValue {
      column: "asset_class",
      value:  other.to_string(),
    }),
  }
}

// ─── GloveSize ───────────────────────────────────────────────────────────────

pub fn encode_glove_size(s: GloveSize) -> &'static str {
  match s {
    GloveSize::Size7 => "size_7",
    GloveSize::Size8 => "size_8",
    GloveSize::Size9 => "size_9",
    GloveSize::Size10 => "size_10",
    GloveSize::Size11 => "size_11",
    GloveSize::Size12 => "size_12",
  }
}

pub fn decode_glove_size(s: &str) -> Result<GloveSize> {
  match s {
    "size_7" => Ok(GloveSize::Size7),
    "size_8" => Ok(GloveSize::Size8),
    "size_9" => Ok(GloveSize::Size9),
    "size_10" => Ok(GloveSize::Size10),
    "size_11" => Ok(GloveSize::Size11),
    "size_12" => Ok(GloveSize::Size12),
    other => Err(Error::UnknownEnumValue {
      column: "glove_size",
      value:  other.to_string(),
    }),
  }
}

// ─── GloveColor ──────────────────────────────────────────────────────────────

pub fn encode_glove_color(c: GloveColor) -> &'static str {
  match c {
    GloveColor::Red => "red",
    GloveColor::Yellow => "yellow",
    GloveColor::Black => "black",
    GloveColor::Beige => "beige",
  }
}

pub fn decode_glove_color(s: &str) -> Result<GloveColor> {
  match s {
    "red" => Ok(GloveColor::Red),
    "yellow" => Ok(GloveColor::Yellow),
    "black" => Ok(GloveColor::Black),
    "beige" => Ok(GloveColor::Beige),
    other => Err(Error::UnknownEnumValue {
      column: "glove_color",
      value:  other.to_string(),
    }),
  }
}

// ─── CertStatus ──────────────────────────────────────────────────────────────

pub fn encode_status(s: CertStatus) -> &'static str {
  match s {
    CertStatus::Active => "active",
    CertStatus::NearDue => "near-due",
    CertStatus::Expired => "expired",
    CertStatus::Failed => "failed",
    CertStatus::InTesting => "in-testing",
  }
}

pub fn decode_status(s: &str) -> Result<CertStatus> {
  match s {
    "active" => Ok(CertStatus::Active),
    "near-due" => Ok(CertStatus::NearDue),
    "expired" => Ok(CertStatus::Expired),
    "failed" => Ok(CertStatus::Failed),
    "in-testing" => Ok(CertStatus::InTesting),
    other => Err(Error::UnknownEnumValue {
      column: "status",
      value:  other.to_string(),
    }),
  }
}

// ─── Applied-to set ──────────────────────────────────────────────────────────

pub fn encode_applied_to(ids: &[Uuid]) -> Result<String> {
  let strings: Vec<String> = ids.iter().copied().map(encode_uuid).collect();
  Ok(serde_json::to_string(&strings)?)
}

pub fn decode_applied_to(s: &str) -> Result<Vec<Uuid>> {
  let strings: Vec<String> = serde_json::from_str(s)?;
  strings.iter().map(|s| decode_uuid(s)).collect()
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `assets` row.
pub struct RawAsset {
  pub asset_id:                String,
  pub org_id:                  String,
  pub serial_number:           String,
  pub asset_class:             String,
  pub glove_size:              Option<String>,
  pub glove_color:             Option<String>,
  pub assigned_user_id:        Option<String>,
  pub issue_date:              String,
  pub last_certification_date: String,
  pub next_certification_date: String,
  pub status:                  String,
  pub failure_date:            Option<String>,
  pub failure_reason:          Option<String>,
  pub testing_start_date:      Option<String>,
  pub created_at:              String,
}

impl RawAsset {
  pub fn into_asset(self) -> Result<Asset> {
    Ok(Asset {
      asset_id:                decode_uuid(&self.asset_id)?,
      org_id:                  decode_uuid(&self.org_id)?,
      serial_number:           self.serial_number,
      asset_class:             decode_asset_class(&self.asset_class)?,
      glove_size:              self
        .glove_size
        .as_deref()
        .map(decode_glove_size)
        .transpose()?,
      glove_color:             self
        .glove_color
        .as_deref()
        .map(decode_glove_color)
        .transpose()?,
      assigned_user_id:        self
        .assigned_user_id
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
      issue_date:              decode_date(&self.issue_date)?,
      last_certification_date: decode_date(&self.last_certification_date)?,
      next_certification_date: decode_date(&self.next_certification_date)?,
      status:                  decode_status(&self.status)?,
      failure_date:            self
        .failure_date
        .as_deref()
        .map(decode_date)
        .transpose()?,
      failure_reason:          self.failure_reason,
      testing_start_date:      self
        .testing_start_date
        .as_deref()
        .map(decode_date)
        .transpose()?,
      created_at:              decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `certification_documents` row.
pub struct RawDocument {
  pub document_id:       String,
  pub asset_id:          String,
  pub org_id:            String,
  pub file_name:         String,
  pub file_url:          String,
  pub content_hash:      String,
  pub upload_date:       String,
  pub uploaded_by:       String,
  pub applied_to_assets: String,
}

impl RawDocument {
  pub fn into_document(self) -> Result<CertificationDocument> {
    Ok(CertificationDocument {
      document_id:       decode_uuid(&self.document_id)?,
      asset_id:          decode_uuid(&self.asset_id)?,
      org_id:            decode_uuid(&self.org_id)?,
      file_name:         self.file_name,
      file_url:          self.file_url,
      content_hash:      self.content_hash,
      upload_date:       decode_dt(&self.upload_date)?,
      uploaded_by:       decode_uuid(&self.uploaded_by)?,
      applied_to_assets: decode_applied_to(&self.applied_to_assets)?,
    })
  }
}
