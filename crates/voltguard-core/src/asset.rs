//! Asset types — the tracked unit of certified safety equipment.
//!
//! An asset is an insulating glove owned by exactly one organization. Its
//! `status` is a derived projection of the certification dates plus the two
//! sticky override states; it is never written directly by callers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Insulation class ────────────────────────────────────────────────────────

/// ASTM D120 insulation rating of a glove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetClass {
  #[serde(rename = "class_00")]
  Class00,
  #[serde(rename = "class_0")]
  Class0,
  #[serde(rename = "class_1")]
  Class1,
  #[serde(rename = "class_2")]
  Class2,
  #[serde(rename = "class_3")]
  Class3,
  #[serde(rename = "class_4")]
  Class4,
}

impl AssetClass {
  /// Human-readable label, also the accepted CSV form.
  pub fn label(self) -> &'static str {
    match self {
      Self::Class00 => "Class 00",
      Self::Class0 => "Class 0",
      Self::Class1 => "Class 1",
      Self::Class2 => "Class 2",
      Self::Class3 => "Class 3",
      Self::Class4 => "Class 4",
    }
  }

  /// Parse a label, tolerating case and surrounding whitespace.
  /// Accepts both `Class 1` and `class_1`.
  pub fn parse_label(s: &str) -> Option<Self> {
    let norm: String = s
      .trim()
      .chars()
      .filter(|c| !c.is_whitespace() && *c != '_')
      .collect::<String>()
      .to_ascii_lowercase();
    match norm.as_str() {
      "class00" => Some(Self::Class00),
      "class0" => Some(Self::Class0),
      "class1" => Some(Self::Class1),
      "class2" => Some(Self::Class2),
      "class3" => Some(Self::Class3),
      "class4" => Some(Self::Class4),
      _ => None,
    }
  }
}

// ─── Glove attributes ────────────────────────────────────────────────────────

/// Standard glove sizes 7 through 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GloveSize {
  #[serde(rename = "size_7")]
  Size7,
  #[serde(rename = "size_8")]
  Size8,
  #[serde(rename = "size_9")]
  Size9,
  #[serde(rename = "size_10")]
  Size10,
  #[serde(rename = "size_11")]
  Size11,
  #[serde(rename = "size_12")]
  Size12,
}

impl GloveSize {
  pub fn label(self) -> &'static str {
    match self {
      Self::Size7 => "7",
      Self::Size8 => "8",
      Self::Size9 => "9",
      Self::Size10 => "10",
      Self::Size11 => "11",
      Self::Size12 => "12",
    }
  }

  pub fn parse_label(s: &str) -> Option<Self> {
    match s.trim() {
      "7" => Some(Self::Size7),
      "8" => Some(Self::Size8),
      "9" => Some(Self::Size9),
      "10" => Some(Self::Size10),
      "11" => Some(Self::Size11),
      "12" => Some(Self::Size12),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GloveColor {
  Red,
  Yellow,
  Black,
  Beige,
}

impl GloveColor {
  pub fn label(self) -> &'static str {
    match self {
      Self::Red => "red",
      Self::Yellow => "yellow",
      Self::Black => "black",
      Self::Beige => "beige",
    }
  }

  pub fn parse_label(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "red" => Some(Self::Red),
      "yellow" => Some(Self::Yellow),
      "black" => Some(Self::Black),
      "beige" => Some(Self::Beige),
      _ => None,
    }
  }
}

// ─── Certification status ────────────────────────────────────────────────────

/// Lifecycle status of an asset.
///
/// `Active`, `NearDue` and `Expired` are three renderings of one in-cycle
/// state, re-derived from `next_certification_date` against the current
/// date. `Failed` and `InTesting` are sticky: they suspend date-based
/// re-evaluation until a new certification document restarts the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CertStatus {
  Active,
  NearDue,
  Expired,
  Failed,
  InTesting,
}

impl CertStatus {
  /// Sticky statuses freeze the certification clock.
  pub fn is_sticky(self) -> bool {
    matches!(self, Self::Failed | Self::InTesting)
  }
}

// ─── Asset ───────────────────────────────────────────────────────────────────

/// A tracked glove asset. `org_id` is immutable after creation; the derived
/// fields (`next_certification_date`, `status`) are maintained exclusively
/// by the lifecycle service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
  pub asset_id:                Uuid,
  pub org_id:                  Uuid,
  pub serial_number:           String,
  pub asset_class:             AssetClass,
  pub glove_size:              Option<GloveSize>,
  pub glove_color:             Option<GloveColor>,
  /// `None` means unassigned; otherwise a member of the same org.
  pub assigned_user_id:        Option<Uuid>,
  pub issue_date:              NaiveDate,
  pub last_certification_date: NaiveDate,
  /// `last_certification_date` + 6 calendar months; frozen while sticky.
  pub next_certification_date: NaiveDate,
  pub status:                  CertStatus,
  pub failure_date:            Option<NaiveDate>,
  pub failure_reason:          Option<String>,
  pub testing_start_date:      Option<NaiveDate>,
  pub created_at:              DateTime<Utc>,
}

// ─── NewAsset ────────────────────────────────────────────────────────────────

/// Input to asset creation. The owning org, the derived dates, and the
/// status are computed by the service; they are not accepted from callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAsset {
  pub serial_number:           String,
  pub asset_class:             AssetClass,
  pub last_certification_date: NaiveDate,
  #[serde(default)]
  pub glove_size:              Option<GloveSize>,
  #[serde(default)]
  pub glove_color:             Option<GloveColor>,
  #[serde(default)]
  pub assigned_user_id:        Option<Uuid>,
  /// Defaults to the current date when absent.
  #[serde(default)]
  pub issue_date:              Option<NaiveDate>,
}

// ─── AssetPatch ──────────────────────────────────────────────────────────────

/// Partial update for the generic update operation.
///
/// `status` and the failure/testing fields are deliberately absent: they
/// change only through the dedicated transitions. A field left out of the
/// payload is untouched; `assigned_user_id` distinguishes "absent" from an
/// explicit `null` (which unassigns).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetPatch {
  pub serial_number:           Option<String>,
  pub asset_class:             Option<AssetClass>,
  pub glove_size:              Option<GloveSize>,
  pub glove_color:             Option<GloveColor>,
  #[serde(default, deserialize_with = "double_option")]
  pub assigned_user_id:        Option<Option<Uuid>>,
  pub issue_date:              Option<NaiveDate>,
  pub last_certification_date: Option<NaiveDate>,
}

impl AssetPatch {
  pub fn is_empty(&self) -> bool {
    self.serial_number.is_none()
      && self.asset_class.is_none()
      && self.glove_size.is_none()
      && self.glove_color.is_none()
      && self.assigned_user_id.is_none()
      && self.issue_date.is_none()
      && self.last_certification_date.is_none()
  }
}

/// Map a present-but-null JSON field to `Some(None)`, so it is
/// distinguishable from an absent field (`None` via `#[serde(default)]`).
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: serde::Deserializer<'de>,
{
  Deserialize::deserialize(de).map(Some)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
