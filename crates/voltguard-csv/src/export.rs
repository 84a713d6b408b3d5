//! Export serializer.
//!
//! Fixed column order, one row per asset. Fields containing the delimiter,
//! a quote, or a newline are quoted with `""` escapes so a serial number
//! with a comma cannot corrupt the record structure.

use voltguard_core::asset::{Asset, CertStatus};

pub(crate) const EXPORT_HEADER: &str = "serial_number,asset_class,glove_size,\
                                        glove_color,assigned_user_id,\
                                        issue_date,last_certification_date,\
                                        next_certification_date,status";

/// Quote `s` when it would otherwise break the record structure.
fn escape_field(s: &str) -> String {
  if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r')
  {
    format!("\"{}\"", s.replace('"', "\"\""))
  } else {
    s.to_string()
  }
}

fn status_label(status: CertStatus) -> &'static str {
  match status {
    CertStatus::Active => "active",
    CertStatus::NearDue => "near-due",
    CertStatus::Expired => "expired",
    CertStatus::Failed => "failed",
    CertStatus::InTesting => "in-testing",
  }
}

fn row(asset: &Asset) -> String {
  let fields = [
    escape_field(&asset.serial_number),
    escape_field(asset.asset_class.label()),
    asset.glove_size.map(|s| s.label().to_string()).unwrap_or_default(),
    asset.glove_color.map(|c| c.label().to_string()).unwrap_or_default(),
    asset
      .assigned_user_id
      .map(|u| u.hyphenated().to_string())
      .unwrap_or_default(),
    asset.issue_date.format("%Y-%m-%d").to_string(),
    asset.last_certification_date.format("%Y-%m-%d").to_string(),
    asset.next_certification_date.format("%Y-%m-%d").to_string(),
    status_label(asset.status).to_string(),
  ];
  fields.join(",")
}

pub(crate) fn serialize(assets: &[Asset]) -> String {
  let mut out = String::from(EXPORT_HEADER);
  out.push('\n');
  for asset in assets {
    out.push_str(&row(asset));
    out.push('\n');
  }
  out
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, Utc};
  use uuid::Uuid;
  use voltguard_core::asset::{AssetClass, GloveColor, GloveSize};

  use super::*;

  fn sample(serial: &str) -> Asset {
    Asset {
      asset_id: Uuid::new_v4(),
      org_id: Uuid::new_v4(),
      serial_number: serial.to_string(),
      asset_class: AssetClass::Class2,
      glove_size: Some(GloveSize::Size9),
      glove_color: Some(GloveColor::Red),
      assigned_user_id: None,
      issue_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
      last_certification_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
      next_certification_date: NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
      status: CertStatus::Active,
      failure_date: None,
      failure_reason: None,
      testing_start_date: None,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn header_then_one_row_per_asset() {
    let out = serialize(&[sample("G-1"), sample("G-2")]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], EXPORT_HEADER);
    assert!(lines[1].starts_with("G-1,Class 2,9,red,,2023-06-01,"));
    assert!(lines[1].ends_with(",active"));
  }

  #[test]
  fn comma_in_serial_is_quoted_and_reimports() {
    let out = serialize(&[sample("G-100,B")]);
    assert!(out.contains("\"G-100,B\""));

    // The hardened export must survive its own import path.
    let import = crate::parse_assets(&out).unwrap();
    assert!(import.errors.is_empty());
    assert_eq!(import.rows[0].asset.serial_number, "G-100,B");
  }

  #[test]
  fn quote_in_field_is_doubled() {
    assert_eq!(escape_field("a\"b"), "\"a\"\"b\"");
    assert_eq!(escape_field("plain"), "plain");
  }

  #[test]
  fn optional_fields_left_empty() {
    let mut a = sample("G-1");
    a.glove_size = None;
    a.glove_color = None;
    let out = serialize(&[a]);
    assert!(out.lines().nth(1).unwrap().contains("Class 2,,,,"));
  }
}
