//! The status calculator — pure date arithmetic, no I/O.
//!
//! An in-cycle asset's status is always derived from its
//! `next_certification_date` against the current date. The sticky statuses
//! (`failed`, `in-testing`) are never produced here; they are set only by
//! the dedicated lifecycle transitions.

use chrono::{Months, NaiveDate};

use crate::asset::CertStatus;

/// Days before the due date at which an asset becomes `near-due`.
/// The boundary day itself is near-due.
pub const NEAR_DUE_WINDOW_DAYS: i64 = 30;

/// Length of one certification cycle in calendar months.
pub const CERTIFICATION_INTERVAL_MONTHS: u32 = 6;

/// Derive the in-cycle status for an asset due on
/// `next_certification_date`, evaluated as of `today`.
pub fn compute_status(
  next_certification_date: NaiveDate,
  today: NaiveDate,
) -> CertStatus {
  let days_until_due = (next_certification_date - today).num_days();
  if days_until_due < 0 {
    CertStatus::Expired
  } else if days_until_due <= NEAR_DUE_WINDOW_DAYS {
    CertStatus::NearDue
  } else {
    CertStatus::Active
  }
}

/// The due date implied by a certification recorded on `last`.
///
/// Calendar-month arithmetic with end-of-month clamping (Aug 31 + 6 months
/// is Feb 28/29).
pub fn next_certification_date(last: NaiveDate) -> NaiveDate {
  last
    .checked_add_months(Months::new(CERTIFICATION_INTERVAL_MONTHS))
    .unwrap_or(NaiveDate::MAX)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
