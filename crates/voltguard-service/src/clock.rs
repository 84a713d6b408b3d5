//! Time source abstraction.
//!
//! Status derivation is pure date arithmetic against "today", so the
//! service takes its clock as a component rather than calling `Utc::now()`
//! inline. Tests pin a [`FixedClock`] to exercise boundary dates.

use chrono::{DateTime, NaiveDate, Utc};

pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;

  fn today(&self) -> NaiveDate { self.now().date_naive() }
}

/// The real wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// A clock frozen at a given instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> { self.0 }
}
