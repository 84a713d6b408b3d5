//! Caller identity and the membership-directory contract.
//!
//! Identity is owned by an external provider. Every service operation takes
//! an explicit [`Caller`] resolved from the provider's token rather than
//! reading ambient session state.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;

// ─── Roles ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrgRole {
  Admin,
  Member,
}

// ─── Caller ──────────────────────────────────────────────────────────────────

/// The authenticated caller of a service operation, as claimed by the
/// identity provider's token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
  pub user_id: Uuid,
  pub org_id:  Uuid,
  pub role:    OrgRole,
}

impl Caller {
  pub fn is_admin(&self) -> bool { self.role == OrgRole::Admin }
}

// ─── Directory types ─────────────────────────────────────────────────────────

/// A member of an organization, as reported by the directory. Never
/// persisted by this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationMember {
  pub member_id: Uuid,
  pub name:      String,
  pub email:     String,
  pub role:      OrgRole,
}

/// An invitation that has been sent but not yet accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingInvite {
  pub email:      String,
  pub invited_at: DateTime<Utc>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the external identity/membership provider.
///
/// Adapters map provider responses into the core error taxonomy at this
/// boundary — in particular a too-many-requests signal becomes
/// [`crate::Error::RateLimited`], which the service layer retries with
/// backoff.
pub trait MembershipDirectory: Send + Sync {
  fn list_members(
    &self,
    org_id: Uuid,
  ) -> impl Future<Output = Result<Vec<OrganizationMember>>> + Send + '_;

  fn list_pending_invites(
    &self,
    org_id: Uuid,
  ) -> impl Future<Output = Result<Vec<PendingInvite>>> + Send + '_;

  fn invite<'a>(
    &'a self,
    org_id: Uuid,
    email: &'a str,
  ) -> impl Future<Output = Result<PendingInvite>> + Send + 'a;
}
