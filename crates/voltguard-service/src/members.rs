//! Organization membership, proxied from the external identity provider.
//!
//! Membership is never persisted here. Listing calls are wrapped in
//! [`with_backoff`] because the provider rate-limits them; invitations go
//! through unwrapped so a rate-limit error reaches the caller immediately.

use voltguard_core::{
  Error, Result,
  identity::{Caller, MembershipDirectory, OrganizationMember, PendingInvite},
};

use crate::retry::with_backoff;

pub struct MembershipService<D> {
  directory: D,
}

impl<D: MembershipDirectory> MembershipService<D> {
  pub fn new(directory: D) -> Self { Self { directory } }

  /// Members of the caller's own org. Any role may list them.
  pub async fn list_members(
    &self,
    caller: &Caller,
  ) -> Result<Vec<OrganizationMember>> {
    with_backoff(|| self.directory.list_members(caller.org_id)).await
  }

  /// Invitations sent but not yet accepted. Admin only.
  pub async fn list_pending_invites(
    &self,
    caller: &Caller,
  ) -> Result<Vec<PendingInvite>> {
    if !caller.is_admin() {
      return Err(Error::Forbidden);
    }
    with_backoff(|| self.directory.list_pending_invites(caller.org_id)).await
  }

  /// Invite an email address into the caller's org. Admin only.
  pub async fn invite(
    &self,
    caller: &Caller,
    email: &str,
  ) -> Result<PendingInvite> {
    if !caller.is_admin() {
      return Err(Error::Forbidden);
    }
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
      return Err(Error::Validation(format!("invalid email {email:?}")));
    }
    tracing::info!(org_id = %caller.org_id, "sending membership invite");
    self.directory.invite(caller.org_id, email).await
  }
}
