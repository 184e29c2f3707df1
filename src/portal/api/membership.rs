use reqwest::Method;

use super::ApiClient;
use crate::portal::error::{PortalError, Result};
use crate::shared::membership::UpgradeRequest;
use crate::shared::validation;
use crate::shared::{Membership, MembershipTier, TierTransition};

impl ApiClient {
    /// `GET /membership/current`; `None` when the member has no membership yet
    pub async fn current_membership(&self) -> Result<Option<Membership>> {
        let request = self.authed(Method::GET, &["membership", "current"])?;
        match self.send_json(request, true).await {
            Ok(membership) => Ok(Some(membership)),
            Err(PortalError::Status { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// `GET /membership/email/:email`
    pub async fn membership_by_email(&self, email: &str) -> Result<Option<Membership>> {
        validation::email("email", email)?;
        let request = self.authed(Method::GET, &["membership", "email", email.trim()])?;
        match self.send_json(request, true).await {
            Ok(membership) => Ok(Some(membership)),
            Err(PortalError::Status { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// `POST /membership/upgrade`.
    ///
    /// Requests to the same or a lower tier are refused with
    /// `PortalError::TierRejected` without touching the network.
    pub async fn upgrade_membership(
        &self,
        current: MembershipTier,
        requested: MembershipTier,
    ) -> Result<Membership> {
        let transition = TierTransition::check(current, requested);
        if !transition.is_permitted() {
            tracing::info!(%current, %requested, "Tier change refused client-side");
            return Err(PortalError::TierRejected(transition));
        }

        let request = self
            .authed(Method::POST, &["membership", "upgrade"])?
            .json(&UpgradeRequest {
                membership_type: requested,
            });
        self.send_json(request, true).await
    }
}
