//! Admin back-office endpoints
//!
//! Every call checks `is_admin` on the local session first and fails with
//! `PortalError::Forbidden` without a request when it is false. The backend
//! still enforces the same rule.

use reqwest::Method;
use serde::Serialize;

use super::ApiClient;
use crate::portal::error::Result;
use crate::shared::admin::{
    Ack, Announcement, AnnouncementDraft, MembershipUpdate, NewsletterSubscriber, UserUpdate,
};
use crate::shared::validation;
use crate::shared::{Membership, User};

#[derive(Serialize)]
struct SubscribeRequest<'a> {
    email: &'a str,
}

impl ApiClient {
    pub async fn admin_list_users(&self) -> Result<Vec<User>> {
        self.require_admin()?;
        let request = self.authed(Method::GET, &["admin", "users"])?;
        self.send_json(request, true).await
    }

    pub async fn admin_get_user(&self, id: &str) -> Result<User> {
        self.require_admin()?;
        let request = self.authed(Method::GET, &["admin", "users", id])?;
        self.send_json(request, true).await
    }

    pub async fn admin_update_user(&self, id: &str, update: &UserUpdate) -> Result<User> {
        self.require_admin()?;
        if let Some(email) = update.email.as_deref() {
            validation::email("email", email)?;
        }
        let request = self
            .authed(Method::PUT, &["admin", "users", id])?
            .json(update);
        self.send_json(request, true).await
    }

    pub async fn admin_delete_user(&self, id: &str) -> Result<()> {
        self.require_admin()?;
        let request = self.authed(Method::DELETE, &["admin", "users", id])?;
        self.send_empty(request, true).await
    }

    pub async fn admin_list_memberships(&self) -> Result<Vec<Membership>> {
        self.require_admin()?;
        let request = self.authed(Method::GET, &["admin", "memberships"])?;
        self.send_json(request, true).await
    }

    /// Admins may set any tier; the upgrade-only rule applies to members
    pub async fn admin_update_membership(&self, id: &str, update: &MembershipUpdate) -> Result<Membership> {
        self.require_admin()?;
        let request = self
            .authed(Method::PUT, &["admin", "memberships", id])?
            .json(update);
        self.send_json(request, true).await
    }

    pub async fn admin_delete_membership(&self, id: &str) -> Result<()> {
        self.require_admin()?;
        let request = self.authed(Method::DELETE, &["admin", "memberships", id])?;
        self.send_empty(request, true).await
    }

    /// Published announcements are public
    pub async fn announcements(&self) -> Result<Vec<Announcement>> {
        let request = self.public(Method::GET, &["announcements"])?;
        self.send_json(request, false).await
    }

    pub async fn admin_list_announcements(&self) -> Result<Vec<Announcement>> {
        self.require_admin()?;
        let request = self.authed(Method::GET, &["admin", "announcements"])?;
        self.send_json(request, true).await
    }

    pub async fn admin_create_announcement(&self, draft: &AnnouncementDraft) -> Result<Announcement> {
        self.require_admin()?;
        validate_draft(draft)?;
        let request = self.authed(Method::POST, &["admin", "announcements"])?.json(draft);
        self.send_json(request, true).await
    }

    pub async fn admin_update_announcement(&self, id: &str, draft: &AnnouncementDraft) -> Result<Announcement> {
        self.require_admin()?;
        validate_draft(draft)?;
        let request = self
            .authed(Method::PUT, &["admin", "announcements", id])?
            .json(draft);
        self.send_json(request, true).await
    }

    pub async fn admin_delete_announcement(&self, id: &str) -> Result<()> {
        self.require_admin()?;
        let request = self.authed(Method::DELETE, &["admin", "announcements", id])?;
        self.send_empty(request, true).await
    }

    pub async fn admin_list_subscribers(&self) -> Result<Vec<NewsletterSubscriber>> {
        self.require_admin()?;
        let request = self.authed(Method::GET, &["admin", "newsletter"])?;
        self.send_json(request, true).await
    }

    pub async fn admin_delete_subscriber(&self, id: &str) -> Result<()> {
        self.require_admin()?;
        let request = self.authed(Method::DELETE, &["admin", "newsletter", id])?;
        self.send_empty(request, true).await
    }

    /// Public newsletter signup from the marketing pages
    pub async fn subscribe_newsletter(&self, email: &str) -> Result<Ack> {
        validation::email("email", email)?;
        let request = self
            .public(Method::POST, &["newsletter", "subscribe"])?
            .json(&SubscribeRequest { email: email.trim() });
        self.send_json(request, false).await
    }
}

fn validate_draft(draft: &AnnouncementDraft) -> Result<()> {
    validation::require("title", &draft.title)?;
    validation::require("content", &draft.content)?;
    validation::optional_url("link", draft.link.as_deref())?;
    Ok(())
}
