//! Backend REST client
//!
//! `ApiClient` owns the `reqwest::Client`, attaches the bearer token from the
//! session store, and routes every authenticated response through the
//! [`UnauthorizedInterceptor`]. Endpoint wrappers live in the submodules as
//! additional `impl ApiClient` blocks:
//!
//! - **`auth`** - login, registration, token verification, password reset
//! - **`profile`** - profile and settings
//! - **`membership`** - current membership, lookup, upgrade
//! - **`notifications`** - unread count, listing, mark-read
//! - **`admin`** - users, memberships, announcements, newsletter

mod admin;
mod auth;
mod membership;
mod notifications;
mod profile;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::portal::config::Config;
use crate::portal::error::{PortalError, Result};
use crate::portal::interceptor::{Interception, UnauthorizedInterceptor};
use crate::portal::navigation::Navigator;
use crate::portal::persistence::PersistenceBridge;
use crate::portal::session::SessionStore;

#[derive(Debug, Clone)]
pub struct ApiClient {
    config: Config,
    client: Client,
    store: SessionStore,
    interceptor: UnauthorizedInterceptor,
}

impl ApiClient {
    pub fn new(config: Config, bridge: PersistenceBridge, navigator: Navigator) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        let store = bridge.store().clone();
        Ok(Self {
            config,
            client,
            store,
            interceptor: UnauthorizedInterceptor::new(bridge, navigator),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.store
    }

    /// Request without credentials; responses are not intercepted.
    /// `segments` are appended to the base URL one path segment each.
    fn public(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.config.endpoint(segments)?;
        Ok(self.client.request(method, url))
    }

    /// Request carrying the session's bearer token
    fn authed(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let token = self.store.token().ok_or(PortalError::NotAuthenticated)?;
        self.with_token(method, segments, &token)
    }

    /// Request carrying an explicit token, for callers that track the
    /// session generation themselves
    fn with_token(&self, method: Method, segments: &[&str], token: &str) -> Result<RequestBuilder> {
        Ok(self.public(method, segments)?.bearer_auth(token))
    }

    fn require_admin(&self) -> Result<()> {
        if !self.store.is_authenticated() {
            return Err(PortalError::NotAuthenticated);
        }
        if !self.store.is_admin() {
            return Err(PortalError::Forbidden("administrator access required".to_string()));
        }
        Ok(())
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, intercept: bool) -> Result<T> {
        let response = self.execute(request, intercept).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send_empty(&self, request: RequestBuilder, intercept: bool) -> Result<()> {
        self.execute(request, intercept).await?;
        Ok(())
    }

    async fn execute(&self, request: RequestBuilder, intercept: bool) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if intercept && self.interceptor.handle(status).await == Interception::LoggedOut {
            return Err(PortalError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        tracing::debug!(status = status.as_u16(), %message, "Request failed");
        Err(PortalError::status(status.as_u16(), message))
    }
}

/// Pull `message` or `error` out of a JSON error body, else the raw text
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return Some(text.to_string());
            }
        }
    }
    Some(body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_json_fields() {
        assert_eq!(
            error_message(r#"{"success":false,"message":"Invalid credentials"}"#).as_deref(),
            Some("Invalid credentials")
        );
        assert_eq!(error_message(r#"{"error":"Not found"}"#).as_deref(), Some("Not found"));
        assert_eq!(error_message("Bad Gateway").as_deref(), Some("Bad Gateway"));
        assert_eq!(error_message("  "), None);
    }
}
