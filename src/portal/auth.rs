//! Login, registration and logout flows
//!
//! Ties the API client to the persistence bridge and the navigator so a
//! successful login leaves the session installed, mirrored to storage and
//! the member on the dashboard.

use chrono::{Duration as ChronoDuration, Utc};

use crate::portal::api::ApiClient;
use crate::portal::error::Result;
use crate::portal::navigation::{Navigator, Route};
use crate::portal::persistence::{PersistenceBridge, RestoreOutcome};
use crate::shared::user::RegisterRequest;
use crate::shared::{AuthResponse, User};

pub const LOGGED_OUT_MESSAGE: &str = "You have been logged out.";

#[derive(Debug, Clone)]
pub struct AuthService {
    api: ApiClient,
    bridge: PersistenceBridge,
    navigator: Navigator,
}

impl AuthService {
    pub fn new(api: ApiClient, bridge: PersistenceBridge, navigator: Navigator) -> Self {
        Self {
            api,
            bridge,
            navigator,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Reinstall a saved session at startup
    pub async fn restore(&self) -> Result<RestoreOutcome> {
        self.bridge.restore().await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let response = self.api.login(email, password).await?;
        let user = self.install(response).await?;
        tracing::info!(user_id = %user.id, "Logged in");
        self.navigator.navigate(Route::Dashboard);
        Ok(user)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        let response = self.api.register(request).await?;
        let user = self.install(response).await?;
        tracing::info!(user_id = %user.id, "Registered new member");
        self.navigator.navigate(Route::Dashboard);
        Ok(user)
    }

    pub async fn logout(&self) -> Result<()> {
        self.bridge.clear().await?;
        tracing::info!("Logged out");
        self.navigator.redirect(Route::Login, LOGGED_OUT_MESSAGE);
        Ok(())
    }

    async fn install(&self, response: AuthResponse) -> Result<User> {
        let expires_at = response
            .expires_in
            .filter(|secs| *secs > 0)
            .map(|secs| Utc::now() + ChronoDuration::seconds(secs));
        self.bridge
            .persist(response.user.clone(), response.token, expires_at)
            .await?;
        Ok(response.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::config::Config;
    use crate::portal::session::SessionStore;
    use crate::portal::storage::{DurableStorage, MemoryStorage};
    use assert_matches::assert_matches;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_logout_clears_and_redirects() {
        let storage = Arc::new(MemoryStorage::with_entries([
            ("token", "abc"),
            ("user", r#"{"id":"1","email":"a@b.com","isAdmin":false}"#),
        ]));
        let bridge = PersistenceBridge::new(storage.clone(), SessionStore::new());
        let navigator = Navigator::new(Route::Dashboard);
        let api = ApiClient::new(Config::new(), bridge.clone(), navigator.clone()).unwrap();
        let auth = AuthService::new(api, bridge.clone(), navigator.clone());

        assert_matches!(auth.restore().await, Ok(RestoreOutcome::Restored));
        auth.logout().await.unwrap();

        assert!(!bridge.store().is_authenticated());
        assert_eq!(storage.get("token").await.unwrap(), None);
        assert_eq!(navigator.current(), Route::Login);
        assert_eq!(navigator.flash().as_deref(), Some(LOGGED_OUT_MESSAGE));
    }
}
