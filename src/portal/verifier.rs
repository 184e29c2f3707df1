//! # Periodic Token Verification
//!
//! Re-validates the session token against `GET /user/verify-token` once at
//! start and then on a fixed cadence (five minutes by default). A successful
//! check installs the user/token pair the backend returns; any failure is
//! fatal to the session: it is cleared, the durable copy erased, and the
//! member sent to the login view. There is no retry beyond the next tick.
//!
//! A result is only applied if the session has not been replaced or cleared
//! while the request was in flight, so a late response cannot overwrite a
//! newer login.

use std::fmt;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::portal::api::ApiClient;
use crate::portal::error::PortalError;
use crate::portal::navigation::{Navigator, Route};
use crate::portal::persistence::PersistenceBridge;
use crate::portal::task::TaskHandle;
use crate::shared::User;

pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Nothing to verify
    NoSession,
    /// Backend confirmed the token; session and storage updated
    Refreshed,
    /// Backend confirmed the token but the durable copy could not be
    /// written; the session only lives in memory until the next refresh
    RefreshedUnsaved,
    /// Backend rejected the token or could not be reached; session cleared
    Invalidated,
    /// Session changed while the request was in flight; result dropped
    Superseded,
}

#[derive(Debug, Clone)]
pub struct TokenVerifier {
    api: ApiClient,
    bridge: PersistenceBridge,
    navigator: Navigator,
    interval: Duration,
}

impl TokenVerifier {
    pub fn new(api: ApiClient, bridge: PersistenceBridge, navigator: Navigator) -> Self {
        let interval = api.config().verify_interval();
        Self {
            api,
            bridge,
            navigator,
            interval,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run a single verification now
    pub async fn check_now(&self) -> VerifyOutcome {
        self.check(false).await
    }

    /// Verify immediately, then on every interval tick, until stopped
    pub fn spawn(self) -> TaskHandle {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut startup = true;
            loop {
                ticker.tick().await;
                let outcome = self.check(startup).await;
                startup = false;
                tracing::debug!(?outcome, "Token verification finished");
            }
        });
        TaskHandle::new("token-verifier", task)
    }

    async fn check(&self, startup: bool) -> VerifyOutcome {
        let store = self.bridge.store();
        let Some((token, generation)) = store.token_with_generation() else {
            return VerifyOutcome::NoSession;
        };

        if startup {
            store.set_loading(true);
        }

        match self.api.verify_token(&token).await {
            Ok(response) if response.success => {
                let token = response.token.unwrap_or(token);
                match response.user.or_else(|| store.user()) {
                    Some(user) => self.refresh(generation, user, token).await,
                    None => {
                        let err = PortalError::InvalidResponse(
                            "verification succeeded without a user record".to_string(),
                        );
                        self.invalidate(generation, &err).await
                    }
                }
            }
            Ok(response) => {
                let reason = response
                    .message
                    .unwrap_or_else(|| "token reported invalid".to_string());
                self.invalidate(generation, &reason).await
            }
            Err(e) => self.invalidate(generation, &e).await,
        }
    }

    async fn refresh(&self, generation: u64, user: User, token: String) -> VerifyOutcome {
        match self.bridge.persist_if_current(generation, user, token, None).await {
            Ok(true) => VerifyOutcome::Refreshed,
            Ok(false) => {
                tracing::debug!("Dropping verification result for a superseded session");
                VerifyOutcome::Superseded
            }
            Err(e) => {
                tracing::error!(
                    generation,
                    "Refreshed session could not be saved and will not survive a restart: {}",
                    e
                );
                VerifyOutcome::RefreshedUnsaved
            }
        }
    }

    async fn invalidate(&self, generation: u64, reason: &(dyn fmt::Display + Sync)) -> VerifyOutcome {
        let cleared = match self.bridge.clear_if_current(generation).await {
            Ok(cleared) => cleared,
            Err(e) => {
                tracing::error!("Failed to erase stored session: {}", e);
                true
            }
        };
        if !cleared {
            tracing::debug!("Ignoring verification failure for a superseded session");
            return VerifyOutcome::Superseded;
        }

        tracing::warn!(%reason, "Token verification failed; session cleared");
        if self.navigator.current() != Route::Login {
            self.navigator.redirect(Route::Login, SESSION_EXPIRED_MESSAGE);
        }
        VerifyOutcome::Invalidated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::config::Config;
    use crate::portal::error::Result;
    use crate::portal::session::SessionStore;
    use crate::portal::storage::{DurableStorage, MemoryStorage};
    use crate::shared::AppConfig;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Reads work, every write fails
    #[derive(Debug, Default)]
    struct ReadOnlyStorage {
        inner: MemoryStorage,
    }

    #[async_trait]
    impl DurableStorage for ReadOnlyStorage {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key).await
        }
    }

    #[tokio::test]
    async fn test_no_session_is_a_noop() {
        let bridge = PersistenceBridge::new(Arc::new(MemoryStorage::new()), SessionStore::new());
        let navigator = Navigator::new(Route::Home);
        let api = ApiClient::new(Config::new(), bridge.clone(), navigator.clone()).unwrap();
        let verifier = TokenVerifier::new(api, bridge.clone(), navigator.clone());

        assert_eq!(verifier.interval(), Duration::from_secs(300));
        assert_eq!(verifier.check_now().await, VerifyOutcome::NoSession);
        assert_eq!(navigator.current(), Route::Home);
        assert!(!bridge.store().is_loading());
    }

    #[tokio::test]
    async fn test_unsaved_refresh_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/user/verify-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "user": { "id": "1", "email": "a@b.com", "isAdmin": false },
                "token": "rotated",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config =
            Config::with_builder(AppConfig::builder().api_base_url(format!("{}/api", server.uri()))).unwrap();
        let bridge = PersistenceBridge::new(Arc::new(ReadOnlyStorage::default()), SessionStore::new());
        let navigator = Navigator::new(Route::Dashboard);
        let api = ApiClient::new(config, bridge.clone(), navigator.clone()).unwrap();
        bridge.store().set_session(
            User {
                id: "1".to_string(),
                email: "a@b.com".to_string(),
                first_name: None,
                last_name: None,
                is_admin: false,
            },
            "abc".to_string(),
        );

        let verifier = TokenVerifier::new(api, bridge.clone(), navigator.clone());
        assert_eq!(verifier.check_now().await, VerifyOutcome::RefreshedUnsaved);

        assert!(bridge.store().is_authenticated());
        assert_eq!(bridge.store().token().as_deref(), Some("rotated"));
        assert_eq!(bridge.storage().get("token").await.unwrap(), None);
        assert_eq!(navigator.current(), Route::Dashboard);
    }
}
