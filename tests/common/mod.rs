//! Common test utilities and helpers
//!
//! - `Harness`: a wiremock backend plus a fully wired client runtime
//! - member fixtures and canned backend bodies

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use society_portal::portal::{
    ApiClient, Config, MemoryStorage, Navigator, PersistenceBridge, Route, SessionStore,
};
use society_portal::shared::{AppConfig, User};
use wiremock::MockServer;

pub const TOKEN: &str = "abc";

pub fn member(is_admin: bool) -> User {
    User {
        id: "42".to_string(),
        email: "jane@society.org".to_string(),
        first_name: Some("Jane".to_string()),
        last_name: Some("Doe".to_string()),
        is_admin,
    }
}

pub fn member_json(is_admin: bool) -> Value {
    json!({
        "id": "42",
        "email": "jane@society.org",
        "firstName": "Jane",
        "lastName": "Doe",
        "isAdmin": is_admin,
    })
}

pub fn membership_json(tier: &str) -> Value {
    json!({
        "id": "m-1",
        "membershipType": tier,
        "status": "active",
        "issueDate": "2026-01-01T00:00:00Z",
        "expiryDate": "2027-01-01T00:00:00Z",
    })
}

pub struct Harness {
    pub server: MockServer,
    pub storage: Arc<MemoryStorage>,
    pub bridge: PersistenceBridge,
    pub navigator: Navigator,
    pub api: ApiClient,
}

impl Harness {
    pub async fn start() -> Self {
        Self::start_on(Route::Dashboard, MemoryStorage::new()).await
    }

    pub async fn start_on(route: Route, storage: MemoryStorage) -> Self {
        let server = MockServer::start().await;
        let config = Config::with_builder(
            AppConfig::builder()
                .api_base_url(format!("{}/api", server.uri()))
                .request_timeout(Duration::from_secs(5)),
        )
        .unwrap();

        let storage = Arc::new(storage);
        let bridge = PersistenceBridge::new(storage.clone(), SessionStore::new());
        let navigator = Navigator::new(route);
        let api = ApiClient::new(config, bridge.clone(), navigator.clone()).unwrap();

        Self {
            server,
            storage,
            bridge,
            navigator,
            api,
        }
    }

    /// Install a logged-in session with [`TOKEN`]
    pub async fn login_as(&self, is_admin: bool) {
        self.bridge
            .persist(member(is_admin), TOKEN.to_string(), None)
            .await
            .unwrap();
    }
}
