//! Portal Client Module
//!
//! Client-side session and authentication core for the member portal. It
//! holds the session, keeps it mirrored to durable storage, re-verifies it in
//! the background and decides which views a member may reach.
//!
//! # Architecture
//!
//! - **`session`** - `SessionStore`, the single source of truth for who is logged in
//! - **`storage`** - `DurableStorage` trait with memory and SQLite backends
//! - **`persistence`** - mirrors the store into storage and restores it at startup
//! - **`api`** - REST client for the portal backend
//! - **`interceptor`** - clears the session on any 401 from an authenticated call
//! - **`verifier`** - periodic `verify-token` check
//! - **`notifications`** - periodic unread-count poll
//! - **`guard`** - route guards
//! - **`navigation`** - current route plus flash message
//! - **`auth`** - login, registration and logout flows
//! - **`config`** / **`error`** - configuration loading and `PortalError`
//!
//! # Wiring
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use society_portal::portal::{
//!     ApiClient, Config, Navigator, PersistenceBridge, SessionStore, SqliteStorage, TokenVerifier,
//! };
//!
//! # async fn example() -> society_portal::portal::Result<()> {
//! let config = Config::load()?;
//! let storage = Arc::new(SqliteStorage::open(&config.storage_path()).await?);
//! let bridge = PersistenceBridge::new(storage, SessionStore::new());
//! let navigator = Navigator::default();
//! let api = ApiClient::new(config, bridge.clone(), navigator.clone())?;
//!
//! bridge.restore().await?;
//! let _verifier = TokenVerifier::new(api, bridge, navigator).spawn();
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod interceptor;
pub mod navigation;
pub mod notifications;
pub mod persistence;
pub mod session;
pub mod storage;
pub mod task;
pub mod verifier;

pub use api::ApiClient;
pub use auth::AuthService;
pub use config::Config;
pub use error::{PortalError, Result};
pub use guard::{FailurePolicy, Guard, GuardDecision, Requirement};
pub use interceptor::{Interception, UnauthorizedInterceptor};
pub use navigation::{Location, Navigator, Route};
pub use notifications::UnreadPoller;
pub use persistence::{DiscardReason, PersistenceBridge, RestoreOutcome};
pub use session::SessionStore;
pub use storage::{DurableStorage, MemoryStorage, SqliteStorage};
pub use task::TaskHandle;
pub use verifier::{TokenVerifier, VerifyOutcome};
