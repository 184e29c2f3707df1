//! Society Portal - Client Core Library
//!
//! Session and authentication core for the professional-society member
//! portal: who is logged in, how that survives a restart, how it is
//! re-verified against the backend, and which views a member may reach.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared with the backend's JSON API
//!   - Users, sessions, memberships, notifications, admin payloads
//!   - Input validation and `SharedError`
//!   - `AppConfig` and its builder
//!
//! - **`portal`** - Client runtime
//!   - `SessionStore` published over a `tokio::sync::watch` channel
//!   - Durable storage (memory and SQLite) with restore-on-startup
//!   - REST client with a global 401 interceptor
//!   - Background token verification and unread-count polling
//!   - Route guards and navigation state
//!
//! # Binary
//!
//! `portal-agent` wires everything together headlessly: it restores the
//! saved session, runs the background tasks and logs session and navigation
//! changes until interrupted.
//!
//! # Thread Safety
//!
//! All shared state lives behind `Arc` and `watch::Sender`; every handle is
//! `Clone + Send + Sync` and may be moved into spawned tasks.
//!
//! # Error Handling
//!
//! - `shared::SharedError` for validation and serialization
//! - `shared::ConfigError` for configuration
//! - `portal::PortalError` for everything the runtime does

/// Types shared with the backend API
pub mod shared;

/// Client session runtime
pub mod portal;
