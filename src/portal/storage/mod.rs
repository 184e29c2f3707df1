//! # Durable Storage
//!
//! Key/value storage that survives restarts, holding the mirrored session.
//!
//! - `memory` - process-local map, for tests and throwaway sessions
//! - `sqlite` - single-table SQLite file under the platform data directory

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::portal::error::Result;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// Opaque bearer token
pub const KEY_TOKEN: &str = "token";
/// JSON-serialized `User`
pub const KEY_USER: &str = "user";
/// Token expiry as epoch milliseconds
pub const KEY_TOKEN_EXPIRES: &str = "tokenExpires";
/// Email of the logged-in member
pub const KEY_EMAIL: &str = "email";

/// Every key the session mirror owns; cleared together on logout
pub const SESSION_KEYS: [&str; 4] = [KEY_TOKEN, KEY_USER, KEY_TOKEN_EXPIRES, KEY_EMAIL];

#[async_trait]
pub trait DurableStorage: Send + Sync + std::fmt::Debug {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;

    /// Write several entries. Backends that can should do this atomically.
    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value).await?;
        }
        Ok(())
    }

    /// Remove several keys. Backends that can should do this atomically.
    async fn remove_many(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.remove(key).await?;
        }
        Ok(())
    }
}
