//! Shared Module
//!
//! Platform-agnostic types exchanged with the member-portal backend and
//! shared by every part of the client runtime. Nothing in here performs I/O.

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Users, sessions, profile and settings bodies
pub mod user;

/// Membership tiers and the upgrade rule
pub mod membership;

/// Notification types
pub mod notification;

/// Admin back-office types
pub mod admin;

/// Form field validation
pub mod validation;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use membership::{Membership, MembershipTier, TierTransition};
pub use notification::{Notification, UnreadCount};
pub use user::{AuthResponse, Profile, Session, Settings, User, VerifyTokenResponse};
