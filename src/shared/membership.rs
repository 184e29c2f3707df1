//! Membership tiers and the upgrade-only transition rule
//!
//! Tiers are totally ordered `Student < Professional < Corporate`. A request
//! to move from tier A to tier B is permitted iff `rank(B) > rank(A)`; equal
//! ranks are an informational no-op and lower ranks are rejected before any
//! request is sent.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

/// Membership plan level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipTier {
    Student,
    Professional,
    Corporate,
}

impl MembershipTier {
    /// All tiers in ascending rank order
    pub const ALL: [MembershipTier; 3] = [
        MembershipTier::Student,
        MembershipTier::Professional,
        MembershipTier::Corporate,
    ];

    pub fn rank(self) -> u8 {
        match self {
            Self::Student => 0,
            Self::Professional => 1,
            Self::Corporate => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Professional => "professional",
            Self::Corporate => "corporate",
        }
    }

    /// Tiers a member on this tier may still upgrade to
    pub fn upgrades(self) -> impl Iterator<Item = MembershipTier> {
        Self::ALL.into_iter().filter(move |tier| tier.rank() > self.rank())
    }
}

impl fmt::Display for MembershipTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipTier {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "professional" => Ok(Self::Professional),
            "corporate" => Ok(Self::Corporate),
            other => Err(SharedError::validation(
                "membershipType",
                format!("unknown membership tier '{}'", other),
            )),
        }
    }
}

/// Outcome of checking a requested tier change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierTransition {
    /// Strictly higher rank; may be sent to the backend
    Upgrade {
        from: MembershipTier,
        to: MembershipTier,
    },
    /// Same tier; informational, nothing to do
    AlreadySubscribed(MembershipTier),
    /// Lower rank; rejected client-side
    Downgrade {
        from: MembershipTier,
        to: MembershipTier,
    },
}

impl TierTransition {
    pub fn check(current: MembershipTier, requested: MembershipTier) -> Self {
        match requested.rank().cmp(&current.rank()) {
            std::cmp::Ordering::Greater => Self::Upgrade {
                from: current,
                to: requested,
            },
            std::cmp::Ordering::Equal => Self::AlreadySubscribed(current),
            std::cmp::Ordering::Less => Self::Downgrade {
                from: current,
                to: requested,
            },
        }
    }

    pub fn is_permitted(&self) -> bool {
        matches!(self, Self::Upgrade { .. })
    }

    /// Message shown to the member for this outcome
    pub fn message(&self) -> String {
        match self {
            Self::Upgrade { from, to } => format!("Upgrading membership from {} to {}.", from, to),
            Self::AlreadySubscribed(tier) => {
                format!("You are already subscribed to the {} membership.", tier)
            }
            Self::Downgrade { from, to } => format!(
                "You cannot downgrade from {} to {}. Please contact support for assistance.",
                from, to
            ),
        }
    }
}

/// Membership record fetched from the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: String,
    pub membership_type: MembershipTier,
    pub status: String,
    pub issue_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
}

impl Membership {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status.eq_ignore_ascii_case("active") && self.expiry_date > now
    }

    /// Whole days until expiry, zero once expired
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.expiry_date - now).num_days().max(0)
    }
}

/// Body of `POST /membership/upgrade`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeRequest {
    pub membership_type: MembershipTier,
}
