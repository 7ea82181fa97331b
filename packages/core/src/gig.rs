//! Gig domain types for posted units of work.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::validate::{positive_amount, required_text};
use crate::{MarketError, UserId};

/// Unique identifier for a gig, using ULID for chronological sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GigId(pub Ulid);

impl GigId {
    /// Create a new unique gig ID.
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parse a gig ID from a string.
    pub fn parse(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for GigId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GigId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a gig.
///
/// A gig moves from `Open` to `Assigned` exactly once, when one of its bids
/// is hired. There is no way back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GigStatus {
    /// Accepting bids.
    #[default]
    Open,
    /// A bid was hired; closed to further bidding.
    Assigned,
}

impl GigStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GigStatus::Open => "open",
            GigStatus::Assigned => "assigned",
        }
    }
}

impl std::fmt::Display for GigStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A posted unit of work with a budget, owned by one identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gig {
    /// Unique identifier for this gig.
    pub id: GigId,
    /// Identity of the poster.
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    /// Positive budget amount.
    pub budget: f64,
    /// Current lifecycle state.
    pub status: GigStatus,
    /// When the gig was posted.
    pub created_at: DateTime<Utc>,
}

impl Gig {
    /// Create a new open gig, validating the poster's input.
    ///
    /// Title and description are trimmed and must not be blank; the budget
    /// must be a positive, finite amount.
    pub fn new(
        owner_id: UserId,
        title: &str,
        description: &str,
        budget: f64,
    ) -> Result<Self, MarketError> {
        Ok(Self {
            id: GigId::new(),
            owner_id,
            title: required_text("title", title)?,
            description: required_text("description", description)?,
            budget: positive_amount("budget", budget)?,
            status: GigStatus::Open,
            created_at: Utc::now(),
        })
    }

    /// Check if the gig is still accepting bids.
    pub fn is_open(&self) -> bool {
        self.status == GigStatus::Open
    }

    /// Check if `user` posted this gig.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner_id == user
    }
}
