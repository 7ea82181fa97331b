//! Bid domain types for offers made on a gig.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::validate::{positive_amount, required_text};
use crate::{GigId, MarketError, UserId};

/// Unique identifier for a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BidId(pub Ulid);

impl BidId {
    /// Create a new unique bid ID.
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parse a bid ID from a string.
    pub fn parse(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for BidId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BidId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Current status of a bid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BidStatus {
    /// Waiting for the gig owner's decision.
    #[default]
    Pending,
    /// Accepted; the gig is assigned to this bidder.
    Hired,
    /// Another bid on the same gig was hired.
    Rejected,
}

impl BidStatus {
    /// Check if the bid can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BidStatus::Hired | BidStatus::Rejected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BidStatus::Pending => "pending",
            BidStatus::Hired => "hired",
            BidStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for BidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A freelancer's offer to perform a gig for a stated price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub id: BidId,
    /// The gig this bid was placed on.
    pub gig_id: GigId,
    /// Identity of the bidder.
    pub freelancer_id: UserId,
    pub message: String,
    pub price: f64,
    pub status: BidStatus,
    pub created_at: DateTime<Utc>,
}

impl Bid {
    /// Create a new pending bid, validating the bidder's input.
    pub fn new(
        gig_id: GigId,
        freelancer_id: UserId,
        message: &str,
        price: f64,
    ) -> Result<Self, MarketError> {
        Ok(Self {
            id: BidId::new(),
            gig_id,
            freelancer_id,
            message: required_text("message", message)?,
            price: positive_amount("price", price)?,
            status: BidStatus::Pending,
            created_at: Utc::now(),
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == BidStatus::Pending
    }
}
