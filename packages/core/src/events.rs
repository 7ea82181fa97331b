//! Domain events emitted by the lifecycle coordinator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BidId, GigId, UserId};

/// Events emitted after a lifecycle transition has been committed.
///
/// Events are only ever published once the store write that caused them has
/// succeeded, so an observer that re-reads state sees the new status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MarketEvent {
    /// A bid was placed on an open gig.
    BidReceived {
        gig_id: GigId,
        bid_id: BidId,
        freelancer_id: UserId,
        gig_owner_id: UserId,
        gig_title: String,
        /// Display name of the bidder, resolved when the bid was placed.
        bidder_name: String,
        timestamp: DateTime<Utc>,
    },
    /// A bid was hired and its gig assigned.
    Hired {
        gig_id: GigId,
        bid_id: BidId,
        freelancer_id: UserId,
        gig_owner_id: UserId,
        gig_title: String,
        timestamp: DateTime<Utc>,
    },
    /// A pending bid was rejected because another bid on the gig was hired.
    BidRejected {
        gig_id: GigId,
        bid_id: BidId,
        freelancer_id: UserId,
        gig_owner_id: UserId,
        gig_title: String,
        timestamp: DateTime<Utc>,
    },
}

impl MarketEvent {
    /// Get the timestamp of the event.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            MarketEvent::BidReceived { timestamp, .. } => *timestamp,
            MarketEvent::Hired { timestamp, .. } => *timestamp,
            MarketEvent::BidRejected { timestamp, .. } => *timestamp,
        }
    }

    /// Get the gig this event concerns.
    pub fn gig_id(&self) -> GigId {
        match self {
            MarketEvent::BidReceived { gig_id, .. } => *gig_id,
            MarketEvent::Hired { gig_id, .. } => *gig_id,
            MarketEvent::BidRejected { gig_id, .. } => *gig_id,
        }
    }

    /// Get the bid this event concerns.
    pub fn bid_id(&self) -> BidId {
        match self {
            MarketEvent::BidReceived { bid_id, .. } => *bid_id,
            MarketEvent::Hired { bid_id, .. } => *bid_id,
            MarketEvent::BidRejected { bid_id, .. } => *bid_id,
        }
    }

    /// Get a short description of this event for logging.
    pub fn description(&self) -> String {
        match self {
            MarketEvent::BidReceived {
                gig_id,
                bid_id,
                freelancer_id,
                ..
            } => format!("Bid {} by {} received on gig {}", bid_id, freelancer_id, gig_id),
            MarketEvent::Hired {
                gig_id,
                freelancer_id,
                ..
            } => format!("{} hired for gig {}", freelancer_id, gig_id),
            MarketEvent::BidRejected {
                gig_id, bid_id, ..
            } => format!("Bid {} rejected on gig {}", bid_id, gig_id),
        }
    }
}
