//! Message types for actor communication.

use gig_core::{Bid, BidId, Gig, GigId, MarketError, MarketResult, UserId};
use ractor::RpcReplyPort;

/// Messages for the coordinator (router) actor.
#[derive(Debug)]
pub enum CoordinatorMessage {
    /// Place a bid on a gig.
    PlaceBid {
        gig_id: GigId,
        freelancer_id: UserId,
        message: String,
        price: f64,
        reply: RpcReplyPort<MarketResult<Bid>>,
    },

    /// Hire a bid. `gig_id` is the gig the bid was placed on.
    HireBid {
        gig_id: GigId,
        bid_id: BidId,
        requester_id: UserId,
        reply: RpcReplyPort<MarketResult<Gig>>,
    },

    /// A gig actor finished a hire; its gig can no longer change.
    GigClosed { gig_id: GigId },

    /// Number of live gig actors.
    ActiveGigs { reply: RpcReplyPort<usize> },

    /// Shutdown all gig actors and the coordinator.
    Shutdown,

    /// Periodic tick for housekeeping.
    Tick,
}

/// Messages for a GigActor. Every mutation of one gig goes through its actor.
#[derive(Debug)]
pub enum GigMessage {
    PlaceBid {
        freelancer_id: UserId,
        message: String,
        price: f64,
        reply: RpcReplyPort<MarketResult<Bid>>,
    },

    HireBid {
        bid_id: BidId,
        requester_id: UserId,
        reply: RpcReplyPort<MarketResult<Gig>>,
    },

    /// Stop after everything queued before this message.
    Shutdown,
}

impl GigMessage {
    /// Answer the caller with `err` instead of processing the request.
    pub(crate) fn fail(self, err: MarketError) {
        match self {
            GigMessage::PlaceBid { reply, .. } => {
                let _ = reply.send(Err(err));
            }
            GigMessage::HireBid { reply, .. } => {
                let _ = reply.send(Err(err));
            }
            GigMessage::Shutdown => {}
        }
    }
}
