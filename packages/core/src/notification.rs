//! Realtime notification payloads pushed to connected clients.

use serde::{Deserialize, Serialize};

/// A notification delivered over the realtime channel.
///
/// Serialized with a `kind` tag, one variant per kind, each carrying only the
/// fields that kind needs:
///
/// ```json
/// {"kind":"bid_received","gigTitle":"Logo design","bidderName":"Asha"}
/// ```
///
/// Payloads are deliberately minimal. Clients are expected to re-fetch gig
/// and bid state after receiving one rather than render from the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// Sent to the freelancer whose bid was hired.
    Hired {
        #[serde(rename = "gigTitle")]
        gig_title: String,
    },
    /// Sent to the gig owner when a bid arrives.
    BidReceived {
        #[serde(rename = "gigTitle")]
        gig_title: String,
        #[serde(rename = "bidderName")]
        bidder_name: String,
    },
    /// Sent to a bidder whose pending bid lost to another hire.
    BidRejected {
        #[serde(rename = "gigTitle")]
        gig_title: String,
    },
}

impl Notification {
    /// The wire `kind` of this notification.
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::Hired { .. } => "hired",
            Notification::BidReceived { .. } => "bid_received",
            Notification::BidRejected { .. } => "bid_rejected",
        }
    }

    pub fn gig_title(&self) -> &str {
        match self {
            Notification::Hired { gig_title }
            | Notification::BidReceived { gig_title, .. }
            | Notification::BidRejected { gig_title } => gig_title,
        }
    }
}
