//! Bid repository for CRUD operations and the atomic hire.

use std::collections::HashMap;

use gig_core::{Bid, BidId, BidStatus, GigId, UserId};
use serde::{Deserialize, Serialize};

use super::record::{decode_time, encode_time};
use crate::{Database, DbError};

/// Internal record type for SurrealDB.
#[derive(Debug, Serialize, Deserialize)]
struct BidRecord {
    bid_id: BidId,
    gig_id: GigId,
    freelancer_id: UserId,
    message: String,
    price: f64,
    status: BidStatus,
    created_at: String,
}

impl From<&Bid> for BidRecord {
    fn from(bid: &Bid) -> Self {
        Self {
            bid_id: bid.id,
            gig_id: bid.gig_id,
            freelancer_id: bid.freelancer_id.clone(),
            message: bid.message.clone(),
            price: bid.price,
            status: bid.status,
            created_at: encode_time(&bid.created_at),
        }
    }
}

impl TryFrom<BidRecord> for Bid {
    type Error = DbError;

    fn try_from(record: BidRecord) -> Result<Self, Self::Error> {
        Ok(Bid {
            id: record.bid_id,
            gig_id: record.gig_id,
            freelancer_id: record.freelancer_id,
            message: record.message,
            price: record.price,
            status: record.status,
            created_at: decode_time(&record.created_at)?,
        })
    }
}

fn into_bids(records: Vec<BidRecord>) -> Result<Vec<Bid>, DbError> {
    records.into_iter().map(Bid::try_from).collect()
}

/// All writes of a hire run in one transaction. The gig must still be open
/// and the bid must be pending on that gig; otherwise the transaction
/// throws before anything is written and nothing changes.
const HIRE_TRANSACTION: &str = r#"
BEGIN TRANSACTION;
LET $gig_status = array::first((SELECT VALUE status FROM gig WHERE gig_id = $gig_id));
IF $gig_status != "open" {
    THROW "gig is not open";
};
LET $hired = (UPDATE bid SET status = "hired" WHERE bid_id = $bid_id AND gig_id = $gig_id AND status = "pending" RETURN AFTER);
IF array::len($hired) != 1 {
    THROW "bid is not pending on this gig";
};
UPDATE bid SET status = "rejected" WHERE gig_id = $gig_id AND status = "pending";
UPDATE gig SET status = "assigned" WHERE gig_id = $gig_id AND status = "open";
COMMIT TRANSACTION;
"#;

/// Bids touched by a committed hire.
#[derive(Debug, Clone)]
pub struct HireOutcome {
    /// The bid that won.
    pub hired: Bid,
    /// Every bid on the gig that was pending and is now rejected.
    pub rejected: Vec<Bid>,
}

/// Repository for bid persistence operations.
#[derive(Clone)]
pub struct BidRepository {
    db: Database,
}

impl BidRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create a new bid in the database.
    pub async fn create(&self, bid: &Bid) -> Result<Bid, DbError> {
        let record: Option<BidRecord> = self
            .db
            .create(("bid", bid.id.to_string()))
            .content(BidRecord::from(bid))
            .await?;

        record
            .ok_or_else(|| DbError::Query("Failed to create bid".into()))?
            .try_into()
    }

    /// Get a bid by ID, if it exists.
    pub async fn find(&self, id: BidId) -> Result<Option<Bid>, DbError> {
        let record: Option<BidRecord> = self.db.select(("bid", id.to_string())).await?;
        record.map(Bid::try_from).transpose()
    }

    /// Get a bid by ID.
    pub async fn get(&self, id: BidId) -> Result<Bid, DbError> {
        self.find(id)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("Bid not found: {}", id)))
    }

    /// List the bids on a gig in the order they were placed.
    pub async fn list_by_gig(&self, gig_id: GigId) -> Result<Vec<Bid>, DbError> {
        let mut result = self
            .db
            .query("SELECT * FROM bid WHERE gig_id = $gig_id ORDER BY created_at ASC, bid_id ASC")
            .bind(("gig_id", gig_id.to_string()))
            .await?;

        let records: Vec<BidRecord> = result.take(0)?;
        into_bids(records)
    }

    /// List the bids placed by a freelancer, oldest first.
    pub async fn list_by_freelancer(&self, freelancer_id: &UserId) -> Result<Vec<Bid>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM bid WHERE freelancer_id = $freelancer_id ORDER BY created_at ASC, bid_id ASC",
            )
            .bind(("freelancer_id", freelancer_id.to_string()))
            .await?;

        let records: Vec<BidRecord> = result.take(0)?;
        into_bids(records)
    }

    /// List every bid on gigs posted by `owner_id`, oldest first.
    pub async fn list_for_owner(&self, owner_id: &UserId) -> Result<Vec<Bid>, DbError> {
        let mut result = self
            .db
            .query(
                r#"
                SELECT * FROM bid
                WHERE gig_id IN (SELECT VALUE gig_id FROM gig WHERE owner_id = $owner_id)
                ORDER BY created_at ASC, bid_id ASC
                "#,
            )
            .bind(("owner_id", owner_id.to_string()))
            .await?;

        let records: Vec<BidRecord> = result.take(0)?;
        into_bids(records)
    }

    /// Count bids on a gig by status.
    pub async fn count_by_status(&self, gig_id: GigId) -> Result<HashMap<BidStatus, u64>, DbError> {
        let mut result = self
            .db
            .query(
                r#"
                SELECT status, count() AS count
                FROM bid
                WHERE gig_id = $gig_id
                GROUP BY status
                "#,
            )
            .bind(("gig_id", gig_id.to_string()))
            .await?;

        #[derive(Deserialize)]
        struct StatusCount {
            status: BidStatus,
            count: i64,
        }

        let counts: Vec<StatusCount> = result.take(0)?;

        Ok(counts
            .into_iter()
            .map(|c| (c.status, c.count.max(0) as u64))
            .collect())
    }

    /// Hire `bid_id` on `gig_id`.
    ///
    /// In one transaction: the bid becomes `hired`, every other pending bid
    /// on the gig becomes `rejected`, and the gig becomes `assigned`.
    ///
    /// If the gig is not open, or the bid is not pending on this gig, the
    /// transaction aborts with no row changed and this returns
    /// [`DbError::Query`].
    pub async fn hire(&self, gig_id: GigId, bid_id: BidId) -> Result<HireOutcome, DbError> {
        let (mut target, others): (Vec<Bid>, Vec<Bid>) = self
            .list_by_gig(gig_id)
            .await?
            .into_iter()
            .partition(|b| b.id == bid_id);

        let mut hired = target.pop().ok_or_else(|| {
            DbError::Query(format!("Bid {} is not on gig {}", bid_id, gig_id))
        })?;

        self.db
            .query(HIRE_TRANSACTION)
            .bind(("gig_id", gig_id.to_string()))
            .bind(("bid_id", bid_id.to_string()))
            .await?
            .check()
            .map_err(|e| {
                DbError::Query(format!("Hire of bid {} on gig {} aborted: {}", bid_id, gig_id, e))
            })?;

        // Committed: the outcome follows from the pre-read, with no further
        // read that could fail after the write.
        hired.status = BidStatus::Hired;
        let rejected = others
            .into_iter()
            .filter(Bid::is_pending)
            .map(|mut b| {
                b.status = BidStatus::Rejected;
                b
            })
            .collect();

        Ok(HireOutcome { hired, rejected })
    }
}
