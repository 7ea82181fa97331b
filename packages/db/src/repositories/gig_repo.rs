//! Gig repository for CRUD operations.

use gig_core::{Gig, GigId, GigStatus, UserId};
use serde::{Deserialize, Serialize};

use super::record::{decode_time, encode_time};
use crate::{Database, DbError};

/// Internal record type for SurrealDB.
///
/// The record key is the gig ID; it is also stored as `gig_id` so that
/// queries can filter and join on it without decoding record IDs.
#[derive(Debug, Serialize, Deserialize)]
struct GigRecord {
    gig_id: GigId,
    owner_id: UserId,
    title: String,
    description: String,
    budget: f64,
    status: GigStatus,
    created_at: String,
}

impl From<&Gig> for GigRecord {
    fn from(gig: &Gig) -> Self {
        Self {
            gig_id: gig.id,
            owner_id: gig.owner_id.clone(),
            title: gig.title.clone(),
            description: gig.description.clone(),
            budget: gig.budget,
            status: gig.status,
            created_at: encode_time(&gig.created_at),
        }
    }
}

impl TryFrom<GigRecord> for Gig {
    type Error = DbError;

    fn try_from(record: GigRecord) -> Result<Self, Self::Error> {
        Ok(Gig {
            id: record.gig_id,
            owner_id: record.owner_id,
            title: record.title,
            description: record.description,
            budget: record.budget,
            status: record.status,
            created_at: decode_time(&record.created_at)?,
        })
    }
}

fn into_gigs(records: Vec<GigRecord>) -> Result<Vec<Gig>, DbError> {
    records.into_iter().map(Gig::try_from).collect()
}

/// Repository for gig persistence operations.
#[derive(Clone)]
pub struct GigRepository {
    db: Database,
}

impl GigRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create a new gig in the database.
    pub async fn create(&self, gig: &Gig) -> Result<Gig, DbError> {
        let record: Option<GigRecord> = self
            .db
            .create(("gig", gig.id.to_string()))
            .content(GigRecord::from(gig))
            .await?;

        record
            .ok_or_else(|| DbError::Query("Failed to create gig".into()))?
            .try_into()
    }

    /// Get a gig by ID, if it exists.
    pub async fn find(&self, id: GigId) -> Result<Option<Gig>, DbError> {
        let record: Option<GigRecord> = self.db.select(("gig", id.to_string())).await?;
        record.map(Gig::try_from).transpose()
    }

    /// Get a gig by ID.
    pub async fn get(&self, id: GigId) -> Result<Gig, DbError> {
        self.find(id)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("Gig not found: {}", id)))
    }

    /// List gigs posted by an owner, newest first.
    pub async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Gig>, DbError> {
        let mut result = self
            .db
            .query("SELECT * FROM gig WHERE owner_id = $owner_id ORDER BY created_at DESC")
            .bind(("owner_id", owner_id.to_string()))
            .await?;

        let records: Vec<GigRecord> = result.take(0)?;
        into_gigs(records)
    }

    /// List gigs in a given status, newest first.
    pub async fn list_by_status(&self, status: GigStatus) -> Result<Vec<Gig>, DbError> {
        let mut result = self
            .db
            .query("SELECT * FROM gig WHERE status = $status ORDER BY created_at DESC")
            .bind(("status", status.as_str()))
            .await?;

        let records: Vec<GigRecord> = result.take(0)?;
        into_gigs(records)
    }
}
