//! Repository implementations for database operations.

mod bid_repo;
mod gig_repo;
mod profile_repo;
mod record;

pub use bid_repo::{BidRepository, HireOutcome};
pub use gig_repo::GigRepository;
pub use profile_repo::ProfileRepository;

use crate::Database;

/// All repositories over one database handle.
#[derive(Clone)]
pub struct Store {
    pub gigs: GigRepository,
    pub bids: BidRepository,
    pub profiles: ProfileRepository,
}

impl Store {
    pub fn new(db: Database) -> Self {
        Self {
            gigs: GigRepository::new(db.clone()),
            bids: BidRepository::new(db.clone()),
            profiles: ProfileRepository::new(db),
        }
    }
}
