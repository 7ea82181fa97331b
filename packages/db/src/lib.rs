//! SurrealDB integration for the gig marketplace.
//!
//! This crate provides database connectivity and repositories for
//! persisting gigs, bids and user profiles.
//!
//! # Features
//!
//! - `memory` (default): Use in-memory storage for testing
//! - `rocksdb`: Use RocksDB for persistent file-based storage

mod connection;
mod schema;
pub mod repositories;

pub use connection::{Database, DbConfig, DbError, connect};
pub use repositories::Store;
pub use schema::init_schema;

/// Connect to the database and make sure the schema exists.
///
/// This should be called once at application startup. The returned handle is
/// cheap to clone and is shared by every repository.
pub async fn init(config: DbConfig) -> Result<Database, DbError> {
    let db = connect(&config).await?;
    init_schema(&db).await?;
    Ok(db)
}
