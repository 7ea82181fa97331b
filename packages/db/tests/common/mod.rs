use db::{Database, DbConfig, DbError};

/// Fresh in-memory database with the schema applied.
///
/// Every call gets its own datastore, so tests can run in parallel.
pub async fn setup_db() -> Result<Database, DbError> {
    db::init(DbConfig::memory()).await
}
