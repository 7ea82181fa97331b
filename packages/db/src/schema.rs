//! Database schema definitions using SurrealQL.

use crate::{Database, DbError};

/// Initialize the database schema.
///
/// This creates all necessary tables, fields, and indexes. Safe to run on
/// every startup.
pub async fn init_schema(db: &Database) -> Result<(), DbError> {
    tracing::info!("Initializing database schema...");

    db.query(GIG_SCHEMA).await?.check()?;
    db.query(BID_SCHEMA).await?.check()?;
    db.query(PROFILE_SCHEMA).await?.check()?;

    tracing::info!("Database schema initialized");

    Ok(())
}

/// Gig table schema.
///
/// Timestamps are stored as RFC 3339 strings; ordering is done on the
/// decoded values.
const GIG_SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS gig SCHEMAFULL;

DEFINE FIELD IF NOT EXISTS gig_id ON gig TYPE string;
DEFINE FIELD IF NOT EXISTS owner_id ON gig TYPE string;
DEFINE FIELD IF NOT EXISTS title ON gig TYPE string;
DEFINE FIELD IF NOT EXISTS description ON gig TYPE string;
DEFINE FIELD IF NOT EXISTS budget ON gig TYPE number ASSERT $value > 0;
DEFINE FIELD IF NOT EXISTS status ON gig TYPE string DEFAULT "open"
    ASSERT $value INSIDE ["open", "assigned"];
DEFINE FIELD IF NOT EXISTS created_at ON gig TYPE string;

DEFINE INDEX IF NOT EXISTS gig_key ON gig FIELDS gig_id UNIQUE;
DEFINE INDEX IF NOT EXISTS gig_owner ON gig FIELDS owner_id;
DEFINE INDEX IF NOT EXISTS gig_status ON gig FIELDS status;
"#;

/// Bid table schema.
const BID_SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS bid SCHEMAFULL;

DEFINE FIELD IF NOT EXISTS bid_id ON bid TYPE string;
DEFINE FIELD IF NOT EXISTS gig_id ON bid TYPE string;
DEFINE FIELD IF NOT EXISTS freelancer_id ON bid TYPE string;
DEFINE FIELD IF NOT EXISTS message ON bid TYPE string;
DEFINE FIELD IF NOT EXISTS price ON bid TYPE number ASSERT $value > 0;
DEFINE FIELD IF NOT EXISTS status ON bid TYPE string DEFAULT "pending"
    ASSERT $value INSIDE ["pending", "hired", "rejected"];
DEFINE FIELD IF NOT EXISTS created_at ON bid TYPE string;

DEFINE INDEX IF NOT EXISTS bid_key ON bid FIELDS bid_id UNIQUE;
DEFINE INDEX IF NOT EXISTS bid_gig ON bid FIELDS gig_id;
DEFINE INDEX IF NOT EXISTS bid_freelancer ON bid FIELDS freelancer_id;
DEFINE INDEX IF NOT EXISTS bid_gig_status ON bid FIELDS gig_id, status;
"#;

/// Profile directory used to resolve display names.
const PROFILE_SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS profile SCHEMAFULL;

DEFINE FIELD IF NOT EXISTS user_id ON profile TYPE string;
DEFINE FIELD IF NOT EXISTS display_name ON profile TYPE string;

DEFINE INDEX IF NOT EXISTS profile_user ON profile FIELDS user_id UNIQUE;
"#;
