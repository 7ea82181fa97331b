//! Profile directory lookups.

use gig_core::{UserId, UserProfile};
use serde::{Deserialize, Serialize};

use crate::{Database, DbError};

#[derive(Debug, Serialize, Deserialize)]
struct ProfileRecord {
    user_id: UserId,
    display_name: String,
}

/// Repository for user profiles.
///
/// Profiles are owned by the identity provider; the marketplace only needs
/// them to show display names in notifications.
#[derive(Clone)]
pub struct ProfileRepository {
    db: Database,
}

impl ProfileRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert or replace a profile.
    pub async fn upsert(&self, profile: &UserProfile) -> Result<UserProfile, DbError> {
        let record: Option<ProfileRecord> = self
            .db
            .upsert(("profile", profile.user_id.to_string()))
            .content(ProfileRecord {
                user_id: profile.user_id.clone(),
                display_name: profile.display_name.clone(),
            })
            .await?;

        record
            .map(|r| UserProfile::new(r.user_id, r.display_name))
            .ok_or_else(|| DbError::Query("Failed to store profile".into()))
    }

    /// Get a profile, if the user has one.
    pub async fn find(&self, user_id: &UserId) -> Result<Option<UserProfile>, DbError> {
        let record: Option<ProfileRecord> =
            self.db.select(("profile", user_id.to_string())).await?;
        Ok(record.map(|r| UserProfile::new(r.user_id, r.display_name)))
    }

    /// Resolve the name shown for a user, falling back to the raw identity.
    pub async fn display_name(&self, user_id: &UserId) -> Result<String, DbError> {
        Ok(self
            .find(user_id)
            .await?
            .map(|p| p.display_name)
            .unwrap_or_else(|| user_id.to_string()))
    }
}
