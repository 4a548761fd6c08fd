//! Invite entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::invite::Invite;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the invites table.
#[derive(Debug, Clone, FromRow)]
pub struct InviteEntity {
    pub id: Uuid,
    pub code: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub redeemed_at: Option<DateTime<Utc>>,
    pub denied: bool,
}

impl From<InviteEntity> for Invite {
    fn from(e: InviteEntity) -> Self {
        Invite {
            id: e.id,
            code: e.code,
            user_id: e.user_id,
            created_at: e.created_at,
            expires_at: e.expires_at,
            redeemed_at: e.redeemed_at,
            denied: e.denied,
        }
    }
}
