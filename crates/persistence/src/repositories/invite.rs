//! Invite repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::InviteEntity;
use crate::metrics::QueryTimer;

/// Repository for invite-related database operations.
#[derive(Clone)]
pub struct InviteRepository {
    pool: PgPool,
}

impl InviteRepository {
    /// Creates a new InviteRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find invite by exact code match.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<InviteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invite_by_code");
        let result = sqlx::query_as::<_, InviteEntity>(
            r#"
            SELECT id, code, user_id, created_at, expires_at, redeemed_at, denied
            FROM invites
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Atomically redeem an invite.
    ///
    /// Compare-and-swap on `redeemed_at IS NULL`: the returned row count is
    /// the sole signal that this caller consumed the invite. Concurrent
    /// activations with the same code race here, and exactly one observes
    /// a count of 1.
    pub async fn redeem(&self, id: Uuid, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("redeem_invite");
        let result = sqlx::query(
            r#"
            UPDATE invites
            SET redeemed_at = $2
            WHERE id = $1 AND redeemed_at IS NULL
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
