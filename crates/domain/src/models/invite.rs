//! Invite domain models for account activation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A single-use, time-bounded invitation granting one user account access.
///
/// Invites are created out-of-band; this codebase only redeems them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Invite {
    pub id: Uuid,
    pub code: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub redeemed_at: Option<DateTime<Utc>>,
    pub denied: bool,
}

/// Why an invite cannot be redeemed right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Redeemability {
    #[error("Invite already redeemed")]
    AlreadyRedeemed,

    #[error("Invite denied")]
    Denied,

    #[error("Invite expired")]
    Expired,
}

impl Invite {
    /// Classifies whether this invite is redeemable at `now`.
    ///
    /// Check order matches the activation contract: redeemed beats denied
    /// beats expired.
    pub fn redeemable(&self, now: DateTime<Utc>) -> Result<(), Redeemability> {
        if self.redeemed_at.is_some() {
            return Err(Redeemability::AlreadyRedeemed);
        }
        if self.denied {
            return Err(Redeemability::Denied);
        }
        if now >= self.expires_at {
            return Err(Redeemability::Expired);
        }
        Ok(())
    }
}

/// Request body for POST /api/activate.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ActivateRequest {
    /// The one-time redemption code from the invitation link.
    ///
    /// Defaults to empty when the field is absent, so a body without a code
    /// fails validation instead of being rejected at deserialization.
    #[serde(default)]
    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,
}

/// Response body for a successful activation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ActivateResponse {
    /// Signed session token; the sole response payload.
    pub token: String,
}
