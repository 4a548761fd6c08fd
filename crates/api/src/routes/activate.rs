//! Invite activation endpoint.

use axum::{extract::State, Json};
use chrono::Utc;
use domain::models::invite::{ActivateRequest, ActivateResponse, Invite};
use persistence::repositories::InviteRepository;
use shared::token::TokenSigner;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

/// Redeem an invite code and mint a session token.
///
/// POST /api/activate
///
/// Public: the invite code is the sole credential. The invite is consumed by
/// a conditional update on `redeemed_at IS NULL`; that update affecting
/// exactly one row is the only gate for minting a token, so two concurrent
/// activations with the same code cannot both succeed.
pub async fn activate(
    State(state): State<AppState>,
    Json(request): Json<ActivateRequest>,
) -> Result<Json<ActivateResponse>, ApiError> {
    request.validate()?;

    // The signing secret is checked before the redemption write: a
    // misconfigured server must not consume invites it cannot honor.
    let signer = TokenSigner::from_secret(&state.config.auth.jwt_secret)?;

    let repo = InviteRepository::new(state.pool.clone());

    let invite: Invite = repo
        .find_by_code(&request.code)
        .await?
        .ok_or(ApiError::InvalidCode)?
        .into();

    let now = Utc::now();
    invite.redeemable(now)?;

    let rows = repo
        .redeem(invite.id, now)
        .await
        .map_err(|e| ApiError::RedemptionWrite(e.to_string()))?;
    if rows == 0 {
        // Lost a concurrent race after validation: the invite is consumed.
        return Err(ApiError::AlreadyRedeemed);
    }

    let token = signer.mint(invite.user_id)?;

    info!(
        invite_id = %invite.id,
        user_id = %invite.user_id,
        "Invite redeemed"
    );

    Ok(Json(ActivateResponse { token }))
}
