use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::invite::Redeemability;
use serde::Serialize;
use shared::token::TokenError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid code")]
    InvalidCode,

    #[error("Invite already redeemed")]
    AlreadyRedeemed,

    #[error("Invite denied")]
    Denied,

    #[error("Invite expired")]
    Expired,

    #[error("Redemption write failed: {0}")]
    RedemptionWrite(String),

    #[error("Server configuration error: {0}")]
    ServerConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Wire shape for every error response: `{ "error": "..." }`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::InvalidCode => (StatusCode::BAD_REQUEST, "Invalid code".into()),
            ApiError::AlreadyRedeemed => {
                (StatusCode::BAD_REQUEST, "Invite already redeemed".into())
            }
            ApiError::Denied => (StatusCode::BAD_REQUEST, "Invite denied".into()),
            ApiError::Expired => (StatusCode::BAD_REQUEST, "Invite expired".into()),
            ApiError::RedemptionWrite(cause) => {
                tracing::error!("Redemption write failed: {}", cause);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to redeem invite".into(),
                )
            }
            ApiError::ServerConfig(cause) => {
                tracing::error!("Server configuration error: {}", cause);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server configuration error".into(),
                )
            }
            ApiError::Internal(cause) => {
                tracing::error!("Internal error: {}", cause);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".into(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Internal(format!("Database error: {}", err))
    }
}

impl From<Redeemability> for ApiError {
    fn from(r: Redeemability) -> Self {
        match r {
            Redeemability::AlreadyRedeemed => ApiError::AlreadyRedeemed,
            Redeemability::Denied => ApiError::Denied,
            Redeemability::Expired => ApiError::Expired,
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::MissingSecret => ApiError::ServerConfig("Missing signing secret".into()),
            other => ApiError::Internal(format!("Token error: {}", other)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(_, errors)| {
                errors
                    .iter()
                    .map(|e| e.message.clone().map(|m| m.to_string()).unwrap_or_default())
            })
            .collect();

        ApiError::Validation(messages.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_validation_errors_are_400() {
        let response = ApiError::Validation("Code is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        for error in [
            ApiError::InvalidCode,
            ApiError::AlreadyRedeemed,
            ApiError::Denied,
            ApiError::Expired,
        ] {
            assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_infrastructure_errors_are_500() {
        for error in [
            ApiError::RedemptionWrite("connection reset".to_string()),
            ApiError::ServerConfig("missing secret".to_string()),
            ApiError::Internal("boom".to_string()),
        ] {
            assert_eq!(
                error.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }

    #[test]
    fn test_infrastructure_cause_not_exposed() {
        // The logged cause must never reach the response body.
        let body = ErrorBody {
            error: "Failed to redeem invite".to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"error":"Failed to redeem invite"}"#);
    }

    #[test]
    fn test_redeemability_mapping() {
        assert!(matches!(
            ApiError::from(Redeemability::AlreadyRedeemed),
            ApiError::AlreadyRedeemed
        ));
        assert!(matches!(
            ApiError::from(Redeemability::Denied),
            ApiError::Denied
        ));
        assert!(matches!(
            ApiError::from(Redeemability::Expired),
            ApiError::Expired
        ));
    }

    #[test]
    fn test_validation_errors_surface_field_messages() {
        use validator::Validate;

        let request: domain::models::invite::ActivateRequest =
            serde_json::from_value(serde_json::json!({})).unwrap();
        let api: ApiError = request.validate().unwrap_err().into();
        match api {
            ApiError::Validation(msg) => assert_eq!(msg, "Code is required"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_secret_maps_to_server_config() {
        assert!(matches!(
            ApiError::from(TokenError::MissingSecret),
            ApiError::ServerConfig(_)
        ));
    }
}
