//! Room credential handler.

use crate::{api::ApiError, AppState};
use ava_types::{TokenRequest, TokenResponse};
use ava_voice::JoinGrant;
use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) const MISSING_PHONE_NUMBER: &str = "Phone number is required";
pub(crate) const CREDENTIALS_NOT_CONFIGURED: &str = "LiveKit credentials not configured";
pub(crate) const TOKEN_GENERATION_FAILED: &str = "Failed to generate token";

/// Prefix of every room created for a call.
const ROOM_PREFIX: &str = "appointment";

/// Builds the join grant for a caller: a fresh room per call, identified by
/// the caller's phone number.
pub fn caller_grant(phone_number: &str, now_millis: i64) -> JoinGrant {
    JoinGrant {
        room_name: format!("{}-{}", ROOM_PREFIX, now_millis),
        participant_identity: format!("user-{}", phone_number),
        participant_name: phone_number.to_string(),
        metadata: json!({ "phoneNumber": phone_number }).to_string(),
    }
}

/// Handler for `POST /api/token`.
pub async fn token_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected token request body");
            return Err(ApiError::BadRequest(MISSING_PHONE_NUMBER.to_string()));
        }
    };

    let phone_number = request.phone_number.trim();
    if phone_number.is_empty() {
        return Err(ApiError::BadRequest(MISSING_PHONE_NUMBER.to_string()));
    }

    if !state.voice_service.is_configured() {
        tracing::error!(
            missing = ?state.voice_service.config().missing_fields(),
            "token requested but LiveKit credentials are not configured"
        );
        return Err(ApiError::InternalServerError(
            CREDENTIALS_NOT_CONFIGURED.to_string(),
        ));
    }

    let grant = caller_grant(phone_number, chrono::Utc::now().timestamp_millis());
    let token = state.voice_service.generate_join_token(&grant).map_err(|e| {
        tracing::error!(room = %grant.room_name, "token generation failed: {}", e);
        ApiError::InternalServerError(TOKEN_GENERATION_FAILED.to_string())
    })?;

    tracing::info!(
        room = %grant.room_name,
        identity = %grant.participant_identity,
        "issued room join token"
    );

    Ok(Json(TokenResponse {
        token,
        url: state.voice_service.client_url().to_string(),
    }))
}
