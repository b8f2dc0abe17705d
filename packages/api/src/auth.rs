// ABOUTME: Request authentication via personal API keys
// ABOUTME: Extractors resolving the calling user and the team the request is scoped to

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{debug, warn};

use tally_security::{TokenStorage, User};

use crate::error::ApiError;
use crate::state::AppState;

/// Alternative header carrying the key without a scheme
pub const API_TOKEN_HEADER: &str = "X-API-Token";

/// User resolved from the request's personal API key
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Authenticated user plus their current team, checked for organization membership
#[derive(Debug, Clone)]
pub struct TeamContext {
    pub user: User,
    pub team_id: i64,
}

/// Pull the key from `Authorization: Bearer` or `X-API-Token`
fn extract_token(parts: &Parts) -> Option<&str> {
    let bearer = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    bearer
        .or_else(|| {
            parts
                .headers
                .get(API_TOKEN_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
        })
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let path = parts.uri.path().to_string();

        let Some(token) = extract_token(parts) else {
            warn!(path = %path, "Missing API key");
            return Err(ApiError::unauthorized(
                "API key required. Please include an Authorization: Bearer header.",
            ));
        };

        let key = state.token_storage.verify_token(token).await.map_err(|e| {
            warn!(error = %e, "API key verification failed");
            ApiError::unauthorized("Invalid API key")
        })?;

        let Some(key) = key else {
            warn!(path = %path, "Invalid API key provided");
            return Err(ApiError::unauthorized("Invalid API key"));
        };

        if let Err(e) = state
            .token_storage
            .update_last_used(&TokenStorage::hash_token(token))
            .await
        {
            // Not fatal for the request
            warn!(error = %e, "Failed to update API key last_used timestamp");
        }

        let user = state.user_storage.get_user(&key.user_id).await?;
        debug!(path = %path, user_id = %user.id, "API key validated");

        Ok(AuthenticatedUser(user))
    }
}

impl FromRequestParts<AppState> for TeamContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        let Some(team_id) = user.current_team_id else {
            return Err(ApiError::unauthorized("No current team selected"));
        };

        let is_member = state
            .organization_storage
            .team_membership_level(&user.id, team_id)
            .await?
            .is_some();
        if !is_member {
            return Err(ApiError::forbidden("You are not a member of this organization"));
        }

        Ok(TeamContext { user, team_id })
    }
}
