// ABOUTME: HTTP request handlers for external data sources
// ABOUTME: Lists, provisions, retrieves and deletes warehouse sources of the current team

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use tally_warehouse::StripeSourceInput;

use crate::auth::TeamContext;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListSourcesQuery {
    pub search: Option<String>,
}

/// Request body for creating a Stripe source.
///
/// Missing fields deserialize as empty and are rejected by validation.
#[derive(Deserialize)]
pub struct CreateSourceRequest {
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub client_secret: String,
}

#[derive(Serialize)]
pub struct CreateSourceResponse {
    pub source_id: String,
}

/// List sources of the current team, newest first
pub async fn list_sources(
    State(state): State<AppState>,
    ctx: TeamContext,
    Query(params): Query<ListSourcesQuery>,
) -> Result<Response, ApiError> {
    info!("Listing external data sources for team {}", ctx.team_id);

    let sources = state
        .source_storage
        .list_for_team(ctx.team_id, params.search.as_deref())
        .await?;

    Ok(ApiResponse::respond(StatusCode::OK, sources))
}

/// Provision a Stripe source, its destination and connection, then start syncing
pub async fn create_source(
    State(state): State<AppState>,
    ctx: TeamContext,
    Json(request): Json<CreateSourceRequest>,
) -> Result<Response, ApiError> {
    info!("Creating Stripe source for team {}", ctx.team_id);

    let provisioned = state
        .provisioner
        .create_stripe_source(
            ctx.team_id,
            Some(ctx.user.id),
            StripeSourceInput {
                account_id: request.account_id,
                client_secret: request.client_secret,
            },
        )
        .await?;

    Ok(ApiResponse::respond(
        StatusCode::CREATED,
        CreateSourceResponse {
            source_id: provisioned.source_id,
        },
    ))
}

/// Get one source of the current team
pub async fn get_source(
    State(state): State<AppState>,
    ctx: TeamContext,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    info!("Getting external data source: {}", id);

    let source = state.source_storage.get(ctx.team_id, &id).await?;
    Ok(ApiResponse::respond(StatusCode::OK, source))
}

/// Delete the local record; remote resources are left in place
pub async fn delete_source(
    State(state): State<AppState>,
    ctx: TeamContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Deleting external data source: {}", id);

    state.source_storage.delete(ctx.team_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
