// ABOUTME: HTTP request handlers for tag operations
// ABOUTME: Team-scoped tag CRUD and tagging of actions

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use tally_tags::{TagCreateInput, TagUpdateInput, TaggedObject};

use crate::auth::TeamContext;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// List all tags of the current team
pub async fn list_tags(State(state): State<AppState>, ctx: TeamContext) -> Result<Response, ApiError> {
    info!("Listing tags for team {}", ctx.team_id);

    let tags = state.tag_storage.list_tags(ctx.team_id).await?;
    Ok(ApiResponse::respond(StatusCode::OK, tags))
}

/// Get a single tag by ID
pub async fn get_tag(
    State(state): State<AppState>,
    ctx: TeamContext,
    Path(tag_id): Path<String>,
) -> Result<Response, ApiError> {
    info!("Getting tag: {}", tag_id);

    let tag = state.tag_storage.get_tag(ctx.team_id, &tag_id).await?;
    Ok(ApiResponse::respond(StatusCode::OK, tag))
}

/// Request body for creating a tag
#[derive(Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
}

/// Create a new tag
pub async fn create_tag(
    State(state): State<AppState>,
    ctx: TeamContext,
    Json(request): Json<CreateTagRequest>,
) -> Result<Response, ApiError> {
    info!("Creating tag: {}", request.name);

    let tag = state
        .tag_storage
        .create_tag(ctx.team_id, TagCreateInput { name: request.name })
        .await?;
    Ok(ApiResponse::respond(StatusCode::CREATED, tag))
}

/// Request body for updating a tag
#[derive(Deserialize)]
pub struct UpdateTagRequest {
    pub name: Option<String>,
}

/// Rename a tag
pub async fn update_tag(
    State(state): State<AppState>,
    ctx: TeamContext,
    Path(tag_id): Path<String>,
    Json(request): Json<UpdateTagRequest>,
) -> Result<Response, ApiError> {
    info!("Updating tag: {}", tag_id);

    let tag = state
        .tag_storage
        .update_tag(ctx.team_id, &tag_id, TagUpdateInput { name: request.name })
        .await?;
    Ok(ApiResponse::respond(StatusCode::OK, tag))
}

/// Delete a tag
pub async fn delete_tag(
    State(state): State<AppState>,
    ctx: TeamContext,
    Path(tag_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Deleting tag: {}", tag_id);

    state.tag_storage.delete_tag(ctx.team_id, &tag_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Tags attached to an action
pub async fn list_action_tags(
    State(state): State<AppState>,
    ctx: TeamContext,
    Path(action_id): Path<i64>,
) -> Result<Response, ApiError> {
    let tags = state
        .tag_storage
        .list_tags_for_object(ctx.team_id, TaggedObject::Action(action_id))
        .await?;
    Ok(ApiResponse::respond(StatusCode::OK, tags))
}

/// Request body for tagging an object by tag name
#[derive(Deserialize)]
pub struct TagObjectRequest {
    pub tag: String,
}

/// Attach a tag to an action, creating the tag if needed
pub async fn tag_action(
    State(state): State<AppState>,
    ctx: TeamContext,
    Path(action_id): Path<i64>,
    Json(request): Json<TagObjectRequest>,
) -> Result<Response, ApiError> {
    info!("Tagging action {} with '{}'", action_id, request.tag);

    let item = state
        .tag_storage
        .tag_object(ctx.team_id, &request.tag, TaggedObject::Action(action_id))
        .await?;
    Ok(ApiResponse::respond(StatusCode::OK, item))
}

/// Detach a tag from an action
pub async fn untag_action(
    State(state): State<AppState>,
    ctx: TeamContext,
    Path((action_id, tag_id)): Path<(i64, String)>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Removing tag {} from action {}", tag_id, action_id);

    state
        .tag_storage
        .untag_object(ctx.team_id, &tag_id, TaggedObject::Action(action_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
