// ABOUTME: HTTP API layer for Tally providing REST endpoints and routing
// ABOUTME: Integration layer over the tags, warehouse and security packages

use axum::{
    routing::{delete, get},
    Router,
};

pub mod auth;
pub mod error;
pub mod external_data_sources_handlers;
pub mod health;
pub mod response;
pub mod state;
pub mod tags_handlers;

pub use error::ApiError;
pub use state::AppState;

/// Creates the external data sources API router
pub fn create_external_data_sources_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(external_data_sources_handlers::list_sources)
                .post(external_data_sources_handlers::create_source),
        )
        .route(
            "/{id}",
            get(external_data_sources_handlers::get_source)
                .delete(external_data_sources_handlers::delete_source),
        )
}

/// Creates the tags API router
pub fn create_tags_router() -> Router<AppState> {
    Router::new()
        .route("/", get(tags_handlers::list_tags).post(tags_handlers::create_tag))
        .route(
            "/{tag_id}",
            get(tags_handlers::get_tag)
                .put(tags_handlers::update_tag)
                .delete(tags_handlers::delete_tag),
        )
}

/// Creates the actions API router (tagging endpoints)
pub fn create_actions_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{action_id}/tags",
            get(tags_handlers::list_action_tags).post(tags_handlers::tag_action),
        )
        .route(
            "/{action_id}/tags/{tag_id}",
            delete(tags_handlers::untag_action),
        )
}

/// Full API router with state applied
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .nest("/api/external_data_sources", create_external_data_sources_router())
        .nest("/api/tags", create_tags_router())
        .nest("/api/actions", create_actions_router())
        .with_state(state)
}
