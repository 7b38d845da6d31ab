//! Router definitions for all API resources.

pub mod art_styles;
pub mod health;
pub mod parsing_rules;
pub mod projects;

use axum::Router;

use crate::state::AppState;

/// All routes mounted under `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", projects::router())
        .nest("/parsing-rules", parsing_rules::router())
        .nest("/art-styles", art_styles::router())
}
