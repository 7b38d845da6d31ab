//! Route definitions for parsing-rule management.

use axum::routing::get;
use axum::Router;

use crate::handlers::parsing_rules;
use crate::state::AppState;

/// ```text
/// GET    /      -> list_rules
/// POST   /      -> create_rule
/// PUT    /{id}  -> update_rule
/// DELETE /{id}  -> delete_rule (confirmation-gated)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(parsing_rules::list_rules).post(parsing_rules::create_rule),
        )
        .route(
            "/{id}",
            axum::routing::put(parsing_rules::update_rule).delete(parsing_rules::delete_rule),
        )
}
