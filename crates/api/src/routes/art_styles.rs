//! Route definitions for art-style presets.

use axum::routing::get;
use axum::Router;

use crate::handlers::art_styles;
use crate::state::AppState;

/// ```text
/// GET / -> list_art_styles
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(art_styles::list_art_styles))
}
