//! Art-style preset handler.

use axum::Json;

use director_core::art_style::{builtin_styles, ArtStyle};

use crate::error::AppResult;
use crate::response::DataResponse;

/// GET /art-styles
///
/// The built-in presets offered at project creation.
pub async fn list_art_styles() -> AppResult<Json<DataResponse<Vec<ArtStyle>>>> {
    Ok(Json(DataResponse {
        data: builtin_styles(),
    }))
}
