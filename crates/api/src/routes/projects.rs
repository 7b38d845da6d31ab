//! Route definitions for projects and their nested segments, shots,
//! and assets.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{assets, projects, segments, shots};
use crate::state::AppState;

/// ```text
/// GET    /                                    -> list_projects
/// POST   /                                    -> create_project
/// GET    /{id}                                -> get_project
/// PUT    /{id}                                -> update_project
/// DELETE /{id}                                -> delete_project (confirmation-gated)
///
/// POST   /{id}/segments                       -> create_segment
/// PUT    /{id}/segments/{sid}                 -> update_segment
/// POST   /{id}/segments/{sid}/analyze         -> analyze_segment
///
/// PUT    /{id}/segments/{sid}/shots/{shot}                  -> update_shot
/// POST   /{id}/segments/{sid}/shots/{shot}/frames           -> generate_frame
/// POST   /{id}/segments/{sid}/shots/{shot}/move             -> move_shot
/// POST   /{id}/segments/{sid}/shots/{shot}/video            -> generate_video
/// POST   /{id}/segments/{sid}/shots/{shot}/middle-frames    -> add_middle_frame
/// DELETE /{id}/segments/{sid}/shots/{shot}/middle-frames/{i}-> remove_middle_frame
///
/// POST   /{id}/assets                         -> create_asset
/// POST   /{id}/assets/from-shot               -> asset_from_shot
/// PUT    /{id}/assets/{aid}                   -> update_asset
/// DELETE /{id}/assets/{aid}                   -> delete_asset (confirmation-gated)
/// POST   /{id}/assets/{aid}/generate          -> generate_asset
/// POST   /{id}/assets/{aid}/select            -> select_candidate
/// POST   /{id}/assets/{aid}/unlock            -> unlock_asset (confirmation-gated)
/// POST   /{id}/assets/{aid}/media             -> attach_media
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/{id}",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        // Segments.
        .route("/{id}/segments", post(segments::create_segment))
        .route(
            "/{id}/segments/{segment_id}",
            put(segments::update_segment),
        )
        .route(
            "/{id}/segments/{segment_id}/analyze",
            post(segments::analyze_segment),
        )
        // Shots.
        .route(
            "/{id}/segments/{segment_id}/shots/{shot_id}",
            put(shots::update_shot),
        )
        .route(
            "/{id}/segments/{segment_id}/shots/{shot_id}/frames",
            post(shots::generate_frame),
        )
        .route(
            "/{id}/segments/{segment_id}/shots/{shot_id}/move",
            post(shots::move_shot),
        )
        .route(
            "/{id}/segments/{segment_id}/shots/{shot_id}/video",
            post(shots::generate_video),
        )
        .route(
            "/{id}/segments/{segment_id}/shots/{shot_id}/middle-frames",
            post(shots::add_middle_frame),
        )
        .route(
            "/{id}/segments/{segment_id}/shots/{shot_id}/middle-frames/{index}",
            delete(shots::remove_middle_frame),
        )
        // Assets.
        .route("/{id}/assets", post(assets::create_asset))
        .route("/{id}/assets/from-shot", post(assets::asset_from_shot))
        .route(
            "/{id}/assets/{asset_id}",
            put(assets::update_asset).delete(assets::delete_asset),
        )
        .route(
            "/{id}/assets/{asset_id}/generate",
            post(assets::generate_asset),
        )
        .route(
            "/{id}/assets/{asset_id}/select",
            post(assets::select_candidate),
        )
        .route(
            "/{id}/assets/{asset_id}/unlock",
            post(assets::unlock_asset),
        )
        .route(
            "/{id}/assets/{asset_id}/media",
            post(assets::attach_media),
        )
}
