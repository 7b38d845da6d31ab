//! Shot handlers: edits, reordering, frame generation, middle frames,
//! and the mock video render.

use std::time::Duration;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use director_core::asset::{Asset, AssetKind, AssetStatus};
use director_core::error::CoreError;
use director_core::project::Project;
use director_core::prompt::{self, AssetReference};
use director_core::segment::MoveDirection;
use director_core::shot::{self, FrameSlot};
use director_core::types::Id;
use director_comfyui::GenerationRequest;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

use super::{load_project, persist_project};

/// Placeholder clip resolved by the mock video render.
const PLACEHOLDER_CLIP_URL: &str = "https://www.w3schools.com/html/mov_bbb.mp4";

/// Artificial latency of the mock video render.
const VIDEO_RENDER_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Deserialize)]
pub struct UpdateShotRequest {
    pub visual_prompt: Option<String>,
    pub assigned_asset_ids: Option<Vec<Id>>,
    pub voice_asset_id: Option<Id>,
    pub transition_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateFrameRequest {
    pub slot: FrameSlot,
}

#[derive(Debug, Deserialize)]
pub struct MoveShotRequest {
    pub direction: MoveDirection,
}

#[derive(Debug, Deserialize)]
pub struct MiddleFrameRequest {
    pub url: String,
}

/// PUT /projects/{id}/segments/{segment_id}/shots/{shot_id}
pub async fn update_shot(
    State(state): State<AppState>,
    Path((project_id, segment_id, shot_id)): Path<(String, String, String)>,
    Json(input): Json<UpdateShotRequest>,
) -> AppResult<Json<DataResponse<Project>>> {
    let mut project = load_project(&state.pool, &project_id).await?;
    {
        let shot = project.segment_mut(&segment_id)?.shot_mut(&shot_id)?;
        if let Some(prompt) = input.visual_prompt {
            shot.visual_prompt = prompt;
        }
        if let Some(ids) = input.assigned_asset_ids {
            shot.assigned_asset_ids = ids;
        }
        if let Some(voice) = input.voice_asset_id {
            shot.voice_asset_id = Some(voice);
        }
        if let Some(transition) = input.transition_type {
            shot.transition_type = Some(transition);
        }
    }
    project.touch();
    persist_project(&state.pool, &project).await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /projects/{id}/segments/{segment_id}/shots/{shot_id}/move
///
/// Single-step reorder; boundary moves are no-ops.
pub async fn move_shot(
    State(state): State<AppState>,
    Path((project_id, segment_id, shot_id)): Path<(String, String, String)>,
    Json(input): Json<MoveShotRequest>,
) -> AppResult<Json<DataResponse<Project>>> {
    let mut project = load_project(&state.pool, &project_id).await?;
    project
        .segment_mut(&segment_id)?
        .move_shot(&shot_id, input.direction)?;
    project.touch();
    persist_project(&state.pool, &project).await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /projects/{id}/segments/{segment_id}/shots/{shot_id}/frames
///
/// Generate a start or end frame. End frames are image-to-image from
/// the start frame and require one to exist. A failed call reverts the
/// shot to pending (shots have no error state).
pub async fn generate_frame(
    State(state): State<AppState>,
    Path((project_id, segment_id, shot_id)): Path<(String, String, String)>,
    Json(input): Json<GenerateFrameRequest>,
) -> AppResult<Json<DataResponse<Project>>> {
    let mut project = load_project(&state.pool, &project_id).await?;
    {
        let shot = project.segment_mut(&segment_id)?.shot_mut(&shot_id)?;
        if input.slot == FrameSlot::End && shot.image_url.is_none() {
            return Err(AppError::Core(CoreError::Validation(
                "generate the start frame before the end frame".to_string(),
            )));
        }
        shot.begin_generation()?;
    }
    project.touch();
    persist_project(&state.pool, &project).await?;

    let request = build_frame_request(&project, &segment_id, &shot_id, input.slot)?;
    let result = state.generation.generate_image(&request).await;

    // Reload before applying the outcome: whichever response settles
    // last wins over anything written in the meantime.
    let mut project = load_project(&state.pool, &project_id).await?;
    let shot = project.segment_mut(&segment_id)?.shot_mut(&shot_id)?;
    match result {
        Ok(url) => {
            shot.finish_frame(input.slot, url);
            project.touch();
            persist_project(&state.pool, &project).await?;
            Ok(Json(DataResponse { data: project }))
        }
        Err(e) => {
            shot.revert_pending();
            project.touch();
            persist_project(&state.pool, &project).await?;
            Err(e.into())
        }
    }
}

/// POST /projects/{id}/segments/{segment_id}/shots/{shot_id}/middle-frames
///
/// Append a middle frame (append-only).
pub async fn add_middle_frame(
    State(state): State<AppState>,
    Path((project_id, segment_id, shot_id)): Path<(String, String, String)>,
    Json(input): Json<MiddleFrameRequest>,
) -> AppResult<Json<DataResponse<Project>>> {
    let mut project = load_project(&state.pool, &project_id).await?;
    project
        .segment_mut(&segment_id)?
        .shot_mut(&shot_id)?
        .push_middle_frame(input.url);
    project.touch();
    persist_project(&state.pool, &project).await?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /projects/{id}/segments/{segment_id}/shots/{shot_id}/middle-frames/{index}
pub async fn remove_middle_frame(
    State(state): State<AppState>,
    Path((project_id, segment_id, shot_id, index)): Path<(String, String, String, usize)>,
) -> AppResult<Json<DataResponse<Project>>> {
    let mut project = load_project(&state.pool, &project_id).await?;
    project
        .segment_mut(&segment_id)?
        .shot_mut(&shot_id)?
        .remove_middle_frame(index)?;
    project.touch();
    persist_project(&state.pool, &project).await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /projects/{id}/segments/{segment_id}/shots/{shot_id}/video
///
/// Mock video render: resolves a fixed placeholder clip after an
/// artificial delay.
pub async fn generate_video(
    State(state): State<AppState>,
    Path((project_id, segment_id, shot_id)): Path<(String, String, String)>,
) -> AppResult<Json<DataResponse<Project>>> {
    // Validate the shot exists before pretending to render.
    let project = load_project(&state.pool, &project_id).await?;
    project.segment(&segment_id)?.shot(&shot_id)?;

    tokio::time::sleep(VIDEO_RENDER_DELAY).await;

    let mut project = load_project(&state.pool, &project_id).await?;
    project
        .segment_mut(&segment_id)?
        .shot_mut(&shot_id)?
        .set_video(PLACEHOLDER_CLIP_URL);
    project.touch();
    persist_project(&state.pool, &project).await?;
    Ok(Json(DataResponse { data: project }))
}

/// Assemble the generation request for a shot frame: resolve relevant
/// assets (explicit assignment, then name matching), collect locked
/// visual references and LoRA tags, and compose the styled prompts.
fn build_frame_request(
    project: &Project,
    segment_id: &str,
    shot_id: &str,
    slot: FrameSlot,
) -> Result<GenerationRequest, AppError> {
    let shot = project.segment(segment_id)?.shot(shot_id)?;
    let relevant = shot::relevant_assets(shot, &project.assets);

    let references: Vec<AssetReference> = relevant
        .iter()
        .filter(|a| {
            matches!(a.kind, AssetKind::Character | AssetKind::Scene)
                && a.status == AssetStatus::Locked
                && a.reference_image.is_some()
        })
        .map(|a| AssetReference::from_asset(a))
        .collect();

    let model_assets: Vec<&Asset> = relevant
        .iter()
        .filter(|a| a.kind == AssetKind::Model && a.local_path.is_some())
        .copied()
        .collect();
    let lora = prompt::lora_tags(&model_assets, &project.art_style);

    Ok(GenerationRequest {
        prompt: prompt::shot_prompt(&project.art_style, &lora, &shot.visual_prompt),
        negative_prompt: prompt::shot_negative_prompt(&project.art_style),
        seed: None,
        references,
        input_image: match slot {
            FrameSlot::End => shot.image_url.clone(),
            FrameSlot::Start => None,
        },
    })
}
