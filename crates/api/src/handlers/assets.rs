//! Asset handlers: CRUD, candidate generation, selection, unlock,
//! media attachment, and asset-from-shot.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use director_core::asset::AssetKind;
use director_core::confirmation;
use director_core::project::Project;
use director_core::prompt::CANDIDATE_NEGATIVE_PROMPT;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

use super::{load_project, persist_project, ConfirmQuery};

#[derive(Debug, Deserialize)]
pub struct CreateAssetRequest {
    pub kind: AssetKind,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAssetRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub visual_prompt: Option<String>,
    pub tags: Option<Vec<String>>,
    pub trigger_words: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectCandidateRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct AttachMediaRequest {
    pub url: String,
    pub file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssetFromShotRequest {
    pub url: String,
}

/// POST /projects/{id}/assets
///
/// Create a manual asset with a unique auto-numbered name.
pub async fn create_asset(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(input): Json<CreateAssetRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let mut project = load_project(&state.pool, &project_id).await?;
    project.add_manual_asset(input.kind);
    persist_project(&state.pool, &project).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// PUT /projects/{id}/assets/{asset_id}
pub async fn update_asset(
    State(state): State<AppState>,
    Path((project_id, asset_id)): Path<(String, String)>,
    Json(input): Json<UpdateAssetRequest>,
) -> AppResult<Json<DataResponse<Project>>> {
    let mut project = load_project(&state.pool, &project_id).await?;
    {
        let asset = project.asset_mut(&asset_id)?;
        if let Some(name) = input.name {
            asset.name = name;
        }
        if let Some(description) = input.description {
            asset.description = description;
        }
        if let Some(prompt) = input.visual_prompt {
            asset.visual_prompt = prompt;
        }
        if let Some(tags) = input.tags {
            asset.tags = tags;
        }
        if let Some(words) = input.trigger_words {
            asset.trigger_words = Some(words);
        }
        asset.validate()?;
    }
    project.touch();
    persist_project(&state.pool, &project).await?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /projects/{id}/assets/{asset_id}?confirm=true
///
/// Confirmation-gated. Shot references to the asset are not pruned.
pub async fn delete_asset(
    State(state): State<AppState>,
    Path((project_id, asset_id)): Path<(String, String)>,
    Query(query): Query<ConfirmQuery>,
) -> AppResult<Json<DataResponse<Project>>> {
    confirmation::require_confirmed(query.confirmation(), "deleting an asset")?;

    let mut project = load_project(&state.pool, &project_id).await?;
    project.remove_asset(&asset_id)?;
    persist_project(&state.pool, &project).await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /projects/{id}/assets/{asset_id}/generate
///
/// Generate a candidate batch for a visual asset. The asset is
/// persisted as `Generating` for the duration of the batch; success
/// stages the candidates, failure marks the asset `Error`.
pub async fn generate_asset(
    State(state): State<AppState>,
    Path((project_id, asset_id)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<Project>>> {
    let mut project = load_project(&state.pool, &project_id).await?;
    let prompt = {
        let asset = project.asset_mut(&asset_id)?;
        asset.begin_generation()?;
        asset.visual_prompt.clone()
    };
    project.touch();
    persist_project(&state.pool, &project).await?;

    let result = state
        .generation
        .generate_candidates(&prompt, CANDIDATE_NEGATIVE_PROMPT)
        .await;

    // Reload before applying the outcome: whichever response settles
    // last wins over anything written in the meantime.
    let mut project = load_project(&state.pool, &project_id).await?;
    match result {
        Ok((urls, base_seed)) => {
            project.asset_mut(&asset_id)?.finish_generation(urls, base_seed)?;
            project.touch();
            persist_project(&state.pool, &project).await?;
            Ok(Json(DataResponse { data: project }))
        }
        Err(e) => {
            if let Ok(asset) = project.asset_mut(&asset_id) {
                if asset.fail_generation().is_ok() {
                    project.touch();
                    persist_project(&state.pool, &project).await?;
                }
            }
            Err(e.into())
        }
    }
}

/// POST /projects/{id}/assets/{asset_id}/select
///
/// Lock the asset to one of its staged candidates.
pub async fn select_candidate(
    State(state): State<AppState>,
    Path((project_id, asset_id)): Path<(String, String)>,
    Json(input): Json<SelectCandidateRequest>,
) -> AppResult<Json<DataResponse<Project>>> {
    let mut project = load_project(&state.pool, &project_id).await?;
    project.asset_mut(&asset_id)?.select_candidate(&input.url)?;
    project.touch();
    persist_project(&state.pool, &project).await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /projects/{id}/assets/{asset_id}/unlock?confirm=true
///
/// Confirmation-gated: discards the media reference and returns the
/// asset to `Pending`.
pub async fn unlock_asset(
    State(state): State<AppState>,
    Path((project_id, asset_id)): Path<(String, String)>,
    Query(query): Query<ConfirmQuery>,
) -> AppResult<Json<DataResponse<Project>>> {
    confirmation::require_confirmed(query.confirmation(), "unlocking an asset")?;

    let mut project = load_project(&state.pool, &project_id).await?;
    project.asset_mut(&asset_id)?.unlock()?;
    project.touch();
    persist_project(&state.pool, &project).await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /projects/{id}/assets/{asset_id}/media
///
/// Attach an uploaded media URL (audio for music/voice, image for
/// visual kinds, model file for LoRA assets).
pub async fn attach_media(
    State(state): State<AppState>,
    Path((project_id, asset_id)): Path<(String, String)>,
    Json(input): Json<AttachMediaRequest>,
) -> AppResult<Json<DataResponse<Project>>> {
    let mut project = load_project(&state.pool, &project_id).await?;
    project
        .asset_mut(&asset_id)?
        .attach_media(input.url, input.file_name)?;
    project.touch();
    persist_project(&state.pool, &project).await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /projects/{id}/assets/from-shot
///
/// Save a shot frame as a new locked scene asset.
pub async fn asset_from_shot(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(input): Json<AssetFromShotRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let mut project = load_project(&state.pool, &project_id).await?;
    project.add_asset_from_shot(&input.url)?;
    persist_project(&state.pool, &project).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}
