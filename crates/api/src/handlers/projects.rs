//! Project CRUD handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use director_core::art_style::{self, ArtStyle};
use director_core::confirmation;
use director_core::error::CoreError;
use director_core::project::{Project, ProjectSummary};
use director_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

use super::{load_project, persist_project, ConfirmQuery};

/// Request body for project creation.
///
/// The art style is chosen from the built-in presets by id, or supplied
/// in full for a custom style. It cannot be changed afterwards.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub art_style_id: Option<String>,
    pub art_style: Option<ArtStyle>,
}

/// GET /projects
///
/// List project summaries, most recently modified first.
pub async fn list_projects(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ProjectSummary>>>> {
    let summaries = ProjectRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: summaries }))
}

/// POST /projects
///
/// Create a project. Seeds exactly one segment and zero assets.
pub async fn create_project(
    State(state): State<AppState>,
    Json(input): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let style = resolve_style(&input)?;
    let project = Project::create(input.title, style)?;
    ProjectRepo::create(&state.pool, &project).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /projects/{id}
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = load_project(&state.pool, &id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /projects/{id}
///
/// Whole-document update. The stored art style is immutable; an update
/// carrying a different style is rejected.
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(document): Json<Project>,
) -> AppResult<Json<DataResponse<Project>>> {
    let mut project = load_project(&state.pool, &id).await?;
    project.apply_update(document)?;
    persist_project(&state.pool, &project).await?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /projects/{id}?confirm=true
///
/// Confirmation-gated; there is no undo.
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ConfirmQuery>,
) -> AppResult<StatusCode> {
    confirmation::require_confirmed(query.confirmation(), "deleting a project")?;

    if !ProjectRepo::delete(&state.pool, &id).await? {
        return Err(AppError::Core(CoreError::not_found("project", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn resolve_style(input: &CreateProjectRequest) -> Result<ArtStyle, AppError> {
    if let Some(style) = &input.art_style {
        return Ok(style.clone());
    }
    match &input.art_style_id {
        Some(id) => art_style::find_builtin(id)
            .ok_or_else(|| AppError::Core(CoreError::not_found("art style", id.clone()))),
        // The first preset is the creation wizard's default selection.
        None => Ok(art_style::builtin_styles().remove(0)),
    }
}
