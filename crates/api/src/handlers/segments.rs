//! Segment handlers, including the analyze orchestration.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use director_core::error::CoreError;
use director_core::project::Project;
use director_db::repositories::ParsingRuleRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

use super::{load_project, persist_project};

/// Request body for updating a segment's name or script text.
#[derive(Debug, Deserialize)]
pub struct UpdateSegmentRequest {
    pub name: Option<String>,
    pub script_raw: Option<String>,
}

/// Request body for the analyze step.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub script_text: String,
    /// Parsing rule to apply; the default rule when absent.
    pub rule_id: Option<String>,
}

/// POST /projects/{id}/segments
///
/// Append a new numbered chapter.
pub async fn create_segment(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let mut project = load_project(&state.pool, &project_id).await?;
    project.add_segment();
    persist_project(&state.pool, &project).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// PUT /projects/{id}/segments/{segment_id}
pub async fn update_segment(
    State(state): State<AppState>,
    Path((project_id, segment_id)): Path<(String, String)>,
    Json(input): Json<UpdateSegmentRequest>,
) -> AppResult<Json<DataResponse<Project>>> {
    let mut project = load_project(&state.pool, &project_id).await?;
    project
        .segment_mut(&segment_id)?
        .update(input.name, input.script_raw);
    project.touch();
    persist_project(&state.pool, &project).await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /projects/{id}/segments/{segment_id}/analyze
///
/// The full parsing pass: persist the raw script, send it to the
/// language model with the chosen rule's instruction, replace the
/// segment's shots wholesale, and merge the extracted assets into the
/// project list (existing names win).
pub async fn analyze_segment(
    State(state): State<AppState>,
    Path((project_id, segment_id)): Path<(String, String)>,
    Json(input): Json<AnalyzeRequest>,
) -> AppResult<Json<DataResponse<Project>>> {
    if input.script_text.trim().is_empty() {
        return Err(AppError::BadRequest("script text must not be empty".to_string()));
    }

    // Save the raw script before invoking analysis, so the text
    // survives an analysis failure.
    let mut project = load_project(&state.pool, &project_id).await?;
    project
        .segment_mut(&segment_id)?
        .update(None, Some(input.script_text.clone()));
    project.touch();
    persist_project(&state.pool, &project).await?;

    let rule = resolve_rule(&state, input.rule_id.as_deref()).await?;
    tracing::info!(
        project_id = %project_id,
        segment_id = %segment_id,
        rule_id = %rule.id,
        "Analyzing segment script",
    );

    let analysis = state
        .analysis
        .parse(&input.script_text, Some(&rule.system_instruction))
        .await?;

    let segment = project.segment_mut(&segment_id)?;
    let segment_name = segment.name.clone();
    segment.replace_shots(analysis.to_shots());
    let added = project.merge_extracted_assets(analysis.to_assets(&segment_id, &segment_name));
    project.touch();
    persist_project(&state.pool, &project).await?;

    tracing::info!(
        project_id = %project_id,
        shots = analysis.shots.len(),
        assets_added = added,
        "Segment analysis applied",
    );
    Ok(Json(DataResponse { data: project }))
}

async fn resolve_rule(
    state: &AppState,
    rule_id: Option<&str>,
) -> AppResult<director_core::parsing_rule::ParsingRule> {
    match rule_id {
        Some(id) => ParsingRuleRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::not_found("parsing rule", id))),
        None => {
            // Listing seeds the default rule on first run.
            let rules = ParsingRuleRepo::list(&state.pool).await?;
            rules
                .into_iter()
                .find(|r| r.is_default)
                .ok_or_else(|| AppError::InternalError("no default parsing rule".to_string()))
        }
    }
}
