//! Parsing-rule CRUD handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use director_core::confirmation;
use director_core::error::CoreError;
use director_core::parsing_rule::ParsingRule;
use director_core::types::new_id;
use director_db::repositories::ParsingRuleRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

use super::ConfirmQuery;

/// Request body for creating a rule. When no instruction is given the
/// new rule starts from the default rule's instruction.
#[derive(Debug, Deserialize)]
pub struct CreateRuleRequest {
    pub name: String,
    pub system_instruction: Option<String>,
}

/// Request body for updating a rule.
#[derive(Debug, Deserialize)]
pub struct UpdateRuleRequest {
    pub name: Option<String>,
    pub system_instruction: Option<String>,
}

/// GET /parsing-rules
///
/// Lists all rules; the default rule is seeded on first call.
pub async fn list_rules(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ParsingRule>>>> {
    let rules = ParsingRuleRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: rules }))
}

/// POST /parsing-rules
pub async fn create_rule(
    State(state): State<AppState>,
    Json(input): Json<CreateRuleRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ParsingRule>>)> {
    let system_instruction = match input.system_instruction {
        Some(instruction) => instruction,
        // Seeding the list also guarantees a default rule to copy from.
        None => {
            let rules = ParsingRuleRepo::list(&state.pool).await?;
            rules
                .into_iter()
                .find(|r| r.is_default)
                .map(|r| r.system_instruction)
                .unwrap_or_default()
        }
    };

    let rule = ParsingRule {
        id: new_id(),
        name: input.name,
        system_instruction,
        is_default: false,
    };
    rule.validate()?;
    ParsingRuleRepo::save(&state.pool, &rule).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: rule })))
}

/// PUT /parsing-rules/{id}
pub async fn update_rule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateRuleRequest>,
) -> AppResult<Json<DataResponse<ParsingRule>>> {
    let mut rule = ParsingRuleRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("parsing rule", id)))?;

    if let Some(name) = input.name {
        rule.name = name;
    }
    if let Some(instruction) = input.system_instruction {
        rule.system_instruction = instruction;
    }
    rule.validate()?;
    ParsingRuleRepo::save(&state.pool, &rule).await?;

    Ok(Json(DataResponse { data: rule }))
}

/// DELETE /parsing-rules/{id}?confirm=true
///
/// Confirmation-gated; the default rule is not deletable.
pub async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ConfirmQuery>,
) -> AppResult<StatusCode> {
    confirmation::require_confirmed(query.confirmation(), "deleting a parsing rule")?;

    let rule = ParsingRuleRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("parsing rule", id)))?;
    rule.ensure_deletable()?;

    ParsingRuleRepo::delete(&state.pool, &rule.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
