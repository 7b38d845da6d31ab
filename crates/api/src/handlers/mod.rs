//! Handler functions for all API resources.

pub mod art_styles;
pub mod assets;
pub mod parsing_rules;
pub mod projects;
pub mod segments;
pub mod shots;

use director_core::confirmation::Confirmation;
use director_core::error::CoreError;
use director_core::project::Project;
use director_db::repositories::ProjectRepo;
use director_db::DbPool;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Query string for confirmation-gated destructive endpoints
/// (`?confirm=true`).
#[derive(Debug, Deserialize)]
pub struct ConfirmQuery {
    #[serde(default)]
    pub confirm: bool,
}

impl ConfirmQuery {
    pub fn confirmation(&self) -> Confirmation {
        Confirmation::from_flag(self.confirm)
    }
}

/// Load a project document or fail with 404.
pub(crate) async fn load_project(pool: &DbPool, id: &str) -> AppResult<Project> {
    ProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("project", id)))
}

/// Persist an updated project document, failing with 404 when the
/// document disappeared underneath us.
pub(crate) async fn persist_project(pool: &DbPool, project: &Project) -> AppResult<()> {
    if !ProjectRepo::update(pool, project).await? {
        return Err(AppError::Core(CoreError::not_found(
            "project",
            project.id.clone(),
        )));
    }
    Ok(())
}
