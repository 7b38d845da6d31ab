//! Repository for project documents and their summary rows.
//!
//! A project write is two independent statements: the JSONB document
//! overwrite and the summary-row recompute. A crash between them can
//! leave the two tables inconsistent; the platform accepts that window
//! instead of paying for a transaction on every save.

use director_core::project::{Project, ProjectSummary};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::project::ProjectMetadataRow;

/// Column list for `project_metadata` queries.
const METADATA_COLUMNS: &str =
    "id, title, shot_count, cover_image, art_style_label, last_modified";

/// CRUD over the project document store.
pub struct ProjectRepo;

impl ProjectRepo {
    /// List all project summaries, most recently modified first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {METADATA_COLUMNS} FROM project_metadata ORDER BY last_modified DESC"
        );
        let rows = sqlx::query_as::<_, ProjectMetadataRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(ProjectSummary::from).collect())
    }

    /// Load a full project document by id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Project>, sqlx::Error> {
        let row: Option<(Json<Project>,)> =
            sqlx::query_as("SELECT document FROM projects WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(row.map(|(doc,)| doc.0))
    }

    /// Persist a new project document and its summary row.
    pub async fn create(pool: &PgPool, project: &Project) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO projects (id, document) VALUES ($1, $2)")
            .bind(&project.id)
            .bind(Json(project))
            .execute(pool)
            .await?;

        let summary = project.summarize(None);
        Self::insert_metadata(pool, &summary).await?;

        tracing::info!(project_id = %project.id, "Project created");
        Ok(())
    }

    /// Overwrite a project document and recompute its summary row.
    ///
    /// An already-set cover image is kept; otherwise the summary scan
    /// promotes the first available start frame. Returns `false` when
    /// no document with the id exists.
    pub async fn update(pool: &PgPool, project: &Project) -> Result<bool, sqlx::Error> {
        let existing_cover: Option<String> =
            sqlx::query_scalar("SELECT cover_image FROM project_metadata WHERE id = $1")
                .bind(&project.id)
                .fetch_optional(pool)
                .await?
                .flatten();

        let result =
            sqlx::query("UPDATE projects SET document = $2, updated_at = now() WHERE id = $1")
                .bind(&project.id)
                .bind(Json(project))
                .execute(pool)
                .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        let summary = project.summarize(existing_cover);
        sqlx::query(
            "UPDATE project_metadata \
             SET title = $2, shot_count = $3, cover_image = $4, \
                 art_style_label = $5, last_modified = $6 \
             WHERE id = $1",
        )
        .bind(&summary.id)
        .bind(&summary.title)
        .bind(summary.shot_count)
        .bind(summary.cover_image.as_deref())
        .bind(summary.art_style_label.as_deref())
        .bind(summary.last_modified)
        .execute(pool)
        .await?;

        Ok(true)
    }

    /// Delete a project document and its summary row.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        sqlx::query("DELETE FROM project_metadata WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(project_id = %id, "Project deleted");
        }
        Ok(deleted)
    }

    async fn insert_metadata(pool: &PgPool, summary: &ProjectSummary) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO project_metadata \
                (id, title, shot_count, cover_image, art_style_label, last_modified) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&summary.id)
        .bind(&summary.title)
        .bind(summary.shot_count)
        .bind(summary.cover_image.as_deref())
        .bind(summary.art_style_label.as_deref())
        .bind(summary.last_modified)
        .execute(pool)
        .await?;
        Ok(())
    }
}
