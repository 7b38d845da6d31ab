//! Row types for the `projects` and `project_metadata` tables.

use director_core::project::ProjectSummary;
use sqlx::FromRow;

/// One row of the redundant summary table.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectMetadataRow {
    pub id: String,
    pub title: String,
    pub shot_count: i64,
    pub cover_image: Option<String>,
    pub art_style_label: Option<String>,
    pub last_modified: chrono::DateTime<chrono::Utc>,
}

impl From<ProjectMetadataRow> for ProjectSummary {
    fn from(row: ProjectMetadataRow) -> Self {
        ProjectSummary {
            id: row.id,
            title: row.title,
            last_modified: row.last_modified,
            shot_count: row.shot_count,
            cover_image: row.cover_image,
            art_style_label: row.art_style_label,
        }
    }
}
