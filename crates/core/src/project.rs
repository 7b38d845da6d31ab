//! The project aggregate root.
//!
//! A project owns an art style (fixed at creation), a flat asset list,
//! and an ordered list of script segments. Every mutation flows through
//! a transition method here; the API layer loads a project document,
//! applies one transition, and persists the result.
//!
//! No relational integrity is enforced across ids: deleting an asset
//! does not prune shot-to-asset references.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::art_style::ArtStyle;
use crate::asset::{self, Asset, AssetKind, AssetStatus};
use crate::error::CoreError;
use crate::segment::ScriptSegment;
use crate::types::{new_id, Id, Timestamp};

/// The aggregate root owning assets and segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Id,
    pub title: String,
    pub directory_path: String,
    pub created_at: Timestamp,
    pub last_modified: Timestamp,
    /// Fixed at creation; updates that change it are rejected.
    pub art_style: ArtStyle,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgm_asset_id: Option<Id>,
    #[serde(default)]
    pub segments: Vec<ScriptSegment>,
}

impl Project {
    /// Create a project with one seeded chapter and no assets.
    pub fn create(title: impl Into<String>, art_style: ArtStyle) -> Result<Self, CoreError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CoreError::Validation("project title must not be empty".to_string()));
        }
        let now = Utc::now();
        Ok(Self {
            directory_path: format!("Local/{title}"),
            id: new_id(),
            title,
            created_at: now,
            last_modified: now,
            art_style,
            assets: Vec::new(),
            bgm_asset_id: None,
            segments: vec![ScriptSegment::first_chapter()],
        })
    }

    /// Refresh the modification timestamp.
    pub fn touch(&mut self) {
        self.last_modified = Utc::now();
    }

    /// Replace this project with a whole-document update.
    ///
    /// The id, creation time, and art style survive the overwrite; an
    /// update carrying a different art style is a conflict.
    pub fn apply_update(&mut self, update: Project) -> Result<(), CoreError> {
        if update.id != self.id {
            return Err(CoreError::Validation(format!(
                "document id {} does not match project {}",
                update.id, self.id
            )));
        }
        if update.art_style != self.art_style {
            return Err(CoreError::Conflict(
                "the art style is fixed at project creation and cannot be changed".to_string(),
            ));
        }
        let created_at = self.created_at;
        *self = update;
        self.created_at = created_at;
        self.touch();
        Ok(())
    }

    // -- lookups -------------------------------------------------------------

    pub fn segment(&self, segment_id: &str) -> Result<&ScriptSegment, CoreError> {
        self.segments
            .iter()
            .find(|s| s.id == segment_id)
            .ok_or_else(|| CoreError::not_found("segment", segment_id))
    }

    pub fn segment_mut(&mut self, segment_id: &str) -> Result<&mut ScriptSegment, CoreError> {
        self.segments
            .iter_mut()
            .find(|s| s.id == segment_id)
            .ok_or_else(|| CoreError::not_found("segment", segment_id))
    }

    pub fn asset(&self, asset_id: &str) -> Result<&Asset, CoreError> {
        self.assets
            .iter()
            .find(|a| a.id == asset_id)
            .ok_or_else(|| CoreError::not_found("asset", asset_id))
    }

    pub fn asset_mut(&mut self, asset_id: &str) -> Result<&mut Asset, CoreError> {
        self.assets
            .iter_mut()
            .find(|a| a.id == asset_id)
            .ok_or_else(|| CoreError::not_found("asset", asset_id))
    }

    // -- transitions ---------------------------------------------------------

    /// Append a new numbered chapter and return its id.
    pub fn add_segment(&mut self) -> Id {
        let segment = ScriptSegment::numbered_chapter(self.segments.len() + 1);
        let id = segment.id.clone();
        self.segments.push(segment);
        self.touch();
        id
    }

    /// Add a manually created asset with a unique auto-numbered name.
    pub fn add_manual_asset(&mut self, kind: AssetKind) -> Id {
        let name = asset::unique_manual_name(&self.assets, kind);
        let asset = Asset::manual(name, kind);
        let id = asset.id.clone();
        self.assets.push(asset);
        self.touch();
        id
    }

    /// Merge extracted assets into the asset list (existing names win).
    /// Returns how many were added.
    pub fn merge_extracted_assets(&mut self, incoming: Vec<Asset>) -> usize {
        let added = asset::merge_by_name(&mut self.assets, incoming);
        if added > 0 {
            self.touch();
        }
        added
    }

    /// Save a shot's frame as a new locked scene asset.
    pub fn add_asset_from_shot(&mut self, frame_url: &str) -> Result<Id, CoreError> {
        if frame_url.is_empty() {
            return Err(CoreError::Validation("frame url must not be empty".to_string()));
        }
        let mut counter = self.assets.len() + 1;
        let mut name = format!("Shot_Asset_{counter}");
        while self.assets.iter().any(|a| a.name == name) {
            counter += 1;
            name = format!("Shot_Asset_{counter}");
        }
        let mut asset = Asset::manual(name, AssetKind::Scene);
        asset.description = "Created from storyboard".to_string();
        asset.tags = vec!["FromShot".to_string()];
        asset.reference_image = Some(frame_url.to_string());
        asset.status = AssetStatus::Locked;
        let id = asset.id.clone();
        self.assets.push(asset);
        self.touch();
        Ok(id)
    }

    /// Remove an asset by id. Shot references to the id are left in
    /// place (known gap).
    pub fn remove_asset(&mut self, asset_id: &str) -> Result<Asset, CoreError> {
        let index = self
            .assets
            .iter()
            .position(|a| a.id == asset_id)
            .ok_or_else(|| CoreError::not_found("asset", asset_id))?;
        let removed = self.assets.remove(index);
        self.touch();
        Ok(removed)
    }

    // -- summary -------------------------------------------------------------

    /// Total shots across all segments.
    pub fn shot_count(&self) -> i64 {
        self.segments.iter().map(|s| s.shots.len() as i64).sum()
    }

    /// The first start frame found across segments, if any.
    pub fn first_frame_url(&self) -> Option<String> {
        self.segments
            .iter()
            .flat_map(|seg| seg.shots.iter())
            .find_map(|shot| shot.image_url.clone())
    }

    /// Build the redundant metadata summary stored next to the document.
    ///
    /// An already-set cover image is kept; otherwise the first available
    /// start frame is promoted.
    pub fn summarize(&self, existing_cover: Option<String>) -> ProjectSummary {
        ProjectSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            last_modified: self.last_modified,
            shot_count: self.shot_count(),
            cover_image: existing_cover.or_else(|| self.first_frame_url()),
            art_style_label: Some(self.art_style.label.clone()),
        }
    }
}

/// The redundant per-project summary row, recomputed on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: Id,
    pub title: String,
    pub last_modified: Timestamp,
    pub shot_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art_style_label: Option<String>,
}
