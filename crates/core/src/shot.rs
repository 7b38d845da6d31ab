//! Shots: single storyboard units with script text, generated frames,
//! and an optional video clip.
//!
//! The status lifecycle is `Pending -> Generating -> Done`. There is no
//! error state: a failed generation call reverts the shot to `Pending`.

use serde::{Deserialize, Serialize};

use crate::asset::Asset;
use crate::error::CoreError;
use crate::types::{new_id, Id};

/// Shot lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotStatus {
    Pending,
    Generating,
    Done,
}

/// Which frame of a shot a generation call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameSlot {
    Start,
    End,
}

/// One storyboard unit within a script segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub id: Id,
    /// Render order within the segment.
    pub sequence: i32,
    pub script_content: String,
    pub visual_prompt: String,
    pub shot_type: String,
    pub camera_movement: String,
    #[serde(default)]
    pub assigned_asset_ids: Vec<Id>,
    pub status: ShotStatus,
    /// Start frame URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Append-only middle frames; no ordering invariant is enforced.
    #[serde(default)]
    pub middle_frame_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_frame_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_asset_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_type: Option<String>,
}

impl Shot {
    /// Create a pending shot with the given sequence number.
    pub fn new(sequence: i32, script_content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            sequence,
            script_content: script_content.into(),
            visual_prompt: String::new(),
            shot_type: String::new(),
            camera_movement: String::new(),
            assigned_asset_ids: Vec::new(),
            status: ShotStatus::Pending,
            image_url: None,
            middle_frame_urls: Vec::new(),
            end_frame_url: None,
            video_url: None,
            audio_url: None,
            voice_asset_id: None,
            transition_type: None,
        }
    }

    // -- transitions --------------------------------------------------------

    /// Enter `Generating`. Regeneration of an already-done shot is
    /// allowed; a shot that is currently generating is not re-entered.
    pub fn begin_generation(&mut self) -> Result<(), CoreError> {
        if self.status == ShotStatus::Generating {
            return Err(CoreError::Conflict(format!(
                "shot {} is already generating",
                self.sequence
            )));
        }
        self.status = ShotStatus::Generating;
        Ok(())
    }

    /// Record a finished frame in the given slot and mark the shot done.
    pub fn finish_frame(&mut self, slot: FrameSlot, url: impl Into<String>) {
        match slot {
            FrameSlot::Start => self.image_url = Some(url.into()),
            FrameSlot::End => self.end_frame_url = Some(url.into()),
        }
        self.status = ShotStatus::Done;
    }

    /// Revert to `Pending` after a failed generation call. Silent by
    /// design: shots carry no error state.
    pub fn revert_pending(&mut self) {
        self.status = ShotStatus::Pending;
    }

    /// Append a middle frame. Middle frames are append-only.
    pub fn push_middle_frame(&mut self, url: impl Into<String>) {
        self.middle_frame_urls.push(url.into());
    }

    /// Remove a middle frame by index.
    pub fn remove_middle_frame(&mut self, index: usize) -> Result<(), CoreError> {
        if index >= self.middle_frame_urls.len() {
            return Err(CoreError::Validation(format!(
                "middle frame index {index} out of range (len {})",
                self.middle_frame_urls.len()
            )));
        }
        self.middle_frame_urls.remove(index);
        Ok(())
    }

    /// Attach a rendered video clip.
    pub fn set_video(&mut self, url: impl Into<String>) {
        self.video_url = Some(url.into());
    }
}

/// Resolve the assets relevant to a shot.
///
/// Explicit assignments win; when the shot has none, assets whose name
/// appears in the shot's script content are matched instead. Freshly
/// parsed shots have no assignments, so the name fallback is what keeps
/// them usable.
pub fn relevant_assets<'a>(shot: &Shot, assets: &'a [Asset]) -> Vec<&'a Asset> {
    let assigned: Vec<&Asset> = assets
        .iter()
        .filter(|a| shot.assigned_asset_ids.contains(&a.id))
        .collect();
    if !assigned.is_empty() {
        return assigned;
    }
    assets
        .iter()
        .filter(|a| !a.name.is_empty() && shot.script_content.contains(&a.name))
        .collect()
}
