//! Assets: reusable character/scene/prop/music/voice/model entities with
//! a visual or audio reference.
//!
//! The status lifecycle is `Pending -> Generating -> (Locked | Error)`.
//! `Locked` is terminal until an explicit unlock, which discards the
//! prior media reference; `Error` is terminal until the generation is
//! re-triggered. All transitions are methods here so illegal moves are
//! rejected with a [`CoreError::Conflict`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{new_id, Id, Timestamp};

// ---------------------------------------------------------------------------
// Kind and status
// ---------------------------------------------------------------------------

/// The six supported asset kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Character,
    Scene,
    Prop,
    Music,
    Voice,
    Model,
}

impl AssetKind {
    /// Kinds whose media reference is an image.
    pub fn is_visual(self) -> bool {
        matches!(self, AssetKind::Character | AssetKind::Scene | AssetKind::Prop)
    }

    /// Kinds whose media reference is an audio URL.
    pub fn is_audio(self) -> bool {
        matches!(self, AssetKind::Music | AssetKind::Voice)
    }

    /// Display label used when auto-naming manually created assets.
    pub fn label(self) -> &'static str {
        match self {
            AssetKind::Character => "角色",
            AssetKind::Scene => "场景",
            AssetKind::Prop => "道具",
            AssetKind::Music => "音乐",
            AssetKind::Voice => "音色",
            AssetKind::Model => "模型",
        }
    }
}

/// Asset lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    Pending,
    Generating,
    Locked,
    Error,
}

// ---------------------------------------------------------------------------
// Asset
// ---------------------------------------------------------------------------

/// A record of an asset being referenced by a script segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetUsage {
    pub segment_id: Id,
    pub segment_name: String,
    pub timestamp: Timestamp,
}

/// A reusable production asset owned by a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: Id,
    pub name: String,
    pub kind: AssetKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub visual_prompt: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: AssetStatus,
    /// Resolved image reference for visual kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_image: Option<String>,
    /// Resolved audio reference for music/voice kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    /// Resolved model file reference for LoRA assets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
    /// Original file name of an imported LoRA (drives the prompt tag).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
    /// Trigger words emitted alongside a LoRA tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_words: Option<String>,
    /// Generated candidate URLs awaiting a selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<String>>,
    /// Base seed of the last candidate batch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(default)]
    pub usage_log: Vec<AssetUsage>,
}

impl Asset {
    /// Create a manually added asset in `Pending` status.
    pub fn manual(name: impl Into<String>, kind: AssetKind) -> Self {
        Self::new(name, kind, String::new(), String::new(), vec!["Manual".to_string()])
    }

    /// Create an asset extracted by script analysis, recording where it
    /// was first used.
    pub fn extracted(
        name: impl Into<String>,
        kind: AssetKind,
        description: impl Into<String>,
        visual_prompt: impl Into<String>,
        usage: AssetUsage,
    ) -> Self {
        let mut asset = Self::new(
            name,
            kind,
            description.into(),
            visual_prompt.into(),
            vec!["AutoExtracted".to_string()],
        );
        asset.usage_log.push(usage);
        asset
    }

    fn new(
        name: impl Into<String>,
        kind: AssetKind,
        description: String,
        visual_prompt: String,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            kind,
            description,
            visual_prompt,
            tags,
            status: AssetStatus::Pending,
            reference_image: None,
            audio_url: None,
            model_url: None,
            local_path: None,
            trigger_words: None,
            candidates: None,
            seed: None,
            usage_log: Vec::new(),
        }
    }

    /// The resolved media reference appropriate to this asset's kind.
    pub fn media_reference(&self) -> Option<&str> {
        if self.kind.is_visual() {
            self.reference_image.as_deref()
        } else if self.kind.is_audio() {
            self.audio_url.as_deref()
        } else {
            self.model_url.as_deref()
        }
    }

    // -- transitions --------------------------------------------------------

    /// Enter `Generating`. Only visual kinds are AI-generated; audio and
    /// model assets acquire media via upload. Allowed from `Pending`
    /// (including a retry after candidates were rejected) and `Error`.
    pub fn begin_generation(&mut self) -> Result<(), CoreError> {
        if !self.kind.is_visual() {
            return Err(CoreError::Validation(format!(
                "asset '{}' is not a visual kind and cannot be generated",
                self.name
            )));
        }
        match self.status {
            AssetStatus::Pending | AssetStatus::Error => {
                self.status = AssetStatus::Generating;
                Ok(())
            }
            AssetStatus::Generating => Err(CoreError::Conflict(format!(
                "asset '{}' is already generating",
                self.name
            ))),
            AssetStatus::Locked => Err(CoreError::Conflict(format!(
                "asset '{}' is locked; unlock it before regenerating",
                self.name
            ))),
        }
    }

    /// Record a finished candidate batch: back to `Pending` with the
    /// candidate URLs staged for selection.
    pub fn finish_generation(
        &mut self,
        candidates: Vec<String>,
        seed: i64,
    ) -> Result<(), CoreError> {
        if self.status != AssetStatus::Generating {
            return Err(CoreError::Conflict(format!(
                "asset '{}' is not generating",
                self.name
            )));
        }
        if candidates.is_empty() {
            return Err(CoreError::Validation(
                "a candidate batch must contain at least one image".to_string(),
            ));
        }
        self.status = AssetStatus::Pending;
        self.candidates = Some(candidates);
        self.seed = Some(seed);
        // At most one of candidates / reference image may be active.
        self.reference_image = None;
        Ok(())
    }

    /// Record a failed generation call.
    pub fn fail_generation(&mut self) -> Result<(), CoreError> {
        if self.status != AssetStatus::Generating {
            return Err(CoreError::Conflict(format!(
                "asset '{}' is not generating",
                self.name
            )));
        }
        self.status = AssetStatus::Error;
        Ok(())
    }

    /// Lock the asset to one of its staged candidates.
    pub fn select_candidate(&mut self, url: &str) -> Result<(), CoreError> {
        if self.status != AssetStatus::Pending {
            return Err(CoreError::Conflict(format!(
                "asset '{}' has no selectable candidates in status {:?}",
                self.name, self.status
            )));
        }
        let Some(candidates) = &self.candidates else {
            return Err(CoreError::Conflict(format!(
                "asset '{}' has no candidate batch",
                self.name
            )));
        };
        if !candidates.iter().any(|c| c == url) {
            return Err(CoreError::Validation(format!(
                "'{url}' is not one of the staged candidates"
            )));
        }
        self.reference_image = Some(url.to_string());
        self.candidates = None;
        self.status = AssetStatus::Locked;
        Ok(())
    }

    /// Unlock a locked asset, discarding its media reference.
    pub fn unlock(&mut self) -> Result<(), CoreError> {
        if self.status != AssetStatus::Locked {
            return Err(CoreError::Conflict(format!(
                "asset '{}' is not locked",
                self.name
            )));
        }
        if self.kind.is_visual() {
            self.reference_image = None;
        } else if self.kind.is_audio() {
            self.audio_url = None;
        } else {
            self.model_url = None;
        }
        self.candidates = None;
        self.status = AssetStatus::Pending;
        Ok(())
    }

    /// Attach an uploaded media URL, locking the asset for visual and
    /// audio kinds. Model assets only record the file; they have no
    /// lock step.
    pub fn attach_media(
        &mut self,
        url: impl Into<String>,
        file_name: Option<String>,
    ) -> Result<(), CoreError> {
        if self.status == AssetStatus::Generating {
            return Err(CoreError::Conflict(format!(
                "asset '{}' is generating; wait for the batch to finish",
                self.name
            )));
        }
        let url = url.into();
        if url.is_empty() {
            return Err(CoreError::Validation("media url must not be empty".to_string()));
        }
        match self.kind {
            AssetKind::Music | AssetKind::Voice => {
                self.audio_url = Some(url);
                self.status = AssetStatus::Locked;
            }
            AssetKind::Model => {
                self.model_url = Some(url);
                self.local_path = file_name;
            }
            _ => {
                self.reference_image = Some(url);
                self.candidates = None;
                self.status = AssetStatus::Locked;
            }
        }
        Ok(())
    }

    /// Check the structural invariants that every stored asset must hold.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("asset name must not be empty".to_string()));
        }
        if self.status == AssetStatus::Locked && self.media_reference().is_none() {
            return Err(CoreError::Validation(format!(
                "locked asset '{}' has no media reference",
                self.name
            )));
        }
        if self.candidates.as_ref().is_some_and(|c| !c.is_empty())
            && self.kind.is_visual()
            && self.reference_image.is_some()
        {
            return Err(CoreError::Validation(format!(
                "asset '{}' has both staged candidates and a resolved image",
                self.name
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Collection helpers
// ---------------------------------------------------------------------------

/// Merge extracted assets into an existing list, de-duplicating by name.
///
/// Existing names win; incoming duplicates are dropped, including
/// duplicates within the incoming batch itself. Returns how many assets
/// were actually added.
pub fn merge_by_name(existing: &mut Vec<Asset>, incoming: Vec<Asset>) -> usize {
    let mut names: std::collections::HashSet<String> =
        existing.iter().map(|a| a.name.clone()).collect();
    let mut added = 0;
    for asset in incoming {
        if names.insert(asset.name.clone()) {
            existing.push(asset);
            added += 1;
        }
    }
    added
}

/// Pick a unique auto-generated name for a manually created asset,
/// e.g. `新建角色`, `新建角色_1`, `新建角色_2`.
pub fn unique_manual_name(existing: &[Asset], kind: AssetKind) -> String {
    let base = format!("新建{}", kind.label());
    let mut name = base.clone();
    let mut counter = 1;
    while existing.iter().any(|a| a.name == name) {
        name = format!("{base}_{counter}");
        counter += 1;
    }
    name
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
