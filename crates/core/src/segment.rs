//! Script segments: named chapters holding raw script text and an
//! ordered shot list. The parsing step replaces a segment's shots
//! wholesale; manual reordering moves one shot at a time.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::shot::Shot;
use crate::types::{new_id, Id, Timestamp};

/// Direction of a single-step shot move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

/// A chapter of the project's script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptSegment {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub script_raw: String,
    #[serde(default)]
    pub shots: Vec<Shot>,
    pub last_modified: Timestamp,
}

impl ScriptSegment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            script_raw: String::new(),
            shots: Vec::new(),
            last_modified: Utc::now(),
        }
    }

    /// The seed chapter every new project starts with.
    pub fn first_chapter() -> Self {
        Self::new("第一章 (Chapter 1)")
    }

    /// A freshly appended chapter, named after its 1-based position.
    pub fn numbered_chapter(position: usize) -> Self {
        Self::new(format!("第 {position} 章 (New Chapter)"))
    }

    /// Update the raw script text and/or the chapter name.
    pub fn update(&mut self, name: Option<String>, script_raw: Option<String>) {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(script) = script_raw {
            self.script_raw = script;
        }
        self.last_modified = Utc::now();
    }

    /// Replace the shot list wholesale (the parsing step's write path).
    pub fn replace_shots(&mut self, shots: Vec<Shot>) {
        self.shots = shots;
        self.last_modified = Utc::now();
    }

    /// Find a shot by id.
    pub fn shot(&self, shot_id: &str) -> Result<&Shot, CoreError> {
        self.shots
            .iter()
            .find(|s| s.id == shot_id)
            .ok_or_else(|| CoreError::not_found("shot", shot_id))
    }

    pub fn shot_mut(&mut self, shot_id: &str) -> Result<&mut Shot, CoreError> {
        self.shots
            .iter_mut()
            .find(|s| s.id == shot_id)
            .ok_or_else(|| CoreError::not_found("shot", shot_id))
    }

    /// Move a shot one position up or down.
    ///
    /// A pure permutation: the multiset of shot ids is unchanged. Moving
    /// the first shot up or the last shot down is a no-op.
    pub fn move_shot(&mut self, shot_id: &str, direction: MoveDirection) -> Result<(), CoreError> {
        let index = self
            .shots
            .iter()
            .position(|s| s.id == shot_id)
            .ok_or_else(|| CoreError::not_found("shot", shot_id))?;

        let target = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => {
                if index + 1 < self.shots.len() {
                    Some(index + 1)
                } else {
                    None
                }
            }
        };
        if let Some(target) = target {
            self.shots.swap(index, target);
            self.last_modified = Utc::now();
        }
        Ok(())
    }
}
