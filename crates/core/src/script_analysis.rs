//! Validated decoding of script-analysis results.
//!
//! The hosted model is asked for JSON matching a fixed schema
//! (characters / scenes / shots). The response text is NOT trusted:
//! [`decode`] turns the raw JSON into typed entities at the API
//! boundary and rejects anything missing or mistyped with a
//! [`CoreError::Validation`] before a domain object is constructed.

use chrono::Utc;
use serde::Deserialize;

use crate::asset::{Asset, AssetKind, AssetUsage};
use crate::error::CoreError;
use crate::shot::Shot;
use crate::types::Id;

// ---------------------------------------------------------------------------
// Typed result
// ---------------------------------------------------------------------------

/// A character or scene extracted from the script.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedEntity {
    pub name: String,
    pub description: String,
    pub visual_prompt: String,
}

/// One planned shot from the breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedShot {
    pub sequence: i32,
    pub script_content: String,
    pub visual_prompt: String,
    pub shot_type: String,
    pub camera_movement: String,
    pub involved_character_names: Vec<String>,
    pub involved_scene_name: Option<String>,
}

/// The full structured production plan for one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptAnalysis {
    pub characters: Vec<ExtractedEntity>,
    pub scenes: Vec<ExtractedEntity>,
    pub shots: Vec<PlannedShot>,
}

// ---------------------------------------------------------------------------
// Wire shapes (the model's fixed output schema)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    characters: Vec<RawEntity>,
    scenes: Vec<RawEntity>,
    shots: Vec<RawShot>,
}

#[derive(Debug, Deserialize)]
struct RawEntity {
    name: String,
    description: String,
    #[serde(rename = "visualPrompt")]
    visual_prompt: String,
}

#[derive(Debug, Deserialize)]
struct RawShot {
    sequence: i32,
    #[serde(rename = "scriptContent")]
    script_content: String,
    #[serde(rename = "visualPrompt")]
    visual_prompt: String,
    #[serde(rename = "shotType")]
    shot_type: String,
    #[serde(rename = "cameraMovement")]
    camera_movement: String,
    #[serde(default)]
    involved_character_names: Vec<String>,
    #[serde(default)]
    involved_scene_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode the model's response text into a typed analysis.
pub fn decode_text(text: &str) -> Result<ScriptAnalysis, CoreError> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| CoreError::Validation(format!("analysis response is not valid JSON: {e}")))?;
    decode(value)
}

/// Decode a parsed JSON value into a typed analysis.
pub fn decode(value: serde_json::Value) -> Result<ScriptAnalysis, CoreError> {
    let raw: RawAnalysis = serde_json::from_value(value)
        .map_err(|e| CoreError::Validation(format!("analysis response does not match schema: {e}")))?;

    for entity in raw.characters.iter().chain(raw.scenes.iter()) {
        if entity.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "extracted entity has an empty name".to_string(),
            ));
        }
    }
    for shot in &raw.shots {
        if shot.sequence < 1 {
            return Err(CoreError::Validation(format!(
                "shot sequence must be >= 1, got {}",
                shot.sequence
            )));
        }
    }

    let to_entity = |e: RawEntity| ExtractedEntity {
        name: e.name,
        description: e.description,
        visual_prompt: e.visual_prompt,
    };

    Ok(ScriptAnalysis {
        characters: raw.characters.into_iter().map(to_entity).collect(),
        scenes: raw.scenes.into_iter().map(to_entity).collect(),
        shots: raw
            .shots
            .into_iter()
            .map(|s| PlannedShot {
                sequence: s.sequence,
                script_content: s.script_content,
                visual_prompt: s.visual_prompt,
                shot_type: s.shot_type,
                camera_movement: s.camera_movement,
                involved_character_names: s.involved_character_names,
                involved_scene_name: s.involved_scene_name,
            })
            .collect(),
    })
}

// ---------------------------------------------------------------------------
// Domain conversion
// ---------------------------------------------------------------------------

impl ScriptAnalysis {
    /// Build the pending shots that replace a segment's shot list.
    pub fn to_shots(&self) -> Vec<Shot> {
        self.shots
            .iter()
            .map(|planned| {
                let mut shot = Shot::new(planned.sequence, planned.script_content.clone());
                shot.visual_prompt = planned.visual_prompt.clone();
                shot.shot_type = planned.shot_type.clone();
                shot.camera_movement = planned.camera_movement.clone();
                shot
            })
            .collect()
    }

    /// Build the extracted assets to merge into the project list,
    /// tagged with the segment they came from.
    pub fn to_assets(&self, segment_id: &Id, segment_name: &str) -> Vec<Asset> {
        let usage = AssetUsage {
            segment_id: segment_id.clone(),
            segment_name: segment_name.to_string(),
            timestamp: Utc::now(),
        };
        self.characters
            .iter()
            .map(|c| (c, AssetKind::Character))
            .chain(self.scenes.iter().map(|s| (s, AssetKind::Scene)))
            .map(|(entity, kind)| {
                Asset::extracted(
                    entity.name.clone(),
                    kind,
                    entity.description.clone(),
                    entity.visual_prompt.clone(),
                    usage.clone(),
                )
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::art_style::find_builtin;
    use crate::asset::AssetStatus;
    use crate::project::Project;
    use assert_matches::assert_matches;

    const DETECTIVE_RESPONSE: &str = r#"{
        "characters": [
            {"name": "侦探", "description": "雨夜中的主角", "visualPrompt": "1boy, detective, trench coat, rain"}
        ],
        "scenes": [
            {"name": "雨夜街道", "description": "潮湿的城市街道", "visualPrompt": "city street, rain, night, neon"}
        ],
        "shots": [
            {"sequence": 1, "scriptContent": "Detective walks in rain", "visualPrompt": "detective walking, heavy rain", "shotType": "Wide Shot", "cameraMovement": "Dolly"}
        ]
    }"#;

    #[test]
    fn decodes_schema_valid_response() {
        let analysis = decode_text(DETECTIVE_RESPONSE).unwrap();
        assert_eq!(analysis.characters.len(), 1);
        assert_eq!(analysis.characters[0].name, "侦探");
        assert_eq!(analysis.scenes[0].name, "雨夜街道");
        assert_eq!(analysis.shots.len(), 1);
        assert_eq!(analysis.shots[0].sequence, 1);
    }

    #[test]
    fn rejects_non_json_response() {
        assert_matches!(decode_text("not json"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_missing_field() {
        let text = r#"{"characters": [], "scenes": []}"#;
        assert_matches!(decode_text(text), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_mistyped_sequence() {
        let text = r#"{
            "characters": [], "scenes": [],
            "shots": [{"sequence": "one", "scriptContent": "", "visualPrompt": "", "shotType": "", "cameraMovement": ""}]
        }"#;
        assert_matches!(decode_text(text), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_zero_sequence() {
        let text = r#"{
            "characters": [], "scenes": [],
            "shots": [{"sequence": 0, "scriptContent": "", "visualPrompt": "", "shotType": "", "cameraMovement": ""}]
        }"#;
        assert_matches!(decode_text(text), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_empty_entity_name() {
        let text = r#"{
            "characters": [{"name": " ", "description": "", "visualPrompt": ""}],
            "scenes": [], "shots": []
        }"#;
        assert_matches!(decode_text(text), Err(CoreError::Validation(_)));
    }

    #[test]
    fn detective_scenario_yields_one_shot_and_two_assets() {
        let mut project =
            Project::create("雨夜", find_builtin("film_noir").unwrap()).unwrap();
        let segment_id = project.segments[0].id.clone();
        let segment_name = project.segments[0].name.clone();

        let analysis = decode_text(DETECTIVE_RESPONSE).unwrap();
        let shots = analysis.to_shots();
        let assets = analysis.to_assets(&segment_id, &segment_name);

        project.segment_mut(&segment_id).unwrap().replace_shots(shots);
        let added = project.merge_extracted_assets(assets);

        assert_eq!(added, 2);
        assert_eq!(project.segments[0].shots.len(), 1);
        assert_eq!(project.segments[0].shots[0].sequence, 1);
        for asset in &project.assets {
            assert_eq!(asset.status, AssetStatus::Pending);
            assert_eq!(asset.tags, vec!["AutoExtracted"]);
            assert_eq!(asset.usage_log[0].segment_id, segment_id);
        }
    }

    #[test]
    fn reanalysis_does_not_duplicate_assets() {
        let mut project =
            Project::create("雨夜", find_builtin("film_noir").unwrap()).unwrap();
        let segment_id = project.segments[0].id.clone();
        let analysis = decode_text(DETECTIVE_RESPONSE).unwrap();

        project.merge_extracted_assets(analysis.to_assets(&segment_id, "第一章"));
        project.merge_extracted_assets(analysis.to_assets(&segment_id, "第一章"));
        assert_eq!(project.assets.len(), 2);
    }
}
