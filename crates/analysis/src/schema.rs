//! The fixed output schema requested from the language model.
//!
//! Mirrors the structured-output schema format of the Gemini
//! `generateContent` API. The model is instructed to emit JSON with
//! `characters`, `scenes`, and `shots` arrays; the descriptions steer
//! naming (Simplified Chinese) and prompt language (English tags).

use serde_json::{json, Value};

/// Build the response schema attached to every analysis request.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "characters": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING", "description": "Chinese Name (e.g. 李雷)" },
                        "description": { "type": "STRING", "description": "Character role and basic info in Chinese" },
                        "visualPrompt": { "type": "STRING", "description": "Detailed visual description in English tags for Stable Diffusion (e.g., '1girl, detective, trench coat, cyberpunk city background, neon lights, highly detailed face')" }
                    },
                    "required": ["name", "description", "visualPrompt"]
                }
            },
            "scenes": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING", "description": "Chinese Scene Name (e.g. 废弃工厂)" },
                        "description": { "type": "STRING", "description": "Atmosphere and location info in Chinese" },
                        "visualPrompt": { "type": "STRING", "description": "Detailed environment description in English tags (e.g., 'futuristic city street, rain, neon signs, wet ground, cinematic lighting, 8k')" }
                    },
                    "required": ["name", "description", "visualPrompt"]
                }
            },
            "shots": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "sequence": { "type": "INTEGER" },
                        "scriptContent": { "type": "STRING" },
                        "visualPrompt": { "type": "STRING", "description": "A highly descriptive stable diffusion prompt for this specific shot" },
                        "shotType": { "type": "STRING", "description": "e.g., Wide Shot, Close Up" },
                        "cameraMovement": { "type": "STRING", "description": "e.g., Pan, Tilt, Dolly" },
                        "involved_character_names": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "involved_scene_name": { "type": "STRING" }
                    },
                    "required": ["sequence", "scriptContent", "visualPrompt", "shotType", "cameraMovement"]
                }
            }
        },
        "required": ["characters", "scenes", "shots"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_requires_all_three_collections() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, vec!["characters", "scenes", "shots"]);
    }

    #[test]
    fn shot_schema_requires_sequence_and_prompts() {
        let schema = response_schema();
        let required = &schema["properties"]["shots"]["items"]["required"];
        assert!(required.as_array().unwrap().iter().any(|v| v == "sequence"));
        assert!(required.as_array().unwrap().iter().any(|v| v == "visualPrompt"));
    }
}
