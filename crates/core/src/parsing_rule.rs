//! Parsing rules: named instruction templates controlling how script
//! text is decomposed by the language-model call. Exactly one rule is
//! the default, seeded on first access.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Id;

/// The standard film-storyboard instruction shipped as the default rule.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = r#"You are an expert Film Director and Storyboard Artist AI (AI导演与分镜师).
Your task is to analyze a raw script (Chinese or English) and break it down into a structured production plan.

1. **Assets Extraction**: Extract all key Characters (角色) and Scenes (场景).
   - **CRITICAL**: The 'name' field MUST be in **Simplified Chinese** (e.g., "张三", "赛博街道").
   - **CRITICAL**: The 'visualPrompt' MUST be in **English** tags for Stable Diffusion.
2. **Shot Breakdown**: Break the script into individual Shots (分镜).
3. **Visual Translation**: Translate abstract emotions into concrete visual descriptions.

Output valid JSON matching the schema."#;

/// Well-known id of the seeded default rule.
pub const DEFAULT_RULE_ID: &str = "default";

/// A named instruction template sent verbatim to the analysis gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsingRule {
    pub id: Id,
    pub name: String,
    pub system_instruction: String,
    #[serde(default)]
    pub is_default: bool,
}

impl ParsingRule {
    /// The rule seeded on first run.
    pub fn seeded_default() -> Self {
        Self {
            id: DEFAULT_RULE_ID.to_string(),
            name: "标准电影分镜 (Standard)".to_string(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            is_default: true,
        }
    }

    /// Validate a rule before it is saved.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("rule name must not be empty".to_string()));
        }
        if self.system_instruction.trim().is_empty() {
            return Err(CoreError::Validation(
                "rule system instruction must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Guard deletion: the default rule cannot be removed.
    pub fn ensure_deletable(&self) -> Result<(), CoreError> {
        if self.is_default {
            return Err(CoreError::Conflict("the default rule cannot be deleted".to_string()));
        }
        Ok(())
    }
}
