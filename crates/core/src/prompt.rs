//! Prompt shaping for image generation.
//!
//! Reference-asset fragments are concatenated ahead of the shot prompt,
//! the project art style contributes a positive prefix and a negative
//! suffix, and LoRA assets inject `<lora:...>` tags. There is no
//! token-budget truncation.

use serde::{Deserialize, Serialize};

use crate::art_style::ArtStyle;
use crate::asset::Asset;

/// Negative prompt used for asset candidate batches.
pub const CANDIDATE_NEGATIVE_PROMPT: &str = "ugly, blurry, low quality";

/// Quality suffix appended to every shot negative prompt.
const SHOT_NEGATIVE_SUFFIX: &str = "blurry, ugly, low quality";

/// Default weight for a style LoRA without an explicit weight.
const DEFAULT_STYLE_LORA_WEIGHT: f64 = 0.8;

/// A prompt fragment contributed by a locked reference asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetReference {
    pub name: String,
    pub visual_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl AssetReference {
    pub fn from_asset(asset: &Asset) -> Self {
        Self {
            name: asset.name.clone(),
            visual_prompt: asset.visual_prompt.clone(),
            image_url: asset.reference_image.clone(),
        }
    }
}

/// Prepend parenthesized reference fragments to a prompt.
pub fn with_references(prompt: &str, references: &[AssetReference]) -> String {
    if references.is_empty() {
        return prompt.to_string();
    }
    let context: Vec<String> = references
        .iter()
        .map(|r| format!("({})", r.visual_prompt))
        .collect();
    format!("{}, {}", context.join(", "), prompt)
}

/// Build the `<lora:...>` tags for the shot's model assets plus the
/// style LoRA, if any. File extensions are stripped from imported
/// model file names.
pub fn lora_tags(model_assets: &[&Asset], style: &ArtStyle) -> String {
    let mut tags: Vec<String> = Vec::new();
    for asset in model_assets {
        let Some(path) = &asset.local_path else { continue };
        let stem = path
            .trim_end_matches(".safetensors")
            .trim_end_matches(".ckpt");
        let mut tag = format!("<lora:{stem}:1.0>");
        if let Some(words) = asset.trigger_words.as_deref().filter(|w| !w.is_empty()) {
            tag.push(' ');
            tag.push_str(words);
        }
        tags.push(tag);
    }
    if let Some(model) = &style.lora_model {
        let weight = style.lora_weight.unwrap_or(DEFAULT_STYLE_LORA_WEIGHT);
        tags.push(format!("<lora:{model}:{weight}>"));
    }
    tags.join(", ")
}

/// Compose the full positive prompt for a shot: style prefix, LoRA
/// tags, then the shot's own visual prompt.
pub fn shot_prompt(style: &ArtStyle, lora: &str, visual_prompt: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !style.positive_prompt.is_empty() {
        parts.push(format!("({})", style.positive_prompt));
    }
    if !lora.is_empty() {
        parts.push(lora.to_string());
    }
    parts.push(visual_prompt.to_string());
    parts.join(", ")
}

/// Compose the negative prompt for a shot from the style's negative
/// prompt plus the fixed quality suffix.
pub fn shot_negative_prompt(style: &ArtStyle) -> String {
    if style.negative_prompt.is_empty() {
        SHOT_NEGATIVE_SUFFIX.to_string()
    } else {
        format!("{}, {SHOT_NEGATIVE_SUFFIX}", style.negative_prompt)
    }
}
