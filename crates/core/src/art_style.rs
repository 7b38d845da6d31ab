//! Art styles: a fixed positive/negative prompt pair applied to every
//! generation within a project, chosen once at project creation.

use serde::{Deserialize, Serialize};

/// A named visual style. The prompt pair is injected into every image
/// generation for the owning project; an optional style LoRA rides along.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtStyle {
    pub id: String,
    pub label: String,
    pub positive_prompt: String,
    pub negative_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lora_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lora_weight: Option<f64>,
}

impl ArtStyle {
    fn preset(id: &str, label: &str, positive: &str, negative: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            positive_prompt: positive.to_string(),
            negative_prompt: negative.to_string(),
            lora_model: None,
            lora_weight: None,
        }
    }
}

/// The built-in style presets offered at project creation.
///
/// The `custom` preset carries empty prompts; callers fill it in from
/// user input before creating the project.
pub fn builtin_styles() -> Vec<ArtStyle> {
    vec![
        ArtStyle::preset(
            "cyberpunk",
            "赛博朋克 (Cyberpunk)",
            "cyberpunk style, neon lights, high contrast, futuristic city, rain, wet streets, chromatic aberration, masterpiece, best quality, 8k",
            "natural light, sunshine, rustic, vintage, low quality, blurry",
        ),
        ArtStyle::preset(
            "anime_jp",
            "日系动画 (Japanese Anime)",
            "anime style, makoto shinkai style, vibrant colors, detailed clouds, lens flare, beautiful lighting, 2d, flat color, masterpiece",
            "photorealistic, 3d, render, western comic style, lowres",
        ),
        ArtStyle::preset(
            "pixar_3d",
            "皮克斯 3D (Pixar Style)",
            "3d render, pixar style, disney style, cute, expressive faces, subsurface scattering, ambient occlusion, bright lighting, soft shadows, 4k, cgsociety",
            "2d, sketch, anime, rough, dark, horror",
        ),
        ArtStyle::preset(
            "film_noir",
            "胶片电影 (Film Noir)",
            "cinematic film still, film noir, black and white, dramatic lighting, shadow play, grain, analog photography, leica, 35mm",
            "color, cartoon, anime, 3d render, digital art, oversaturated",
        ),
        ArtStyle::preset(
            "chinese_ink",
            "水墨国风 (Chinese Ink)",
            "chinese ink painting style, watercolor, traditional art, wash painting, calligraphy strokes, elegant, minimalist, mountains, fog",
            "photorealistic, cyberpunk, neon, 3d, vibrant colors",
        ),
        ArtStyle::preset("custom", "自定义 (Custom)", "", ""),
    ]
}

/// Look up a built-in preset by id.
pub fn find_builtin(id: &str) -> Option<ArtStyle> {
    builtin_styles().into_iter().find(|s| s.id == id)
}
