//! The text-to-image workflow template submitted to ComfyUI.
//!
//! One fixed node graph covers both generation paths: end-frame
//! (image-to-image) generation is signalled only by lowering the
//! KSampler `denoise` input, with no separate conditioning path.

use serde_json::{json, Value};

/// Full-strength denoise for plain text-to-image generation.
pub const TXT2IMG_DENOISE: f64 = 1.0;

/// Reduced denoise used when an input image seeds the generation
/// (end frames derived from a start frame).
pub const IMG2IMG_DENOISE: f64 = 0.6;

/// The SaveImage node whose output carries the rendered image.
pub const OUTPUT_NODE: &str = "9";

/// Build the workflow graph for one generation call.
pub fn text_to_image_workflow(
    prompt: &str,
    negative_prompt: &str,
    seed: i64,
    denoise: f64,
) -> Value {
    json!({
        "3": {
            "inputs": {
                "seed": seed,
                "steps": 20,
                "cfg": 8,
                "sampler_name": "euler",
                "scheduler": "normal",
                "denoise": denoise,
                "model": ["4", 0],
                "positive": ["6", 0],
                "negative": ["7", 0],
                "latent_image": ["5", 0]
            },
            "class_type": "KSampler"
        },
        "4": {
            "inputs": { "ckpt_name": "v1-5-pruned-emaonly.ckpt" },
            "class_type": "CheckpointLoaderSimple"
        },
        "5": {
            "inputs": { "width": 512, "height": 512, "batch_size": 1 },
            "class_type": "EmptyLatentImage"
        },
        "6": {
            "inputs": { "text": prompt, "clip": ["4", 1] },
            "class_type": "CLIPTextEncode"
        },
        "7": {
            "inputs": { "text": negative_prompt, "clip": ["4", 1] },
            "class_type": "CLIPTextEncode"
        },
        "8": {
            "inputs": { "samples": ["3", 0], "vae": ["4", 2] },
            "class_type": "VAEDecode"
        },
        OUTPUT_NODE: {
            "inputs": { "filename_prefix": "DirectorAI", "images": ["8", 0] },
            "class_type": "SaveImage"
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_land_in_the_encode_nodes() {
        let wf = text_to_image_workflow("a detective", "blurry", 7, TXT2IMG_DENOISE);
        assert_eq!(wf["6"]["inputs"]["text"], "a detective");
        assert_eq!(wf["7"]["inputs"]["text"], "blurry");
    }

    #[test]
    fn seed_and_denoise_land_in_the_sampler() {
        let wf = text_to_image_workflow("p", "n", 123456789, IMG2IMG_DENOISE);
        assert_eq!(wf["3"]["inputs"]["seed"], 123456789);
        assert_eq!(wf["3"]["inputs"]["denoise"], 0.6);
    }

    #[test]
    fn output_node_saves_images() {
        let wf = text_to_image_workflow("p", "n", 1, TXT2IMG_DENOISE);
        assert_eq!(wf[OUTPUT_NODE]["class_type"], "SaveImage");
    }
}
