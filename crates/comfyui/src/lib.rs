//! ComfyUI image-generation gateway.
//!
//! Wraps the ComfyUI HTTP API (workflow submission, connectivity probe,
//! history retrieval) and WebSocket stream (job-status events) behind a
//! single [`gateway::GenerationGateway`] that resolves a prompt to an
//! image URL. A deterministic mock mode stands in for the real pipeline
//! when configured, or when the connectivity probe fails.

pub mod api;
pub mod client;
pub mod gateway;
pub mod messages;
pub mod workflow;

pub use gateway::{EngineMode, GenerationConfig, GenerationError, GenerationGateway, GenerationRequest};
