use std::sync::Arc;

use director_analysis::ScriptAnalysisGateway;
use director_comfyui::GenerationGateway;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`. Cheaply cloneable: inner data is behind `Arc`
/// or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: director_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Image-generation gateway (ComfyUI or mock).
    pub generation: Arc<GenerationGateway>,
    /// Script-analysis gateway (hosted language model).
    pub analysis: Arc<ScriptAnalysisGateway>,
}
