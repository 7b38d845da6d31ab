//! Script-analysis gateway.
//!
//! Sends raw script text plus a parsing-rule instruction to a hosted
//! language model and decodes the fixed-schema JSON response into a
//! typed [`director_core::script_analysis::ScriptAnalysis`].

pub mod gateway;
pub mod schema;

pub use gateway::{AnalysisConfig, AnalysisError, ScriptAnalysisGateway};
