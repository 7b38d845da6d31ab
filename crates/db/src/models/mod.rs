//! Row types for the document-store tables.

pub mod parsing_rule;
pub mod project;
