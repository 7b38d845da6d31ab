//! Repositories for the document-store tables.

pub mod parsing_rule_repo;
pub mod project_repo;

pub use parsing_rule_repo::ParsingRuleRepo;
pub use project_repo::ProjectRepo;
