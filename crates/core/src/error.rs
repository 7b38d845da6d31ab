/// Domain-level error type shared by all crates.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup by id failed.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"project"`, `"asset"`.
        entity: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation conflicts with current state (e.g. an illegal
    /// status transition).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A destructive operation was attempted without explicit
    /// confirmation.
    #[error("Confirmation required: {0}")]
    ConfirmationRequired(String),

    /// An unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] with a string id.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }
}
