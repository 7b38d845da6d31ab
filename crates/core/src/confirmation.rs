//! Structured confirmation for destructive operations.
//!
//! Destructive calls (delete project/asset/rule, unlock) carry a
//! [`Confirmation`] decoded from the request. The decision of whether
//! an operation may proceed lives here; how a client asks its user is
//! presentation and none of our business. There is no undo.

use crate::error::CoreError;

/// Whether the caller has explicitly confirmed a destructive operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl Confirmation {
    /// Build from a request flag (absent means declined).
    pub fn from_flag(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

/// Gate a destructive operation on an explicit confirmation.
pub fn require_confirmed(confirmation: Confirmation, action: &str) -> Result<(), CoreError> {
    match confirmation {
        Confirmation::Confirmed => Ok(()),
        Confirmation::Declined => Err(CoreError::ConfirmationRequired(format!(
            "{action} requires explicit confirmation"
        ))),
    }
}
