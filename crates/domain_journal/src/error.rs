//! Journal domain errors

use thiserror::Error;

use core_kernel::CoreError;

/// Errors that can occur in the journal domain
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("Invalid {field}: {message}")]
    InvalidField { field: &'static str, message: String },

    #[error("Entry is empty: add shared notes, private notes or at least one round")]
    EmptyEntry,

    #[error("Session date {0} is in the future")]
    FutureSession(chrono::NaiveDate),

    #[error("Session date {0} is too far in the past")]
    SessionTooOld(chrono::NaiveDate),

    #[error("Partner {0} is referenced by journal rounds")]
    PartnerInUse(String),

    #[error("A user cannot coach themself")]
    SelfCoaching,

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl JournalError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        JournalError::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// True for errors caused by the request content
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            JournalError::InvalidField { .. }
                | JournalError::EmptyEntry
                | JournalError::FutureSession(_)
                | JournalError::SessionTooOld(_)
                | JournalError::SelfCoaching
                | JournalError::Core(CoreError::Validation(_))
                | JournalError::Core(CoreError::Temporal(_))
        )
    }

    /// True for referential conflicts
    ///
    /// Create-once conflicts surface from the ports as `PortError::Conflict`.
    pub fn is_conflict(&self) -> bool {
        matches!(self, JournalError::PartnerInUse(_))
    }
}
