//! Progress domain errors

use thiserror::Error;

use core_kernel::{CoreError, TemporalError};

use crate::evidence::EvidenceStatus;

/// Errors that can occur in the progress domain
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("Invalid {field}: {message}")]
    InvalidField { field: &'static str, message: String },

    #[error("Athletes cannot review their own evidence")]
    SelfReview,

    #[error("Evidence is already {0}")]
    AlreadyReviewed(EvidenceStatus),

    #[error(transparent)]
    Temporal(#[from] TemporalError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ProgressError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ProgressError::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// True for errors caused by the request content
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ProgressError::InvalidField { .. }
                | ProgressError::Temporal(_)
                | ProgressError::Core(CoreError::Validation(_))
                | ProgressError::Core(CoreError::Temporal(_))
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ProgressError::AlreadyReviewed(_))
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, ProgressError::SelfReview)
    }
}
