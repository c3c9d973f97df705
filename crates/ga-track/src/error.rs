//! Tracking errors

use ga_host::HostError;

/// Tracking error
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("unknown tracking call {0:?}")]
    UnknownSchema(String),

    /// Raised by `ValidatorKind::from_str` for an unrecognised name
    #[error("unknown validator {0:?}")]
    UnknownValidator(String),

    #[error("{call}: field {field:?} failed validation (value: {value})")]
    Validation {
        call: String,
        field: String,
        /// Offending value, `<absent>` when missing
        value: String,
    },

    #[error("event type {0:?} cannot be tracked")]
    InvalidEventType(String),

    #[error("analytics queue {0:?} is not available")]
    MissingCollaborator(String),

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    #[error(transparent)]
    Host(#[from] HostError),
}

impl TrackError {
    /// Field name for validation failures
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Recover a `TrackError` raised inside a listener or task
    pub fn from_host(err: &HostError) -> Option<&TrackError> {
        err.callback_error()?.downcast_ref::<TrackError>()
    }
}
