use thiserror::Error;

use crate::domain::error::DomainError;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsersError {
    #[error("Missing parameters: {message}")]
    MissingParameters { message: String },

    #[error("User not found")]
    NotFound,

    #[error("Users store unavailable")]
    Unavailable,

    #[error("Internal error")]
    Internal,
}

impl UsersError {
    pub fn missing_parameters(message: impl Into<String>) -> Self {
        Self::MissingParameters {
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn unavailable() -> Self {
        Self::Unavailable
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<DomainError> for UsersError {
    fn from(domain_error: DomainError) -> Self {
        match domain_error {
            DomainError::MissingParameters { detail } => Self::missing_parameters(detail),
            DomainError::NotFound { .. } => Self::not_found(),
            DomainError::StoreUnavailable { .. } => Self::unavailable(),
            DomainError::SchemaWidenFailure { .. }
            | DomainError::InsertFailure { .. }
            | DomainError::Database { .. } => Self::internal(),
        }
    }
}
