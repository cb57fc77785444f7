use thiserror::Error;

use crate::contract::model::LookupCriteria;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Missing parameters: {detail}")]
    MissingParameters { detail: String },

    #[error("User not found: {criteria}")]
    NotFound { criteria: String },

    #[error("Failed to widen users table: {message}")]
    SchemaWidenFailure { message: String },

    #[error("Failed to insert user: {message}")]
    InsertFailure { message: String },

    #[error("Users store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn missing_parameters(detail: impl Into<String>) -> Self {
        Self::MissingParameters {
            detail: detail.into(),
        }
    }

    pub fn not_found(criteria: &LookupCriteria) -> Self {
        Self::NotFound {
            criteria: criteria.to_string(),
        }
    }

    pub fn schema_widen_failure(message: impl Into<String>) -> Self {
        Self::SchemaWidenFailure {
            message: message.into(),
        }
    }

    pub fn insert_failure(message: impl Into<String>) -> Self {
        Self::InsertFailure {
            message: message.into(),
        }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// True for failures caused by the store itself rather than the request.
    pub fn is_server_side(&self) -> bool {
        !matches!(self, Self::MissingParameters { .. } | Self::NotFound { .. })
    }
}
