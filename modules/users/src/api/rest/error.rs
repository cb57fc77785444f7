use axum::http::StatusCode;

use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::domain::error::DomainError;

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.example.com/{}", code))
        .with_code(code)
        .with_instance(instance);

    let problem = match tracing::Span::current().id() {
        Some(id) => problem.with_trace_id(id.into_u64().to_string()),
        None => problem,
    };

    ProblemResponse(problem)
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::MissingParameters { detail } => from_parts(
            StatusCode::BAD_REQUEST,
            "USERS_MISSING_PARAMETERS",
            "Missing parameters",
            detail.clone(),
            instance,
        ),
        DomainError::NotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "USERS_NOT_FOUND",
            "User not found",
            "User not found",
            instance,
        ),
        DomainError::SchemaWidenFailure { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Schema widening failed");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "USERS_SCHEMA_WIDEN",
                "Internal error",
                "Failed to upgrade the users table",
                instance,
            )
        }
        DomainError::InsertFailure { .. } => {
            tracing::error!(error = ?e, "Insert failed");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "USERS_INSERT",
                "Internal error",
                "Failed to insert user",
                instance,
            )
        }
        DomainError::StoreUnavailable { .. } => {
            tracing::error!(error = ?e, "Users store unavailable");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "USERS_STORE_UNAVAILABLE",
                "Internal error",
                "The users store is unavailable",
                instance,
            )
        }
        DomainError::Database { .. } => {
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_DB",
                "Internal error",
                "An internal database error occurred",
                instance,
            )
        }
    }
}
