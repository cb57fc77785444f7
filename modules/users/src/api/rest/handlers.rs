use std::sync::Arc;

use axum::{
    extract::Query,
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    Extension,
};
use tracing::{error, info};

use crate::api::rest::dto::{
    CollectionParams, EmailDto, LegacyUserReq, LookupParams, SchemaDto, UserDto, UserReq,
};
use crate::api::rest::error::{from_parts, map_domain_error};
use crate::api::rest::problem::ProblemResponse;
use crate::contract::model::{present, LookupCriteria};
use crate::domain::service::Service;

/// Body of a successful reset.
pub const CLEAN_MESSAGE: &str =
    "Database cleaned. Back to v1 state and empty (only full_name and email_addr).";

fn email_line(email: String) -> String {
    format!("{email}\n")
}

/// v1 lookup: full name only.
pub async fn v1_get_user(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    Query(params): Query<LookupParams>,
) -> Result<String, ProblemResponse> {
    let Some(full_name) = present(&params.full_name) else {
        return Err(from_parts(
            StatusCode::BAD_REQUEST,
            "USERS_MISSING_PARAMETERS",
            "Missing parameters",
            "v1 requires full_name parameter",
            uri.path(),
        ));
    };

    svc.lookup_by(LookupCriteria::FullName(full_name.to_owned()))
        .await
        .map(email_line)
        .map_err(|e| map_domain_error(&e, uri.path()))
}

/// v1 insert of the legacy column pair.
pub async fn v1_create_user(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    Json(req): Json<LegacyUserReq>,
) -> Result<StatusCode, ProblemResponse> {
    info!("Creating v1 user: {:?}", req);
    svc.store(req.into()).await.map_err(|e| {
        error!("Failed to create v1 user: {}", e);
        map_domain_error(&e, uri.path())
    })?;
    Ok(StatusCode::CREATED)
}

/// v2 lookup: full name, or first and last name.
pub async fn v2_get_user(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    Query(params): Query<LookupParams>,
) -> Result<String, ProblemResponse> {
    svc.lookup(params.into())
        .await
        .map(email_line)
        .map_err(|e| map_domain_error(&e, uri.path()))
}

/// v2 insert; widens the table when the body carries a split name.
pub async fn v2_create_user(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    Json(req): Json<UserReq>,
) -> Result<StatusCode, ProblemResponse> {
    info!("Creating v2 user: {:?}", req);
    let receipt = svc.store(req.into()).await.map_err(|e| {
        error!("Failed to create v2 user: {}", e);
        map_domain_error(&e, uri.path())
    })?;
    info!(kind = ?receipt.kind, widened = receipt.widened, "v2 user created");
    Ok(StatusCode::CREATED)
}

/// v3 collection read: `?name=` looks up one email, otherwise lists all rows.
pub async fn v3_get_users(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    Query(params): Query<CollectionParams>,
) -> Result<Response, ProblemResponse> {
    if let Some(name) = present(&params.name) {
        let email = svc
            .lookup_by(LookupCriteria::FullName(name.to_owned()))
            .await
            .map_err(|e| map_domain_error(&e, uri.path()))?;
        return Ok(Json(EmailDto { email }).into_response());
    }

    let users = svc.list().await.map_err(|e| {
        error!("Failed to list users: {}", e);
        map_domain_error(&e, uri.path())
    })?;
    let dto: Vec<UserDto> = users.into_iter().map(UserDto::from).collect();
    Ok(Json(dto).into_response())
}

pub async fn v3_create_user(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    Json(req): Json<LegacyUserReq>,
) -> Result<StatusCode, ProblemResponse> {
    info!("Creating v3 user: {:?}", req);
    svc.store(req.into()).await.map_err(|e| {
        error!("Failed to create v3 user: {}", e);
        map_domain_error(&e, uri.path())
    })?;
    Ok(StatusCode::CREATED)
}

/// Drop all users and return the table to the v1 shape.
pub async fn clean(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
) -> Result<&'static str, ProblemResponse> {
    let descriptor = svc.reset().await.map_err(|e| {
        error!("Failed to reset users table: {}", e);
        map_domain_error(&e, uri.path())
    })?;
    info!(generation = descriptor.generation, "users table cleaned");
    Ok(CLEAN_MESSAGE)
}

pub async fn get_schema(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
) -> Result<Json<SchemaDto>, ProblemResponse> {
    svc.schema()
        .await
        .map(|d| Json(SchemaDto::from(d)))
        .map_err(|e| map_domain_error(&e, uri.path()))
}
