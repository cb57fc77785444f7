use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::api::rest::handlers;
use crate::config::UsersConfig;
use crate::domain::service::Service;

/// Mount the enabled API versions on `router`.
///
/// `/schema` is always mounted; each version and `/clean` follow `config`.
pub fn register_routes(mut router: Router, service: Arc<Service>, config: &UsersConfig) -> Router {
    if config.v1_enabled {
        router = router.route(
            "/v1/user",
            get(handlers::v1_get_user).post(handlers::v1_create_user),
        );
    }

    if config.v2_enabled {
        router = router.route(
            "/v2/user",
            get(handlers::v2_get_user).post(handlers::v2_create_user),
        );
    }

    if config.v3_enabled {
        router = router.route(
            "/v3/users",
            get(handlers::v3_get_users).post(handlers::v3_create_user),
        );
    }

    // Any other method on /clean is answered with 405 by the method router.
    if config.reset_enabled {
        router = router.route("/clean", post(handlers::clean));
    }

    router
        .route("/schema", get(handlers::get_schema))
        .layer(Extension(service))
}
