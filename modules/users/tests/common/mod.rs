#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use db::{ConnectOpts, DbHandle};
use tempfile::TempDir;

use users::{
    api::rest::routes, domain::service::Service, infra::storage::SqlxUsersRepository,
    UsersConfig,
};

/// A service over a fresh SQLite file. Keep the `TempDir` alive for the
/// duration of the test.
pub struct TestStore {
    pub dir: TempDir,
    pub db: Arc<DbHandle>,
    pub service: Arc<Service>,
}

pub async fn sqlite_store() -> TestStore {
    let dir = tempfile::tempdir().expect("tempdir");
    let dsn = format!("sqlite://{}", dir.path().join("users.db").display());
    let db = Arc::new(
        DbHandle::connect(&dsn, ConnectOpts::default())
            .await
            .expect("connect sqlite"),
    );
    let service = Service::new(Arc::new(SqlxUsersRepository::new(Arc::clone(&db))));
    service.init().await.expect("init users table");
    TestStore {
        dir,
        db,
        service: Arc::new(service),
    }
}

pub fn router(service: Arc<Service>) -> Router {
    routes::register_routes(Router::new(), service, &UsersConfig::default())
}

/// Live column names of the users table.
pub async fn columns(db: &DbHandle) -> Vec<String> {
    let pool = db.sqlx_sqlite().expect("sqlite pool");
    sqlx::query_scalar::<_, String>("SELECT name FROM pragma_table_info('users')")
        .fetch_all(pool)
        .await
        .expect("introspect columns")
}
