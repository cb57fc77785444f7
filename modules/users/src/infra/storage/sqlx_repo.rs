//! sqlx-backed implementation of the `UsersRepository` port.
//!
//! One code path serves both engines: the `on_pool!` macro expands the body
//! once per concrete pool type, and [`Dialect`] supplies the few statements
//! that differ (bind placeholders, column introspection, widening).

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use db::{DbHandle, DbPool};
use tracing::debug;

use crate::contract::model::{LookupCriteria, SchemaShape, UserRecord};
use crate::domain::payload::PayloadShape;
use crate::domain::repo::{StoreUnavailable, UsersRepository};

const TABLE: &str = "users";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    /// Placeholder for the 1-based bind position `n`.
    fn placeholder(self, n: usize) -> String {
        match self {
            Self::Postgres => format!("${n}"),
            Self::Sqlite => "?".to_string(),
        }
    }

    fn columns_query(self) -> &'static str {
        match self {
            Self::Postgres => {
                "SELECT column_name::text FROM information_schema.columns \
                 WHERE table_name = $1 AND table_schema = current_schema()"
            }
            Self::Sqlite => "SELECT name FROM pragma_table_info(?)",
        }
    }
}

fn create_table_sql(if_not_exists: bool) -> String {
    let guard = if if_not_exists { "IF NOT EXISTS " } else { "" };
    format!("CREATE TABLE {guard}{TABLE} (full_name TEXT, email_addr TEXT)")
}

fn insert_sql(dialect: Dialect, columns: &[&str]) -> String {
    let binds: Vec<String> = (1..=columns.len()).map(|n| dialect.placeholder(n)).collect();
    format!(
        "INSERT INTO {TABLE} ({}) VALUES ({})",
        columns.join(", "),
        binds.join(", ")
    )
}

fn find_email_sql(dialect: Dialect, criteria: &LookupCriteria) -> String {
    match criteria {
        LookupCriteria::FullName(_) => format!(
            "SELECT email_addr FROM {TABLE} WHERE full_name = {} LIMIT 1",
            dialect.placeholder(1)
        ),
        LookupCriteria::FirstLast { .. } => format!(
            "SELECT email_addr FROM {TABLE} WHERE first_name = {} AND last_name = {} LIMIT 1",
            dialect.placeholder(1),
            dialect.placeholder(2)
        ),
    }
}

fn criteria_binds(criteria: &LookupCriteria) -> Vec<&str> {
    match criteria {
        LookupCriteria::FullName(name) => vec![name.as_str()],
        LookupCriteria::FirstLast { first, last } => vec![first.as_str(), last.as_str()],
    }
}

/// Connection-class failures are tagged so the service can report them as
/// an unavailable store; everything else stays a plain statement error.
fn store_error(err: sqlx::Error) -> anyhow::Error {
    let unreachable = matches!(
        err,
        sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed
    );
    if unreachable {
        anyhow::Error::new(StoreUnavailable(err.to_string()))
    } else {
        anyhow::Error::new(err)
    }
}

fn is_duplicate_column(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|e| e.message().contains("duplicate column name"))
}

/// Runs `$body` with `$pool` bound to the concrete sqlx pool and `$dialect`
/// set to the matching [`Dialect`].
macro_rules! on_pool {
    ($db:expr, |$pool:ident, $dialect:ident| $body:expr) => {
        match $db.pool() {
            DbPool::Postgres($pool) => {
                let $dialect = Dialect::Postgres;
                $body
            }
            DbPool::Sqlite($pool) => {
                let $dialect = Dialect::Sqlite;
                $body
            }
        }
    };
}

/// Users repository over a shared [`DbHandle`].
pub struct SqlxUsersRepository {
    db: Arc<DbHandle>,
}

impl SqlxUsersRepository {
    pub fn new(db: Arc<DbHandle>) -> Self {
        Self { db }
    }

    async fn column_names(&self) -> anyhow::Result<Vec<String>> {
        on_pool!(self.db, |pool, dialect| {
            sqlx::query_scalar::<_, String>(dialect.columns_query())
                .bind(TABLE)
                .fetch_all(pool)
                .await
                .map_err(store_error)
                .context("failed to introspect users columns")
        })
    }
}

#[async_trait]
impl UsersRepository for SqlxUsersRepository {
    async fn ensure_table(&self) -> anyhow::Result<()> {
        let sql = create_table_sql(true);
        on_pool!(self.db, |pool, _dialect| {
            sqlx::query(&sql)
                .execute(pool)
                .await
                .map_err(store_error)
                .context("failed to create users table")?;
        });
        Ok(())
    }

    async fn schema_shape(&self) -> anyhow::Result<SchemaShape> {
        let columns = self.column_names().await?;
        Ok(SchemaShape::from_columns(&columns))
    }

    async fn widen_schema(&self) -> anyhow::Result<()> {
        match self.db.pool() {
            DbPool::Postgres(pool) => {
                let sql = format!(
                    "ALTER TABLE {TABLE} \
                     ADD COLUMN IF NOT EXISTS first_name TEXT, \
                     ADD COLUMN IF NOT EXISTS last_name TEXT"
                );
                sqlx::query(&sql)
                    .execute(pool)
                    .await
                    .map_err(store_error)
                    .context("failed to widen users table")?;
            }
            DbPool::Sqlite(pool) => {
                // SQLite has no ADD COLUMN IF NOT EXISTS; check first and
                // tolerate losing the race to a concurrent writer.
                let existing = self.column_names().await?;
                for column in ["first_name", "last_name"] {
                    if existing.iter().any(|c| c.eq_ignore_ascii_case(column)) {
                        continue;
                    }
                    let sql = format!("ALTER TABLE {TABLE} ADD COLUMN {column} TEXT");
                    match sqlx::query(&sql).execute(pool).await {
                        Ok(_) => debug!(column, "added column"),
                        Err(e) if is_duplicate_column(&e) => {
                            debug!(column, "column added concurrently")
                        }
                        Err(e) => {
                            return Err(store_error(e))
                                .with_context(|| format!("failed to add column {column}"));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    async fn find_email(&self, criteria: &LookupCriteria) -> anyhow::Result<Option<String>> {
        let binds = criteria_binds(criteria);
        let email = on_pool!(self.db, |pool, dialect| {
            let sql = find_email_sql(dialect, criteria);
            let mut query = sqlx::query_scalar::<_, Option<String>>(&sql);
            for value in &binds {
                query = query.bind(*value);
            }
            query
                .fetch_optional(pool)
                .await
                .map_err(store_error)
                .context("failed to query user email")?
        });
        // A matching row whose email is NULL counts as a hit with an empty address.
        Ok(email.map(Option::unwrap_or_default))
    }

    async fn insert(&self, payload: &PayloadShape) -> anyhow::Result<()> {
        let values = payload.values();
        on_pool!(self.db, |pool, dialect| {
            let sql = insert_sql(dialect, payload.columns());
            let mut query = sqlx::query(&sql);
            for value in &values {
                query = query.bind(*value);
            }
            query
                .execute(pool)
                .await
                .map_err(store_error)
                .context("failed to insert user")?;
        });
        Ok(())
    }

    async fn list(&self, shape: SchemaShape) -> anyhow::Result<Vec<UserRecord>> {
        type Row = (Option<String>, Option<String>, Option<String>, Option<String>);
        let sql = match shape {
            SchemaShape::Wide => {
                format!("SELECT full_name, first_name, last_name, email_addr FROM {TABLE}")
            }
            SchemaShape::Narrow => format!(
                "SELECT full_name, CAST(NULL AS TEXT), CAST(NULL AS TEXT), email_addr FROM {TABLE}"
            ),
        };
        let rows: Vec<Row> = on_pool!(self.db, |pool, _dialect| {
            sqlx::query_as::<_, Row>(&sql)
                .fetch_all(pool)
                .await
                .map_err(store_error)
                .context("failed to list users")?
        });
        Ok(rows
            .into_iter()
            .map(|(full_name, first_name, last_name, email_addr)| UserRecord {
                full_name,
                first_name,
                last_name,
                email_addr,
            })
            .collect())
    }

    async fn reset(&self) -> anyhow::Result<()> {
        let drop = format!("DROP TABLE IF EXISTS {TABLE}");
        let create = create_table_sql(false);
        on_pool!(self.db, |pool, _dialect| {
            sqlx::query(&drop)
                .execute(pool)
                .await
                .map_err(store_error)
                .context("failed to drop users table")?;
            sqlx::query(&create)
                .execute(pool)
                .await
                .map_err(store_error)
                .context("failed to recreate users table")?;
        });
        Ok(())
    }
}
