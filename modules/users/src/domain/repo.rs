use async_trait::async_trait;
use thiserror::Error;

use crate::contract::model::{LookupCriteria, SchemaShape, UserRecord};
use crate::domain::payload::PayloadShape;

/// Marker placed in an `anyhow` chain when the store could not be reached at
/// all (pool exhausted or closed, socket/TLS failure). The service uses it to
/// tell connectivity loss apart from statement failures.
#[derive(Debug, Error)]
#[error("store unavailable: {0}")]
pub struct StoreUnavailable(pub String);

/// True when any cause in the chain is a [`StoreUnavailable`] marker.
pub fn is_store_unavailable(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.is::<StoreUnavailable>())
}

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Create the table in its narrow shape unless it already exists.
    async fn ensure_table(&self) -> anyhow::Result<()>;

    /// Introspect the live column set.
    async fn schema_shape(&self) -> anyhow::Result<SchemaShape>;

    /// Add the split name columns. Must be a no-op when they exist.
    async fn widen_schema(&self) -> anyhow::Result<()>;

    /// Email of the first row matching `criteria`, if any.
    async fn find_email(&self, criteria: &LookupCriteria) -> anyhow::Result<Option<String>>;

    async fn insert(&self, payload: &PayloadShape) -> anyhow::Result<()>;

    /// All rows; split name columns are read only when `shape` is wide.
    async fn list(&self, shape: SchemaShape) -> anyhow::Result<Vec<UserRecord>>;

    /// Drop the table and recreate it narrow.
    async fn reset(&self) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn marker_is_found_through_context_layers() {
        let err: anyhow::Result<()> = Err(StoreUnavailable("pool timed out".into()).into());
        let err = err.context("find_email failed").unwrap_err();
        assert!(is_store_unavailable(&err));

        let plain = anyhow::anyhow!("syntax error near SELECT");
        assert!(!is_store_unavailable(&plain));
    }
}
