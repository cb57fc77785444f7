use async_trait::async_trait;

use crate::contract::model::{
    LookupCriteria, SchemaDescriptor, StoreReceipt, UserRecord,
};

/// Public API of the users module for in-process consumers.
///
/// Errors are `anyhow` wrappers around [`crate::contract::UsersError`];
/// downcast to inspect them.
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// Resolve the email of the user matching `criteria`.
    async fn lookup(&self, criteria: LookupCriteria) -> anyhow::Result<String>;

    /// Persist a record, widening the table first when it carries a split name.
    async fn store(&self, record: UserRecord) -> anyhow::Result<StoreReceipt>;

    async fn list(&self) -> anyhow::Result<Vec<UserRecord>>;

    /// Drop every row and return the table to its narrow shape.
    async fn reset(&self) -> anyhow::Result<()>;

    async fn schema(&self) -> anyhow::Result<SchemaDescriptor>;
}
