use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::UsersApi,
    error::UsersError,
    model::{LookupCriteria, SchemaDescriptor, StoreReceipt, UserRecord},
};
use crate::domain::{error::DomainError, service::Service};

/// In-process `UsersApi` backed directly by the domain service.
pub struct UsersLocalClient {
    service: Arc<Service>,
}

impl UsersLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl UsersApi for UsersLocalClient {
    async fn lookup(&self, criteria: LookupCriteria) -> anyhow::Result<String> {
        self.service.lookup_by(criteria).await.map_err(to_contract)
    }

    async fn store(&self, record: UserRecord) -> anyhow::Result<StoreReceipt> {
        self.service.store(record).await.map_err(to_contract)
    }

    async fn list(&self) -> anyhow::Result<Vec<UserRecord>> {
        self.service.list().await.map_err(to_contract)
    }

    async fn reset(&self) -> anyhow::Result<()> {
        self.service.reset().await.map(|_| ()).map_err(to_contract)
    }

    async fn schema(&self) -> anyhow::Result<SchemaDescriptor> {
        self.service.schema().await.map_err(to_contract)
    }
}

fn to_contract(e: DomainError) -> anyhow::Error {
    anyhow::Error::new(UsersError::from(e))
}
