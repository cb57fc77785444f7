use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::contract::model::{
    LookupCriteria, LookupQuery, SchemaDescriptor, SchemaShape, StoreReceipt, UserRecord,
};
use crate::domain::error::DomainError;
use crate::domain::payload::PayloadShape;
use crate::domain::repo::{is_store_unavailable, UsersRepository};
use crate::domain::schema::SchemaState;

/// Compatibility resolver: picks the column set for each read and write and
/// widens the table lazily when a write carries a split name.
///
/// Depends only on the repository port, not on infra types.
pub struct Service {
    repo: Arc<dyn UsersRepository>,
    schema: SchemaState,
}

impl Service {
    pub fn new(repo: Arc<dyn UsersRepository>) -> Self {
        Self {
            repo,
            schema: SchemaState::new(),
        }
    }

    /// Bootstrap the table and learn its shape. Any failure here means the
    /// store is unreachable or unusable, which the caller treats as fatal.
    #[instrument(name = "users.service.init", skip(self))]
    pub async fn init(&self) -> Result<SchemaDescriptor, DomainError> {
        self.repo
            .ensure_table()
            .await
            .map_err(|e| DomainError::store_unavailable(format!("{e:#}")))?;
        let descriptor = self
            .refresh()
            .await
            .map_err(|e| DomainError::store_unavailable(e.to_string()))?;
        info!(shape = descriptor.shape.as_str(), "users table ready");
        Ok(descriptor)
    }

    /// Look up by raw query parameters. Unrecognized parameter shapes fail
    /// before storage is touched.
    #[instrument(name = "users.service.lookup", skip(self, query))]
    pub async fn lookup(&self, query: LookupQuery) -> Result<String, DomainError> {
        let criteria = LookupCriteria::from_query(&query).ok_or_else(|| {
            DomainError::missing_parameters("Missing name parameters")
        })?;
        self.lookup_by(criteria).await
    }

    #[instrument(name = "users.service.lookup_by", skip(self, criteria), fields(criteria = %criteria))]
    pub async fn lookup_by(&self, criteria: LookupCriteria) -> Result<String, DomainError> {
        debug!("Looking up user email");

        // No row can match a column that does not exist yet.
        if matches!(criteria, LookupCriteria::FirstLast { .. })
            && self.schema.known() == Some(SchemaShape::Narrow)
        {
            return Err(DomainError::not_found(&criteria));
        }

        match self.repo.find_email(&criteria).await {
            Ok(Some(email)) => Ok(email),
            Ok(None) => Err(DomainError::not_found(&criteria)),
            Err(e) if matches!(criteria, LookupCriteria::FirstLast { .. }) => {
                // The cached shape may be stale (reset by another process).
                match self.refresh().await {
                    Ok(d) if d.shape == SchemaShape::Narrow => {
                        Err(DomainError::not_found(&criteria))
                    }
                    _ => Err(classify(e, DomainError::database)),
                }
            }
            Err(e) => Err(classify(e, DomainError::database)),
        }
    }

    #[instrument(name = "users.service.store", skip(self, record))]
    pub async fn store(&self, record: UserRecord) -> Result<StoreReceipt, DomainError> {
        let payload = PayloadShape::classify(record);
        let kind = payload.kind();
        debug!(?kind, "Storing user");

        // Widening is idempotent and always issued: the cache may be Wide
        // while another process has reset the table.
        let mut widened = false;
        if payload.required_schema() == SchemaShape::Wide {
            let before = self.schema.known();
            self.repo
                .widen_schema()
                .await
                .map_err(|e| classify(e, DomainError::schema_widen_failure))?;
            let d = self.schema.observe(SchemaShape::Wide);
            if before != Some(SchemaShape::Wide) {
                info!(generation = d.generation, "users table widened with first_name/last_name");
                widened = true;
            }
        }

        if let Err(e) = self.repo.insert(&payload).await {
            // Widening is kept; the next write re-checks storage.
            self.schema.invalidate();
            warn!(?kind, widened, "insert failed after schema check");
            return Err(classify(e, DomainError::insert_failure));
        }

        Ok(StoreReceipt { kind, widened })
    }

    #[instrument(name = "users.service.list", skip(self))]
    pub async fn list(&self) -> Result<Vec<UserRecord>, DomainError> {
        // The table is shared; a cached shape may miss another process's
        // widen or reset.
        let shape = self.refresh().await?.shape;
        let users = match self.repo.list(shape).await {
            Ok(users) => users,
            Err(_) if shape == SchemaShape::Wide => {
                // Reset between introspection and the listing.
                let shape = self.refresh().await?.shape;
                self.repo
                    .list(shape)
                    .await
                    .map_err(|e| classify(e, DomainError::database))?
            }
            Err(e) => return Err(classify(e, DomainError::database)),
        };
        debug!("Listed {} users", users.len());
        Ok(users)
    }

    #[instrument(name = "users.service.reset", skip(self))]
    pub async fn reset(&self) -> Result<SchemaDescriptor, DomainError> {
        if let Err(e) = self.repo.reset().await {
            self.schema.invalidate();
            return Err(classify(e, DomainError::database));
        }
        let d = self.schema.replace(SchemaShape::Narrow);
        info!(generation = d.generation, "users table reset to narrow shape");
        Ok(d)
    }

    /// Cached descriptor, introspecting storage when unknown.
    pub async fn schema(&self) -> Result<SchemaDescriptor, DomainError> {
        match self.schema.descriptor() {
            Some(d) => Ok(d),
            None => self.refresh().await,
        }
    }

    async fn refresh(&self) -> Result<SchemaDescriptor, DomainError> {
        let shape = self
            .repo
            .schema_shape()
            .await
            .map_err(|e| classify(e, DomainError::database))?;
        Ok(self.schema.observe(shape))
    }
}

/// Connectivity failures win over the operation-specific error kind.
fn classify(err: anyhow::Error, otherwise: impl FnOnce(String) -> DomainError) -> DomainError {
    let message = format!("{err:#}");
    if is_store_unavailable(&err) {
        DomainError::store_unavailable(message)
    } else {
        otherwise(message)
    }
}
