use std::sync::Arc;

use arc_swap::ArcSwapOption;
use axum::Router;
use db::DbHandle;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::UsersConfig;
use crate::contract::client::UsersApi;
use crate::domain::service::Service;
use crate::gateways::local::UsersLocalClient;
use crate::infra::storage::SqlxUsersRepository;

struct Wired {
    service: Arc<Service>,
    config: UsersConfig,
}

/// Users module: wires the sqlx repository into the resolver and exposes it
/// over REST and as an in-process client.
#[derive(Default)]
pub struct Users {
    wired: ArcSwapOption<Wired>,
}

impl Users {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bootstrap storage and build the service. Fails when the store cannot
    /// be reached.
    pub async fn init(&self, db: Arc<DbHandle>, config: UsersConfig) -> anyhow::Result<()> {
        info!("Initializing users module");
        debug!("Loaded users config: {:?}", config);

        let repo = SqlxUsersRepository::new(db);
        let service = Service::new(Arc::new(repo));
        let descriptor = service.init().await?;
        debug!(
            shape = descriptor.shape.as_str(),
            generation = descriptor.generation,
            "users schema observed"
        );

        self.wired.store(Some(Arc::new(Wired {
            service: Arc::new(service),
            config,
        })));
        Ok(())
    }

    fn wired(&self) -> anyhow::Result<Arc<Wired>> {
        self.wired
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("users module not initialized"))
    }

    pub fn service(&self) -> anyhow::Result<Arc<Service>> {
        Ok(Arc::clone(&self.wired()?.service))
    }

    pub fn register_rest(&self, router: Router) -> anyhow::Result<Router> {
        info!("Registering users REST routes");
        let wired = self.wired()?;
        Ok(routes::register_routes(
            router,
            Arc::clone(&wired.service),
            &wired.config,
        ))
    }

    pub fn client(&self) -> anyhow::Result<Arc<dyn UsersApi>> {
        Ok(Arc::new(UsersLocalClient::new(self.service()?)))
    }
}
