// ABOUTME: Shared application state for request handlers
// ABOUTME: Holds the database pool, storage layers, provisioner and ingestion policies

use std::sync::Arc;

use sqlx::SqlitePool;
use tally_config::IngestionSettings;
use tally_ingestion::{PartitionKeyRouter, ReplayEventPolicy};
use tally_security::{OrganizationStorage, TokenStorage, UserStorage};
use tally_tags::TagStorage;
use tally_warehouse::{
    ConnectionProvider, DestinationProvider, ExternalDataSourceStorage, SourceProvider,
    SourceProvisioner,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub user_storage: Arc<UserStorage>,
    pub organization_storage: Arc<OrganizationStorage>,
    pub token_storage: Arc<TokenStorage>,
    pub tag_storage: Arc<TagStorage>,
    pub source_storage: ExternalDataSourceStorage,
    pub provisioner: Arc<SourceProvisioner>,
    pub partition_router: Arc<PartitionKeyRouter>,
    pub replay_policy: Arc<ReplayEventPolicy>,
}

impl AppState {
    /// Build the state around one client implementing every sync service provider.
    ///
    /// The ingestion policies share the same settings instance.
    pub fn new<P>(pool: SqlitePool, sync_client: Arc<P>, ingestion_settings: Arc<IngestionSettings>) -> Self
    where
        P: SourceProvider + DestinationProvider + ConnectionProvider + 'static,
    {
        let source_storage = ExternalDataSourceStorage::new(pool.clone());
        let provisioner = SourceProvisioner::with_client(sync_client, source_storage.clone());

        Self {
            user_storage: Arc::new(UserStorage::new(pool.clone())),
            organization_storage: Arc::new(OrganizationStorage::new(pool.clone())),
            token_storage: Arc::new(TokenStorage::new(pool.clone())),
            tag_storage: Arc::new(TagStorage::new(pool.clone())),
            source_storage,
            provisioner: Arc::new(provisioner),
            partition_router: Arc::new(PartitionKeyRouter::new(ingestion_settings.clone())),
            replay_policy: Arc::new(ReplayEventPolicy::new(ingestion_settings)),
            pool,
        }
    }
}
