// ABOUTME: External data warehouse sources for Tally
// ABOUTME: Remote provisioning through the sync service with rollback, plus local source records

pub mod config;
pub mod error;
pub mod providers;
pub mod provisioner;
pub mod rollback;
pub mod storage;
pub mod types;

pub use config::WarehouseConfig;
pub use error::{ProvisionError, ProvisionResult, ProvisionStep};
pub use providers::{
    ConnectionProvider, DestinationProvider, ProviderError, ProviderResult, RemoteConnection,
    RemoteDestination, RemoteSource, SourceProvider, StripeSourcePayload, SyncServiceClient,
    UnconfiguredSyncService,
};
pub use provisioner::{ProvisionedSource, SourceProvisioner};
pub use rollback::{Compensation, Compensator, RollbackStack, UnwindReport};
pub use storage::ExternalDataSourceStorage;
pub use types::{
    CreatedBy, ExternalDataSource, NewExternalDataSource, SourceType, StripeSourceInput,
    STATUS_RUNNING,
};
