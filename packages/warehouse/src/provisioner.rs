// ABOUTME: Orchestrates provisioning of a new external data source
// ABOUTME: Source, destination and connection are created remotely, persisted, then synced

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::error::{ProvisionError, ProvisionResult, ProvisionStep};
use crate::providers::{
    ConnectionProvider, DestinationProvider, ProviderResult, SourceProvider, StripeSourcePayload,
};
use crate::rollback::{Compensation, Compensator, RollbackStack};
use crate::storage::ExternalDataSourceStorage;
use crate::types::{NewExternalDataSource, SourceType, StripeSourceInput, STATUS_RUNNING};

/// Result of a successful provisioning run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedSource {
    pub id: String,
    pub source_id: String,
    pub connection_id: String,
}

#[derive(Clone)]
pub struct SourceProvisioner {
    sources: Arc<dyn SourceProvider>,
    destinations: Arc<dyn DestinationProvider>,
    connections: Arc<dyn ConnectionProvider>,
    storage: ExternalDataSourceStorage,
}

impl SourceProvisioner {
    pub fn new(
        sources: Arc<dyn SourceProvider>,
        destinations: Arc<dyn DestinationProvider>,
        connections: Arc<dyn ConnectionProvider>,
        storage: ExternalDataSourceStorage,
    ) -> Self {
        Self {
            sources,
            destinations,
            connections,
            storage,
        }
    }

    /// Build a provisioner whose three providers are one client
    pub fn with_client<P>(client: Arc<P>, storage: ExternalDataSourceStorage) -> Self
    where
        P: SourceProvider + DestinationProvider + ConnectionProvider + 'static,
    {
        Self::new(client.clone(), client.clone(), client, storage)
    }

    pub fn storage(&self) -> &ExternalDataSourceStorage {
        &self.storage
    }

    /// Provision a Stripe source for `team_id`.
    ///
    /// Any failure before the local record exists unwinds the remote resources
    /// created so far and returns the original error. A failure to start the
    /// initial sync keeps the record.
    pub async fn create_stripe_source(
        &self,
        team_id: i64,
        created_by_id: Option<String>,
        input: StripeSourceInput,
    ) -> ProvisionResult<ProvisionedSource> {
        input.validate().map_err(ProvisionError::Validation)?;

        info!("Provisioning Stripe source for team {}", team_id);
        let mut rollback = RollbackStack::new();

        let payload = StripeSourcePayload {
            account_id: input.account_id,
            client_secret: input.client_secret,
        };
        let source = self
            .sources
            .create_stripe_source(&payload)
            .await
            .map_err(ProvisionError::provider(ProvisionStep::CreateSource))?;
        rollback.push(Compensation::DeleteSource(source.source_id.clone()));

        let destination = match self.destinations.create_destination(team_id).await {
            Ok(destination) => destination,
            Err(e) => {
                return Err(self
                    .abort(rollback, ProvisionError::provider(ProvisionStep::CreateDestination)(e))
                    .await)
            }
        };
        rollback.push(Compensation::DeleteDestination(destination.destination_id.clone()));

        let connection = match self
            .connections
            .create_connection(&source.source_id, &destination.destination_id)
            .await
        {
            Ok(connection) => connection,
            Err(e) => {
                return Err(self
                    .abort(rollback, ProvisionError::provider(ProvisionStep::CreateConnection)(e))
                    .await)
            }
        };
        rollback.push(Compensation::DeleteConnection(connection.connection_id.clone()));

        let record = match self
            .storage
            .create(NewExternalDataSource {
                source_id: source.source_id.clone(),
                connection_id: connection.connection_id.clone(),
                team_id,
                status: STATUS_RUNNING.to_string(),
                source_type: SourceType::Stripe,
                created_by_id,
            })
            .await
        {
            Ok(record) => record,
            Err(e) => return Err(self.abort(rollback, ProvisionError::Storage(e)).await),
        };
        rollback.commit();

        self.connections
            .start_sync(&connection.connection_id)
            .await
            .map_err(|e| {
                error!(
                    "Initial sync failed to start for connection {}: {}",
                    connection.connection_id, e
                );
                ProvisionError::provider(ProvisionStep::StartSync)(e)
            })?;

        info!(
            "Provisioned source {} with connection {} for team {}",
            record.source_id, record.connection_id, team_id
        );

        Ok(ProvisionedSource {
            id: record.id,
            source_id: record.source_id,
            connection_id: record.connection_id,
        })
    }

    /// Unwind completed steps and hand back the error that caused the abort
    async fn abort(&self, rollback: RollbackStack, cause: ProvisionError) -> ProvisionError {
        warn!("Provisioning aborted, rolling back {} step(s): {}", rollback.len(), cause);

        let report = rollback.unwind(self).await;
        if !report.failed.is_empty() {
            error!(
                "{} rollback step(s) failed; remote resources may be orphaned",
                report.failed.len()
            );
        }

        cause
    }
}

#[async_trait]
impl Compensator for SourceProvisioner {
    async fn compensate(&self, step: &Compensation) -> ProviderResult<()> {
        match step {
            Compensation::DeleteSource(id) => self.sources.delete_source(id).await,
            Compensation::DeleteDestination(id) => self.destinations.delete_destination(id).await,
            Compensation::DeleteConnection(id) => self.connections.delete_connection(id).await,
        }
    }
}
