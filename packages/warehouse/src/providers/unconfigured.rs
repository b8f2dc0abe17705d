// ABOUTME: Provider used when the sync service is not configured
// ABOUTME: Every call fails with a configuration error so provisioning reports it cleanly

use async_trait::async_trait;

use super::{
    ConnectionProvider, DestinationProvider, ProviderError, ProviderResult, RemoteConnection,
    RemoteDestination, RemoteSource, SourceProvider, StripeSourcePayload,
};

#[derive(Debug, Clone)]
pub struct UnconfiguredSyncService {
    reason: String,
}

impl UnconfiguredSyncService {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> ProviderError {
        ProviderError::Configuration(self.reason.clone())
    }
}

#[async_trait]
impl SourceProvider for UnconfiguredSyncService {
    async fn create_stripe_source(&self, _payload: &StripeSourcePayload) -> ProviderResult<RemoteSource> {
        Err(self.error())
    }

    async fn delete_source(&self, _source_id: &str) -> ProviderResult<()> {
        Err(self.error())
    }
}

#[async_trait]
impl DestinationProvider for UnconfiguredSyncService {
    async fn create_destination(&self, _team_id: i64) -> ProviderResult<RemoteDestination> {
        Err(self.error())
    }

    async fn delete_destination(&self, _destination_id: &str) -> ProviderResult<()> {
        Err(self.error())
    }
}

#[async_trait]
impl ConnectionProvider for UnconfiguredSyncService {
    async fn create_connection(
        &self,
        _source_id: &str,
        _destination_id: &str,
    ) -> ProviderResult<RemoteConnection> {
        Err(self.error())
    }

    async fn delete_connection(&self, _connection_id: &str) -> ProviderResult<()> {
        Err(self.error())
    }

    async fn start_sync(&self, _connection_id: &str) -> ProviderResult<()> {
        Err(self.error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_call_reports_configuration_error() {
        let service = UnconfiguredSyncService::new("SYNC_SERVICE_API_URL is not set");

        let err = service.create_destination(1).await.unwrap_err();
        assert_eq!(
            err,
            ProviderError::Configuration("SYNC_SERVICE_API_URL is not set".to_string())
        );
        assert!(service.start_sync("conn").await.is_err());
    }
}
