// ABOUTME: Remote provisioning collaborators for warehouse sources
// ABOUTME: Source, destination and connection provider traits plus their shared error type

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod http;
pub mod unconfigured;

pub use http::SyncServiceClient;
pub use unconfigured::UnconfiguredSyncService;

/// Errors raised by the remote sync service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Stripe credentials sent to the sync service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeSourcePayload {
    pub account_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSource {
    pub source_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDestination {
    pub destination_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConnection {
    pub connection_id: String,
}

#[async_trait]
pub trait SourceProvider: Send + Sync {
    async fn create_stripe_source(&self, payload: &StripeSourcePayload) -> ProviderResult<RemoteSource>;
    async fn delete_source(&self, source_id: &str) -> ProviderResult<()>;
}

#[async_trait]
pub trait DestinationProvider: Send + Sync {
    /// Create the bucket destination a team's synced data lands in
    async fn create_destination(&self, team_id: i64) -> ProviderResult<RemoteDestination>;
    async fn delete_destination(&self, destination_id: &str) -> ProviderResult<()>;
}

#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    async fn create_connection(
        &self,
        source_id: &str,
        destination_id: &str,
    ) -> ProviderResult<RemoteConnection>;
    async fn delete_connection(&self, connection_id: &str) -> ProviderResult<()>;
    async fn start_sync(&self, connection_id: &str) -> ProviderResult<()>;
}
