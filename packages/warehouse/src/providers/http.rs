// ABOUTME: HTTP client for the warehouse sync service
// ABOUTME: Implements the source, destination and connection providers over its JSON REST API

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{
    ConnectionProvider, DestinationProvider, ProviderError, ProviderResult, RemoteConnection,
    RemoteDestination, RemoteSource, SourceProvider, StripeSourcePayload,
};
use crate::config::WarehouseConfig;

/// Earliest Stripe data pulled by a new source
pub const STRIPE_START_DATE: &str = "2023-01-01T00:00:00Z";

/// Longest error body kept from a failed response
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Sync cadence for new connections (hourly)
pub const CONNECTION_CRON_EXPRESSION: &str = "0 0 * * * ?";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SourceResponse {
    source_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DestinationResponse {
    destination_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionResponse {
    connection_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobResponse {
    job_id: Value,
}

#[derive(Clone)]
pub struct SyncServiceClient {
    http_client: Client,
    config: WarehouseConfig,
}

impl SyncServiceClient {
    pub fn new(config: WarehouseConfig) -> ProviderResult<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Configuration(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &WarehouseConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url, path)
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> ProviderResult<T> {
        let url = self.url(path);
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }

    async fn delete(&self, path: &str) -> ProviderResult<()> {
        let url = self.url(path);
        debug!("DELETE {}", url);

        let response = self
            .http_client
            .delete(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn check_status(response: Response) -> ProviderResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_else(|_| status.to_string());
        Err(ProviderError::Api {
            status: status.as_u16(),
            body: tally_core::truncate(&body, MAX_ERROR_BODY_CHARS).to_string(),
        })
    }
}

#[async_trait]
impl SourceProvider for SyncServiceClient {
    async fn create_stripe_source(&self, payload: &StripeSourcePayload) -> ProviderResult<RemoteSource> {
        let body = json!({
            "name": format!("stripe source {}", payload.account_id),
            "sourceType": "stripe",
            "workspaceId": self.config.workspace_id,
            "configuration": {
                "sourceType": "stripe",
                "account_id": payload.account_id,
                "client_secret": payload.client_secret,
                "start_date": STRIPE_START_DATE,
            },
        });

        let response: SourceResponse = self.post("sources", &body).await?;
        Ok(RemoteSource {
            source_id: response.source_id,
        })
    }

    async fn delete_source(&self, source_id: &str) -> ProviderResult<()> {
        self.delete(&format!("sources/{}", source_id)).await
    }
}

#[async_trait]
impl DestinationProvider for SyncServiceClient {
    async fn create_destination(&self, team_id: i64) -> ProviderResult<RemoteDestination> {
        let body = json!({
            "name": "S3 destination",
            "workspaceId": self.config.workspace_id,
            "configuration": {
                "destinationType": "s3",
                "s3_bucket_name": self.config.bucket_name,
                "s3_bucket_path": format!("airbyte/{}", team_id),
                "s3_bucket_region": self.config.bucket_region,
                "format": {
                    "format_type": "Parquet",
                    "compression_codec": "UNCOMPRESSED",
                },
            },
        });

        let response: DestinationResponse = self.post("destinations", &body).await?;
        Ok(RemoteDestination {
            destination_id: response.destination_id,
        })
    }

    async fn delete_destination(&self, destination_id: &str) -> ProviderResult<()> {
        self.delete(&format!("destinations/{}", destination_id)).await
    }
}

#[async_trait]
impl ConnectionProvider for SyncServiceClient {
    async fn create_connection(
        &self,
        source_id: &str,
        destination_id: &str,
    ) -> ProviderResult<RemoteConnection> {
        let body = json!({
            "name": format!("stripe connection {}", source_id),
            "sourceId": source_id,
            "destinationId": destination_id,
            "schedule": {
                "scheduleType": "cron",
                "cronExpression": CONNECTION_CRON_EXPRESSION,
            },
        });

        let response: ConnectionResponse = self.post("connections", &body).await?;
        Ok(RemoteConnection {
            connection_id: response.connection_id,
        })
    }

    async fn delete_connection(&self, connection_id: &str) -> ProviderResult<()> {
        self.delete(&format!("connections/{}", connection_id)).await
    }

    async fn start_sync(&self, connection_id: &str) -> ProviderResult<()> {
        let body = json!({
            "connectionId": connection_id,
            "jobType": "sync",
        });

        let response: JobResponse = self.post("jobs", &body).await?;
        debug!("Started sync job {} for connection {}", response.job_id, connection_id);
        Ok(())
    }
}
