// ABOUTME: Sync service configuration
// ABOUTME: Endpoint, credentials, workspace and destination bucket read from the environment

use std::time::Duration;

use tally_config::constants::{
    SYNC_SERVICE_API_KEY, SYNC_SERVICE_API_URL, SYNC_SERVICE_TIMEOUT_SECS,
    SYNC_SERVICE_WORKSPACE_ID, WAREHOUSE_BUCKET_NAME, WAREHOUSE_BUCKET_REGION,
};
use tally_config::{get_from_env, require_from_env, ConfigError, EnvLookup, ProcessEnv};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BUCKET_REGION: &str = "us-east-1";

#[derive(Debug, Clone, PartialEq)]
pub struct WarehouseConfig {
    pub api_url: String,
    pub api_key: String,
    pub workspace_id: String,
    pub bucket_name: String,
    pub bucket_region: String,
    pub timeout: Duration,
}

impl WarehouseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&ProcessEnv)
    }

    pub fn from_lookup<E: EnvLookup + ?Sized>(env: &E) -> Result<Self, ConfigError> {
        let api_url: String = require_from_env(env, SYNC_SERVICE_API_URL)?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: require_from_env(env, SYNC_SERVICE_API_KEY)?,
            workspace_id: require_from_env(env, SYNC_SERVICE_WORKSPACE_ID)?,
            bucket_name: require_from_env(env, WAREHOUSE_BUCKET_NAME)?,
            bucket_region: get_from_env(env, WAREHOUSE_BUCKET_REGION, DEFAULT_BUCKET_REGION.to_string()),
            timeout: Duration::from_secs(get_from_env(env, SYNC_SERVICE_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS)),
        })
    }
}
