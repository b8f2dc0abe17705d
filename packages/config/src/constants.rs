// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Tally

// Runtime Mode
pub const DEBUG: &str = "DEBUG";
pub const TEST: &str = "TEST";

// Server Configuration
pub const TALLY_API_PORT: &str = "TALLY_API_PORT";
pub const TALLY_API_HOST: &str = "TALLY_API_HOST";
pub const TALLY_DATABASE_PATH: &str = "TALLY_DATABASE_PATH";
pub const TALLY_CORS_ORIGIN: &str = "TALLY_CORS_ORIGIN";

// Ingestion
pub const INGESTION_LAG_METRIC_TEAM_IDS: &str = "INGESTION_LAG_METRIC_TEAM_IDS";
pub const BUFFER_CONVERSION_SECONDS: &str = "BUFFER_CONVERSION_SECONDS"; // Keep in sync with the plugin server
pub const EVENT_PARTITION_KEYS_TO_OVERRIDE: &str = "EVENT_PARTITION_KEYS_TO_OVERRIDE";
pub const QUOTA_LIMITING_ENABLED: &str = "QUOTA_LIMITING_ENABLED";
pub const PARTITION_KEY_AUTOMATIC_OVERRIDE_ENABLED: &str = "PARTITION_KEY_AUTOMATIC_OVERRIDE_ENABLED";
pub const PARTITION_KEY_BUCKET_CAPACITY: &str = "PARTITION_KEY_BUCKET_CAPACITY";
pub const PARTITION_KEY_BUCKET_REPLENTISH_RATE: &str = "PARTITION_KEY_BUCKET_REPLENTISH_RATE"; // Sic, deployed name
pub const REPLAY_EVENT_MAX_SIZE: &str = "REPLAY_EVENT_MAX_SIZE";
pub const SESSION_RECORDING_ALLOW_V1_INGESTION: &str = "SESSION_RECORDING_ALLOW_V1_INGESTION";

// Warehouse Sync Service
pub const SYNC_SERVICE_API_URL: &str = "SYNC_SERVICE_API_URL";
pub const SYNC_SERVICE_API_KEY: &str = "SYNC_SERVICE_API_KEY";
pub const SYNC_SERVICE_WORKSPACE_ID: &str = "SYNC_SERVICE_WORKSPACE_ID";
pub const SYNC_SERVICE_TIMEOUT_SECS: &str = "SYNC_SERVICE_TIMEOUT_SECS";
pub const WAREHOUSE_BUCKET_NAME: &str = "WAREHOUSE_BUCKET_NAME";
pub const WAREHOUSE_BUCKET_REGION: &str = "WAREHOUSE_BUCKET_REGION";

// System Environment Variables
pub const HOME: &str = "HOME";
