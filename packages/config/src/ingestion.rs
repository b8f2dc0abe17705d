// ABOUTME: Ingestion settings loaded once at startup
// ABOUTME: Immutable struct shared by reference with the ingestion collaborators

use serde::Serialize;
use tracing::warn;

use crate::constants;
use crate::env::{get_bool_from_env, get_from_env, get_list_from_env, EnvLookup, ProcessEnv};

/// Metric name for events routed to the dead letter queue.
/// Keep in sync with the plugin server.
pub const EVENTS_DEAD_LETTER_QUEUE_STATSD_METRIC: &str = "events_added_to_dead_letter_queue";

pub const REPLAY_RETENTION_DAYS_MIN: u32 = 30;
pub const REPLAY_RETENTION_DAYS_MAX: u32 = 90;

const DEFAULT_BUFFER_CONVERSION_SECONDS: u64 = 60;
const DEFAULT_PARTITION_KEY_BUCKET_CAPACITY: u32 = 1000;
const DEFAULT_PARTITION_KEY_BUCKET_REPLENISH_RATE: f64 = 1.0;
const DEFAULT_REPLAY_EVENT_MAX_SIZE: usize = 1024 * 512; // 512kb

/// Whether the process runs in debug or test mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuntimeEnvironment {
    pub debug: bool,
    pub test: bool,
}

impl RuntimeEnvironment {
    pub fn production() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(&ProcessEnv)
    }

    pub fn from_lookup<E: EnvLookup + ?Sized>(env: &E) -> Self {
        Self {
            debug: get_bool_from_env(env, constants::DEBUG, false),
            test: get_bool_from_env(env, constants::TEST, false),
        }
    }

    pub fn is_production(&self) -> bool {
        !self.debug && !self.test
    }
}

/// Typed ingestion configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestionSettings {
    pub ingestion_lag_metric_team_ids: Vec<String>,
    pub buffer_conversion_seconds: u64,
    /// `<team_id>:<distinct_id>` pairs that always get a random partition
    pub event_partition_keys_to_override: Vec<String>,
    pub quota_limiting_enabled: bool,
    pub partition_key_automatic_override_enabled: bool,
    pub partition_key_bucket_capacity: u32,
    /// Tokens per second added back to each partition key bucket
    pub partition_key_bucket_replenish_rate: f64,
    pub replay_event_max_size: usize,
    /// Deprecated: recordings should go to blob storage
    pub session_recording_allow_v1_ingestion: bool,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            ingestion_lag_metric_team_ids: Vec::new(),
            buffer_conversion_seconds: DEFAULT_BUFFER_CONVERSION_SECONDS,
            event_partition_keys_to_override: Vec::new(),
            quota_limiting_enabled: false,
            partition_key_automatic_override_enabled: false,
            partition_key_bucket_capacity: DEFAULT_PARTITION_KEY_BUCKET_CAPACITY,
            partition_key_bucket_replenish_rate: DEFAULT_PARTITION_KEY_BUCKET_REPLENISH_RATE,
            replay_event_max_size: DEFAULT_REPLAY_EVENT_MAX_SIZE,
            session_recording_allow_v1_ingestion: true,
        }
    }
}

impl IngestionSettings {
    /// Load settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(&ProcessEnv, RuntimeEnvironment::from_env())
    }

    /// Load settings from an arbitrary environment source
    pub fn from_lookup<E: EnvLookup + ?Sized>(env: &E, runtime: RuntimeEnvironment) -> Self {
        let mut session_recording_allow_v1_ingestion =
            get_bool_from_env(env, constants::SESSION_RECORDING_ALLOW_V1_INGESTION, true);
        if !runtime.is_production() {
            session_recording_allow_v1_ingestion = false;
        }

        let settings = Self {
            ingestion_lag_metric_team_ids: get_list_from_env(
                env,
                constants::INGESTION_LAG_METRIC_TEAM_IDS,
            ),
            buffer_conversion_seconds: get_from_env(
                env,
                constants::BUFFER_CONVERSION_SECONDS,
                DEFAULT_BUFFER_CONVERSION_SECONDS,
            ),
            event_partition_keys_to_override: get_list_from_env(
                env,
                constants::EVENT_PARTITION_KEYS_TO_OVERRIDE,
            ),
            quota_limiting_enabled: get_bool_from_env(env, constants::QUOTA_LIMITING_ENABLED, false),
            partition_key_automatic_override_enabled: get_bool_from_env(
                env,
                constants::PARTITION_KEY_AUTOMATIC_OVERRIDE_ENABLED,
                false,
            ),
            partition_key_bucket_capacity: get_from_env(
                env,
                constants::PARTITION_KEY_BUCKET_CAPACITY,
                DEFAULT_PARTITION_KEY_BUCKET_CAPACITY,
            ),
            partition_key_bucket_replenish_rate: get_from_env(
                env,
                constants::PARTITION_KEY_BUCKET_REPLENTISH_RATE,
                DEFAULT_PARTITION_KEY_BUCKET_REPLENISH_RATE,
            ),
            replay_event_max_size: get_from_env(
                env,
                constants::REPLAY_EVENT_MAX_SIZE,
                DEFAULT_REPLAY_EVENT_MAX_SIZE,
            ),
            session_recording_allow_v1_ingestion,
        };

        if settings.warns_v1_deprecation(runtime) {
            warn!(
                "SESSION_RECORDING_ALLOW_V1_INGESTION is set to true! \
                 Session recordings v1 ingestion is deprecated and will be removed. \
                 You must set up blob storage. \
                 Future versions will not support storing recordings in the events database."
            );
        }

        settings
    }

    /// Whether loading these settings under `runtime` emits the v1 ingestion deprecation warning
    pub fn warns_v1_deprecation(&self, runtime: RuntimeEnvironment) -> bool {
        runtime.is_production() && self.session_recording_allow_v1_ingestion
    }
}
