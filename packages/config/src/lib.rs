// ABOUTME: Configuration loading for Tally
// ABOUTME: Environment variable names, typed coercion helpers, and ingestion settings

pub mod constants;
pub mod env;
pub mod ingestion;

pub use env::{
    get_bool_from_env, get_from_env, get_list, get_list_from_env, require_from_env, str_to_bool,
    ConfigError, EnvLookup, ProcessEnv,
};
pub use ingestion::{
    IngestionSettings, RuntimeEnvironment, EVENTS_DEAD_LETTER_QUEUE_STATSD_METRIC,
    REPLAY_RETENTION_DAYS_MAX, REPLAY_RETENTION_DAYS_MIN,
};
