// ABOUTME: Typed coercion of environment variables with defaults
// ABOUTME: Best-effort parsing: malformed values fall back to the default with a warning

use std::collections::HashMap;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

/// Errors for variables that have no sensible default
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Source of environment values.
///
/// The process environment is the production source; tests pass a `HashMap`
/// so they never mutate global state.
pub trait EnvLookup {
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Reads from the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvLookup for HashMap<&str, &str> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.to_string())
    }
}

/// Interpret a string as a boolean flag.
///
/// `y`, `yes`, `t`, `true`, `on` and `1` (any case) are true; everything else is false.
pub fn str_to_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "y" | "yes" | "t" | "true" | "on" | "1"
    )
}

/// Split a comma separated value into trimmed, non-empty items
pub fn get_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Read `key` and parse it as `T`, returning `default` when unset, empty or malformed
pub fn get_from_env<T, E>(env: &E, key: &str, default: T) -> T
where
    T: FromStr,
    E: EnvLookup + ?Sized,
{
    match env.lookup(key) {
        Some(raw) if !raw.trim().is_empty() => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(key = %key, value = %raw, "Malformed environment value, using default");
                default
            }
        },
        _ => default,
    }
}

/// Read a required `key`, failing when unset, empty or unparsable
pub fn require_from_env<T, E>(env: &E, key: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    E: EnvLookup + ?Sized,
{
    let raw = env
        .lookup(key)
        .filter(|raw| !raw.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingVar(key.to_string()))?;

    raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.clone(),
    })
}

/// Read `key` as a boolean flag, returning `default` when unset or empty
pub fn get_bool_from_env<E>(env: &E, key: &str, default: bool) -> bool
where
    E: EnvLookup + ?Sized,
{
    match env.lookup(key) {
        Some(raw) if !raw.trim().is_empty() => str_to_bool(&raw),
        _ => default,
    }
}

/// Read `key` as a comma separated list, empty when unset
pub fn get_list_from_env<E>(env: &E, key: &str) -> Vec<String>
where
    E: EnvLookup + ?Sized,
{
    env.lookup(key).map(|raw| get_list(&raw)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_to_bool() {
        for truthy in ["y", "YES", "t", "True", "on", "1", " true "] {
            assert!(str_to_bool(truthy), "{truthy} should be true");
        }
        for falsy in ["n", "no", "false", "off", "0", "", "maybe"] {
            assert!(!str_to_bool(falsy), "{falsy} should be false");
        }
    }

    #[test]
    fn test_get_list() {
        assert!(get_list("").is_empty());
        assert_eq!(get_list("1, 2,,3 "), vec!["1", "2", "3"]);
        assert_eq!(get_list("2:myLovelyId"), vec!["2:myLovelyId"]);
    }

    #[test]
    fn test_get_from_env_defaults() {
        let env: HashMap<&str, &str> =
            HashMap::from([("GOOD", "42"), ("BAD", "forty-two"), ("EMPTY", "")]);

        assert_eq!(get_from_env(&env, "GOOD", 1i64), 42);
        assert_eq!(get_from_env(&env, "BAD", 1i64), 1);
        assert_eq!(get_from_env(&env, "EMPTY", 1i64), 1);
        assert_eq!(get_from_env(&env, "MISSING", 1.5f64), 1.5);
    }

    #[test]
    fn test_require_from_env() {
        let env: HashMap<&str, &str> =
            HashMap::from([("URL", "http://sync.local"), ("PORT", "eighty"), ("BLANK", " ")]);

        assert_eq!(
            require_from_env::<String, _>(&env, "URL").unwrap(),
            "http://sync.local"
        );
        assert_eq!(
            require_from_env::<u16, _>(&env, "PORT"),
            Err(ConfigError::InvalidValue {
                key: "PORT".to_string(),
                value: "eighty".to_string()
            })
        );
        assert_eq!(
            require_from_env::<String, _>(&env, "BLANK"),
            Err(ConfigError::MissingVar("BLANK".to_string()))
        );
    }

    #[test]
    fn test_get_bool_from_env() {
        let env: HashMap<&str, &str> = HashMap::from([("ON", "on"), ("OFF", "false")]);

        assert!(get_bool_from_env(&env, "ON", false));
        assert!(!get_bool_from_env(&env, "OFF", true));
        assert!(get_bool_from_env(&env, "MISSING", true));
    }
}
