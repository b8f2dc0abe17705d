// ABOUTME: HTTP server configuration
// ABOUTME: Bind address, database location and CORS origin read from the environment

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use tally_config::constants::{TALLY_API_HOST, TALLY_API_PORT, TALLY_CORS_ORIGIN, TALLY_DATABASE_PATH};
use tally_config::{ConfigError, EnvLookup, ProcessEnv};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// `None` uses `~/.tally/tally.db`
    pub database_path: Option<PathBuf>,
    pub cors_origin: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&ProcessEnv)
    }

    pub fn from_lookup<E: EnvLookup + ?Sized>(env: &E) -> Result<Self, ConfigError> {
        let port = match non_empty(env, TALLY_API_PORT) {
            Some(raw) => match raw.parse::<u16>() {
                Ok(port) if port != 0 => port,
                _ => return Err(invalid(TALLY_API_PORT, raw)),
            },
            None => DEFAULT_PORT,
        };

        let host = match non_empty(env, TALLY_API_HOST) {
            Some(raw) => raw.parse::<IpAddr>().map_err(|_| invalid(TALLY_API_HOST, raw))?,
            None => DEFAULT_HOST,
        };

        Ok(Self {
            host,
            port,
            database_path: non_empty(env, TALLY_DATABASE_PATH).map(PathBuf::from),
            cors_origin: non_empty(env, TALLY_CORS_ORIGIN)
                .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn non_empty<E: EnvLookup + ?Sized>(env: &E, key: &str) -> Option<String> {
    env.lookup(key)
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn invalid(key: &str, value: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    }
}
