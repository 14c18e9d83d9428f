use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE_NAME: &str = "goLangApi";
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_uri: String,
    pub database_name: String,
    pub server_address: String,
    /// Deadline applied to the store interaction of every user operation.
    pub request_timeout: Duration,
    /// Upper bound for server selection and the startup ping.
    pub connect_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mongo_uri: DEFAULT_MONGO_URI.to_string(),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECONDS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            mongo_uri: env::var("MONGOURI")
                .unwrap_or_else(|_| DEFAULT_MONGO_URI.to_string()),
            database_name: env::var("MONGO_DATABASE")
                .unwrap_or_else(|_| DEFAULT_DATABASE_NAME.to_string()),
            server_address: env::var("SERVER_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string()),
            request_timeout: Duration::from_secs(seconds_from_env(
                "REQUEST_TIMEOUT_SECONDS",
                DEFAULT_REQUEST_TIMEOUT_SECONDS,
            )?),
            connect_timeout: Duration::from_secs(seconds_from_env(
                "CONNECT_TIMEOUT_SECONDS",
                DEFAULT_CONNECT_TIMEOUT_SECONDS,
            )?),
        })
    }
}

fn seconds_from_env(key: &str, default: u64) -> Result<u64> {
    match env::var(key) {
        Ok(raw) => {
            let seconds: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds, got '{}'", key, raw))?;
            if seconds == 0 {
                anyhow::bail!("{} must be greater than zero", key);
            }
            Ok(seconds)
        }
        Err(_) => Ok(default),
    }
}
