use std::env;

use log::*;

const DEFAULT_BTG_HOST: &str = "127.0.0.1";
const DEFAULT_BTG_PORT: u16 = 4460;
const DEFAULT_SHUTDOWN_TIMEOUT: u64 = 30;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// How many seconds workers get to finish their in-flight requests when the server is asked to stop.
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BTG_HOST.to_string(),
            port: DEFAULT_BTG_PORT,
            database_url: String::default(),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("BTG_HOST").ok().unwrap_or_else(|| DEFAULT_BTG_HOST.into());
        let port = env::var("BTG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for BTG_PORT. {e} Using the default, {DEFAULT_BTG_PORT}, instead."
                    );
                    DEFAULT_BTG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_BTG_PORT);
        let database_url = env::var("BTG_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ BTG_DATABASE_URL is not set. Please set it to the URL for the marketplace database.");
            String::default()
        });
        let shutdown_timeout = env::var("BTG_SHUTDOWN_TIMEOUT")
            .map_err(|_| {
                info!(
                    "🪛️ BTG_SHUTDOWN_TIMEOUT is not set. Using the default value of {DEFAULT_SHUTDOWN_TIMEOUT} secs."
                )
            })
            .and_then(|s| {
                s.parse::<u64>().map_err(|e| warn!("🪛️ Invalid configuration value for BTG_SHUTDOWN_TIMEOUT. {e}"))
            })
            .ok()
            .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT);
        Self { host, port, database_url, shutdown_timeout }
    }
}
