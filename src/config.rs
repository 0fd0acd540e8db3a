use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// Default configuration constants
const DEFAULT_MAX_IDLE_PER_HOST: usize = 10;
const DEFAULT_POOL_IDLE_TIMEOUT_SECONDS: u64 = 90;

const URL_ENV: &str = "MATTERMOST_URL";
const TOKEN_ENV: &str = "MATTERMOST_TOKEN";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub mattermost: MattermostConfig,
    pub connection: ConnectionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MattermostConfig {
    /// Server base URL, without the `/api/v4` prefix
    pub url: String,
    /// Personal access token or bot token, sent as a bearer token
    pub token: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionConfig {
    /// Request timeout. Unset means the HTTP client never times out a call.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    pub max_idle_per_host: usize,
    pub pool_idle_timeout_seconds: u64,
}

impl Config {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut settings = config::Config::builder();

        // Default values
        settings = settings
            .set_default("mattermost.url", "")?
            .set_default("mattermost.token", "")?
            .set_default("connection.max_idle_per_host", DEFAULT_MAX_IDLE_PER_HOST as u64)?
            .set_default(
                "connection.pool_idle_timeout_seconds",
                DEFAULT_POOL_IDLE_TIMEOUT_SECONDS,
            )?;

        // Load from config file if provided
        if let Some(path) = config_path
            && Path::new(path).exists()
        {
            settings = settings.add_source(config::File::with_name(path));
        }

        // Override with environment variables
        settings = settings.add_source(
            config::Environment::with_prefix("MATTERMOST")
                .prefix_separator("_")
                .separator("__"),
        );

        if let Ok(url) = std::env::var(URL_ENV) {
            settings = settings.set_override("mattermost.url", url)?;
        }

        if let Ok(token) = std::env::var(TOKEN_ENV) {
            settings = settings.set_override("mattermost.token", token)?;
        }

        let mut config: Config = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject empty credentials and normalize the base URL
    pub fn validate(&mut self) -> Result<()> {
        if self.mattermost.url.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "Mattermost server URL required: set {}",
                URL_ENV
            ));
        }
        if self.mattermost.token.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "Mattermost access token required: set {}",
                TOKEN_ENV
            ));
        }

        self.mattermost.url = self.mattermost.url.trim_end_matches('/').to_string();
        Ok(())
    }
}
