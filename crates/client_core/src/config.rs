use std::{collections::HashMap, fs};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
const CLIENT_CONFIG_FILE: &str = "client.toml";
const SERVER_URL_ENV: &str = "PRICE_SERVER_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid server url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("server url '{0}' must use http or https")]
    UnsupportedScheme(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSettings {
    pub server_url: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
        }
    }
}

impl ClientSettings {
    pub fn with_server_url(mut self, server_url: Option<String>) -> Self {
        if let Some(url) = server_url {
            self.server_url = url;
        }
        self
    }

    /// Validated base URL without a trailing slash.
    pub fn normalized_server_url(&self) -> Result<String, ConfigError> {
        let raw = self.server_url.trim();
        let parsed = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
            url: raw.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(raw.to_string()));
        }
        Ok(parsed.as_str().trim_end_matches('/').to_string())
    }
}

pub fn load_client_settings() -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(CLIENT_CONFIG_FILE) {
        apply_file_overrides(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var(SERVER_URL_ENV) {
        if !v.trim().is_empty() {
            settings.server_url = v;
        }
    }

    settings
}

fn apply_file_overrides(settings: &mut ClientSettings, raw: &str) {
    match toml::from_str::<HashMap<String, String>>(raw) {
        Ok(file_cfg) => {
            if let Some(v) = file_cfg.get("server_url") {
                settings.server_url = v.clone();
            }
        }
        Err(error) => tracing::warn!(%error, "ignoring unreadable {CLIENT_CONFIG_FILE}"),
    }
}
