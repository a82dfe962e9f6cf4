use std::{collections::HashMap, fs};

use serde::Deserialize;

const SERVER_CONFIG_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub artifacts_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            artifacts_dir: "./artifacts".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SERVER_CONFIG_FILE) {
        apply_file_overrides(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    match toml::from_str::<HashMap<String, String>>(raw) {
        Ok(file_cfg) => {
            if let Some(v) = file_cfg.get("bind_addr") {
                settings.server_bind = v.clone();
            }
            if let Some(v) = file_cfg.get("artifacts_dir") {
                settings.artifacts_dir = v.clone();
            }
        }
        Err(error) => tracing::warn!(%error, "ignoring unreadable {SERVER_CONFIG_FILE}"),
    }
}

/// Later names win, so `APP__*` overrides the short form.
fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    for name in ["SERVER_BIND", "APP__BIND_ADDR"] {
        if let Some(v) = lookup(name) {
            settings.server_bind = v;
        }
    }
    for name in ["ARTIFACTS_DIR", "APP__ARTIFACTS_DIR"] {
        if let Some(v) = lookup(name) {
            settings.artifacts_dir = v;
        }
    }
}
