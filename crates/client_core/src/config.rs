use std::{collections::HashMap, env, fs};

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".into(),
            request_timeout_seconds: 10,
        }
    }
}

/// Defaults, then `catalog.toml` in the working directory, then environment
/// overrides (`API_BASE_URL` / `APP__API_BASE_URL`,
/// `APP__REQUEST_TIMEOUT_SECONDS`), last writer wins.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("catalog.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("api_base_url") {
                settings.api_base_url = v.clone();
            }
            if let Some(v) = file_cfg.get("request_timeout_seconds") {
                if let Ok(parsed) = v.parse::<u64>() {
                    settings.request_timeout_seconds = parsed;
                }
            }
        }
    }

    if let Ok(v) = env::var("API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Ok(v) = env::var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Ok(v) = env::var("APP__REQUEST_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_seconds = parsed;
        }
    }

    settings
}
