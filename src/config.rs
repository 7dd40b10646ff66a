use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{ReelError, Result};
use crate::tmdb::Auth;

const DEFAULT_LANGUAGE: &str = "en-US";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ApiConfig {
    /// TMDB v4 read access token (preferred).
    pub read_token: Option<String>,
    /// TMDB v3 API key.
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GeneralConfig {
    pub language: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("reel").join("config.toml"))
}

impl Config {
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Config::default();
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        toml::from_str::<Config>(&content).unwrap_or_default()
    }

    /// Credentials, with environment variables taking precedence over
    /// the config file.
    pub fn resolve_auth(&self) -> Result<Auth> {
        let read_token = env_var("TMDB_READ_TOKEN").or_else(|| self.api.read_token.clone());
        let api_key = env_var("TMDB_API_KEY").or_else(|| self.api.api_key.clone());
        pick_auth(read_token, api_key)
    }

    pub fn language(&self, override_lang: Option<String>) -> String {
        override_lang
            .or_else(|| self.general.language.clone())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn pick_auth(read_token: Option<String>, api_key: Option<String>) -> Result<Auth> {
    if let Some(token) = read_token.filter(|t| !t.trim().is_empty()) {
        return Ok(Auth::Bearer(token));
    }
    if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
        return Ok(Auth::ApiKey(key));
    }
    Err(ReelError::Auth(
        "missing TMDB credentials: set TMDB_READ_TOKEN or TMDB_API_KEY, \
         or add them to the [api] section of the config file"
            .to_string(),
    ))
}
