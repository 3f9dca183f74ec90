use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::forms::ValuePolicy;

const APP_DIR: &str = "Graph-Desk";

/// Environment variable that overrides the stored API base url.
pub const API_URL_ENV: &str = "GRAPH_DESK_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "AppSettings::default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "AppSettings::default_search_limit")]
    pub default_search_limit: u32,
    #[serde(default)]
    pub value_policy: ValuePolicy,
    // Request traffic file, off unless asked for
    #[serde(default)]
    pub request_log_enabled: bool,
    // If None, request logs go to the OS temp dir
    #[serde(default)]
    pub request_log_override: Option<PathBuf>,
    // If None, use OS temporary directory for exports
    #[serde(default)]
    pub export_override: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_base_url: Self::default_api_base_url(),
            default_search_limit: Self::default_search_limit(),
            value_policy: ValuePolicy::default(),
            request_log_enabled: false,
            request_log_override: None,
            export_override: None,
        }
    }
}

impl AppSettings {
    fn config_dir() -> PathBuf {
        #[cfg(target_os = "macos")]
        {
            // ~/Library/Application Support/Graph-Desk
            let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("~"));
            return home.join("Library").join("Application Support").join(APP_DIR);
        }
        #[cfg(target_os = "windows")]
        {
            if let Ok(appdata) = std::env::var("APPDATA") {
                return PathBuf::from(appdata).join(APP_DIR);
            }
            return PathBuf::from(APP_DIR);
        }
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            // $XDG_CONFIG_HOME/Graph-Desk or ~/.config/Graph-Desk
            if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
                return PathBuf::from(xdg).join(APP_DIR);
            }
            let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("~"));
            return home.join(".config").join(APP_DIR);
        }
    }

    pub(crate) fn default_api_base_url() -> String { "http://127.0.0.1:8000/api/".to_string() }
    pub(crate) fn default_search_limit() -> u32 { 100 }

    pub fn settings_path() -> PathBuf { Self::config_dir().join("settings.json") }

    /// Reads settings.json, or returns defaults when it does not exist yet.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::settings_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let mut f = fs::File::open(&path)?;
        let mut s = String::new();
        f.read_to_string(&mut s)?;
        Ok(serde_json::from_str(&s)?)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;
        let s = serde_json::to_string_pretty(self)?;
        let mut f = fs::File::create(dir.join("settings.json"))?;
        f.write_all(s.as_bytes())?;
        Ok(())
    }

    /// Applies `GRAPH_DESK_API_URL` when set and non-blank.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            self.api_base_url = url.trim().to_string();
        }
        self
    }

    /// Directory where the settings file (settings.json) is stored.
    pub fn settings_dir() -> PathBuf { Self::config_dir() }

    /// {temp_dir}/Graph-Desk/exports
    pub fn export_default_dir() -> PathBuf { std::env::temp_dir().join(APP_DIR).join("exports") }

    pub fn export_dir(&self) -> PathBuf {
        if let Some(p) = &self.export_override { return p.clone(); }
        Self::export_default_dir()
    }

    /// {temp_dir}/Graph-Desk/request-logs
    pub fn request_log_default_dir() -> PathBuf { std::env::temp_dir().join(APP_DIR).join("request-logs") }

    pub fn request_log_dir(&self) -> PathBuf {
        if let Some(p) = &self.request_log_override { return p.clone(); }
        Self::request_log_default_dir()
    }

    /// Search limit used when the form's limit is blank, zero or invalid.
    pub fn search_limit(&self) -> u32 {
        if self.default_search_limit == 0 { Self::default_search_limit() } else { self.default_search_limit }
    }
}
