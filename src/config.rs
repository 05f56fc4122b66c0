//! Process settings. Built once at startup and passed to the loader and server.

use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_DATASET: &str = "sample";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    pub dataset: String,
    pub log_filter: String,
    /// `*` allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            dataset: DEFAULT_DATASET.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            bind_addr: get("POKEFINDER_BIND").unwrap_or(defaults.bind_addr),
            data_dir: get("POKEFINDER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            dataset: get("POKEFINDER_DATASET").unwrap_or(defaults.dataset),
            log_filter: get("POKEFINDER_LOG").unwrap_or(defaults.log_filter),
            cors_origins: get("POKEFINDER_CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }

    pub fn fixtures_dir(&self) -> PathBuf {
        self.data_dir.join("fixtures").join(&self.dataset)
    }
}
