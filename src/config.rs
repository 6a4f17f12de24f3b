use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_VERSION: u64 = 1;

/// Browser local storage allows roughly 5 MiB per origin.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("compass")
}

fn default_projects() -> Vec<String> {
    vec![
        "Health".into(),
        "Career".into(),
        "Finance".into(),
        "Relationships".into(),
        "Personal Growth".into(),
    ]
}

fn default_version() -> u64 {
    CONFIG_VERSION
}

fn default_quota() -> usize {
    DEFAULT_QUOTA_BYTES
}

fn default_sync_delay_ms() -> u64 {
    1000
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CompassConfig {
    #[serde(default = "default_version")]
    pub version: u64,
    #[serde(default = "default_data_dir")]
    pub data_directory: PathBuf,
    /// Largest serialized value accepted per key; 0 disables the check.
    #[serde(default = "default_quota")]
    pub storage_quota_bytes: usize,
    #[serde(default)]
    pub debug_logging: bool,
    #[serde(default = "default_projects")]
    pub default_projects: Vec<String>,
    /// Simulated latency of the stub login and playlist sync.
    #[serde(default = "default_sync_delay_ms")]
    pub sync_delay_ms: u64,
}

impl Default for CompassConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data_directory: default_data_dir(),
            storage_quota_bytes: DEFAULT_QUOTA_BYTES,
            debug_logging: false,
            default_projects: default_projects(),
            sync_delay_ms: default_sync_delay_ms(),
        }
    }
}

impl CompassConfig {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("compass")
            .join("config.json")
    }

    /// Read the config file. Missing or unreadable files give the defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("Invalid config at {}: {}, using defaults", path.display(), e);
                Self::default()
            }),
            Err(_) => {
                log::debug!("No config at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Ensure the data directory exists.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_directory)
    }

    pub fn sync_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.sync_delay_ms)
    }
}
