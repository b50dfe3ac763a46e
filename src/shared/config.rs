//! Application configuration. Storage location and backend, display name.

use serde::Deserialize;
use std::path::PathBuf;

/// Default data directory when `CAREFLOW_DATA_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// File name of the key-value store inside the data directory.
pub const STORAGE_FILE: &str = "storage.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// JSON file under `data_dir`; survives restarts.
    #[default]
    File,
    /// Process memory only.
    Memory,
}

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Read from CAREFLOW_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Storage backend: "file" or "memory". Read from CAREFLOW_STORAGE.
    #[serde(default)]
    pub storage: StorageKind,

    /// Display name for the seed state (ignored once a snapshot exists). Read from CAREFLOW_USER_NAME.
    #[serde(default)]
    pub user_name: Option<String>,
}

impl AppConfig {
    /// Environment (CAREFLOW_*), then the file named by CAREFLOW_CONFIG if set.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("CAREFLOW"));
        if let Ok(path) = std::env::var("CAREFLOW_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    pub fn data_dir_or_default(&self) -> PathBuf {
        PathBuf::from(
            self.data_dir
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(DEFAULT_DATA_DIR),
        )
    }

    pub fn storage_path(&self) -> PathBuf {
        self.data_dir_or_default().join(STORAGE_FILE)
    }

    /// Configured display name, if non-blank.
    pub fn user_name(&self) -> Option<&str> {
        self.user_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(src: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(src, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.storage, StorageKind::File);
        assert_eq!(cfg.storage_path(), PathBuf::from("./data").join("storage.json"));
        assert_eq!(cfg.user_name(), None);
    }

    #[test]
    fn test_from_file_source() {
        let cfg = from_toml(
            r#"
            data_dir = "/var/lib/careflow"
            storage = "memory"
            user_name = "  Miranda Bailey "
            "#,
        );
        assert_eq!(cfg.storage, StorageKind::Memory);
        assert_eq!(cfg.storage_path(), PathBuf::from("/var/lib/careflow/storage.json"));
        assert_eq!(cfg.user_name(), Some("Miranda Bailey"));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let cfg = from_toml("data_dir = \"  \"\nuser_name = \"\"");
        assert_eq!(cfg.data_dir_or_default(), PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(cfg.user_name(), None);
    }

    #[test]
    fn test_unknown_storage_kind_rejected() {
        let r = config::Config::builder()
            .add_source(config::File::from_str("storage = \"s3\"", config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize::<AppConfig>();
        assert!(r.is_err());
    }
}
