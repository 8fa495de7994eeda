use crate::modal::SupersedePolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080/BookGetter/api";
const MAX_FADE_OUT_MS: u64 = 5_000;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Base URL of the BookGetter REST API
    pub api_base: String,

    /// Directory for the log file
    pub data_dir: PathBuf,

    /// Dialog fade-out before removal, in milliseconds
    pub fade_out_ms: u64,

    /// What happens to a dialog's future when a newer dialog replaces it
    pub supersede: SupersedePolicy,

    /// Capture mouse clicks (needed for backdrop dismissal)
    pub mouse_enabled: bool,

    /// Run on the built-in sample store instead of the REST API
    pub offline: bool,

    /// Timeout for each API request, in seconds
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            data_dir: dirs::data_local_dir()
                .map(|dir| dir.join("bookgetter"))
                .unwrap_or_else(|| PathBuf::from("./data")),
            fade_out_ms: 200,
            supersede: SupersedePolicy::Abandon,
            mouse_enabled: true,
            offline: false,
            request_timeout_secs: 10,
        }
    }
}

/// Values read from a configuration file; absent keys keep the current value
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FileConfig {
    pub api_base: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub fade_out_ms: Option<u64>,
    pub supersede: Option<SupersedePolicy>,
    pub mouse_enabled: Option<bool>,
    pub offline: Option<bool>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// Initialize configuration from defaults, environment and config files
    pub async fn init() -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = Self::default();
        config.load_from_env();

        if let Some(path) = Self::find_config_file() {
            let file_config = Self::load_from_file(&path).await?;
            config.merge_with(file_config);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `BOOKGETTER_*` environment variables
    pub fn load_from_env(&mut self) {
        self.load_from_lookup(|key| std::env::var(key).ok());
    }

    fn load_from_lookup(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(api_base) = lookup("BOOKGETTER_API_BASE") {
            self.api_base = api_base;
        }

        if let Some(data_dir) = lookup("BOOKGETTER_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }

        if let Some(fade) = lookup("BOOKGETTER_FADE_MS").and_then(|v| v.parse().ok()) {
            self.fade_out_ms = fade;
        }

        if let Some(policy) = lookup("BOOKGETTER_SUPERSEDE").and_then(|v| v.parse().ok()) {
            self.supersede = policy;
        }

        if let Some(mouse) = lookup("BOOKGETTER_MOUSE") {
            self.mouse_enabled = mouse.to_lowercase() != "false";
        }

        if let Some(offline) = lookup("BOOKGETTER_OFFLINE") {
            self.offline = offline.to_lowercase() == "true";
        }
    }

    /// First existing configuration file, in priority order:
    /// `./.bookgetter.json`, `./bookgetter.json`, then the user config dir.
    pub fn find_config_file() -> Option<PathBuf> {
        let mut candidates = vec![
            PathBuf::from("./.bookgetter.json"),
            PathBuf::from("./bookgetter.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("bookgetter").join("bookgetter.json"));
        }

        candidates.into_iter().find(|path| path.exists())
    }

    pub async fn load_from_file(path: &Path) -> Result<FileConfig> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    /// Merge file values into this configuration
    pub fn merge_with(&mut self, other: FileConfig) {
        if let Some(api_base) = other.api_base {
            self.api_base = api_base;
        }
        if let Some(data_dir) = other.data_dir {
            self.data_dir = data_dir;
        }
        if let Some(fade) = other.fade_out_ms {
            self.fade_out_ms = fade;
        }
        if let Some(policy) = other.supersede {
            self.supersede = policy;
        }
        if let Some(mouse) = other.mouse_enabled {
            self.mouse_enabled = mouse;
        }
        if let Some(offline) = other.offline {
            self.offline = offline;
        }
        if let Some(timeout) = other.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
    }

    pub fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.fade_out_ms > MAX_FADE_OUT_MS {
            return Err(anyhow::anyhow!(
                "fade_out_ms must be at most {} (got {})",
                MAX_FADE_OUT_MS,
                self.fade_out_ms
            ));
        }

        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "api_base must be an http(s) URL (got '{}')",
                self.api_base
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("request_timeout_secs must be greater than 0"));
        }

        Ok(())
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("bookgetter.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.fade_out(), Duration::from_millis(200));
        assert_eq!(config.supersede, SupersedePolicy::Abandon);
        assert!(config.mouse_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("BOOKGETTER_API_BASE", "https://shop.example/api"),
            ("BOOKGETTER_FADE_MS", "0"),
            ("BOOKGETTER_SUPERSEDE", "cancel"),
            ("BOOKGETTER_MOUSE", "false"),
            ("BOOKGETTER_OFFLINE", "TRUE"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.load_from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_base, "https://shop.example/api");
        assert_eq!(config.fade_out_ms, 0);
        assert_eq!(config.supersede, SupersedePolicy::Cancel);
        assert!(!config.mouse_enabled);
        assert!(config.offline);
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let mut config = Config::default();
        config.load_from_lookup(|key| match key {
            "BOOKGETTER_FADE_MS" => Some("soon".to_string()),
            "BOOKGETTER_SUPERSEDE" => Some("reject".to_string()),
            _ => None,
        });

        assert_eq!(config.fade_out_ms, 200);
        assert_eq!(config.supersede, SupersedePolicy::Abandon);
    }

    #[tokio::test]
    async fn test_file_merge_keeps_unset_values() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("bookgetter.json");
        tokio::fs::write(&path, r#"{"fade_out_ms": 350, "supersede": "cancel"}"#)
            .await
            .unwrap();

        let mut config = Config::default();
        config.merge_with(Config::load_from_file(&path).await.unwrap());

        assert_eq!(config.fade_out_ms, 350);
        assert_eq!(config.supersede, SupersedePolicy::Cancel);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[tokio::test]
    async fn test_invalid_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("bookgetter.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        assert!(Config::load_from_file(&path).await.is_err());
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.fade_out_ms = 10_000;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api_base = "ftp://books".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
