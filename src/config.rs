use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::backend::BackendKind;

pub const CONFIG_PATH_ENV: &str = "CLASSROOM_CONFIG";
pub const MASTER_KEY_ENV: &str = "CLASSROOM_MASTER_KEY";
const APP_DIR: &str = "classroom-store";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: BackendKind,
    /// Where key-value storage and backups live. Defaults to the platform
    /// data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_url")]
    pub url: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url: default_fetch_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub master_key: String,
    #[serde(default = "default_bin_name")]
    pub bin_name: String,
    #[serde(default = "default_flush_interval")]
    pub flush_interval_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            master_key: String::new(),
            bin_name: default_bin_name(),
            flush_interval_secs: default_flush_interval(),
        }
    }
}

fn default_fetch_url() -> String {
    "http://localhost:8000/data.json".to_string()
}
fn default_api_url() -> String {
    "https://api.jsonbin.io/v3/b".to_string()
}
fn default_bin_name() -> String {
    "uchis-ru-data".to_string()
}
fn default_flush_interval() -> u64 {
    30
}

/// Longest accepted background flush period: one day.
pub const MAX_FLUSH_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Load from `CLASSROOM_CONFIG`, else the platform config directory. A
/// missing file means defaults.
pub fn load_default() -> Result<StoreConfig> {
    let path = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => PathBuf::from(path),
        Err(_) => dirs::config_dir()
            .context("Failed to get config directory")?
            .join(APP_DIR)
            .join("config.toml"),
    };

    if !path.exists() {
        return Ok(StoreConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &Path) -> Result<StoreConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<StoreConfig> {
    toml::from_str(content).context("Failed to parse config TOML")
}

impl StoreConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut config = load_default()?;
        config.normalize_and_validate()?;
        Ok(config)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        if self.remote.master_key.trim().is_empty() {
            if let Ok(key) = std::env::var(MASTER_KEY_ENV) {
                self.remote.master_key = key;
            }
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        match self.backend {
            BackendKind::Local => {}
            BackendKind::Fetch => {
                if self.fetch.url.trim().is_empty() {
                    return Err(anyhow!("fetch.url is empty"));
                }
            }
            BackendKind::Remote => {
                if self.remote.master_key.trim().is_empty() {
                    return Err(anyhow!(
                        "remote.master_key is empty; set it in the config file or {MASTER_KEY_ENV}"
                    ));
                }
                if self.remote.api_url.trim().is_empty() {
                    return Err(anyhow!("remote.api_url is empty"));
                }
                if !(1..=MAX_FLUSH_INTERVAL_SECS).contains(&self.remote.flush_interval_secs) {
                    return Err(anyhow!(
                        "remote.flush_interval_secs must be between 1 and {MAX_FLUSH_INTERVAL_SECS}"
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(dirs::data_dir()
                .context("Failed to get data directory")?
                .join(APP_DIR)),
        }
    }

    pub fn backups_dir(&self) -> Result<PathBuf> {
        Ok(self.resolve_data_dir()?.join("backups"))
    }

    /// Background flush period; only the remote backend flushes on a timer.
    pub fn autosync_interval(&self) -> Option<Duration> {
        (self.backend == BackendKind::Remote)
            .then(|| Duration::from_secs(self.remote.flush_interval_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.backend, BackendKind::Local);
        assert_eq!(config.fetch.url, "http://localhost:8000/data.json");
        assert_eq!(config.remote.api_url, "https://api.jsonbin.io/v3/b");
        assert_eq!(config.remote.bin_name, "uchis-ru-data");
        assert_eq!(config.remote.flush_interval_secs, 30);
        assert!(config.autosync_interval().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_remote_section() {
        let config = parse(
            r#"
            backend = "remote"
            data_dir = "/tmp/classroom"

            [remote]
            master_key = "k"
            flush_interval_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.backend, BackendKind::Remote);
        assert_eq!(config.resolve_data_dir().unwrap(), PathBuf::from("/tmp/classroom"));
        assert_eq!(config.autosync_interval(), Some(Duration::from_secs(5)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn remote_requires_master_key() {
        let config = parse("backend = \"remote\"").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_flush_interval_and_unknown_backend() {
        let config = parse(
            "backend = \"remote\"\n[remote]\nmaster_key = \"k\"\nflush_interval_secs = 0",
        )
        .unwrap();
        assert!(config.validate().is_err());
        assert!(parse("backend = \"ftp\"").is_err());
    }

    #[test]
    fn flush_interval_is_bounded() {
        let remote = |secs: u64| {
            parse(&format!(
                "backend = \"remote\"\n[remote]\nmaster_key = \"k\"\nflush_interval_secs = {secs}"
            ))
            .unwrap()
        };
        assert!(remote(MAX_FLUSH_INTERVAL_SECS).validate().is_ok());
        assert!(remote(MAX_FLUSH_INTERVAL_SECS + 1).validate().is_err());
        assert!(remote(u64::MAX / 2).validate().is_err());
    }

    #[test]
    fn fetch_requires_url() {
        let config = parse("backend = \"fetch\"\n[fetch]\nurl = \"\"").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "backend = \"fetch\"\n[fetch]\nurl = \"http://x/data.json\"").unwrap();

        let config = load_from_file(&path).unwrap();
        assert_eq!(config.backend, BackendKind::Fetch);
        assert_eq!(config.fetch.url, "http://x/data.json");
        assert!(load_from_file(&dir.path().join("missing.toml")).is_err());
    }
}
