use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides `api.url`
pub const API_URL_ENV: &str = "PORTAL_API_URL";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Title shown in the header
  pub title: String,
  pub api: ApiConfig,
  pub probe: ProbeConfig,
  pub cache: CacheConfig,
  /// Number of items requested from the updates feed
  pub updates_limit: usize,
  pub log: LogConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      title: "Community Portal".to_string(),
      api: ApiConfig::default(),
      probe: ProbeConfig::default(),
      cache: CacheConfig::default(),
      updates_limit: 10,
      log: LogConfig::default(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  /// Base URL of the portal backend, without the `/api` prefix
  pub url: String,
  /// Path probed by the reachability monitor
  pub health_path: String,
  pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      url: "http://localhost:4000".to_string(),
      health_path: "/api/health".to_string(),
      request_timeout_secs: 15,
    }
  }
}

impl ApiConfig {
  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs)
  }
}

/// Reachability probe timing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
  /// Upper bound for a single health check
  pub timeout_ms: u64,
  /// Delay between periodic re-checks
  pub interval_secs: u64,
  /// Extra attempts after a failed check before declaring the backend offline
  pub retries: u32,
  /// First retry delay, doubled per attempt
  pub backoff_ms: u64,
}

impl Default for ProbeConfig {
  fn default() -> Self {
    Self {
      timeout_ms: 3000,
      interval_secs: 60,
      retries: 1,
      backoff_ms: 500,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  /// How long a resolved list is reused without refetching
  pub stale_secs: u64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self { stale_secs: 300 }
  }
}

impl CacheConfig {
  pub fn stale_time(&self) -> Duration {
    Duration::from_secs(self.stale_secs)
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
  /// Default filter when RUST_LOG is not set
  pub level: String,
  /// Directory for log files (defaults to the user data dir)
  pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      level: "info".to_string(),
      directory: None,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./portal.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/portal/config.yaml
  ///
  /// Without any file the built-in defaults are used. `PORTAL_API_URL`
  /// overrides the configured backend URL.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let mut config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Self::default(),
    };

    if let Ok(url) = std::env::var(API_URL_ENV) {
      if !url.trim().is_empty() {
        config.api.url = url;
      }
    }

    config.validate()?;
    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("portal.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("portal").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  pub fn from_yaml(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;
    Ok(config)
  }

  /// Reject values that would make the probe or cache meaningless.
  pub fn validate(&self) -> Result<()> {
    url::Url::parse(&self.api.url)
      .map_err(|e| eyre!("Invalid api.url '{}': {}", self.api.url, e))?;

    if self.probe.timeout_ms == 0 {
      return Err(eyre!("probe.timeout_ms must be greater than zero"));
    }
    if self.probe.interval_secs == 0 {
      return Err(eyre!("probe.interval_secs must be greater than zero"));
    }
    if self.updates_limit == 0 {
      return Err(eyre!("updates_limit must be greater than zero"));
    }

    Ok(())
  }

  /// Directory for rolling log files.
  pub fn log_directory(&self) -> Result<PathBuf> {
    if let Some(dir) = &self.log.directory {
      return Ok(dir.clone());
    }

    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("portal").join("logs"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn test_empty_yaml_uses_defaults() {
    let config = Config::from_yaml("{}").unwrap();
    assert_eq!(config.api.url, "http://localhost:4000");
    assert_eq!(config.api.health_path, "/api/health");
    assert_eq!(config.cache.stale_time(), Duration::from_secs(300));
    assert_eq!(config.probe.timeout_ms, 3000);
    assert_eq!(config.updates_limit, 10);
  }

  #[test]
  fn test_partial_sections_keep_other_defaults() {
    let yaml = r#"
title: Riverside Collective
api:
  url: https://api.riverside.example
probe:
  retries: 3
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.title, "Riverside Collective");
    assert_eq!(config.api.url, "https://api.riverside.example");
    assert_eq!(config.api.request_timeout_secs, 15);
    assert_eq!(config.probe.retries, 3);
    assert_eq!(config.probe.backoff_ms, 500);
  }

  #[test]
  fn test_validate_rejects_bad_values() {
    let mut config = Config::default();
    config.api.url = "not a url".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.probe.timeout_ms = 0;
    assert!(config.validate().is_err());

    assert!(Config::default().validate().is_ok());
  }

  #[test]
  fn test_load_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "updates_limit: 4\ncache:\n  stale_secs: 30").unwrap();

    let config = Config::load_from_path(file.path()).unwrap();
    assert_eq!(config.updates_limit, 4);
    assert_eq!(config.cache.stale_secs, 30);
  }

  #[test]
  fn test_load_missing_explicit_path_fails() {
    let err = Config::load(Some(Path::new("/definitely/not/here.yaml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
  }
}
