//! Store configuration: remote base URL, page size, stale time, and cache
//! bound. Loaded from YAML (explicit path, then `./todoq.yaml`, then the XDG
//! config directory), with sensible defaults when no file exists.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Default collection URL, matching the public dummyjson todos resource.
pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com/todos";

fn default_base_url() -> String {
  DEFAULT_BASE_URL.to_string()
}

fn default_limit() -> u32 {
  10
}

fn default_stale_secs() -> u64 {
  60
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  /// Collection URL of the remote todo resource.
  #[serde(default = "default_base_url")]
  pub base_url: String,
  /// Initial page size.
  #[serde(default = "default_limit")]
  pub default_limit: u32,
  /// Seconds before a fetched page is considered stale and refetched on the
  /// next visit.
  #[serde(default = "default_stale_secs")]
  pub stale_secs: u64,
  /// Bound on cached pages (least-recently-used eviction). Unbounded if
  /// unset.
  #[serde(default)]
  pub cache_capacity: Option<usize>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      default_limit: default_limit(),
      stale_secs: default_stale_secs(),
      cache_capacity: None,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./todoq.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/todoq/config.yaml
  ///
  /// With no explicit path and no file found, defaults are used.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(ConfigError::NotFound(p.display().to_string()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("todoq.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("todoq").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
      path: path.display().to_string(),
      source: e,
    })?;

    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
      path: path.display().to_string(),
      source: e,
    })
  }

  /// The effective base URL, validated.
  ///
  /// TODOQ_BASE_URL in the environment overrides the configured value.
  pub fn base_url(&self) -> Result<Url, ConfigError> {
    let raw = std::env::var("TODOQ_BASE_URL").unwrap_or_else(|_| self.base_url.clone());
    Url::parse(&raw).map_err(|e| ConfigError::BaseUrl {
      url: raw,
      source: e,
    })
  }

  pub fn stale_time(&self) -> std::time::Duration {
    std::time::Duration::from_secs(self.stale_secs)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.default_limit, 10);
    assert_eq!(config.stale_secs, 60);
    assert!(config.cache_capacity.is_none());
  }

  #[test]
  fn test_parse_partial_yaml() {
    let config: Config = serde_yaml::from_str("default_limit: 25\ncache_capacity: 8\n").unwrap();
    assert_eq!(config.default_limit, 25);
    assert_eq!(config.cache_capacity, Some(8));
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
  }

  #[test]
  fn test_invalid_base_url_rejected() {
    let config = Config {
      base_url: "not a url".to_string(),
      ..Config::default()
    };
    assert!(config.base_url().is_err());
  }

  #[test]
  fn test_missing_explicit_path_is_an_error() {
    let err = Config::load(Some(Path::new("/nonexistent/todoq.yaml"))).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
  }
}
