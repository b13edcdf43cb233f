//! Error types surfaced by the transport and configuration layers.
//!
//! Mutation failures are not errors from the store's point of view: they
//! trigger a rollback and the page returning to its prior state is the
//! failure signal. Only page fetches surface a `TransportError` message
//! through the view.

use thiserror::Error;

/// Failure talking to the remote todo service.
#[derive(Debug, Error)]
pub enum TransportError {
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("service returned status {0}")]
  Status(u16),

  #[error("failed to decode response: {0}")]
  Decode(#[from] serde_json::Error),
}

/// Failure loading or parsing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("config file not found: {0}")]
  NotFound(String),

  #[error("failed to read config file {path}: {source}")]
  Read {
    path: String,
    source: std::io::Error,
  },

  #[error("failed to parse config file {path}: {source}")]
  Parse {
    path: String,
    source: serde_yaml::Error,
  },

  #[error("invalid base url {url}: {source}")]
  BaseUrl {
    url: String,
    source: url::ParseError,
  },
}
