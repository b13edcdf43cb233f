//! HTTP implementation of the transport capability.
//!
//! Talks to a dummyjson-style REST resource: `GET {base}?limit=&skip=` for
//! pages, `PUT {base}/{id}` for field updates, `DELETE {base}/{id}` for
//! removal. Retry policy, if any, belongs here — the store never retries.

use futures::future::BoxFuture;
use url::Url;

use crate::config::Config;
use crate::error::{ConfigError, TransportError};
use crate::remote::api_types::ApiTodosResponse;
use crate::remote::{Mutation, PageFetch, Transport};

/// Transport backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
  client: reqwest::Client,
  /// Collection URL without a trailing slash, e.g. `https://dummyjson.com/todos`.
  base: String,
}

impl HttpTransport {
  /// Build a transport from configuration.
  pub fn new(config: &Config) -> Result<Self, ConfigError> {
    Ok(Self::with_base_url(config.base_url()?))
  }

  pub fn with_base_url(base: Url) -> Self {
    Self {
      client: reqwest::Client::new(),
      base: base.as_str().trim_end_matches('/').to_string(),
    }
  }
}

impl Transport for HttpTransport {
  fn fetch_page(
    &self,
    limit: u32,
    skip: u32,
  ) -> BoxFuture<'static, Result<PageFetch, TransportError>> {
    let client = self.client.clone();
    let url = format!("{}?limit={}&skip={}", self.base, limit, skip);

    Box::pin(async move {
      tracing::debug!(%url, "fetching page");
      let resp = client.get(&url).send().await?;
      let status = resp.status();
      if !status.is_success() {
        return Err(TransportError::Status(status.as_u16()));
      }
      let bytes = resp.bytes().await?;
      let body: ApiTodosResponse = serde_json::from_slice(&bytes)?;
      Ok(body.into_page_fetch())
    })
  }

  fn apply_mutation(
    &self,
    id: u64,
    mutation: Mutation,
  ) -> BoxFuture<'static, Result<(), TransportError>> {
    let client = self.client.clone();
    let url = format!("{}/{}", self.base, id);

    Box::pin(async move {
      tracing::debug!(kind = mutation.kind(), %url, "applying remote mutation");
      let req = match &mutation {
        Mutation::Toggle { completed } => client
          .put(&url)
          .json(&serde_json::json!({ "completed": completed })),
        Mutation::EditTitle { title } => client
          .put(&url)
          .json(&serde_json::json!({ "todo": title })),
        Mutation::Delete => client.delete(&url),
      };

      let resp = req.send().await?;
      let status = resp.status();
      if !status.is_success() {
        return Err(TransportError::Status(status.as_u16()));
      }
      Ok(())
    })
  }
}
