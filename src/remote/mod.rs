//! The remote todo service, seen from the store as a capability:
//! fetch one page, apply one mutation. The concrete HTTP client lives in
//! [`client`]; the store itself only ever holds a `dyn Transport`.

pub mod api_types;
pub mod client;

pub use client::HttpTransport;

use futures::future::BoxFuture;

use crate::error::TransportError;
use crate::types::Todo;

/// One fetched window of the remote collection.
#[derive(Debug, Clone)]
pub struct PageFetch {
  pub items: Vec<Todo>,
  pub total: u64,
}

/// A state-changing operation on one remote record, with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
  /// Set the completed flag to the given end state.
  Toggle { completed: bool },
  /// Remove the record from the remote collection.
  Delete,
  /// Replace the title.
  EditTitle { title: String },
}

impl Mutation {
  /// Short operation name for logging.
  pub fn kind(&self) -> &'static str {
    match self {
      Mutation::Toggle { .. } => "toggle",
      Mutation::Delete => "delete",
      Mutation::EditTitle { .. } => "edit",
    }
  }
}

/// Capability contract between the store and the remote service.
///
/// Only records with a server-confirmed identity ever reach this boundary,
/// so mutations address records by their numeric remote id. Futures are
/// boxed `'static` so the store can run them on the runtime while its own
/// methods stay non-blocking.
pub trait Transport: Send + Sync {
  /// Fetch `limit` records starting at offset `skip`, plus the collection
  /// total as the service reports it.
  fn fetch_page(&self, limit: u32, skip: u32)
    -> BoxFuture<'static, Result<PageFetch, TransportError>>;

  /// Apply one mutation to the record with the given remote id.
  fn apply_mutation(&self, id: u64, mutation: Mutation)
    -> BoxFuture<'static, Result<(), TransportError>>;
}
