//! Client-side store that keeps a paginated window of a remote todo
//! collection synchronized with local, optimistic edits.
//!
//! The remote collection is partitioned into fixed-size pages keyed by
//! (limit, skip). Mutations on the visible page apply immediately, before
//! the network round-trip completes; if the remote call fails, the page is
//! restored from the snapshot taken when the call was issued. Records
//! created client-side coexist with remote-backed records and never make a
//! network call.
//!
//! Presentation and the concrete transport are collaborators: the store only
//! requires a [`Transport`] and exposes a [`TodoListView`] per render cycle.
//!
//! # Example
//!
//! ```ignore
//! let config = Config::load(None)?;
//! let transport = Arc::new(HttpTransport::new(&config)?);
//! let mut store = TodoStore::from_config(&config, transport);
//!
//! store.ensure_page();
//! // In the event loop tick:
//! if store.poll() {
//!     render(store.view());
//! }
//! store.add("Defeat Malenia");
//! store.toggle(store.view().todos[0].id);
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod remote;
pub mod store;
pub mod types;

pub use cache::{PageCache, PageEntry, PageKey};
pub use config::Config;
pub use error::{ConfigError, TransportError};
pub use pagination::Pagination;
pub use remote::{HttpTransport, Mutation, PageFetch, Transport};
pub use store::{TodoListView, TodoStore};
pub use types::{Todo, TodoId};
