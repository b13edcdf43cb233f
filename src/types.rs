//! Domain types for the todo store.
//!
//! These are deliberately separate from the wire types in `remote::api_types`:
//! the remote service only ever sees numeric ids, while the store needs to
//! know whether a record has a server-confirmed identity at all.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier for a todo record.
///
/// Local ids are drawn from a process-wide counter in a namespace disjoint
/// from every server-issued id, so a locally created record can never collide
/// with (or be mistaken for) a remote one. A record's id never changes from
/// `Remote` to `Local`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TodoId {
  /// Assigned by the remote service.
  Remote(u64),
  /// Generated client-side; the record was never persisted remotely.
  Local(u64),
}

impl TodoId {
  pub fn is_local(&self) -> bool {
    matches!(self, TodoId::Local(_))
  }
}

impl fmt::Display for TodoId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TodoId::Remote(n) => write!(f, "{}", n),
      TodoId::Local(n) => write!(f, "local:{}", n),
    }
  }
}

/// One list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
  pub id: TodoId,
  pub title: String,
  pub completed: bool,
}

static NEXT_LOCAL_ID: AtomicU64 = AtomicU64::new(1);

impl Todo {
  /// Create a record that exists only in the client cache.
  ///
  /// The caller is responsible for title validation; this constructor does
  /// not trim.
  pub fn new_local(title: impl Into<String>) -> Self {
    Self {
      id: TodoId::Local(NEXT_LOCAL_ID.fetch_add(1, Ordering::Relaxed)),
      title: title.into(),
      completed: false,
    }
  }

  pub fn is_local(&self) -> bool {
    self.id.is_local()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_local_ids_are_unique() {
    let a = Todo::new_local("one");
    let b = Todo::new_local("two");
    assert_ne!(a.id, b.id);
    assert!(a.is_local());
  }

  #[test]
  fn test_local_never_equals_remote() {
    // Even with the same numeric value, the namespaces are disjoint.
    assert_ne!(TodoId::Local(7), TodoId::Remote(7));
  }
}
