//! In-memory page cache keyed by (limit, skip).
//!
//! Pure storage with no network awareness: the owning store decides when a
//! miss or a stale entry triggers a fetch. Entries live for the lifetime of
//! the store that owns the cache; there is no cross-session persistence.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::types::Todo;

/// Identifies one window into the remote collection.
///
/// Two keys are equal iff both fields match. `skip = (page - 1) * limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageKey {
  pub limit: u32,
  pub skip: u32,
}

impl PageKey {
  /// Key for a 1-based page number at the given page size.
  pub fn from_page(page: u32, limit: u32) -> Self {
    debug_assert!(page >= 1);
    debug_assert!(limit >= 1);
    Self {
      limit,
      skip: (page - 1) * limit,
    }
  }
}

/// The last known state of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
  /// Ordered records for this window. Never longer than `key.limit`;
  /// the store enforces that on insert.
  pub records: Vec<Todo>,
  /// Remote-reported collection size, adjusted by uncommitted local
  /// additions and removals of never-synced local records.
  pub total: u64,
  /// When this entry last came from the remote service. `None` for entries
  /// synthesized locally (e.g. an add on a never-fetched page); those carry
  /// no remote data yet and are always refreshable.
  fetched_at: Option<Instant>,
}

impl PageEntry {
  /// Entry populated from a remote fetch.
  pub fn from_fetch(records: Vec<Todo>, total: u64) -> Self {
    Self {
      records,
      total,
      fetched_at: Some(Instant::now()),
    }
  }

  /// Entry synthesized client-side, never fetched.
  pub fn synthetic(records: Vec<Todo>, total: u64) -> Self {
    Self {
      records,
      total,
      fetched_at: None,
    }
  }

  pub fn is_stale(&self, stale_time: Duration) -> bool {
    match self.fetched_at {
      Some(at) => at.elapsed() > stale_time,
      None => false,
    }
  }

  /// Whether this entry was synthesized client-side and never fetched.
  pub fn is_synthetic(&self) -> bool {
    self.fetched_at.is_none()
  }
}

#[derive(Debug)]
struct Slot {
  entry: PageEntry,
  last_used: u64,
}

/// Mapping from page key to the last known records and total for that page.
///
/// Unbounded by default (a session only ever visits so many distinct pages);
/// an optional capacity applies least-recently-used eviction by key.
#[derive(Debug, Default)]
pub struct PageCache {
  slots: HashMap<PageKey, Slot>,
  capacity: Option<usize>,
  clock: u64,
}

impl PageCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// Cache bounded to `capacity` pages, evicting the least recently used.
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      capacity: Some(capacity.max(1)),
      ..Self::default()
    }
  }

  pub fn has(&self, key: PageKey) -> bool {
    self.slots.contains_key(&key)
  }

  pub fn get(&self, key: PageKey) -> Option<&PageEntry> {
    self.slots.get(&key).map(|s| &s.entry)
  }

  /// Mutable access counts as a use for eviction ordering.
  pub fn get_mut(&mut self, key: PageKey) -> Option<&mut PageEntry> {
    self.clock += 1;
    let clock = self.clock;
    self.slots.get_mut(&key).map(|s| {
      s.last_used = clock;
      &mut s.entry
    })
  }

  pub fn set(&mut self, key: PageKey, entry: PageEntry) {
    self.clock += 1;
    let clock = self.clock;
    self.slots.insert(
      key,
      Slot {
        entry,
        last_used: clock,
      },
    );
    if let Some(cap) = self.capacity {
      while self.slots.len() > cap {
        let oldest = self
          .slots
          .iter()
          .min_by_key(|(_, s)| s.last_used)
          .map(|(k, _)| *k);
        match oldest {
          Some(k) => {
            tracing::debug!(limit = k.limit, skip = k.skip, "evicting cached page");
            self.slots.remove(&k);
          }
          None => break,
        }
      }
    }
  }

  #[cfg(test)]
  pub fn len(&self) -> usize {
    self.slots.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry(total: u64) -> PageEntry {
    PageEntry::from_fetch(Vec::new(), total)
  }

  #[test]
  fn test_key_from_page() {
    assert_eq!(PageKey::from_page(1, 10), PageKey { limit: 10, skip: 0 });
    assert_eq!(PageKey::from_page(3, 10), PageKey { limit: 10, skip: 20 });
    assert_eq!(PageKey::from_page(2, 25), PageKey { limit: 25, skip: 25 });
  }

  #[test]
  fn test_set_get_has() {
    let mut cache = PageCache::new();
    let key = PageKey::from_page(1, 10);
    assert!(!cache.has(key));
    assert!(cache.get(key).is_none());

    cache.set(key, entry(3));
    assert!(cache.has(key));
    assert_eq!(cache.get(key).unwrap().total, 3);
  }

  #[test]
  fn test_lru_eviction_by_key() {
    let mut cache = PageCache::with_capacity(2);
    let k1 = PageKey::from_page(1, 10);
    let k2 = PageKey::from_page(2, 10);
    let k3 = PageKey::from_page(3, 10);

    cache.set(k1, entry(0));
    cache.set(k2, entry(0));
    // Touch k1 so k2 becomes the eviction candidate.
    cache.get_mut(k1);
    cache.set(k3, entry(0));

    assert_eq!(cache.len(), 2);
    assert!(cache.has(k1));
    assert!(!cache.has(k2));
    assert!(cache.has(k3));
  }

  #[test]
  fn test_staleness() {
    let fetched = entry(0);
    assert!(!fetched.is_stale(Duration::from_secs(60)));
    assert!(fetched.is_stale(Duration::ZERO));

    // Synthesized entries have no fetch timestamp; they report not-stale
    // but are refreshable by construction.
    let synthetic = PageEntry::synthetic(Vec::new(), 1);
    assert!(!synthetic.is_stale(Duration::ZERO));
    assert!(synthetic.is_synthetic());
    assert!(!fetched.is_synthetic());
  }
}
