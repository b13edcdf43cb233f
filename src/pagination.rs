//! Pagination state: current page number and page size.
//!
//! All transitions are bounded by the last known total, which lives with the
//! cached pages — callers pass it in rather than this type tracking it.

use crate::cache::PageKey;

/// Tracks the 1-based page number and page size, and derives the active
/// page key from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
  page: u32,
  limit: u32,
}

impl Pagination {
  pub fn new(limit: u32) -> Self {
    Self {
      page: 1,
      limit: limit.max(1),
    }
  }

  pub fn page(&self) -> u32 {
    self.page
  }

  pub fn limit(&self) -> u32 {
    self.limit
  }

  /// The page key this state currently points at.
  pub fn key(&self) -> PageKey {
    PageKey::from_page(self.page, self.limit)
  }

  /// Number of pages implied by `total`, never less than 1.
  pub fn total_pages(&self, total: u64) -> u64 {
    (total.div_ceil(self.limit as u64)).max(1)
  }

  /// Advance one page unless the next window would start past the end of the
  /// collection. Returns whether the page changed.
  pub fn next(&mut self, total: u64) -> bool {
    if (self.page as u64) * (self.limit as u64) < total {
      self.page += 1;
      true
    } else {
      false
    }
  }

  /// Go back one page; no-op on the first page. Returns whether the page
  /// changed.
  pub fn previous(&mut self) -> bool {
    if self.page > 1 {
      self.page -= 1;
      true
    } else {
      false
    }
  }

  /// Change the page size. Resets to page 1: the old offset is meaningless
  /// under a new limit.
  pub fn set_limit(&mut self, limit: u32) {
    self.limit = limit.max(1);
    self.page = 1;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_key_derivation() {
    let mut p = Pagination::new(10);
    assert_eq!(p.key(), PageKey { limit: 10, skip: 0 });
    assert!(p.next(23));
    assert_eq!(p.key(), PageKey { limit: 10, skip: 10 });
  }

  #[test]
  fn test_next_bounded_by_total() {
    // 23 items at 10 per page: pages 1, 2, and a partial 3.
    let mut p = Pagination::new(10);
    assert!(p.next(23));
    assert!(p.next(23));
    assert_eq!(p.page(), 3);
    // 3 * 10 >= 23, cannot advance further.
    assert!(!p.next(23));
    assert_eq!(p.page(), 3);
  }

  #[test]
  fn test_previous_stops_at_one() {
    let mut p = Pagination::new(10);
    assert!(!p.previous());
    assert_eq!(p.page(), 1);

    p.next(30);
    assert!(p.previous());
    assert_eq!(p.page(), 1);
  }

  #[test]
  fn test_set_limit_resets_page() {
    let mut p = Pagination::new(10);
    p.next(50);
    p.next(50);
    assert_eq!(p.page(), 3);

    p.set_limit(25);
    assert_eq!(p.page(), 1);
    assert_eq!(p.limit(), 25);
  }

  #[test]
  fn test_total_pages() {
    let p = Pagination::new(10);
    assert_eq!(p.total_pages(0), 1);
    assert_eq!(p.total_pages(10), 1);
    assert_eq!(p.total_pages(23), 3);
  }
}
