//! The owning controller: page cache, pagination, search term, and the
//! coordinator for optimistic mutations with rollback.
//!
//! `TodoStore` follows an event-loop style: its methods never block. Remote
//! work is spawned onto the tokio runtime and results come back over a
//! channel that [`TodoStore::poll`] drains, so all state transitions happen
//! on the caller's thread in response to discrete events. Between issuing a
//! remote call and its settlement, the cache already reflects the optimistic
//! post-state and every read sees it.
//!
//! The store must be used from within a tokio runtime.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::cache::{PageCache, PageEntry, PageKey};
use crate::config::Config;
use crate::error::TransportError;
use crate::filter::filter_todos;
use crate::pagination::Pagination;
use crate::remote::{Mutation, PageFetch, Transport};
use crate::types::{Todo, TodoId};

/// One in-flight remote mutation. Created when the call is issued, destroyed
/// on settlement. At most one exists per target id at a time.
#[derive(Debug)]
struct MutationContext {
  /// The page the optimistic change was applied to. Settlement targets this
  /// key even if the user has navigated away since.
  key: PageKey,
  /// Operation name, for logging.
  kind: &'static str,
  /// Full page entry as it was before the optimistic change.
  snapshot: PageEntry,
}

/// Completion of a spawned remote call, delivered over the store's channel.
#[derive(Debug)]
enum Settlement {
  Fetch {
    key: PageKey,
    result: Result<PageFetch, TransportError>,
  },
  Mutation {
    id: TodoId,
    result: Result<(), TransportError>,
  },
}

/// Presentation snapshot for one render cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct TodoListView {
  /// Records of the active page, projected through the search filter.
  pub todos: Vec<Todo>,
  /// Whether a fetch for the active page is in flight.
  pub loading: bool,
  /// Page-level fetch error for the active page, if any.
  pub error: Option<String>,
  /// Ids with a mutation in flight; their controls should be disabled.
  pub mutating: Vec<TodoId>,
  pub page: u32,
  pub limit: u32,
  pub total: u64,
  pub total_pages: u64,
}

/// Client-side store keeping a paginated window of the remote todo
/// collection synchronized with local optimistic edits.
pub struct TodoStore {
  transport: Arc<dyn Transport>,
  cache: PageCache,
  pagination: Pagination,
  search: String,
  stale_time: Duration,
  /// Last known collection size: the remote-reported total adjusted by
  /// uncommitted local additions and removals of never-synced records.
  total: u64,
  /// In-flight mutation contexts, keyed by target id.
  inflight: HashMap<TodoId, MutationContext>,
  /// Pages with a fetch in flight.
  fetching: HashSet<PageKey>,
  /// Pages whose last fetch failed; cleared when a fetch starts or succeeds.
  errors: HashMap<PageKey, String>,
  tx: mpsc::UnboundedSender<Settlement>,
  rx: mpsc::UnboundedReceiver<Settlement>,
}

impl TodoStore {
  /// Create a store with default settings (page size 10, 60 s stale time,
  /// unbounded cache). The cache starts empty; call [`ensure_page`] to
  /// populate the first page.
  ///
  /// [`ensure_page`]: TodoStore::ensure_page
  pub fn new(transport: Arc<dyn Transport>) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      transport,
      cache: PageCache::new(),
      pagination: Pagination::new(10),
      search: String::new(),
      stale_time: Duration::from_secs(60),
      total: 0,
      inflight: HashMap::new(),
      fetching: HashSet::new(),
      errors: HashMap::new(),
      tx,
      rx,
    }
  }

  /// Create a store using configured page size, stale time, and cache bound.
  pub fn from_config(config: &Config, transport: Arc<dyn Transport>) -> Self {
    let mut store = Self::new(transport);
    store.pagination = Pagination::new(config.default_limit);
    store.stale_time = config.stale_time();
    if let Some(cap) = config.cache_capacity {
      store.cache = PageCache::with_capacity(cap);
    }
    store
  }

  /// Set the stale time for cached pages.
  pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
    self.stale_time = stale_time;
    self
  }

  /// The key of the page currently being viewed.
  pub fn active_key(&self) -> PageKey {
    self.pagination.key()
  }

  /// Cached entry for the active page, if populated.
  pub fn active_entry(&self) -> Option<&PageEntry> {
    self.cache.get(self.active_key())
  }

  /// Cached entry for an arbitrary page key.
  pub fn page_entry(&self, key: PageKey) -> Option<&PageEntry> {
    self.cache.get(key)
  }

  pub fn is_mutating(&self, id: TodoId) -> bool {
    self.inflight.contains_key(&id)
  }

  pub fn search(&self) -> &str {
    &self.search
  }

  /// Set the search term applied to the active page at view time.
  pub fn set_search(&mut self, query: impl Into<String>) {
    self.search = query.into();
  }

  /// Fetch the active page if it is missing or stale and no fetch for it is
  /// already in flight. Non-blocking; the result arrives via [`poll`].
  ///
  /// [`poll`]: TodoStore::poll
  pub fn ensure_page(&mut self) {
    let key = self.active_key();
    if self.fetching.contains(&key) {
      return;
    }
    let needed = match self.cache.get(key) {
      None => true,
      // A synthetic entry holds only never-synced local records; the page's
      // remote data still has to be fetched. The refetch replaces the local
      // records, as it does for any optimistic change.
      Some(entry) => entry.is_synthetic() || entry.is_stale(self.stale_time),
    };
    if !needed {
      return;
    }

    self.fetching.insert(key);
    self.errors.remove(&key);

    let fut = self.transport.fetch_page(key.limit, key.skip);
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let result = fut.await;
      // Ignore send errors - the store may have been dropped
      let _ = tx.send(Settlement::Fetch { key, result });
    });
  }

  /// Drain settlements of completed remote calls, committing or rolling back
  /// each one. Call this from the event loop tick. Returns `true` if any
  /// state changed.
  pub fn poll(&mut self) -> bool {
    let mut changed = false;
    while let Ok(settlement) = self.rx.try_recv() {
      changed = true;
      match settlement {
        Settlement::Fetch { key, result } => self.settle_fetch(key, result),
        Settlement::Mutation { id, result } => self.settle_mutation(id, result),
      }
    }
    changed
  }

  fn settle_fetch(&mut self, key: PageKey, result: Result<PageFetch, TransportError>) {
    self.fetching.remove(&key);
    match result {
      Ok(mut fetch) => {
        tracing::debug!(
          limit = key.limit,
          skip = key.skip,
          items = fetch.items.len(),
          total = fetch.total,
          "page fetched"
        );
        fetch.items.truncate(key.limit as usize);
        self.errors.remove(&key);
        self.total = fetch.total;
        self.cache.set(key, PageEntry::from_fetch(fetch.items, fetch.total));
      }
      Err(e) => {
        // Leave the cache for this key unpopulated; the page shows an error.
        tracing::warn!(limit = key.limit, skip = key.skip, error = %e, "page fetch failed");
        self.errors.insert(key, e.to_string());
      }
    }
  }

  fn settle_mutation(&mut self, id: TodoId, result: Result<(), TransportError>) {
    let Some(ctx) = self.inflight.remove(&id) else {
      return;
    };
    match result {
      Ok(()) => {
        tracing::debug!(%id, kind = ctx.kind, "mutation committed");
      }
      Err(e) => {
        // Full replacement, not a merge: this undoes the optimistic change
        // even if other mutations interleaved on different ids, at the cost
        // of also discarding their optimistic effects on this page.
        tracing::warn!(%id, kind = ctx.kind, error = %e, "mutation failed, rolling back page");
        self.cache.set(ctx.key, ctx.snapshot);
      }
    }
  }

  /// Insert a new, purely local record at the head of the active page.
  ///
  /// No remote call is made: creation is instantaneous by design, unlike
  /// toggle/delete/edit which reconcile with the remote service. If the
  /// insert pushes the page past its limit, the tail record is hidden from
  /// the visible page (not deleted remotely) until the page is refetched.
  /// Empty or whitespace-only titles are ignored.
  pub fn add(&mut self, title: &str) {
    let trimmed = title.trim();
    if trimmed.is_empty() {
      return;
    }

    let key = self.active_key();
    let limit = key.limit as usize;
    let todo = Todo::new_local(trimmed);

    match self.cache.get_mut(key) {
      Some(entry) => {
        entry.records.insert(0, todo);
        entry.records.truncate(limit);
        entry.total += 1;
      }
      None => {
        // Never-fetched page: synthesize an entry holding just the new
        // record, with the unknown remote total treated as zero. The entry
        // stays refreshable so the page's remote data can still arrive.
        self.cache.set(key, PageEntry::synthetic(vec![todo], 1));
      }
    }
    self.total += 1;
  }

  /// Flip a record's completed flag.
  pub fn toggle(&mut self, id: TodoId) {
    let key = self.active_key();
    let Some(completed) = self
      .cache
      .get(key)
      .and_then(|e| e.records.iter().find(|t| t.id == id))
      .map(|t| !t.completed)
    else {
      return;
    };
    if self.reject_if_busy(id) {
      return;
    }

    match id {
      TodoId::Local(_) => {
        // No remote counterpart to reconcile against; mutate in place.
        self.apply_to_record(key, id, |t| t.completed = completed);
      }
      TodoId::Remote(remote_id) => {
        let snapshot = self.snapshot(key);
        self.apply_to_record(key, id, |t| t.completed = completed);
        self.apply_remote(id, remote_id, Mutation::Toggle { completed }, key, snapshot);
      }
    }
  }

  /// Remove a record from the active page (and, for remote records, from the
  /// remote collection).
  pub fn delete(&mut self, id: TodoId) {
    let key = self.active_key();
    let exists = self
      .cache
      .get(key)
      .is_some_and(|e| e.records.iter().any(|t| t.id == id));
    if !exists || self.reject_if_busy(id) {
      return;
    }

    match id {
      TodoId::Local(_) => {
        // The record was never synced, so the collection shrinks.
        if let Some(entry) = self.cache.get_mut(key) {
          entry.records.retain(|t| t.id != id);
          entry.total = entry.total.saturating_sub(1);
        }
        self.total = self.total.saturating_sub(1);
      }
      TodoId::Remote(remote_id) => {
        // A remote-confirmed delete does not change the adjusted total.
        let snapshot = self.snapshot(key);
        if let Some(entry) = self.cache.get_mut(key) {
          entry.records.retain(|t| t.id != id);
        }
        self.apply_remote(id, remote_id, Mutation::Delete, key, snapshot);
      }
    }
  }

  /// Replace a record's title. A title that is empty after trimming, or
  /// equal to the current one, ends the edit without any change or call.
  pub fn edit_title(&mut self, id: TodoId, new_title: &str) {
    let trimmed = new_title.trim();
    if trimmed.is_empty() {
      return;
    }

    let key = self.active_key();
    let Some(current) = self
      .cache
      .get(key)
      .and_then(|e| e.records.iter().find(|t| t.id == id))
    else {
      return;
    };
    if current.title == trimmed {
      return;
    }
    if self.reject_if_busy(id) {
      return;
    }

    let title = trimmed.to_string();
    match id {
      TodoId::Local(_) => {
        self.apply_to_record(key, id, move |t| t.title = title);
      }
      TodoId::Remote(remote_id) => {
        let snapshot = self.snapshot(key);
        self.apply_to_record(key, id, {
          let title = title.clone();
          move |t| t.title = title
        });
        self.apply_remote(id, remote_id, Mutation::EditTitle { title }, key, snapshot);
      }
    }
  }

  /// Advance to the next page if one exists; fetches it on a cache miss.
  pub fn next_page(&mut self) {
    if self.pagination.next(self.total) {
      self.ensure_page();
    }
  }

  /// Go back one page; no-op on the first page.
  pub fn prev_page(&mut self) {
    if self.pagination.previous() {
      self.ensure_page();
    }
  }

  /// Change the page size; resets to page 1 and fetches the new window.
  pub fn set_limit(&mut self, limit: u32) {
    self.pagination.set_limit(limit);
    self.ensure_page();
  }

  /// Presentation snapshot for the current render cycle: the active page
  /// projected through the search filter, plus loading/error/busy state and
  /// pagination bookkeeping.
  pub fn view(&self) -> TodoListView {
    let key = self.active_key();
    let todos = match self.cache.get(key) {
      Some(entry) => filter_todos(&entry.records, &self.search)
        .into_iter()
        .cloned()
        .collect(),
      None => Vec::new(),
    };

    TodoListView {
      todos,
      loading: self.fetching.contains(&key),
      error: self.errors.get(&key).cloned(),
      mutating: self.inflight.keys().copied().collect(),
      page: self.pagination.page(),
      limit: self.pagination.limit(),
      total: self.total,
      total_pages: self.pagination.total_pages(self.total),
    }
  }

  /// A second mutation on an id that already has one in flight is rejected.
  fn reject_if_busy(&self, id: TodoId) -> bool {
    if self.inflight.contains_key(&id) {
      tracing::debug!(%id, "mutation already in flight for this record");
      true
    } else {
      false
    }
  }

  fn snapshot(&self, key: PageKey) -> PageEntry {
    // Caller has already verified the entry exists.
    self
      .cache
      .get(key)
      .cloned()
      .unwrap_or_else(|| PageEntry::synthetic(Vec::new(), 0))
  }

  fn apply_to_record(&mut self, key: PageKey, id: TodoId, f: impl FnOnce(&mut Todo)) {
    if let Some(entry) = self.cache.get_mut(key) {
      if let Some(record) = entry.records.iter_mut().find(|t| t.id == id) {
        f(record);
      }
    }
  }

  /// Issue a remote mutation for an optimistic change already applied to the
  /// page at `key`.
  ///
  /// On failure the full snapshot is restored. Known limitation: because
  /// rollback replaces the whole page entry, it also erases the optimistic
  /// effects of any later, still-unsettled mutation on a *different* id
  /// within the same page. Each in-flight mutation still carries its own
  /// independent snapshot, so its eventual settlement is handled correctly
  /// on its own terms.
  fn apply_remote(
    &mut self,
    id: TodoId,
    remote_id: u64,
    mutation: Mutation,
    key: PageKey,
    snapshot: PageEntry,
  ) {
    self.inflight.insert(
      id,
      MutationContext {
        key,
        kind: mutation.kind(),
        snapshot,
      },
    );

    let fut = self.transport.apply_mutation(remote_id, mutation);
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let result = fut.await;
      let _ = tx.send(Settlement::Mutation { id, result });
    });
  }
}

impl std::fmt::Debug for TodoStore {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TodoStore")
      .field("pagination", &self.pagination)
      .field("total", &self.total)
      .field("inflight", &self.inflight.keys().collect::<Vec<_>>())
      .field("fetching", &self.fetching)
      .finish_non_exhaustive()
  }
}
