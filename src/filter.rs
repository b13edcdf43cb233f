//! Pure search projection over a page of todos.
//!
//! This is a view-layer filter for the currently cached page only — it never
//! touches the cache, the reported total, or pagination math.

use crate::types::Todo;

/// Filter todos whose title contains the query as a case-insensitive
/// substring. The query is trimmed first; an empty or whitespace-only query
/// is the identity.
pub fn filter_todos<'a>(todos: &'a [Todo], query: &str) -> Vec<&'a Todo> {
  let q = query.trim().to_lowercase();
  if q.is_empty() {
    return todos.iter().collect();
  }
  todos
    .iter()
    .filter(|t| t.title.to_lowercase().contains(&q))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn page() -> Vec<Todo> {
    ["elden ring", "Buy milk", "water the plants"]
      .into_iter()
      .map(Todo::new_local)
      .collect()
  }

  #[test]
  fn test_empty_query_is_identity() {
    let todos = page();
    assert_eq!(filter_todos(&todos, "").len(), 3);
    assert_eq!(filter_todos(&todos, "   ").len(), 3);
  }

  #[test]
  fn test_case_insensitive_substring() {
    let todos = page();
    let matched = filter_todos(&todos, "Ring");
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].title, "elden ring");
  }

  #[test]
  fn test_no_match_returns_empty() {
    let todos = page();
    assert!(filter_todos(&todos, "zebra").is_empty());
  }

  #[test]
  fn test_query_is_trimmed() {
    let todos = page();
    assert_eq!(filter_todos(&todos, "  milk  ").len(), 1);
  }
}
