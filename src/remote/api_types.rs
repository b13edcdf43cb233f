//! Serde-deserializable types matching the todo service's responses.
//!
//! These are separate from the domain types: the wire calls the title field
//! `todo` and knows nothing about local records, and keeping the envelope
//! here lets the domain types stay focused on what the store needs.

use serde::Deserialize;

use crate::remote::PageFetch;
use crate::types::{Todo, TodoId};

#[derive(Debug, Deserialize)]
pub struct ApiTodo {
  pub id: u64,
  /// The title. The service names this field after the resource itself.
  #[serde(rename = "todo", default)]
  pub title: String,
  #[serde(default)]
  pub completed: bool,
  #[serde(rename = "userId", default)]
  pub user_id: u64,
}

impl ApiTodo {
  pub fn into_domain(self) -> Todo {
    Todo {
      id: TodoId::Remote(self.id),
      title: self.title,
      completed: self.completed,
    }
  }
}

/// Envelope of the paginated list endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiTodosResponse {
  #[serde(default)]
  pub todos: Vec<ApiTodo>,
  #[serde(default)]
  pub total: u64,
  #[serde(default)]
  pub skip: u64,
  #[serde(default)]
  pub limit: u64,
}

impl ApiTodosResponse {
  pub fn into_page_fetch(self) -> PageFetch {
    PageFetch {
      items: self.todos.into_iter().map(ApiTodo::into_domain).collect(),
      total: self.total,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_list_envelope() {
    let body = r#"{
      "todos": [
        {"id": 1, "todo": "Do something nice", "completed": true, "userId": 26},
        {"id": 2, "todo": "Memorize a poem", "completed": false, "userId": 48}
      ],
      "total": 254,
      "skip": 0,
      "limit": 2
    }"#;

    let parsed: ApiTodosResponse = serde_json::from_str(body).unwrap();
    let page = parsed.into_page_fetch();

    assert_eq!(page.total, 254);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, TodoId::Remote(1));
    assert_eq!(page.items[0].title, "Do something nice");
    assert!(page.items[0].completed);
  }

  #[test]
  fn test_missing_fields_default() {
    let parsed: ApiTodo = serde_json::from_str(r#"{"id": 9}"#).unwrap();
    let todo = parsed.into_domain();
    assert_eq!(todo.id, TodoId::Remote(9));
    assert_eq!(todo.title, "");
    assert!(!todo.completed);
  }
}
