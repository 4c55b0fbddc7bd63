//! Unwrapping of the JSON envelopes returned by list endpoints.
//!
//! The backend is not consistent about where it puts a list. Paginated
//! endpoints answer `{ success, message, data: { data: [...], total, page } }`,
//! simpler ones `{ success, data: [...] }`, and a few return the array itself
//! or park it under a resource-specific field. Every accepted layout is an
//! explicit [`Envelope`] variant.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Paging metadata carried by some envelopes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
  pub total: Option<u64>,
  pub page: Option<u64>,
  pub limit: Option<u64>,
  pub total_pages: Option<u64>,
}

impl Pagination {
  fn from_object(object: &Map<String, Value>) -> Option<Self> {
    let read = |names: &[&str]| names.iter().find_map(|n| object.get(*n).and_then(Value::as_u64));

    let pagination = Self {
      total: read(&["total", "count"]),
      page: read(&["page", "currentPage"]),
      limit: read(&["limit", "pageSize", "perPage"]),
      total_pages: read(&["totalPages", "pages"]),
    };

    if pagination == Self::default() {
      None
    } else {
      Some(pagination)
    }
  }
}

/// A classified response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
  /// `[...]`
  Bare(Vec<Value>),
  /// `{ data: { data: [...], total, page, ... } }`, or any deeper chain of
  /// `data` objects ending in an array
  NestedData {
    items: Vec<Value>,
    pagination: Option<Pagination>,
  },
  /// `{ data: [...] }`
  Data(Vec<Value>),
  /// First array-valued field, either inside `data` or at the top level.
  Keyed {
    path: String,
    items: Vec<Value>,
    pagination: Option<Pagination>,
  },
  /// No array anywhere we look
  Empty,
}

impl Envelope {
  /// Classify a response body, preferring the most deeply nested list.
  pub fn classify(body: Value) -> Self {
    let mut object = match body {
      Value::Array(items) => return Envelope::Bare(items),
      Value::Object(object) => object,
      _ => return Envelope::Empty,
    };

    match object.shift_remove("data") {
      Some(Value::Object(mut data)) => {
        if let Some((items, pagination)) = take_nested_data(&mut data) {
          return Envelope::NestedData { items, pagination };
        }

        if let Some((field, items)) = take_first_array(&mut data) {
          return Envelope::Keyed {
            path: format!("data.{}", field),
            pagination: Pagination::from_object(&data),
            items,
          };
        }
      }
      Some(Value::Array(items)) => return Envelope::Data(items),
      _ => {}
    }

    match take_first_array(&mut object) {
      Some((field, items)) => Envelope::Keyed {
        path: field,
        pagination: Pagination::from_object(&object),
        items,
      },
      None => Envelope::Empty,
    }
  }

  /// Short name of the layout, used in log lines.
  pub fn shape(&self) -> &str {
    match self {
      Envelope::Bare(_) => "array",
      Envelope::NestedData { .. } => "data.data",
      Envelope::Data(_) => "data",
      Envelope::Keyed { path, .. } => path,
      Envelope::Empty => "empty",
    }
  }

  pub fn pagination(&self) -> Option<Pagination> {
    match self {
      Envelope::NestedData { pagination, .. } | Envelope::Keyed { pagination, .. } => *pagination,
      _ => None,
    }
  }

  pub fn into_items(self) -> Vec<Value> {
    match self {
      Envelope::Bare(items) | Envelope::Data(items) => items,
      Envelope::NestedData { items, .. } | Envelope::Keyed { items, .. } => items,
      Envelope::Empty => Vec::new(),
    }
  }
}

/// Follow `data` objects down to the innermost `data` array.
///
/// Pagination comes from the object holding the array, else from the
/// nearest enclosing object that has some.
fn take_nested_data(object: &mut Map<String, Value>) -> Option<(Vec<Value>, Option<Pagination>)> {
  match object.get_mut("data") {
    Some(Value::Array(_)) => {
      let pagination = Pagination::from_object(object);
      match object.shift_remove("data") {
        Some(Value::Array(items)) => Some((items, pagination)),
        _ => None,
      }
    }
    Some(Value::Object(inner)) => {
      let (items, pagination) = take_nested_data(inner)?;
      Some((items, pagination.or_else(|| Pagination::from_object(object))))
    }
    _ => None,
  }
}

/// Remove and return the first array-valued field, in received order.
fn take_first_array(object: &mut Map<String, Value>) -> Option<(String, Vec<Value>)> {
  let field = object
    .iter()
    .find(|(_, value)| value.is_array())
    .map(|(name, _)| name.clone())?;

  match object.shift_remove(&field) {
    Some(Value::Array(items)) => Some((field, items)),
    _ => None,
  }
}

/// A decoded page of records.
#[derive(Debug, Clone)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub pagination: Option<Pagination>,
}

/// Unwrap a response body into typed items.
///
/// Items that do not decode are logged and skipped.
pub fn unwrap_list<T: DeserializeOwned>(resource: &str, body: Value) -> Page<T> {
  let envelope = Envelope::classify(body);
  let pagination = envelope.pagination();
  tracing::debug!(resource, shape = envelope.shape(), "unwrapped list envelope");

  let items = envelope
    .into_items()
    .into_iter()
    .enumerate()
    .filter_map(|(index, value)| match serde_json::from_value::<T>(value) {
      Ok(item) => Some(item),
      Err(e) => {
        tracing::warn!(resource, index, error = %e, "skipping malformed record");
        None
      }
    })
    .collect();

  Page { items, pagination }
}
