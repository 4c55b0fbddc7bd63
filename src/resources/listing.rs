//! How each record type is shown in lists, details and plain-text output.

use chrono::NaiveDate;

use crate::api::types::{Document, Job, Opportunity, Partner, Tender, Update};
use crate::cache::Cacheable;

/// A record that can be listed.
pub trait Listing: Cacheable + std::fmt::Debug {
  /// List column headers with their width in characters
  const COLUMNS: &'static [(&'static str, usize)];

  fn id(&self) -> &str;

  /// Title of the detail view
  fn heading(&self) -> &str;

  /// One cell per column
  fn cells(&self) -> Vec<String>;

  /// Labelled fields for the detail view
  fn details(&self) -> Vec<(&'static str, String)>;

  /// Long free text, if any
  fn body(&self) -> &str {
    ""
  }

  /// Closing date, for records that have one
  fn deadline(&self) -> Option<NaiveDate> {
    None
  }

  /// Case-insensitive match against the visible cells and the body.
  fn matches(&self, filter: &str) -> bool {
    let filter = filter.trim().to_lowercase();
    if filter.is_empty() {
      return true;
    }
    self
      .cells()
      .iter()
      .map(String::as_str)
      .chain(std::iter::once(self.body()))
      .any(|text| text.to_lowercase().contains(&filter))
  }

  /// Tab-separated line for `portal list`.
  fn plain_line(&self) -> String {
    let mut parts = vec![self.id().to_string()];
    parts.extend(self.cells());
    parts.join("\t")
  }
}

fn text(value: &Option<String>) -> String {
  value.clone().unwrap_or_else(|| "-".to_string())
}

pub fn format_date(value: Option<NaiveDate>) -> String {
  value
    .map(|d| d.format("%d %b %Y").to_string())
    .unwrap_or_else(|| "-".to_string())
}

impl Listing for Job {
  const COLUMNS: &'static [(&'static str, usize)] = &[
    ("TITLE", 36),
    ("DEPARTMENT", 16),
    ("LOCATION", 14),
    ("TYPE", 10),
    ("CLOSES", 11),
  ];

  fn id(&self) -> &str {
    &self.id
  }

  fn heading(&self) -> &str {
    &self.title
  }

  fn cells(&self) -> Vec<String> {
    vec![
      self.title.clone(),
      text(&self.department),
      text(&self.location),
      text(&self.employment_type),
      format_date(self.closing_date),
    ]
  }

  fn details(&self) -> Vec<(&'static str, String)> {
    vec![
      ("Department", text(&self.department)),
      ("Location", text(&self.location)),
      ("Type", text(&self.employment_type)),
      ("Closes", format_date(self.closing_date)),
      ("Apply", text(&self.apply_url)),
    ]
  }

  fn body(&self) -> &str {
    &self.summary
  }

  fn deadline(&self) -> Option<NaiveDate> {
    self.closing_date
  }
}

impl Listing for Opportunity {
  const COLUMNS: &'static [(&'static str, usize)] = &[
    ("TITLE", 36),
    ("CATEGORY", 14),
    ("LOCATION", 16),
    ("DEADLINE", 11),
  ];

  fn id(&self) -> &str {
    &self.id
  }

  fn heading(&self) -> &str {
    &self.title
  }

  fn cells(&self) -> Vec<String> {
    vec![
      self.title.clone(),
      text(&self.category),
      text(&self.location),
      format_date(self.deadline),
    ]
  }

  fn details(&self) -> Vec<(&'static str, String)> {
    vec![
      ("Category", text(&self.category)),
      ("Location", text(&self.location)),
      ("Deadline", format_date(self.deadline)),
      ("Link", text(&self.link)),
    ]
  }

  fn body(&self) -> &str {
    &self.description
  }

  fn deadline(&self) -> Option<NaiveDate> {
    self.deadline
  }
}

impl Listing for Partner {
  const COLUMNS: &'static [(&'static str, usize)] = &[("NAME", 32), ("WEBSITE", 40)];

  fn id(&self) -> &str {
    &self.id
  }

  fn heading(&self) -> &str {
    &self.name
  }

  fn cells(&self) -> Vec<String> {
    vec![self.name.clone(), text(&self.website)]
  }

  fn details(&self) -> Vec<(&'static str, String)> {
    vec![
      ("Website", text(&self.website)),
      ("Logo", text(&self.logo_url)),
    ]
  }

  fn body(&self) -> &str {
    self.description.as_deref().unwrap_or("")
  }
}

impl Listing for Update {
  const COLUMNS: &'static [(&'static str, usize)] =
    &[("TITLE", 44), ("AUTHOR", 20), ("PUBLISHED", 11)];

  fn id(&self) -> &str {
    &self.id
  }

  fn heading(&self) -> &str {
    &self.title
  }

  fn cells(&self) -> Vec<String> {
    vec![
      self.title.clone(),
      text(&self.author),
      format_date(self.published_on),
    ]
  }

  fn details(&self) -> Vec<(&'static str, String)> {
    vec![
      ("Author", text(&self.author)),
      ("Published", format_date(self.published_on)),
      ("Image", text(&self.image_url)),
    ]
  }

  fn body(&self) -> &str {
    &self.summary
  }
}

impl Listing for Document {
  const COLUMNS: &'static [(&'static str, usize)] =
    &[("TITLE", 40), ("CATEGORY", 16), ("FORMAT", 8)];

  fn id(&self) -> &str {
    &self.id
  }

  fn heading(&self) -> &str {
    &self.title
  }

  fn cells(&self) -> Vec<String> {
    vec![
      self.title.clone(),
      text(&self.category),
      text(&self.file_type),
    ]
  }

  fn details(&self) -> Vec<(&'static str, String)> {
    vec![
      ("Category", text(&self.category)),
      ("Format", text(&self.file_type)),
      ("Download", text(&self.file_url)),
    ]
  }

  fn body(&self) -> &str {
    self.description.as_deref().unwrap_or("")
  }
}

impl Listing for Tender {
  const COLUMNS: &'static [(&'static str, usize)] = &[
    ("REFERENCE", 12),
    ("TITLE", 40),
    ("STATUS", 8),
    ("DEADLINE", 11),
  ];

  fn id(&self) -> &str {
    &self.id
  }

  fn heading(&self) -> &str {
    &self.title
  }

  fn cells(&self) -> Vec<String> {
    vec![
      text(&self.reference),
      self.title.clone(),
      self.status.label().to_string(),
      format_date(self.deadline),
    ]
  }

  fn details(&self) -> Vec<(&'static str, String)> {
    vec![
      ("Reference", text(&self.reference)),
      ("Status", self.status.label().to_string()),
      ("Deadline", format_date(self.deadline)),
      ("Documents", text(&self.document_url)),
    ]
  }

  fn body(&self) -> &str {
    &self.description
  }

  fn deadline(&self) -> Option<NaiveDate> {
    self.deadline
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seed;

  fn cells_match_columns<T: Listing>(items: &[T]) -> bool {
    items.iter().all(|item| item.cells().len() == T::COLUMNS.len())
  }

  #[test]
  fn test_cells_line_up_with_columns() {
    assert!(cells_match_columns(&seed::careers()));
    assert!(cells_match_columns(&seed::opportunities()));
    assert!(cells_match_columns(&seed::partners()));
    assert!(cells_match_columns(&seed::updates()));
    assert!(cells_match_columns(&seed::resources()));
    assert!(cells_match_columns(&seed::tenders()));
  }

  #[test]
  fn test_filter_is_case_insensitive() {
    let jobs = seed::careers();
    assert!(jobs[0].matches("OUTREACH"));
    assert!(jobs[0].matches("  "));
    assert!(!jobs[0].matches("plumber"));
  }

  #[test]
  fn test_filter_searches_body() {
    let tenders = seed::tenders();
    assert!(tenders[0].matches("twelve events"));
  }

  #[test]
  fn test_plain_line_starts_with_id() {
    let tender = &seed::tenders()[0];
    assert_eq!(
      tender.plain_line(),
      "static-tender-1\tTND-001\tCatering Services for Community Events\tOpen\t-"
    );
  }

  #[test]
  fn test_format_date() {
    assert_eq!(format_date(NaiveDate::from_ymd_opt(2025, 3, 1)), "01 Mar 2025");
    assert_eq!(format_date(None), "-");
  }
}
