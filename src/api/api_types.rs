//! Serde-deserializable types matching portal API responses.
//!
//! These types are separate from domain types to allow tolerant
//! deserialization (camelCase or snake_case names, Mongo-style `_id`,
//! loosely formatted dates) while keeping domain types flat.
//!
//! Every accepted spelling of a field is its own `Option`, so a record that
//! carries two of them still decodes. The `From` impls pick the first
//! non-empty value in the listed order.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

use super::types::{Document, Job, Opportunity, Partner, Tender, TenderStatus, Update};

// ============================================================================
// Field helpers
// ============================================================================

/// Record id as sent by the backend (string or number).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiId {
  Text(String),
  Number(i64),
}

impl ApiId {
  pub fn into_string(self) -> String {
    match self {
      ApiId::Text(s) => s,
      ApiId::Number(n) => n.to_string(),
    }
  }
}

#[derive(Deserialize)]
struct IdKeys {
  id: Option<ApiId>,
  #[serde(rename = "_id")]
  mongo_id: Option<ApiId>,
}

/// Record id read from `id`, falling back to `_id`.
///
/// Flattened into every wire record; a record with neither fails to decode.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "IdKeys")]
pub struct RecordId(String);

impl TryFrom<IdKeys> for RecordId {
  type Error = String;

  fn try_from(keys: IdKeys) -> Result<Self, Self::Error> {
    keys
      .id
      .or(keys.mongo_id)
      .map(|id| RecordId(id.into_string()))
      .ok_or_else(|| "missing field `id` or `_id`".to_string())
  }
}

/// Accepts `2025-03-01`, `2025-03-01T09:30:00Z` or `2025-03-01T09:30:00.000+02:00`.
///
/// Unparseable values become `None`; a bad date should not drop the record.
fn deserialize_loose_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw: Option<String> = Option::deserialize(deserializer)?;
  Ok(raw.as_deref().and_then(parse_loose_date))
}

pub fn parse_loose_date(raw: &str) -> Option<NaiveDate> {
  let raw = raw.trim();
  if raw.is_empty() {
    return None;
  }
  if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
    return Some(date);
  }
  DateTime::parse_from_rfc3339(raw)
    .map(|dt| dt.date_naive())
    .ok()
}

/// Partner logos are either a plain URL or an uploaded-asset object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiLogo {
  Url(String),
  Asset { url: String },
}

impl ApiLogo {
  fn into_url(self) -> String {
    match self {
      ApiLogo::Url(url) | ApiLogo::Asset { url } => url,
    }
  }
}

/// First candidate that is present and not blank.
fn first_text<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
  candidates
    .into_iter()
    .flatten()
    .find(|s| !s.trim().is_empty())
}

// ============================================================================
// Careers
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiJob {
  #[serde(flatten)]
  pub id: RecordId,
  pub title: String,
  pub department: Option<String>,
  pub location: Option<String>,
  pub employment_type: Option<String>,
  #[serde(rename = "employment_type")]
  pub employment_type_snake: Option<String>,
  #[serde(rename = "type")]
  pub kind: Option<String>,
  pub summary: Option<String>,
  pub description: Option<String>,
  #[serde(default, deserialize_with = "deserialize_loose_date")]
  pub closing_date: Option<NaiveDate>,
  #[serde(default, rename = "closing_date", deserialize_with = "deserialize_loose_date")]
  pub closing_date_snake: Option<NaiveDate>,
  #[serde(default, deserialize_with = "deserialize_loose_date")]
  pub deadline: Option<NaiveDate>,
  pub apply_url: Option<String>,
  #[serde(rename = "apply_url")]
  pub apply_url_snake: Option<String>,
  pub application_url: Option<String>,
}

impl From<ApiJob> for Job {
  fn from(api: ApiJob) -> Self {
    Job {
      id: api.id.0,
      title: api.title,
      department: first_text([api.department]),
      location: first_text([api.location]),
      employment_type: first_text([api.employment_type, api.employment_type_snake, api.kind]),
      summary: first_text([api.summary, api.description]).unwrap_or_default(),
      closing_date: api.closing_date.or(api.closing_date_snake).or(api.deadline),
      apply_url: first_text([api.apply_url, api.apply_url_snake, api.application_url]),
    }
  }
}

// ============================================================================
// Opportunities
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOpportunity {
  #[serde(flatten)]
  pub id: RecordId,
  pub title: String,
  pub category: Option<String>,
  #[serde(rename = "type")]
  pub kind: Option<String>,
  pub description: Option<String>,
  pub location: Option<String>,
  #[serde(default, deserialize_with = "deserialize_loose_date")]
  pub deadline: Option<NaiveDate>,
  #[serde(default, deserialize_with = "deserialize_loose_date")]
  pub closing_date: Option<NaiveDate>,
  #[serde(default, rename = "closing_date", deserialize_with = "deserialize_loose_date")]
  pub closing_date_snake: Option<NaiveDate>,
  pub link: Option<String>,
  pub url: Option<String>,
  pub apply_url: Option<String>,
}

impl From<ApiOpportunity> for Opportunity {
  fn from(api: ApiOpportunity) -> Self {
    Opportunity {
      id: api.id.0,
      title: api.title,
      category: first_text([api.category, api.kind]),
      description: api.description.unwrap_or_default(),
      location: first_text([api.location]),
      deadline: api.deadline.or(api.closing_date).or(api.closing_date_snake),
      link: first_text([api.link, api.url, api.apply_url]),
    }
  }
}

// ============================================================================
// Partners
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPartner {
  #[serde(flatten)]
  pub id: RecordId,
  pub name: Option<String>,
  pub title: Option<String>,
  pub description: Option<String>,
  pub logo: Option<ApiLogo>,
  pub logo_url: Option<ApiLogo>,
  #[serde(rename = "logo_url")]
  pub logo_url_snake: Option<ApiLogo>,
  pub website: Option<String>,
  pub url: Option<String>,
  pub website_url: Option<String>,
}

impl From<ApiPartner> for Partner {
  fn from(api: ApiPartner) -> Self {
    let logo = [api.logo, api.logo_url, api.logo_url_snake].map(|l| l.map(ApiLogo::into_url));
    Partner {
      id: api.id.0,
      name: first_text([api.name, api.title]).unwrap_or_default(),
      description: first_text([api.description]),
      logo_url: first_text(logo),
      website: first_text([api.website, api.url, api.website_url]),
    }
  }
}

// ============================================================================
// Updates
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUpdate {
  #[serde(flatten)]
  pub id: RecordId,
  pub title: String,
  pub summary: Option<String>,
  pub excerpt: Option<String>,
  pub content: Option<String>,
  pub author: Option<String>,
  #[serde(default, deserialize_with = "deserialize_loose_date")]
  pub published_on: Option<NaiveDate>,
  #[serde(default, deserialize_with = "deserialize_loose_date")]
  pub published_at: Option<NaiveDate>,
  #[serde(default, rename = "published_at", deserialize_with = "deserialize_loose_date")]
  pub published_at_snake: Option<NaiveDate>,
  #[serde(default, deserialize_with = "deserialize_loose_date")]
  pub date: Option<NaiveDate>,
  #[serde(default, deserialize_with = "deserialize_loose_date")]
  pub created_at: Option<NaiveDate>,
  pub image_url: Option<String>,
  #[serde(rename = "image_url")]
  pub image_url_snake: Option<String>,
  pub image: Option<String>,
}

impl From<ApiUpdate> for Update {
  fn from(api: ApiUpdate) -> Self {
    Update {
      id: api.id.0,
      title: api.title,
      summary: first_text([api.summary, api.excerpt, api.content]).unwrap_or_default(),
      author: first_text([api.author]),
      published_on: api
        .published_on
        .or(api.published_at)
        .or(api.published_at_snake)
        .or(api.date)
        .or(api.created_at),
      image_url: first_text([api.image_url, api.image_url_snake, api.image]),
    }
  }
}

// ============================================================================
// Resources (documents)
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDocument {
  #[serde(flatten)]
  pub id: RecordId,
  pub title: Option<String>,
  pub name: Option<String>,
  pub description: Option<String>,
  pub category: Option<String>,
  pub file_url: Option<String>,
  #[serde(rename = "file_url")]
  pub file_url_snake: Option<String>,
  pub url: Option<String>,
  pub download_url: Option<String>,
  pub file_type: Option<String>,
  #[serde(rename = "file_type")]
  pub file_type_snake: Option<String>,
  pub format: Option<String>,
}

impl From<ApiDocument> for Document {
  fn from(api: ApiDocument) -> Self {
    Document {
      id: api.id.0,
      title: first_text([api.title, api.name]).unwrap_or_default(),
      description: first_text([api.description]),
      category: first_text([api.category]),
      file_url: first_text([api.file_url, api.file_url_snake, api.url, api.download_url]),
      file_type: first_text([api.file_type, api.file_type_snake, api.format])
        .map(|t| t.to_uppercase()),
    }
  }
}

// ============================================================================
// Tenders
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTender {
  #[serde(flatten)]
  pub id: RecordId,
  pub reference: Option<String>,
  pub reference_number: Option<String>,
  #[serde(rename = "ref")]
  pub reference_short: Option<String>,
  pub title: String,
  pub description: Option<String>,
  pub status: Option<String>,
  #[serde(default, deserialize_with = "deserialize_loose_date")]
  pub deadline: Option<NaiveDate>,
  #[serde(default, deserialize_with = "deserialize_loose_date")]
  pub closing_date: Option<NaiveDate>,
  #[serde(default, rename = "closing_date", deserialize_with = "deserialize_loose_date")]
  pub closing_date_snake: Option<NaiveDate>,
  pub document_url: Option<String>,
  #[serde(rename = "document_url")]
  pub document_url_snake: Option<String>,
  pub url: Option<String>,
}

impl ApiTender {
  /// Convert using `today` to derive a status when the backend omits one.
  pub fn into_tender(self, today: NaiveDate) -> Tender {
    let deadline = self
      .deadline
      .or(self.closing_date)
      .or(self.closing_date_snake);
    let status = match self.status.as_deref().map(str::to_lowercase).as_deref() {
      Some("open") => TenderStatus::Open,
      Some("closed") => TenderStatus::Closed,
      Some("awarded") => TenderStatus::Awarded,
      _ => match deadline {
        Some(deadline) if deadline < today => TenderStatus::Closed,
        _ => TenderStatus::Open,
      },
    };

    Tender {
      id: self.id.0,
      reference: first_text([self.reference, self.reference_number, self.reference_short]),
      title: self.title,
      description: self.description.unwrap_or_default(),
      status,
      deadline,
      document_url: first_text([self.document_url, self.document_url_snake, self.url]),
    }
  }
}
