//! Flat domain records exposed to views and the CLI.
//!
//! Live responses and the bundled seed data both produce these exact types,
//! so consumers never know where a record came from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Open position listed on the careers page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
  pub id: String,
  pub title: String,
  pub department: Option<String>,
  pub location: Option<String>,
  pub employment_type: Option<String>,
  pub summary: String,
  pub closing_date: Option<NaiveDate>,
  pub apply_url: Option<String>,
}

/// Volunteering, training or funding opportunity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
  pub id: String,
  pub title: String,
  pub category: Option<String>,
  pub description: String,
  pub location: Option<String>,
  pub deadline: Option<NaiveDate>,
  pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
  pub id: String,
  pub name: String,
  pub description: Option<String>,
  pub logo_url: Option<String>,
  pub website: Option<String>,
}

/// News item shown in the updates feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
  pub id: String,
  pub title: String,
  pub summary: String,
  pub author: Option<String>,
  pub published_on: Option<NaiveDate>,
  pub image_url: Option<String>,
}

/// Downloadable document from the resources page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
  pub id: String,
  pub title: String,
  pub description: Option<String>,
  pub category: Option<String>,
  pub file_url: Option<String>,
  pub file_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenderStatus {
  Open,
  Closed,
  Awarded,
}

impl TenderStatus {
  pub fn label(&self) -> &'static str {
    match self {
      TenderStatus::Open => "Open",
      TenderStatus::Closed => "Closed",
      TenderStatus::Awarded => "Awarded",
    }
  }
}

/// Procurement notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tender {
  pub id: String,
  pub reference: Option<String>,
  pub title: String,
  pub description: String,
  pub status: TenderStatus,
  pub deadline: Option<NaiveDate>,
  pub document_url: Option<String>,
}
