//! Bundled listings served while the backend is unreachable.
//!
//! Every function builds a fresh copy; nothing here is mutated at runtime.

use chrono::NaiveDate;

use crate::api::types::{Document, Job, Opportunity, Partner, Tender, TenderStatus, Update};

fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
  NaiveDate::from_ymd_opt(year, month, day)
}

fn text(s: &str) -> Option<String> {
  Some(s.to_string())
}

pub fn careers() -> Vec<Job> {
  vec![
    Job {
      id: "static-career-1".to_string(),
      title: "Community Outreach Coordinator".to_string(),
      department: text("Programmes"),
      location: text("Hybrid"),
      employment_type: text("Full-time"),
      summary: "Build relationships with local groups and coordinate our outreach calendar."
        .to_string(),
      closing_date: None,
      apply_url: None,
    },
    Job {
      id: "static-career-2".to_string(),
      title: "Volunteer Programme Assistant".to_string(),
      department: text("Volunteering"),
      location: text("On site"),
      employment_type: text("Part-time"),
      summary: "Support volunteer onboarding, rotas and recognition events.".to_string(),
      closing_date: None,
      apply_url: None,
    },
  ]
}

pub fn opportunities() -> Vec<Opportunity> {
  vec![
    Opportunity {
      id: "static-opportunity-1".to_string(),
      title: "Weekend Food Bank Volunteer".to_string(),
      category: text("Volunteering"),
      description: "Help sort donations and pack parcels on Saturday mornings.".to_string(),
      location: text("Community Hall"),
      deadline: None,
      link: None,
    },
    Opportunity {
      id: "static-opportunity-2".to_string(),
      title: "Youth Leadership Programme".to_string(),
      category: text("Training"),
      description: "A twelve-week course for young people aged 16 to 24.".to_string(),
      location: text("Online"),
      deadline: None,
      link: None,
    },
    Opportunity {
      id: "static-opportunity-3".to_string(),
      title: "Small Grants for Local Projects".to_string(),
      category: text("Funding"),
      description: "Grants for resident-led projects that bring neighbours together."
        .to_string(),
      location: None,
      deadline: None,
      link: None,
    },
  ]
}

pub fn partners() -> Vec<Partner> {
  vec![
    Partner {
      id: "static-partner-1".to_string(),
      name: "City Library Network".to_string(),
      description: text("Hosts our digital skills drop-ins."),
      logo_url: None,
      website: None,
    },
    Partner {
      id: "static-partner-2".to_string(),
      name: "Neighbourhood Food Alliance".to_string(),
      description: text("Supplies the weekly food bank."),
      logo_url: None,
      website: None,
    },
    Partner {
      id: "static-partner-3".to_string(),
      name: "Regional Health Trust".to_string(),
      description: text("Runs wellbeing sessions with our members."),
      logo_url: None,
      website: None,
    },
  ]
}

pub fn updates() -> Vec<Update> {
  vec![
    Update {
      id: "static-update-1".to_string(),
      title: "Our new community hub is open".to_string(),
      summary: "The refurbished hall now hosts drop-ins five days a week.".to_string(),
      author: text("Communications Team"),
      published_on: date(2024, 9, 2),
      image_url: None,
    },
    Update {
      id: "static-update-2".to_string(),
      title: "Annual general meeting".to_string(),
      summary: "Members are invited to review the year and elect the new board.".to_string(),
      author: text("Board Secretary"),
      published_on: date(2024, 6, 14),
      image_url: None,
    },
  ]
}

pub fn resources() -> Vec<Document> {
  vec![
    Document {
      id: "static-resource-1".to_string(),
      title: "Annual Report".to_string(),
      description: text("Highlights, accounts and impact figures."),
      category: text("Reports"),
      file_url: None,
      file_type: text("PDF"),
    },
    Document {
      id: "static-resource-2".to_string(),
      title: "Safeguarding Policy".to_string(),
      description: text("How we keep children and adults at risk safe."),
      category: text("Policies"),
      file_url: None,
      file_type: text("PDF"),
    },
    Document {
      id: "static-resource-3".to_string(),
      title: "Volunteer Handbook".to_string(),
      description: text("Everything new volunteers need to know."),
      category: text("Guides"),
      file_url: None,
      file_type: text("PDF"),
    },
  ]
}

pub fn tenders() -> Vec<Tender> {
  vec![
    Tender {
      id: "static-tender-1".to_string(),
      reference: text("TND-001"),
      title: "Catering Services for Community Events".to_string(),
      description: "Provision of catering for up to twelve events per year.".to_string(),
      status: TenderStatus::Open,
      deadline: None,
      document_url: None,
    },
    Tender {
      id: "static-tender-2".to_string(),
      reference: text("TND-002"),
      title: "Website Maintenance and Hosting".to_string(),
      description: "Ongoing maintenance, hosting and security updates.".to_string(),
      status: TenderStatus::Closed,
      deadline: None,
      document_url: None,
    },
  ]
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  fn unique<'a>(ids: impl Iterator<Item = &'a str>) -> bool {
    let mut seen = HashSet::new();
    ids.into_iter().all(|id| seen.insert(id))
  }

  #[test]
  fn test_careers_seed_matches_published_ids() {
    let ids: Vec<_> = careers().into_iter().map(|j| j.id).collect();
    assert_eq!(ids, vec!["static-career-1", "static-career-2"]);
  }

  #[test]
  fn test_seed_ids_are_unique_and_non_empty() {
    assert!(!opportunities().is_empty());
    assert!(!partners().is_empty());
    assert!(!updates().is_empty());
    assert!(!resources().is_empty());
    assert!(!tenders().is_empty());

    assert!(unique(opportunities().iter().map(|o| o.id.as_str())));
    assert!(unique(partners().iter().map(|p| p.id.as_str())));
    assert!(unique(updates().iter().map(|u| u.id.as_str())));
    assert!(unique(resources().iter().map(|d| d.id.as_str())));
    assert!(unique(tenders().iter().map(|t| t.id.as_str())));
  }

  #[test]
  fn test_seeds_are_rebuilt_identically() {
    assert_eq!(careers(), careers());
    assert_eq!(tenders(), tenders());
  }
}
