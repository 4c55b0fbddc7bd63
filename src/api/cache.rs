//! Caching implementations for portal types.

use crate::cache::Cacheable;

use super::types::{Document, Job, Opportunity, Partner, Tender, Update};

impl Cacheable for Job {
  fn entity_type() -> &'static str {
    "job"
  }
}

impl Cacheable for Opportunity {
  fn entity_type() -> &'static str {
    "opportunity"
  }
}

impl Cacheable for Partner {
  fn entity_type() -> &'static str {
    "partner"
  }
}

impl Cacheable for Update {
  fn entity_type() -> &'static str {
    "update"
  }
}

impl Cacheable for Document {
  fn entity_type() -> &'static str {
    "document"
  }
}

impl Cacheable for Tender {
  fn entity_type() -> &'static str {
    "tender"
  }
}
