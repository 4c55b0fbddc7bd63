//! The six public listings and their fetch hooks.

mod hook;
mod listing;

use std::future::Future;

use color_eyre::Result;
use futures::future::BoxFuture;

use crate::api::types::{Document, Job, Opportunity, Partner, Tender, Update};
use crate::api::{ApiClient, ClientError};
use crate::cache::CacheLayer;
use crate::reachability::Reachability;
use crate::seed;

pub use hook::{ResourceHook, UseResource};
pub use listing::Listing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ResourceKind {
  Careers,
  Opportunities,
  Partners,
  Updates,
  Resources,
  Tenders,
}

impl ResourceKind {
  pub const ALL: [ResourceKind; 6] = [
    ResourceKind::Careers,
    ResourceKind::Opportunities,
    ResourceKind::Partners,
    ResourceKind::Updates,
    ResourceKind::Resources,
    ResourceKind::Tenders,
  ];

  /// Resource name, as used in endpoints and cache keys
  pub fn name(&self) -> &'static str {
    match self {
      ResourceKind::Careers => "careers",
      ResourceKind::Opportunities => "opportunities",
      ResourceKind::Partners => "partners",
      ResourceKind::Updates => "updates",
      ResourceKind::Resources => "resources",
      ResourceKind::Tenders => "tenders",
    }
  }

  pub fn title(&self) -> &'static str {
    match self {
      ResourceKind::Careers => "Careers",
      ResourceKind::Opportunities => "Opportunities",
      ResourceKind::Partners => "Partners",
      ResourceKind::Updates => "Updates",
      ResourceKind::Resources => "Resources",
      ResourceKind::Tenders => "Tenders",
    }
  }

  pub fn from_name(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|kind| kind.name() == name)
  }
}

/// Adapt a client call into a live fetcher.
fn live<T, F, Fut>(
  client: &ApiClient,
  fetch: F,
) -> impl Fn() -> BoxFuture<'static, Result<Vec<T>>> + Send + Sync + 'static
where
  T: Send + 'static,
  F: Fn(ApiClient) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<Vec<T>, ClientError>> + Send + 'static,
{
  let client = client.clone();
  move || {
    let request = fetch(client.clone());
    Box::pin(async move { Ok(request.await?) })
  }
}

/// One hook per listing, sharing a reachability handle and a cache.
#[derive(Clone)]
pub struct Resources {
  pub careers: ResourceHook<Job>,
  pub opportunities: ResourceHook<Opportunity>,
  pub partners: ResourceHook<Partner>,
  pub updates: ResourceHook<Update>,
  pub resources: ResourceHook<Document>,
  pub tenders: ResourceHook<Tender>,
}

impl Resources {
  pub fn new(
    client: &ApiClient,
    reachability: &Reachability,
    cache: &CacheLayer,
    updates_limit: usize,
  ) -> Self {
    let r = || reachability.clone();
    let c = || cache.clone();

    Self {
      careers: ResourceHook::new(
        "careers",
        r(),
        c(),
        seed::careers(),
        live(client, |api| async move { api.careers().await }),
      ),
      opportunities: ResourceHook::new(
        "opportunities",
        r(),
        c(),
        seed::opportunities(),
        live(client, |api| async move { api.opportunities().await }),
      ),
      partners: ResourceHook::new(
        "partners",
        r(),
        c(),
        seed::partners(),
        live(client, |api| async move { api.partners().await }),
      ),
      updates: ResourceHook::new(
        "updates",
        r(),
        c(),
        seed::updates(),
        live(client, move |api| async move { api.updates(updates_limit).await }),
      ),
      resources: ResourceHook::new(
        "resources",
        r(),
        c(),
        seed::resources(),
        live(client, |api| async move { api.resources().await }),
      ),
      tenders: ResourceHook::new(
        "tenders",
        r(),
        c(),
        seed::tenders(),
        live(client, |api| async move { api.tenders().await }),
      ),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::{CacheSource, MemoryStorage};
  use crate::config::ApiConfig;
  use crate::reachability::{ProbePolicy, ReachabilityMonitor};
  use axum::http::StatusCode;
  use axum::routing::get;
  use axum::{Json, Router};
  use serde_json::{json, Value};
  use std::collections::BTreeSet;
  use std::sync::atomic::{AtomicU32, Ordering};
  use std::sync::Arc;
  use std::time::Duration;

  struct Portal {
    monitor: ReachabilityMonitor,
    resources: Resources,
    calls: Arc<AtomicU32>,
  }

  fn jobs_body() -> Value {
    json!({
      "success": true,
      "data": [
        { "_id": "j1", "title": "Finance Officer", "department": "Finance" },
        { "_id": "j2", "title": "Youth Worker", "location": "Eastside" },
        { "_id": "j3", "title": "Fundraising Lead", "employmentType": "Full-time" }
      ]
    })
  }

  /// Backend with working careers/partners, failing opportunities.
  fn router(calls: &Arc<AtomicU32>) -> Router {
    let careers = Arc::clone(calls);
    let opportunities = Arc::clone(calls);
    let partners = Arc::clone(calls);
    Router::new()
      .route(
        "/api/careers",
        get(move || {
          careers.fetch_add(1, Ordering::SeqCst);
          async { Json(jobs_body()) }
        }),
      )
      .route(
        "/api/opportunities",
        get(move || {
          opportunities.fetch_add(1, Ordering::SeqCst);
          async { (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable") }
        }),
      )
      .route(
        "/api/partners",
        get(move || {
          partners.fetch_add(1, Ordering::SeqCst);
          async { Json(json!([{ "id": 7, "name": "Library" }])) }
        }),
      )
  }

  async fn portal(connected: bool) -> Portal {
    let calls = Arc::new(AtomicU32::new(0));
    let app = router(&calls);
    serve_portal(connected, calls, app).await
  }

  async fn serve_portal(connected: bool, calls: Arc<AtomicU32>, app: Router) -> Portal {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });

    let client = ApiClient::new(&ApiConfig {
      url: format!("http://{}", addr),
      ..ApiConfig::default()
    })
    .unwrap();

    let monitor = ReachabilityMonitor::new(
      move || async move {
        if connected {
          Ok(())
        } else {
          Err("connection refused".to_string())
        }
      },
      ProbePolicy {
        retries: 0,
        ..ProbePolicy::default()
      },
    );
    let cache = CacheLayer::new(MemoryStorage::new());
    let resources = Resources::new(&client, &monitor.subscribe(), &cache, 10);

    Portal {
      monitor,
      resources,
      calls,
    }
  }

  async fn settle<T: crate::cache::Cacheable>(resource: &mut UseResource<T>) {
    for _ in 0..100 {
      resource.tick();
      if !resource.output().is_loading {
        return;
      }
      tokio::time::sleep(Duration::from_millis(10)).await;
    }
  }

  fn field_names<T: serde::Serialize>(item: &T) -> BTreeSet<String> {
    match serde_json::to_value(item).unwrap() {
      Value::Object(map) => map.keys().cloned().collect(),
      other => panic!("expected an object, got {}", other),
    }
  }

  #[tokio::test]
  async fn test_offline_careers_are_the_bundled_pair() {
    let portal = portal(false).await;
    portal.monitor.check_now().await;

    let mut careers = portal.resources.careers.use_resource();
    settle(&mut careers).await;

    let output = careers.output();
    let ids: Vec<_> = output.data.iter().map(|job| job.id.as_str()).collect();
    assert_eq!(ids, vec!["static-career-1", "static-career-2"]);
    assert!(!output.is_error);
    assert_eq!(output.source, Some(CacheSource::StaticSeed));
    assert_eq!(portal.calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn test_offline_never_errors() {
    let portal = portal(false).await;
    portal.monitor.check_now().await;
    let r = &portal.resources;

    assert_eq!(r.careers.resolve().await.unwrap().data, seed::careers());
    assert_eq!(r.opportunities.resolve().await.unwrap().data, seed::opportunities());
    assert_eq!(r.partners.resolve().await.unwrap().data, seed::partners());
    assert_eq!(r.updates.resolve().await.unwrap().data, seed::updates());
    assert_eq!(r.resources.resolve().await.unwrap().data, seed::resources());
    assert_eq!(r.tenders.resolve().await.unwrap().data, seed::tenders());
    assert_eq!(portal.calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn test_connected_careers_are_exactly_the_live_list() {
    let portal = portal(true).await;
    portal.monitor.check_now().await;

    let mut careers = portal.resources.careers.use_resource();
    settle(&mut careers).await;

    let output = careers.output();
    let ids: Vec<_> = output.data.iter().map(|job| job.id.as_str()).collect();
    assert_eq!(ids, vec!["j1", "j2", "j3"]);
    assert_eq!(output.source, Some(CacheSource::Network));
    assert!(!output.is_error);
  }

  #[tokio::test]
  async fn test_live_failure_is_an_error_without_seed() {
    let portal = portal(true).await;
    portal.monitor.check_now().await;

    let mut opportunities = portal.resources.opportunities.use_resource();
    settle(&mut opportunities).await;

    let output = opportunities.output();
    assert!(output.data.is_empty());
    assert!(output.is_error);
    assert!(!output.is_loading);
    assert!(output.error.is_some_and(|e| e.contains("500")));
  }

  #[tokio::test]
  async fn test_failures_are_isolated_per_resource() {
    let portal = portal(true).await;
    portal.monitor.check_now().await;
    let r = &portal.resources;

    let (careers, opportunities, partners) = tokio::join!(
      r.careers.resolve(),
      r.opportunities.resolve(),
      r.partners.resolve()
    );

    assert_eq!(careers.unwrap().data.len(), 3);
    assert!(opportunities.is_err());
    assert_eq!(partners.unwrap().data[0].id, "7");
  }

  #[tokio::test]
  async fn test_gated_until_checked() {
    let portal = portal(true).await;

    let mut careers = portal.resources.careers.use_resource();
    tokio::time::sleep(Duration::from_millis(30)).await;
    careers.tick();

    let output = careers.output();
    assert!(output.data.is_empty());
    assert!(!output.is_loading);
    assert!(!output.is_error);
    assert_eq!(portal.calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn test_window_reuses_live_entry() {
    let portal = portal(true).await;
    portal.monitor.check_now().await;

    portal.resources.careers.resolve().await.unwrap();
    let second = portal.resources.careers.resolve().await.unwrap();

    assert_eq!(second.source, CacheSource::CacheFresh);
    assert_eq!(portal.calls.load(Ordering::SeqCst), 1);
  }

  /// Backend where every listing answers, each in a different envelope.
  fn full_router() -> Router {
    let listing = |body: Value| get(move || async move { Json(body) });
    Router::new()
      .route("/api/careers", listing(jobs_body()))
      .route(
        "/api/opportunities",
        listing(json!({ "data": { "data": [{
          "_id": "o1", "title": "Reading Buddy", "type": "Volunteer",
          "description": "Read with children.", "closingDate": "2025-09-01"
        }], "total": 1 } })),
      )
      .route(
        "/api/partners",
        listing(json!([{ "id": 7, "name": "Library", "logo": { "url": "/l.png" } }])),
      )
      .route(
        "/api/updates",
        listing(json!({ "updates": [{
          "id": "u1", "title": "Spring fair", "excerpt": "Stalls wanted",
          "publishedAt": "2025-03-02T10:00:00Z"
        }] })),
      )
      .route(
        "/api/resources",
        listing(json!({ "data": [{
          "_id": "d1", "name": "Annual report", "url": "/files/report.pdf", "format": "pdf"
        }] })),
      )
      .route(
        "/api/tenders",
        listing(json!({ "success": true, "data": [{
          "id": "t1", "referenceNumber": "TND-9", "title": "Printing",
          "status": "open", "deadline": "2025-12-01"
        }] })),
      )
  }

  #[tokio::test]
  async fn test_seed_and_live_records_share_fields() {
    let portal = serve_portal(true, Arc::new(AtomicU32::new(0)), full_router()).await;
    portal.monitor.check_now().await;
    let r = &portal.resources;

    let careers = r.careers.resolve().await.unwrap().data;
    let opportunities = r.opportunities.resolve().await.unwrap().data;
    let partners = r.partners.resolve().await.unwrap().data;
    let updates = r.updates.resolve().await.unwrap().data;
    let documents = r.resources.resolve().await.unwrap().data;
    let tenders = r.tenders.resolve().await.unwrap().data;

    assert_eq!(field_names(&careers[0]), field_names(&seed::careers()[0]));
    assert_eq!(
      field_names(&opportunities[0]),
      field_names(&seed::opportunities()[0])
    );
    assert_eq!(field_names(&partners[0]), field_names(&seed::partners()[0]));
    assert_eq!(field_names(&updates[0]), field_names(&seed::updates()[0]));
    assert_eq!(field_names(&documents[0]), field_names(&seed::resources()[0]));
    assert_eq!(field_names(&tenders[0]), field_names(&seed::tenders()[0]));
  }

  #[test]
  fn test_kind_names_round_trip() {
    for kind in ResourceKind::ALL {
      assert_eq!(ResourceKind::from_name(kind.name()), Some(kind));
    }
    assert_eq!(ResourceKind::from_name("members"), None);
  }
}
