use chrono::Local;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config::ApiConfig;

use super::api_types::{ApiDocument, ApiJob, ApiOpportunity, ApiPartner, ApiTender, ApiUpdate};
use super::envelope::{unwrap_list, Page};
use super::types::{Document, Job, Opportunity, Partner, Tender, Update};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
  /// Non-2xx response, with the response text
  #[error("HTTP {0}: {1}")]
  Api(StatusCode, String),
  #[error("Network error: {0}")]
  Network(#[from] reqwest::Error),
  #[error("Invalid URL: {0}")]
  InvalidUrl(#[from] url::ParseError),
}

/// Portal REST API client
#[derive(Clone, Debug)]
pub struct ApiClient {
  http: reqwest::Client,
  base: Url,
  health_path: String,
}

impl ApiClient {
  pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
    let http = reqwest::Client::builder()
      .timeout(config.request_timeout())
      .user_agent(concat!("portal/", env!("CARGO_PKG_VERSION")))
      .build()?;

    // Endpoints are joined relative to the base, so its path must end in `/`
    let mut base = Url::parse(&config.url)?;
    if !base.path().ends_with('/') {
      let path = format!("{}/", base.path());
      base.set_path(&path);
    }

    Ok(Self {
      http,
      base,
      health_path: config.health_path.clone(),
    })
  }

  /// Host (and port) of the backend, for display
  pub fn host(&self) -> String {
    match (self.base.host_str(), self.base.port()) {
      (Some(host), Some(port)) => format!("{}:{}", host, port),
      (Some(host), None) => host.to_string(),
      _ => self.base.to_string(),
    }
  }

  /// Resolve an endpoint under the base URL, keeping any path prefix.
  fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
    Ok(self.base.join(path.trim_start_matches('/'))?)
  }

  /// Lightweight reachability check: any 2xx from the health path.
  pub async fn health_check(&self) -> Result<(), ClientError> {
    let response = self.http.get(self.endpoint(&self.health_path)?).send().await?;
    ok_empty(response).await
  }

  /// GET a list endpoint and unwrap its envelope into wire records.
  async fn get_list<A: DeserializeOwned>(
    &self,
    resource: &str,
    path: &str,
    query: &[(&str, String)],
  ) -> Result<Page<A>, ClientError> {
    let url = self.endpoint(path)?;
    tracing::debug!(resource, %url, "fetching list");

    let response = self.http.get(url).query(query).send().await?;
    let body: Value = ok_body(response).await?;
    let page = unwrap_list::<A>(resource, body);

    tracing::debug!(resource, count = page.items.len(), "list fetched");
    if let Some(p) = page.pagination {
      if p.total_pages.zip(p.page).is_some_and(|(pages, page)| page < pages) {
        tracing::debug!(
          resource,
          total = ?p.total,
          limit = ?p.limit,
          "only the first page is shown"
        );
      }
    }
    Ok(page)
  }

  pub async fn careers(&self) -> Result<Vec<Job>, ClientError> {
    let page = self.get_list::<ApiJob>("careers", "/api/careers", &[]).await?;
    Ok(page.items.into_iter().map(Job::from).collect())
  }

  pub async fn opportunities(&self) -> Result<Vec<Opportunity>, ClientError> {
    let page = self
      .get_list::<ApiOpportunity>("opportunities", "/api/opportunities", &[])
      .await?;
    Ok(page.items.into_iter().map(Opportunity::from).collect())
  }

  pub async fn partners(&self) -> Result<Vec<Partner>, ClientError> {
    let page = self.get_list::<ApiPartner>("partners", "/api/partners", &[]).await?;
    Ok(page.items.into_iter().map(Partner::from).collect())
  }

  /// Latest updates, newest first as served.
  pub async fn updates(&self, limit: usize) -> Result<Vec<Update>, ClientError> {
    let page = self
      .get_list::<ApiUpdate>("updates", "/api/updates", &[("limit", limit.to_string())])
      .await?;
    Ok(page.items.into_iter().take(limit).map(Update::from).collect())
  }

  pub async fn resources(&self) -> Result<Vec<Document>, ClientError> {
    let page = self
      .get_list::<ApiDocument>("resources", "/api/resources", &[])
      .await?;
    Ok(page.items.into_iter().map(Document::from).collect())
  }

  pub async fn tenders(&self) -> Result<Vec<Tender>, ClientError> {
    let today = Local::now().date_naive();
    let page = self.get_list::<ApiTender>("tenders", "/api/tenders", &[]).await?;
    Ok(
      page
        .items
        .into_iter()
        .map(|tender| tender.into_tender(today))
        .collect(),
    )
  }
}

/// Deserialize a successful response, or return an error carrying the body.
async fn ok_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
  if !response.status().is_success() {
    return Err(ClientError::Api(response.status(), response.text().await?));
  }
  Ok(response.json::<T>().await?)
}

/// Check that an empty response is OK.
async fn ok_empty(response: reqwest::Response) -> Result<(), ClientError> {
  if !response.status().is_success() {
    return Err(ClientError::Api(response.status(), response.text().await?));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::StatusCode as AxumStatus;
  use axum::routing::get;
  use axum::{Json, Router};
  use serde_json::json;
  use std::collections::HashMap;

  async fn serve(router: Router) -> ApiClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, router).await.unwrap();
    });

    ApiClient::new(&ApiConfig {
      url: format!("http://{}", addr),
      ..ApiConfig::default()
    })
    .unwrap()
  }

  #[tokio::test]
  async fn test_health_check_status() {
    let client = serve(Router::new().route("/api/health", get(|| async { "ok" }))).await;
    assert!(client.health_check().await.is_ok());

    let client = serve(Router::new().route(
      "/api/health",
      get(|| async { (AxumStatus::SERVICE_UNAVAILABLE, "down") }),
    ))
    .await;
    match client.health_check().await {
      Err(ClientError::Api(status, body)) => {
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, "down");
      }
      other => panic!("expected API error, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_paginated_envelope_is_flattened() {
    let router = Router::new().route(
      "/api/partners",
      get(|| async {
        Json(json!({
          "success": true,
          "message": "Partners retrieved",
          "data": {
            "data": [
              { "_id": "a1", "name": "Food Bank", "logo": { "url": "/logos/fb.png" } },
              { "_id": "a2", "name": "Library" }
            ],
            "total": 2,
            "page": 1
          }
        }))
      }),
    );
    let client = serve(router).await;

    let partners = client.partners().await.unwrap();
    assert_eq!(partners.len(), 2);
    assert_eq!(partners[0].id, "a1");
    assert_eq!(partners[0].logo_url.as_deref(), Some("/logos/fb.png"));
    assert_eq!(partners[1].logo_url, None);
  }

  #[tokio::test]
  async fn test_updates_sends_limit() {
    let router = Router::new().route(
      "/api/updates",
      get(
        |axum::extract::Query(params): axum::extract::Query<HashMap<String, String>>| async move {
          let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(0);
          let items: Vec<_> = (0..limit + 2)
            .map(|i| json!({ "id": i, "title": format!("Update {}", i) }))
            .collect();
          Json(json!({ "data": items }))
        },
      ),
    );
    let client = serve(router).await;

    let updates = client.updates(3).await.unwrap();
    assert_eq!(updates.len(), 3);
    assert_eq!(updates[0].id, "0");
  }

  #[tokio::test]
  async fn test_server_error_is_api_error() {
    let router = Router::new().route(
      "/api/tenders",
      get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let client = serve(router).await;

    assert!(matches!(
      client.tenders().await,
      Err(ClientError::Api(StatusCode::INTERNAL_SERVER_ERROR, _))
    ));
  }

  #[tokio::test]
  async fn test_invalid_json_is_network_error() {
    let router = Router::new().route("/api/careers", get(|| async { "<html>oops</html>" }));
    let client = serve(router).await;

    assert!(matches!(client.careers().await, Err(ClientError::Network(_))));
  }

  #[test]
  fn test_host_display() {
    let client = ApiClient::new(&ApiConfig {
      url: "https://api.example.org".to_string(),
      ..ApiConfig::default()
    })
    .unwrap();
    assert_eq!(client.host(), "api.example.org");
  }

  #[test]
  fn test_endpoint_keeps_base_path() {
    for url in ["https://example.org/backend", "https://example.org/backend/"] {
      let client = ApiClient::new(&ApiConfig {
        url: url.to_string(),
        ..ApiConfig::default()
      })
      .unwrap();
      assert_eq!(
        client.endpoint("/api/careers").unwrap().as_str(),
        "https://example.org/backend/api/careers"
      );
    }
  }

  #[tokio::test]
  async fn test_backend_behind_path_prefix() {
    let api = Router::new()
      .route("/api/health", get(|| async { "ok" }))
      .route(
        "/api/careers",
        get(|| async { Json(json!([{ "id": "j1", "title": "Caretaker" }])) }),
      );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, Router::new().nest("/backend", api))
        .await
        .unwrap();
    });

    let client = ApiClient::new(&ApiConfig {
      url: format!("http://{}/backend", addr),
      ..ApiConfig::default()
    })
    .unwrap();

    assert!(client.health_check().await.is_ok());
    assert_eq!(client.careers().await.unwrap()[0].id, "j1");
  }
}
