mod api;
mod app;
mod cache;
mod commands;
mod config;
mod event;
mod logging;
mod query;
mod reachability;
mod resources;
mod seed;
mod ui;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::ApiClient;
use crate::cache::{CacheLayer, CacheSource, MemoryStorage};
use crate::reachability::{ProbePolicy, ReachabilityMonitor};
use crate::resources::{Listing, ResourceHook, ResourceKind, Resources};

#[derive(Parser, Debug)]
#[command(name = "portal")]
#[command(about = "A terminal front end for the community portal listings")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./portal.yaml, then $XDG_CONFIG_HOME/portal/config.yaml)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// Backend base URL, overriding the config file and PORTAL_API_URL
  #[arg(long, global = true)]
  api_url: Option<String>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Print one listing and exit
  List {
    kind: ResourceKind,

    /// Print JSON instead of tab-separated lines
    #[arg(long)]
    json: bool,
  },
  /// Check whether the backend is reachable
  Status,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;
  if let Some(url) = args.api_url {
    config.api.url = url;
    config.validate()?;
  }

  let _log_guard = logging::init(&config)?;

  let client = ApiClient::new(&config.api)?;
  let probe_client = client.clone();
  let monitor = Arc::new(ReachabilityMonitor::new(
    move || {
      let client = probe_client.clone();
      async move { client.health_check().await.map_err(|e| e.to_string()) }
    },
    ProbePolicy::from(&config.probe),
  ));

  let cache = CacheLayer::new(MemoryStorage::new()).with_stale_time(config.cache.stale_time());
  let resources = Resources::new(&client, &monitor.subscribe(), &cache, config.updates_limit);

  match args.command {
    None => {
      let checks = monitor.spawn();
      let mut app = app::App::new(config, client.host(), resources, Arc::clone(&monitor));
      let result = app.run().await;
      checks.abort();
      result
    }
    Some(Command::Status) => {
      let connected = monitor.check_now().await;
      println!(
        "{}: {}",
        client.host(),
        if connected { "online" } else { "offline" }
      );
      Ok(())
    }
    Some(Command::List { kind, json }) => {
      monitor.check_now().await;
      match kind {
        ResourceKind::Careers => print_list(&resources.careers, json).await,
        ResourceKind::Opportunities => print_list(&resources.opportunities, json).await,
        ResourceKind::Partners => print_list(&resources.partners, json).await,
        ResourceKind::Updates => print_list(&resources.updates, json).await,
        ResourceKind::Resources => print_list(&resources.resources, json).await,
        ResourceKind::Tenders => print_list(&resources.tenders, json).await,
      }
    }
  }
}

async fn print_list<T: Listing>(hook: &ResourceHook<T>, json: bool) -> Result<()> {
  let result = hook
    .resolve()
    .await
    .wrap_err_with(|| format!("Failed to load {}", hook.name()))?;

  tracing::info!(
    resource = hook.name(),
    source = ?result.source,
    cached_at = ?result.cached_at,
    count = result.data.len(),
    "listing resolved"
  );

  if result.source == CacheSource::StaticSeed {
    eprintln!("backend unreachable, showing bundled {}", hook.name());
  }

  if json {
    println!("{}", serde_json::to_string_pretty(&result.data)?);
  } else {
    for item in &result.data {
      println!("{}", item.plain_line());
    }
  }
  Ok(())
}
