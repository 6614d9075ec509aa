use std::sync::Arc;

use axum::Router;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes::{build_router, AppState};
use super::ServerConfig;
use crate::db::Repository;

pub struct Daemon {
  config: ServerConfig,
  state: Arc<AppState>,
  shutdown_tx: broadcast::Sender<()>,
}

impl Daemon {
  /// Open both catalog databases. Schema setup happens in `run`.
  pub fn open(config: ServerConfig) -> Result<Self, anyhow::Error> {
    let races = Arc::new(Repository::open(&config.racing.path)?);
    let events = Arc::new(Repository::open(&config.sports.path)?);
    tracing::info!(
      "Opened racing database at {}, sports database at {}",
      config.racing.path,
      config.sports.path
    );
    Ok(Self::with_state(config, Arc::new(AppState { races, events })))
  }

  pub fn with_state(config: ServerConfig, state: Arc<AppState>) -> Self {
    let (shutdown_tx, _) = broadcast::channel(1);
    Self {
      config,
      state,
      shutdown_tx,
    }
  }

  /// Trigger graceful shutdown of the HTTP server
  pub fn shutdown(&self) {
    tracing::info!("Initiating graceful shutdown...");
    let _ = self.shutdown_tx.send(());
  }

  /// Create tables (and fixtures when configured). Safe to call repeatedly.
  pub async fn init(&self) -> Result<(), anyhow::Error> {
    let seed = self.config.seed;
    let races = self.state.races.clone();
    let events = self.state.events.clone();
    tokio::task::spawn_blocking(move || -> Result<(), anyhow::Error> {
      races.init(seed)?;
      events.init(seed)?;
      Ok(())
    })
    .await??;
    Ok(())
  }

  /// Router with CORS and request tracing applied
  pub fn router(&self) -> Router {
    let origins = &self.config.server.cors_origins;
    let cors = if origins.is_empty() || origins.iter().any(|o| o == "*") {
      CorsLayer::permissive()
    } else {
      let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
      CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
    };

    build_router(self.state.clone())
      .layer(cors)
      .layer(TraceLayer::new_for_http())
  }

  pub async fn run(&self) -> Result<(), anyhow::Error> {
    self.init().await?;

    let addr = self.config.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Catalog API listening on http://{}", addr);

    let mut shutdown_rx = self.shutdown_tx.subscribe();
    axum::serve(listener, self.router())
      .with_graceful_shutdown(async move {
        let _ = shutdown_rx.recv().await;
        tracing::info!("Catalog API shutting down");
      })
      .await?;
    Ok(())
  }
}
