use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::catalog::{Event, EventFilter, Race, RaceFilter};
use crate::db::{self, Repository};
use crate::types::ListRequest;

/// Repositories shared by all handlers
pub struct AppState {
  pub races: Arc<Repository<Race>>,
  pub events: Arc<Repository<Event>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListRacesResponse {
  pub races: Vec<Race>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListEventsResponse {
  pub events: Vec<Event>,
}

/// Build the catalog API router
pub fn build_router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/v1/list-races", post(list_races))
    .route("/v1/races/{id}", get(get_race))
    .route("/v1/list-events", post(list_events))
    .route("/v1/events/{id}", get(get_event))
    .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
  Json(serde_json::json!({ "status": "ok" }))
}

async fn list_races(
  State(state): State<Arc<AppState>>,
  Json(request): Json<ListRequest<RaceFilter>>,
) -> Result<Json<ListRacesResponse>, AppError> {
  let repo = state.races.clone();
  let races = run_blocking(move || repo.list(&request)).await?;
  Ok(Json(ListRacesResponse { races }))
}

async fn get_race(
  State(state): State<Arc<AppState>>,
  Path(id): Path<i64>,
) -> Result<Json<Race>, AppError> {
  let repo = state.races.clone();
  let race = run_blocking(move || repo.get(id)).await?;
  Ok(Json(race))
}

async fn list_events(
  State(state): State<Arc<AppState>>,
  Json(request): Json<ListRequest<EventFilter>>,
) -> Result<Json<ListEventsResponse>, AppError> {
  let repo = state.events.clone();
  let events = run_blocking(move || repo.list(&request)).await?;
  Ok(Json(ListEventsResponse { events }))
}

async fn get_event(
  State(state): State<Arc<AppState>>,
  Path(id): Path<i64>,
) -> Result<Json<Event>, AppError> {
  let repo = state.events.clone();
  let event = run_blocking(move || repo.get(id)).await?;
  Ok(Json(event))
}

/// Store calls are synchronous; keep them off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
  F: FnOnce() -> db::Result<T> + Send + 'static,
  T: Send + 'static,
{
  tokio::task::spawn_blocking(f)
    .await
    .map_err(|e| AppError::Internal(format!("store task failed: {}", e)))?
    .map_err(AppError::from)
}

enum AppError {
  NotFound(String),
  Internal(String),
}

impl From<db::Error> for AppError {
  fn from(e: db::Error) -> Self {
    if e.is_not_found() {
      Self::NotFound(e.to_string())
    } else {
      tracing::error!("store error: {}", e);
      Self::Internal(e.to_string())
    }
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let (status, msg) = match self {
      Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
      Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
    };
    (status, Json(serde_json::json!({ "error": msg }))).into_response()
  }
}
