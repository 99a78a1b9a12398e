//! Handlers for the legacy `/count` demo endpoints.

use axum::extract::{Json, State, rejection::JsonRejection};
use kinship_core::store::RegistryStore;
use serde::Deserialize;

use crate::{AppState, envelope::Envelope, error::ApiError};

/// Body of `POST /count`.
#[derive(Debug, Deserialize)]
pub struct CountBody {
  pub action: Option<String>,
}

/// `POST /count` — `{"action":"inc"}` adds a row, `{"action":"clear"}`
/// removes them all; anything else only reads the total.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<CountBody>, JsonRejection>,
) -> Result<Envelope<i64>, ApiError>
where
  S: RegistryStore + 'static,
{
  let action = body.ok().and_then(|Json(b)| b.action);
  match action.as_deref() {
    Some("inc") => state.store.increment_counter().await,
    Some("clear") => state.store.clear_counter().await,
    _ => Ok(()),
  }
  .map_err(ApiError::internal)?;

  total(State(state)).await
}

/// `GET /count`
pub async fn total<S>(State(state): State<AppState<S>>) -> Result<Envelope<i64>, ApiError>
where
  S: RegistryStore + 'static,
{
  let count = state
    .store
    .counter_total()
    .await
    .map_err(ApiError::internal)?;
  Ok(Envelope::ok(count))
}
