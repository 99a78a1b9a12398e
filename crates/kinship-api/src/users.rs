//! Handlers for the user endpoints.
//!
//! | Method | Path          | Notes |
//! |--------|---------------|-------|
//! | `POST` | `/user/login` | Registers the caller on first call |
//! | `GET`  | `/wx_openid`  | Echoes the platform-injected openid |

use axum::{
  extract::State,
  http::{HeaderMap, StatusCode},
  response::{IntoResponse, Response},
};
use kinship_core::store::RegistryStore;
use serde::Serialize;

use crate::{
  AppState,
  auth::{Caller, OPENID_HEADER, SOURCE_HEADER},
  envelope::Envelope,
  error::ApiError,
};

#[derive(Debug, Serialize)]
pub struct LoginData {
  pub openid: String,
}

/// `POST /user/login` — idempotently make sure the caller has a user row.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Caller(openid): Caller,
) -> Result<Envelope<LoginData>, ApiError>
where
  S: RegistryStore + 'static,
{
  let user = state
    .store
    .ensure_user(openid)
    .await
    .map_err(ApiError::internal)?;

  tracing::debug!(openid = %user.openid, "user logged in");
  Ok(Envelope::ok(LoginData { openid: user.openid }))
}

/// `GET /wx_openid` — the raw openid as plain text, for requests that came
/// through the platform gateway. Anything else gets an empty 204.
pub async fn wx_openid(headers: HeaderMap) -> Response {
  if !headers.contains_key(SOURCE_HEADER) {
    return StatusCode::NO_CONTENT.into_response();
  }
  headers
    .get(OPENID_HEADER)
    .and_then(|v| v.to_str().ok())
    .unwrap_or_default()
    .to_owned()
    .into_response()
}
