//! Handlers for `/persons` endpoints. Every handler is scoped to the
//! [`Caller`]'s registry.
//!
//! | Method   | Path            | Notes |
//! |----------|-----------------|-------|
//! | `GET`    | `/persons`      | Oldest first |
//! | `POST`   | `/persons`      | Body: [`CreatePersonBody`]; 409 if the id is taken |
//! | `GET`    | `/persons/{id}` | 404 if not found |
//! | `PUT`    | `/persons/{id}` | Body: [`UpdatePersonBody`]; sparse, empty body allowed |
//! | `DELETE` | `/persons/{id}` | 404 if not found |
//! | `POST`   | `/persons/sync` | Body: [`SyncBody`]; replaces the whole registry |
//! | `GET`    | `/persons/sync` | The person whose id is `sync` |
//! | `PUT`    | `/persons/sync` | As `PUT /persons/{id}` |
//! | `DELETE` | `/persons/sync` | As `DELETE /persons/{id}` |

use axum::{
  body::Bytes,
  extract::{
    Json, Path, State,
    rejection::{BytesRejection, JsonRejection},
  },
};
use kinship_core::{person::Person, store::RegistryStore};

use crate::{
  AppState,
  auth::Caller,
  body::{CreatePersonBody, SyncBody, UpdatePersonBody},
  envelope::Envelope,
  error::ApiError,
};

const MISSING_FIELDS: &str = "缺少 id、name 或 path";
const NOT_FOUND: &str = "未找到该关系人";
const ID_TAKEN: &str = "该 id 已存在";
const PERSONS_NOT_ARRAY: &str = "需要 persons 数组";
const DELETED: &str = "已删除";
const SHADOWED_ID: &str = "sync";

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /persons`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Caller(openid): Caller,
) -> Result<Envelope<Vec<Person>>, ApiError>
where
  S: RegistryStore + 'static,
{
  let persons = state
    .store
    .list_persons(openid)
    .await
    .map_err(ApiError::internal)?;
  Ok(Envelope::ok(persons))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /persons`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Caller(openid): Caller,
  body: Result<Json<CreatePersonBody>, JsonRejection>,
) -> Result<Envelope<Person>, ApiError>
where
  S: RegistryStore + 'static,
{
  let Json(body) = body?;
  let input = body
    .into_new_person()
    .map_err(|_| ApiError::InvalidInput(MISSING_FIELDS.to_owned()))?;

  let person = state
    .store
    .create_person(openid, input)
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(|| ApiError::Conflict(ID_TAKEN.to_owned()))?;
  Ok(Envelope::ok(person))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /persons/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Caller(openid): Caller,
  Path(id): Path<String>,
) -> Result<Envelope<Person>, ApiError>
where
  S: RegistryStore + 'static,
{
  fetch(&state, openid, id).await.map(Envelope::ok)
}

async fn fetch<S: RegistryStore>(
  state: &AppState<S>,
  openid: String,
  id: String,
) -> Result<Person, ApiError> {
  state
    .store
    .get_person(openid, id)
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_owned()))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /persons/{id}` — returns the row as stored after the update.
///
/// An empty body is an empty patch. The id is looked up before the body is
/// validated, so an unknown id is a 404 whatever the body holds.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Caller(openid): Caller,
  Path(id): Path<String>,
  body: Result<Bytes, BytesRejection>,
) -> Result<Envelope<Person>, ApiError>
where
  S: RegistryStore + 'static,
{
  apply_update(&state, openid, id, body).await.map(Envelope::ok)
}

async fn apply_update<S: RegistryStore>(
  state: &AppState<S>,
  openid: String,
  id: String,
  body: Result<Bytes, BytesRejection>,
) -> Result<Person, ApiError> {
  let current = fetch(state, openid.clone(), id.clone()).await?;

  let body = body.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
  let patch = parse_update(&body)?.into_patch()?;
  if patch.is_empty() {
    return Ok(current);
  }

  state
    .store
    .update_person(openid, id, patch)
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_owned()))
}

fn parse_update(body: &[u8]) -> Result<UpdatePersonBody, ApiError> {
  if body.iter().all(u8::is_ascii_whitespace) {
    return Ok(UpdatePersonBody::default());
  }
  let Json(body) = Json::<UpdatePersonBody>::from_bytes(body)?;
  Ok(body)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /persons/{id}`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Caller(openid): Caller,
  Path(id): Path<String>,
) -> Result<Envelope<()>, ApiError>
where
  S: RegistryStore + 'static,
{
  remove(&state, openid, id).await
}

async fn remove<S: RegistryStore>(
  state: &AppState<S>,
  openid: String,
  id: String,
) -> Result<Envelope<()>, ApiError> {
  let deleted = state
    .store
    .delete_person(openid, id)
    .await
    .map_err(ApiError::internal)?;
  if !deleted {
    return Err(ApiError::NotFound(NOT_FOUND.to_owned()));
  }
  Ok(Envelope::message(DELETED))
}

// ─── Person named `sync` ──────────────────────────────────────────────────────
//
// The static `/persons/sync` route wins over `/persons/{id}`, so a person
// whose id is `sync` is served by these.

/// `GET /persons/sync`
pub async fn get_shadowed<S>(
  State(state): State<AppState<S>>,
  Caller(openid): Caller,
) -> Result<Envelope<Person>, ApiError>
where
  S: RegistryStore + 'static,
{
  fetch(&state, openid, SHADOWED_ID.to_owned()).await.map(Envelope::ok)
}

/// `PUT /persons/sync`
pub async fn update_shadowed<S>(
  State(state): State<AppState<S>>,
  Caller(openid): Caller,
  body: Result<Bytes, BytesRejection>,
) -> Result<Envelope<Person>, ApiError>
where
  S: RegistryStore + 'static,
{
  apply_update(&state, openid, SHADOWED_ID.to_owned(), body)
    .await
    .map(Envelope::ok)
}

/// `DELETE /persons/sync`
pub async fn delete_shadowed<S>(
  State(state): State<AppState<S>>,
  Caller(openid): Caller,
) -> Result<Envelope<()>, ApiError>
where
  S: RegistryStore + 'static,
{
  remove(&state, openid, SHADOWED_ID.to_owned()).await
}

// ─── Sync ─────────────────────────────────────────────────────────────────────

/// `POST /persons/sync` — replace the caller's registry with the given list.
pub async fn sync<S>(
  State(state): State<AppState<S>>,
  Caller(openid): Caller,
  body: Result<Json<SyncBody>, JsonRejection>,
) -> Result<Envelope<Vec<Person>>, ApiError>
where
  S: RegistryStore + 'static,
{
  let Json(body) = body
    .map_err(|e| ApiError::InvalidInput(format!("{PERSONS_NOT_ARRAY}: {}", e.body_text())))?;
  let persons = body.into_new_persons()?;

  let count = persons.len();
  let synced = state
    .store
    .replace_persons(openid, persons)
    .await
    .map_err(ApiError::internal)?;

  tracing::info!(count, "registry synced");
  Ok(Envelope::ok(synced))
}
