//! The uniform `{ code, data?, message? }` response wrapper.
//!
//! `code` is `0` on success and the HTTP status number otherwise, so clients
//! have a single parsing path for every response.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  pub code:    u16,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:    Option<T>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

impl<T> Envelope<T> {
  pub fn ok(data: T) -> Self {
    Self { code: 0, data: Some(data), message: None }
  }
}

impl Envelope<()> {
  /// A success carrying only a message, e.g. after a delete.
  pub fn message(message: impl Into<String>) -> Self {
    Self { code: 0, data: None, message: Some(message.into()) }
  }

  pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
    Self { code: status.as_u16(), data: None, message: Some(message.into()) }
  }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
  fn into_response(self) -> Response { Json(self).into_response() }
}
