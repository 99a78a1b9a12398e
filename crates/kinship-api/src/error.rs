//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::envelope::Envelope;

/// An error returned by an API handler. Every variant renders as the same
/// envelope shape with `code` set to the HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("未登录或 openid 缺失")]
  Unauthenticated,

  #[error("{0}")]
  InvalidInput(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Conflict(String),

  #[error("{0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn internal(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    ApiError::Internal(Box::new(e))
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
      ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::InvalidInput(rejection.body_text()) }
}

/// Validation failures surface in the same language as every other message.
impl From<kinship_core::Error> for ApiError {
  fn from(e: kinship_core::Error) -> Self {
    let message = match e {
      kinship_core::Error::MissingField(field) => format!("缺少 {field}"),
      kinship_core::Error::NullField(field) => format!("{field} 不能为 null"),
      kinship_core::Error::DuplicateId(id) => format!("id 重复：{id}"),
    };
    ApiError::InvalidInput(message)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn core_errors_become_localised_invalid_input() {
    let cases = [
      (kinship_core::Error::MissingField("name"), "缺少 name"),
      (kinship_core::Error::NullField("path"), "path 不能为 null"),
      (kinship_core::Error::DuplicateId("dad".into()), "id 重复：dad"),
    ];
    for (core, message) in cases {
      let err = ApiError::from(core);
      assert_eq!(err.status(), StatusCode::BAD_REQUEST);
      assert_eq!(err.to_string(), message);
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if let ApiError::Internal(e) = &self {
      tracing::error!(error = %e, "request failed");
    }
    (status, Envelope::failure(status, self.to_string())).into_response()
  }
}
