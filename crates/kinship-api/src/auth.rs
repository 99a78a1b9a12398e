//! Caller identification.
//!
//! This service performs no signature, expiry or replay checks of its own.
//! WeChat cloud hosting authenticates the mini-program user and injects the
//! user's openid into every `callContainer` request; whatever sits in front
//! of this service is trusted to have done so. [`IdentityVerifier`] is the
//! seam where that trust is placed, and [`PlatformHeader`] is the default
//! that simply believes the injected header.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use kinship_core::store::RegistryStore;

use crate::{AppState, error::ApiError};

/// Header carrying the caller's openid, injected by the platform.
pub const OPENID_HEADER: &str = "x-wx-openid";

/// Header present when the request came through the platform gateway.
pub const SOURCE_HEADER: &str = "x-wx-source";

/// Resolves the caller's identifier from request headers.
pub trait IdentityVerifier: Send + Sync {
  /// Return the caller's openid, or `None` if the request is not
  /// authenticated.
  fn identify(&self, headers: &HeaderMap) -> Option<String>;
}

/// Trusts the `X-WX-OPENID` header as-is. An absent or empty value means the
/// caller is not signed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformHeader;

impl IdentityVerifier for PlatformHeader {
  fn identify(&self, headers: &HeaderMap) -> Option<String> {
    headers
      .get(OPENID_HEADER)
      .and_then(|v| v.to_str().ok())
      .filter(|s| !s.is_empty())
      .map(str::to_owned)
  }
}

/// The authenticated caller's openid. Extracting it rejects the request with
/// [`ApiError::Unauthenticated`] before the handler body runs.
#[derive(Debug, Clone)]
pub struct Caller(pub String);

impl<S> FromRequestParts<AppState<S>> for Caller
where
  S: RegistryStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    state
      .verifier
      .identify(&parts.headers)
      .map(Caller)
      .ok_or(ApiError::Unauthenticated)
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  #[test]
  fn platform_header_reads_openid() {
    let mut headers = HeaderMap::new();
    headers.insert(OPENID_HEADER, HeaderValue::from_static("o6_bmjrPTlm6_2sgVt7hMZOPfL2M"));
    assert_eq!(
      PlatformHeader.identify(&headers).as_deref(),
      Some("o6_bmjrPTlm6_2sgVt7hMZOPfL2M")
    );
  }

  #[test]
  fn platform_header_rejects_missing_or_empty() {
    let mut headers = HeaderMap::new();
    assert_eq!(PlatformHeader.identify(&headers), None);

    headers.insert(OPENID_HEADER, HeaderValue::from_static(""));
    assert_eq!(PlatformHeader.identify(&headers), None);
  }
}
