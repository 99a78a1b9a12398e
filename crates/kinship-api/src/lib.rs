//! JSON API for the Kinship relative registry.
//!
//! Exposes an axum [`Router`] backed by any [`RegistryStore`]. Every
//! response, success or failure, uses the [`Envelope`] shape.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", kinship_api::api_router(state))
//! ```

pub mod auth;
pub mod body;
pub mod counter;
pub mod envelope;
pub mod error;
pub mod persons;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use kinship_core::store::RegistryStore;

pub use envelope::Envelope;
pub use error::ApiError;

use auth::{IdentityVerifier, PlatformHeader};

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub store:    Arc<S>,
  pub verifier: Arc<dyn IdentityVerifier>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), verifier: Arc::clone(&self.verifier) }
  }
}

impl<S: RegistryStore> AppState<S> {
  /// State that trusts the platform-injected openid header.
  pub fn new(store: S) -> Self {
    Self { store: Arc::new(store), verifier: Arc::new(PlatformHeader) }
  }

  pub fn with_verifier(mut self, verifier: impl IdentityVerifier + 'static) -> Self {
    self.verifier = Arc::new(verifier);
    self
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: RegistryStore + 'static,
{
  Router::new()
    // Legacy demo
    .route("/count", get(counter::total::<S>).post(counter::update::<S>))
    // Platform
    .route("/wx_openid", get(users::wx_openid))
    .route("/user/login", post(users::login::<S>))
    // Registry
    .route("/persons", get(persons::list::<S>).post(persons::create::<S>))
    .route(
      "/persons/sync",
      post(persons::sync::<S>)
        .get(persons::get_shadowed::<S>)
        .put(persons::update_shadowed::<S>)
        .delete(persons::delete_shadowed::<S>),
    )
    .route(
      "/persons/{id}",
      get(persons::get_one::<S>)
        .put(persons::update::<S>)
        .delete(persons::delete_one::<S>),
    )
    .with_state(state)
}
