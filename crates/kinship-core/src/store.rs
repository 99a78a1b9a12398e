//! The `RegistryStore` trait.
//!
//! Implemented by storage backends (e.g. `kinship-store-sqlite`). The API
//! layer depends on this abstraction, not on any concrete backend, so
//! handlers can be exercised against an in-memory store.

use std::future::Future;

use crate::{
  person::{NewPerson, Person, PersonPatch},
  user::User,
};

/// Abstraction over a Kinship store backend.
///
/// Every person operation is scoped by the owner's `openid`; a backend must
/// never return or touch a row belonging to another owner.
///
/// Expected outcomes ("already exists", "not found") are reported through
/// `Option`/`bool` so callers can tell them apart from backend failures
/// without knowing the backend's error type.
pub trait RegistryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Find the user with this openid, creating it first if absent.
  fn ensure_user(
    &self,
    openid: String,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  // ── Persons — reads ───────────────────────────────────────────────────

  /// All persons of `openid`, oldest first; ties keep insertion order.
  fn list_persons(
    &self,
    openid: String,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  fn get_person(
    &self,
    openid: String,
    id: String,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  // ── Persons — writes ──────────────────────────────────────────────────

  /// Insert a person. Returns `None`, leaving the existing row untouched,
  /// if `(openid, person.id)` is already taken.
  fn create_person(
    &self,
    openid: String,
    person: NewPerson,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Apply a sparse update and return the row as stored afterwards.
  /// Returns `None` if no such person exists.
  fn update_person(
    &self,
    openid: String,
    id: String,
    patch: PersonPatch,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Delete one person. Returns `false` if it did not exist.
  fn delete_person(
    &self,
    openid: String,
    id: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Atomically replace the whole registry of `openid` with `persons`,
  /// preserving their order. On failure the previous registry is kept.
  fn replace_persons(
    &self,
    openid: String,
    persons: Vec<NewPerson>,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  // ── Legacy counter ────────────────────────────────────────────────────

  /// Add one counter row.
  fn increment_counter(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove all counter rows and restart the id sequence.
  fn clear_counter(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Number of counter rows.
  fn counter_total(&self) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;
}
