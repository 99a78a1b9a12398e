//! Error types for `kinship-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing required field `{0}`")]
  MissingField(&'static str),

  #[error("field `{0}` cannot be null")]
  NullField(&'static str),

  #[error("duplicate person id: {0:?}")]
  DuplicateId(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
