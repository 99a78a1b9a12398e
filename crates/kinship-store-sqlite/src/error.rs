//! Error type for `kinship-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A status column held a value outside its enum.
  #[error("unknown {column} value: {value:?}")]
  UnknownValue {
    column: &'static str,
    value:  String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
