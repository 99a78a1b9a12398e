//! User — the owner of a registry, keyed by the platform-issued openid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user. Created on first login and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub openid:     String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
