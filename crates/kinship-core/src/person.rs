//! Person — one relative in a user's registry.
//!
//! A person is addressed by `(openid, id)`. The `id` is chosen by the client
//! (e.g. `mom_bro_1`) and is only unique within one owner's registry.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString, IntoStaticStr};

use crate::{Error, Result};

/// Connective used to render a relationship path for display.
pub const PATH_CONNECTIVE: &str = "的";

// ─── Status enums ────────────────────────────────────────────────────────────

/// Whether the relative is alive.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LifeStatus {
  /// Clients send `""` when the picker was left untouched.
  #[default]
  #[serde(alias = "")]
  #[strum(to_string = "living", serialize = "")]
  Living,
  Deceased,
}

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MaritalStatus {
  #[default]
  #[serde(rename = "")]
  #[strum(serialize = "")]
  Unspecified,
  Married,
  Unmarried,
  Divorced,
  Widowed,
}

// ─── Stored record ───────────────────────────────────────────────────────────

/// A relative as stored, including owner and server-maintained timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
  pub openid:         String,
  pub id:             String,
  /// Relationship steps from the user to this relative, root first.
  pub path:           Vec<String>,
  pub path_label:     String,
  /// Term of address, e.g. "舅舅".
  pub name:           String,
  /// Position among relatives sharing the same path; 1 is the eldest.
  pub rank:           i64,
  pub status:         LifeStatus,
  pub marital_status: MaritalStatus,
  /// Local path or cloud object key of the photo; the bytes live elsewhere.
  pub photo_path:     String,
  pub traits:         String,
  pub contact:        String,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

// ─── Insert input ────────────────────────────────────────────────────────────

/// A fully-defaulted person ready to be inserted. The owner and timestamps
/// are supplied by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPerson {
  pub id:             String,
  pub path:           Vec<String>,
  pub path_label:     String,
  pub name:           String,
  pub rank:           i64,
  pub status:         LifeStatus,
  pub marital_status: MaritalStatus,
  pub photo_path:     String,
  pub traits:         String,
  pub contact:        String,
}

impl NewPerson {
  /// Build a person with every optional field at its default and the path
  /// label derived from `path`.
  pub fn new(id: impl Into<String>, name: impl Into<String>, path: Vec<String>) -> Self {
    let path_label = path_label(&path);
    Self {
      id: id.into(),
      path,
      path_label,
      name: name.into(),
      rank: 1,
      status: LifeStatus::default(),
      marital_status: MaritalStatus::default(),
      photo_path: String::new(),
      traits: String::new(),
      contact: String::new(),
    }
  }
}

/// Render a path for display: `["妈妈", "哥哥"]` becomes `"妈妈的哥哥"`.
pub fn path_label(path: &[String]) -> String { path.join(PATH_CONNECTIVE) }

/// Reject a replacement list that names the same id twice; the store keys
/// rows on `(openid, id)` so such a list can never be stored as given.
pub fn ensure_unique_ids(persons: &[NewPerson]) -> Result<()> {
  let mut seen = HashSet::with_capacity(persons.len());
  for person in persons {
    if !seen.insert(person.id.as_str()) {
      return Err(Error::DuplicateId(person.id.clone()));
    }
  }
  Ok(())
}

// ─── Sparse update ───────────────────────────────────────────────────────────

/// A partial update. `None` leaves the stored column untouched; `Some`
/// overwrites it, empty strings included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonPatch {
  pub path:           Option<Vec<String>>,
  pub path_label:     Option<String>,
  pub name:           Option<String>,
  pub rank:           Option<i64>,
  pub status:         Option<LifeStatus>,
  pub marital_status: Option<MaritalStatus>,
  pub photo_path:     Option<String>,
  pub traits:         Option<String>,
  pub contact:        Option<String>,
}

impl PersonPatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn path(segments: &[&str]) -> Vec<String> {
    segments.iter().map(|s| (*s).to_owned()).collect()
  }

  #[test]
  fn path_label_joins_with_connective() {
    assert_eq!(path_label(&path(&["mother", "brother"])), "mother的brother");
    assert_eq!(path_label(&path(&["妈妈"])), "妈妈");
    assert_eq!(path_label(&[]), "");
  }

  #[test]
  fn new_person_defaults() {
    let p = NewPerson::new("mom_bro_1", "舅舅", path(&["妈妈", "哥哥"]));
    assert_eq!(p.path_label, "妈妈的哥哥");
    assert_eq!(p.rank, 1);
    assert_eq!(p.status, LifeStatus::Living);
    assert_eq!(p.marital_status, MaritalStatus::Unspecified);
    assert!(p.photo_path.is_empty() && p.traits.is_empty() && p.contact.is_empty());
  }

  #[test]
  fn status_wire_forms() {
    assert_eq!(serde_json::to_string(&LifeStatus::Deceased).unwrap(), "\"deceased\"");
    assert_eq!(serde_json::to_string(&MaritalStatus::Unspecified).unwrap(), "\"\"");
    assert_eq!(
      serde_json::from_str::<LifeStatus>("\"\"").unwrap(),
      LifeStatus::Living
    );
    assert_eq!(
      serde_json::from_str::<MaritalStatus>("\"widowed\"").unwrap(),
      MaritalStatus::Widowed
    );
    assert!(serde_json::from_str::<LifeStatus>("\"zombie\"").is_err());
  }

  #[test]
  fn status_column_forms() {
    assert_eq!(LifeStatus::Living.as_ref(), "living");
    assert_eq!(MaritalStatus::Unspecified.as_ref(), "");
    assert_eq!("divorced".parse::<MaritalStatus>().unwrap(), MaritalStatus::Divorced);
    assert_eq!("".parse::<MaritalStatus>().unwrap(), MaritalStatus::Unspecified);
  }

  #[test]
  fn duplicate_ids_are_rejected() {
    let list = vec![
      NewPerson::new("a", "x", vec![]),
      NewPerson::new("b", "y", vec![]),
      NewPerson::new("a", "z", vec![]),
    ];
    assert!(matches!(ensure_unique_ids(&list), Err(Error::DuplicateId(id)) if id == "a"));
    assert!(ensure_unique_ids(&list[..2]).is_ok());
  }

  #[test]
  fn empty_patch() {
    assert!(PersonPatch::default().is_empty());
    let patch = PersonPatch { traits: Some(String::new()), ..Default::default() };
    assert!(!patch.is_empty());
  }
}
