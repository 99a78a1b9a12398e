//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with millisecond precision and
//! a `Z` suffix, so lexical order matches chronological order. Paths are
//! stored as compact JSON arrays. Status enums are stored by their wire name.

use chrono::{DateTime, SecondsFormat, Utc};
use kinship_core::{
  person::{LifeStatus, MaritalStatus, NewPerson, Person, PersonPatch},
  user::User,
};
use rusqlite::{Row, ToSql, types::Value};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Path ────────────────────────────────────────────────────────────────────

pub fn encode_path(path: &[String]) -> Result<String> { Ok(serde_json::to_string(path)?) }

pub fn decode_path(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

// ─── Status enums ────────────────────────────────────────────────────────────

pub fn decode_life_status(s: &str) -> Result<LifeStatus> {
  s.parse().map_err(|_| Error::UnknownValue {
    column: "status",
    value:  s.to_owned(),
  })
}

pub fn decode_marital_status(s: &str) -> Result<MaritalStatus> {
  s.parse().map_err(|_| Error::UnknownValue {
    column: "marital_status",
    value:  s.to_owned(),
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawPerson::from_row`].
pub const PERSON_COLUMNS: &str = "openid, id, path, path_label, name, rank, status, \
                                  marital_status, photo_path, traits, contact, created_at, \
                                  updated_at";

/// Raw values read directly from a `persons` row.
pub struct RawPerson {
  pub openid:         String,
  pub id:             String,
  pub path:           String,
  pub path_label:     String,
  pub name:           String,
  pub rank:           i64,
  pub status:         String,
  pub marital_status: String,
  pub photo_path:     String,
  pub traits:         String,
  pub contact:        String,
  pub created_at:     String,
  pub updated_at:     String,
}

impl RawPerson {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      openid:         row.get(0)?,
      id:             row.get(1)?,
      path:           row.get(2)?,
      path_label:     row.get(3)?,
      name:           row.get(4)?,
      rank:           row.get(5)?,
      status:         row.get(6)?,
      marital_status: row.get(7)?,
      photo_path:     row.get(8)?,
      traits:         row.get(9)?,
      contact:        row.get(10)?,
      created_at:     row.get(11)?,
      updated_at:     row.get(12)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      openid:         self.openid,
      id:             self.id,
      path:           decode_path(&self.path)?,
      path_label:     self.path_label,
      name:           self.name,
      rank:           self.rank,
      status:         decode_life_status(&self.status)?,
      marital_status: decode_marital_status(&self.marital_status)?,
      photo_path:     self.photo_path,
      traits:         self.traits,
      contact:        self.contact,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub openid:     String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawUser {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      openid:     row.get(0)?,
      created_at: row.get(1)?,
      updated_at: row.get(2)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      openid:     self.openid,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// A [`NewPerson`] encoded for insertion, bound in [`PERSON_COLUMNS`] order.
pub struct PersonRow {
  pub openid:         String,
  pub id:             String,
  pub path:           String,
  pub path_label:     String,
  pub name:           String,
  pub rank:           i64,
  pub status:         &'static str,
  pub marital_status: &'static str,
  pub photo_path:     String,
  pub traits:         String,
  pub contact:        String,
  pub at:             String,
}

impl PersonRow {
  pub fn encode(openid: &str, person: &NewPerson, at: &str) -> Result<Self> {
    Ok(Self {
      openid:         openid.to_owned(),
      id:             person.id.clone(),
      path:           encode_path(&person.path)?,
      path_label:     person.path_label.clone(),
      name:           person.name.clone(),
      rank:           person.rank,
      status:         person.status.into(),
      marital_status: person.marital_status.into(),
      photo_path:     person.photo_path.clone(),
      traits:         person.traits.clone(),
      contact:        person.contact.clone(),
      at:             at.to_owned(),
    })
  }

  /// Parameters for `INSERT INTO persons (PERSON_COLUMNS) VALUES (?1 … ?13)`.
  /// Both timestamps take the same value.
  pub fn params(&self) -> [&dyn ToSql; 13] {
    [
      &self.openid,
      &self.id,
      &self.path,
      &self.path_label,
      &self.name,
      &self.rank,
      &self.status,
      &self.marital_status,
      &self.photo_path,
      &self.traits,
      &self.contact,
      &self.at,
      &self.at,
    ]
  }
}

/// Column assignments for the fields present in `patch`.
pub fn encode_patch(patch: &PersonPatch) -> Result<Vec<(&'static str, Value)>> {
  let mut sets = Vec::new();
  if let Some(path) = &patch.path {
    sets.push(("path", Value::Text(encode_path(path)?)));
  }
  if let Some(label) = &patch.path_label {
    sets.push(("path_label", Value::Text(label.clone())));
  }
  if let Some(name) = &patch.name {
    sets.push(("name", Value::Text(name.clone())));
  }
  if let Some(rank) = patch.rank {
    sets.push(("rank", Value::Integer(rank)));
  }
  if let Some(status) = patch.status {
    sets.push(("status", Value::Text(status.as_ref().to_owned())));
  }
  if let Some(marital) = patch.marital_status {
    sets.push(("marital_status", Value::Text(marital.as_ref().to_owned())));
  }
  if let Some(photo) = &patch.photo_path {
    sets.push(("photo_path", Value::Text(photo.clone())));
  }
  if let Some(traits) = &patch.traits {
    sets.push(("traits", Value::Text(traits.clone())));
  }
  if let Some(contact) = &patch.contact {
    sets.push(("contact", Value::Text(contact.clone())));
  }
  Ok(sets)
}
