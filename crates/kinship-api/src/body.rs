//! Request body schemas.
//!
//! One type per request shape. Each is deserialised loosely (every field
//! optional) and then validated into the core input types, so that a
//! missing or null field produces [`kinship_core::Error`] rather than an
//! opaque deserialisation failure.

use kinship_core::{
  Error, Result,
  person::{LifeStatus, MaritalStatus, NewPerson, PersonPatch},
};
use serde::{Deserialize, Deserializer};

// ─── Create / sync element ───────────────────────────────────────────────────

/// Body of `POST /persons`, and each element of `POST /persons/sync`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePersonBody {
  pub id:             Option<String>,
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

impl CreatePersonBody {
  /// Validate for a single create: `id`, `name` and `path` are required.
  pub fn into_new_person(mut self) -> Result<NewPerson> {
    let path = self.path.take().ok_or(Error::MissingField("path"))?;
    self.build(path)
  }

  /// Validate as a sync element: a missing `path` is taken as empty.
  pub fn into_synced_person(mut self) -> Result<NewPerson> {
    let path = self.path.take().unwrap_or_default();
    self.build(path)
  }

  fn build(self, path: Vec<String>) -> Result<NewPerson> {
    let id = non_empty(self.id).ok_or(Error::MissingField("id"))?;
    let name = non_empty(self.name).ok_or(Error::MissingField("name"))?;

    let mut person = NewPerson::new(id, name, path);
    if let Some(label) = non_empty(self.path_label) {
      person.path_label = label;
    }
    if let Some(rank) = self.rank {
      person.rank = rank;
    }
    person.status = self.status.unwrap_or_default();
    person.marital_status = self.marital_status.unwrap_or_default();
    person.photo_path = self.photo_path.unwrap_or_default();
    person.traits = self.traits.unwrap_or_default();
    person.contact = self.contact.unwrap_or_default();
    Ok(person)
  }
}

fn non_empty(value: Option<String>) -> Option<String> { value.filter(|s| !s.is_empty()) }

// ─── Sync ────────────────────────────────────────────────────────────────────

/// Body of `POST /persons/sync`.
#[derive(Debug, Deserialize)]
pub struct SyncBody {
  pub persons: Vec<CreatePersonBody>,
}

impl SyncBody {
  /// Validate every element and reject lists that repeat an id.
  pub fn into_new_persons(self) -> Result<Vec<NewPerson>> {
    let persons = self
      .persons
      .into_iter()
      .map(CreatePersonBody::into_synced_person)
      .collect::<Result<Vec<_>>>()?;
    kinship_core::person::ensure_unique_ids(&persons)?;
    Ok(persons)
  }
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// Body of `PUT /persons/{id}`.
///
/// Each field distinguishes three states: absent (`None`, keep the stored
/// value), `null` (`Some(None)`) and a value (`Some(Some(_))`).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePersonBody {
  #[serde(default, deserialize_with = "present")]
  pub path:           Option<Option<Vec<String>>>,
  #[serde(default, deserialize_with = "present")]
  pub path_label:     Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub name:           Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub rank:           Option<Option<i64>>,
  #[serde(default, deserialize_with = "present")]
  pub status:         Option<Option<LifeStatus>>,
  #[serde(default, deserialize_with = "present")]
  pub marital_status: Option<Option<MaritalStatus>>,
  #[serde(default, deserialize_with = "present")]
  pub photo_path:     Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub traits:         Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub contact:        Option<Option<String>>,
}

impl UpdatePersonBody {
  /// `null` clears the optional text fields and is rejected for the rest.
  pub fn into_patch(self) -> Result<PersonPatch> {
    Ok(PersonPatch {
      path:           not_null("path", self.path)?,
      path_label:     self.path_label.map(Option::unwrap_or_default),
      name:           not_null("name", self.name)?,
      rank:           not_null("rank", self.rank)?,
      status:         not_null("status", self.status)?,
      marital_status: self.marital_status.map(Option::unwrap_or_default),
      photo_path:     self.photo_path.map(Option::unwrap_or_default),
      traits:         self.traits.map(Option::unwrap_or_default),
      contact:        self.contact.map(Option::unwrap_or_default),
    })
  }
}

fn not_null<T>(field: &'static str, value: Option<Option<T>>) -> Result<Option<T>> {
  value.map(|v| v.ok_or(Error::NullField(field))).transpose()
}

/// Only called when the key is present, so a `null` becomes `Some(None)`.
fn present<'de, T, D>(de: D) -> std::result::Result<Option<T>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  T::deserialize(de).map(Some)
}
