//! [`SqliteStore`] — the SQLite implementation of [`RegistryStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension as _, ffi, types::Value};

use kinship_core::{
  person::{NewPerson, Person, PersonPatch},
  store::RegistryStore,
  user::User,
};

use crate::{
  Result,
  encode::{PERSON_COLUMNS, PersonRow, RawPerson, RawUser, encode_dt, encode_patch},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Kinship store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// are serialised on the connection's background thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── SQL helpers ─────────────────────────────────────────────────────────────

fn insert_person_sql() -> String {
  format!(
    "INSERT INTO persons ({PERSON_COLUMNS})
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
  )
}

fn select_person(
  conn: &Connection,
  openid: &str,
  id: &str,
) -> rusqlite::Result<Option<RawPerson>> {
  conn
    .query_row(
      &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE openid = ?1 AND id = ?2"),
      rusqlite::params![openid, id],
      RawPerson::from_row,
    )
    .optional()
}

fn select_persons(conn: &Connection, openid: &str) -> rusqlite::Result<Vec<RawPerson>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {PERSON_COLUMNS} FROM persons
     WHERE openid = ?1
     ORDER BY created_at ASC, rowid ASC"
  ))?;
  let rows = stmt
    .query_map(rusqlite::params![openid], RawPerson::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

/// True for the violation raised when `(openid, id)` is already taken.
fn is_duplicate_key(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _)
      if e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        || e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

fn decode_all(raws: Vec<RawPerson>) -> Result<Vec<Person>> {
  raws.into_iter().map(RawPerson::into_person).collect()
}

// ─── RegistryStore impl ──────────────────────────────────────────────────────

impl RegistryStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn ensure_user(&self, openid: String) -> Result<User> {
    let at_str = encode_dt(Utc::now());

    let raw: RawUser = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO users (openid, created_at, updated_at) VALUES (?1, ?2, ?2)",
          rusqlite::params![openid, at_str],
        )?;
        Ok(conn.query_row(
          "SELECT openid, created_at, updated_at FROM users WHERE openid = ?1",
          rusqlite::params![openid],
          RawUser::from_row,
        )?)
      })
      .await?;

    raw.into_user()
  }

  // ── Persons — reads ───────────────────────────────────────────────────────

  async fn list_persons(&self, openid: String) -> Result<Vec<Person>> {
    let raws = self
      .conn
      .call(move |conn| Ok(select_persons(conn, &openid)?))
      .await?;

    decode_all(raws)
  }

  async fn get_person(&self, openid: String, id: String) -> Result<Option<Person>> {
    let raw = self
      .conn
      .call(move |conn| Ok(select_person(conn, &openid, &id)?))
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  // ── Persons — writes ──────────────────────────────────────────────────────

  async fn create_person(&self, openid: String, person: NewPerson) -> Result<Option<Person>> {
    let row = PersonRow::encode(&openid, &person, &encode_dt(Utc::now()))?;

    let raw = self
      .conn
      .call(move |conn| {
        match conn.execute(&insert_person_sql(), row.params().as_slice()) {
          Ok(_) => {}
          Err(e) if is_duplicate_key(&e) => return Ok(None),
          Err(e) => return Err(e.into()),
        }
        Ok(select_person(conn, &row.openid, &row.id)?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn update_person(
    &self,
    openid: String,
    id:     String,
    patch:  PersonPatch,
  ) -> Result<Option<Person>> {
    if patch.is_empty() {
      return self.get_person(openid, id).await;
    }

    let sets   = encode_patch(&patch)?;
    let at_str = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        // ?1 openid, ?2 id, ?3 updated_at, then one slot per patched column.
        let mut sql = String::from("UPDATE persons SET updated_at = ?3");
        for (i, (column, _)) in sets.iter().enumerate() {
          sql.push_str(&format!(", {column} = ?{}", i + 4));
        }
        sql.push_str(" WHERE openid = ?1 AND id = ?2");

        let mut values = vec![
          Value::Text(openid.clone()),
          Value::Text(id.clone()),
          Value::Text(at_str),
        ];
        values.extend(sets.into_iter().map(|(_, v)| v));

        let tx = conn.transaction()?;
        if tx.execute(&sql, rusqlite::params_from_iter(values))? == 0 {
          return Ok(None);
        }
        let raw = select_person(&tx, &openid, &id)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn delete_person(&self, openid: String, id: String) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM persons WHERE openid = ?1 AND id = ?2",
          rusqlite::params![openid, id],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  async fn replace_persons(&self, openid: String, persons: Vec<NewPerson>) -> Result<Vec<Person>> {
    let at_str = encode_dt(Utc::now());
    let rows = persons
      .iter()
      .map(|p| PersonRow::encode(&openid, p, &at_str))
      .collect::<Result<Vec<_>>>()?;

    let (removed, raws) = self
      .conn
      .call(move |conn| {
        // Dropping `tx` without commit rolls the whole replacement back.
        let tx = conn.transaction()?;
        let removed = tx.execute(
          "DELETE FROM persons WHERE openid = ?1",
          rusqlite::params![openid],
        )?;
        {
          let mut stmt = tx.prepare(&insert_person_sql())?;
          for row in &rows {
            stmt.execute(row.params().as_slice())?;
          }
        }
        let raws = select_persons(&tx, &openid)?;
        tx.commit()?;
        Ok((removed, raws))
      })
      .await?;

    tracing::debug!(removed, inserted = raws.len(), "registry replaced");
    decode_all(raws)
  }

  // ── Legacy counter ────────────────────────────────────────────────────────

  async fn increment_counter(&self) -> Result<()> {
    let at_str = encode_dt(Utc::now());
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO counters (count, created_at, updated_at) VALUES (1, ?1, ?1)",
          rusqlite::params![at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn clear_counter(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(
          "DELETE FROM counters;
           DELETE FROM sqlite_sequence WHERE name = 'counters';",
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn counter_total(&self) -> Result<i64> {
    Ok(
      self
        .conn
        .call(|conn| {
          Ok(conn.query_row("SELECT COUNT(*) FROM counters", [], |r| r.get(0))?)
        })
        .await?,
    )
  }
}
