//! SQL schema for the Kinship SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS users (
    openid      TEXT PRIMARY KEY,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

-- Ownership is by openid alone; a registry may exist before its user row.
CREATE TABLE IF NOT EXISTS persons (
    openid          TEXT NOT NULL,
    id              TEXT NOT NULL,      -- client-chosen, e.g. 'mom_bro_1'
    path            TEXT NOT NULL DEFAULT '[]',  -- JSON array of labels
    path_label      TEXT NOT NULL DEFAULT '',
    name            TEXT NOT NULL,
    rank            INTEGER NOT NULL DEFAULT 1,
    status          TEXT NOT NULL DEFAULT 'living',
    marital_status  TEXT NOT NULL DEFAULT '',
    photo_path      TEXT NOT NULL DEFAULT '',
    traits          TEXT NOT NULL DEFAULT '',
    contact         TEXT NOT NULL DEFAULT '',
    created_at      TEXT NOT NULL,      -- RFC 3339 UTC, millisecond precision
    updated_at      TEXT NOT NULL,
    PRIMARY KEY (openid, id)
);

CREATE INDEX IF NOT EXISTS persons_owner_created_idx ON persons(openid, created_at);

-- Legacy demo table; unrelated to the registry.
CREATE TABLE IF NOT EXISTS counters (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    count       INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

PRAGMA user_version = 1;
";
