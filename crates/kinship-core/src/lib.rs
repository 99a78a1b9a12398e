//! Core types and trait definitions for the Kinship relative registry.
//!
//! This crate is free of HTTP and database dependencies. The store backend
//! and the API layer both depend on it.

pub mod error;
pub mod person;
pub mod store;
pub mod user;

pub use error::{Error, Result};
