//! Joined fetches across related collections
//!
//! This module composes a primary fetch with a dependent fetch keyed off a
//! one-to-many field, independently of the entity types involved.

pub mod join;

pub use join::{JoinSpec, JoinedRecords, collect_keys, fetch_joined};
