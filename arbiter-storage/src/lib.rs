//! # arbiter-storage
//!
//! SQLite persistence for the Arbiter engine: connection pool, versioned
//! migrations, and raw query modules. No business logic lives here.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use arbiter_core::errors::{ArbiterError, StorageError};

/// Wrap a SQLite error message in the storage error type.
pub fn to_storage_err(message: String) -> ArbiterError {
    StorageError::SqliteError { message }.into()
}
