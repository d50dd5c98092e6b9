/// Public library interface for the consistency tracker
///
/// This module exports the tracker handle and the public types that client
/// applications and tests build on: domain entities, the storage traits and
/// backends, the streak engine operations, and the analytics engine.

use std::path::PathBuf;
use thiserror::Error;

pub mod analytics;
pub mod domain;
pub mod service;
pub mod storage;

// Re-export the types most callers need
pub use domain::*;
pub use service::{ErrorKind, ServiceError};
pub use storage::{MemoryStore, SqliteStorage, StorageError, Store};

/// Errors that can occur while running the tracker
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("Service error: {0}")]
    Service(#[from] service::ServiceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Tracker handle owning the SQLite backend
///
/// Opening the tracker initializes the database schema if needed. All
/// operations from the [`service`] and [`analytics`] modules run against the
/// storage this handle exposes.
pub struct ConsistencyTracker {
    storage: SqliteStorage,
}

impl ConsistencyTracker {
    /// Open (or create) the tracker database at the given path
    pub fn open(db_path: PathBuf) -> Result<Self, TrackerError> {
        tracing::info!("Opening tracker database: {:?}", db_path);
        let storage = SqliteStorage::new(db_path)?;
        Ok(Self { storage })
    }

    /// Open an in-memory tracker, used by tests and ad-hoc runs
    pub fn open_in_memory() -> Result<Self, TrackerError> {
        let storage = SqliteStorage::open_in_memory()?;
        Ok(Self { storage })
    }

    /// The storage backend this tracker runs against
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }
}
