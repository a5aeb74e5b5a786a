#![forbid(unsafe_code)]

//! Progress-store adapters: the repository contract plus in-memory and
//! `SQLite` implementations. The merge policy is union-only; scoring code
//! never mutates an existing record's tags, it only appends new ones.

pub mod repository;
pub mod sqlite;

pub use repository::{
    InMemoryProgressRepository, ProgressRecord, ProgressRepository, ProgressUpdate, Storage,
    StorageError,
};
pub use sqlite::{SqliteInitError, SqliteRepository};
