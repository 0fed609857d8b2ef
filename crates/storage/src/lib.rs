#![forbid(unsafe_code)]

pub mod progress_store;
pub mod repository;
pub mod sqlite;

pub use progress_store::{PROGRESS_BLOB_KEY, ProgressStore};
pub use repository::{BlobRepository, InMemoryRepository, Storage, StorageError};
