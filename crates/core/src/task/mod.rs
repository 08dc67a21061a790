//! Task module
//!
//! This module contains the task domain model, the blob-store
//! persistence abstraction, and the collection-level task service.

mod blob_store;
mod model;
mod service;

pub use blob_store::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use model::*;
pub use service::{TaskService, TaskUpdate};
