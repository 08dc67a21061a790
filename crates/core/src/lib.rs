//! Core library for the todo task tracker
//!
//! This crate contains the core business logic, including:
//! - The task domain model (tag derivation, recurrence, priority scoring)
//! - A blob-store persistence abstraction
//! - The collection-level task service

pub mod error;
pub mod task;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
