//! # storage-adapters
//!
//! Implementations of [`domains::ForumRepository`] plus the demo data set.
//!
//! - [`MemoryRepository`]: concurrent maps, nothing survives a restart.
//! - [`JsonFileRepository`]: a single JSON snapshot rewritten on every change.

mod changes;
pub mod error;
pub mod json_file;
pub mod memory;
pub mod seed;

pub use error::StorageError;
pub use json_file::JsonFileRepository;
pub use memory::MemoryRepository;
