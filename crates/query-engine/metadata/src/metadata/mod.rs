//! Storage-schema metadata for document structures.

pub mod cache;
pub mod database;

// re-export without modules
pub use cache::*;
pub use database::*;
