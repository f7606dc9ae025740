//! Static metadata describing how document structures map to storage.

pub mod metadata;

pub use metadata::*;
