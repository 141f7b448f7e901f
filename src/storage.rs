//! Document storage: load and persist named JSON documents.

pub mod contract;
pub mod json_file;

pub use contract::{DocumentStorage, JsonDocument};
pub use json_file::{write_atomic, write_atomic_private, JsonFileStorage};
