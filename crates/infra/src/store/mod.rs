//! Persistence boundary for the inventory mapping.
//!
//! `InventoryStore` abstracts where the mapping lives; `JsonFileStore` is the
//! production backend and `InMemoryStore` backs tests.

pub mod in_memory;
pub mod json_file;
pub mod r#trait;

pub use in_memory::InMemoryStore;
pub use json_file::JsonFileStore;
pub use r#trait::{InventoryStore, StoreError};
