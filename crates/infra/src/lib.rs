//! Infrastructure layer: file persistence, configuration, session orchestration.

pub mod config;
pub mod error;
pub mod session;
pub mod store;


pub use config::{AppConfig, ConfigError};
pub use error::{ErrorKind, SessionError};
pub use session::InventorySession;
pub use store::{InMemoryStore, InventoryStore, JsonFileStore, StoreError};
