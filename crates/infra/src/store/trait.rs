use std::io;

use thiserror::Error;

use stockpile_inventory::Inventory;

/// Failure while reading or writing the persisted inventory.
///
/// File-access failures (`NotFound`, `PermissionDenied`, `Io`) are kept apart
/// from content failures (`Malformed`) so callers can report them distinctly.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("inventory file not found: {location}")]
    NotFound { location: String },

    #[error("permission denied for inventory file: {location}")]
    PermissionDenied { location: String },

    #[error("i/o error on inventory file {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed inventory data in {location}: {reason}")]
    Malformed { location: String, reason: String },
}

impl StoreError {
    /// Map an `io::Error` onto the file-access variants.
    pub fn from_io(location: impl Into<String>, source: io::Error) -> Self {
        let location = location.into();
        match source.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound { location },
            io::ErrorKind::PermissionDenied => StoreError::PermissionDenied { location },
            _ => StoreError::Io { location, source },
        }
    }

    pub fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::Malformed {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Persistence boundary for the inventory mapping.
///
/// Implementations either return a fully loaded inventory or an error; a
/// failed load never yields partial state.
pub trait InventoryStore {
    /// Human-readable location (file path, "memory", ...) used in logs and errors.
    fn location(&self) -> String;

    fn load(&self) -> Result<Inventory, StoreError>;

    fn save(&self, inventory: &Inventory) -> Result<(), StoreError>;

    /// Like `load`, but a missing backing file yields an empty inventory.
    fn load_or_empty(&self) -> Result<Inventory, StoreError> {
        match self.load() {
            Err(err) if err.is_not_found() => {
                tracing::info!(location = %self.location(), "inventory not found; starting empty");
                Ok(Inventory::new())
            }
            other => other,
        }
    }
}

impl<S> InventoryStore for &S
where
    S: InventoryStore + ?Sized,
{
    fn location(&self) -> String {
        (**self).location()
    }

    fn load(&self) -> Result<Inventory, StoreError> {
        (**self).load()
    }

    fn save(&self, inventory: &Inventory) -> Result<(), StoreError> {
        (**self).save(inventory)
    }
}
