use std::collections::BTreeMap;
use std::io;
use std::sync::RwLock;

use stockpile_inventory::Inventory;

use super::r#trait::{InventoryStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Missing,
    Present(BTreeMap<String, u64>),
    Corrupt(String),
}

/// In-memory inventory store.
///
/// Intended for tests/dev. Starts out "missing" like a file that was never
/// written, and can be seeded or marked corrupt to exercise error paths.
#[derive(Debug)]
pub struct InMemoryStore {
    slot: RwLock<Slot>,
    saves: RwLock<u64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_slot(Slot::Missing)
    }

    pub fn seeded<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, u64)>,
        K: Into<String>,
    {
        let snapshot = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self::with_slot(Slot::Present(snapshot))
    }

    /// A store whose every load fails with `StoreError::Malformed`.
    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::with_slot(Slot::Corrupt(reason.into()))
    }

    fn with_slot(slot: Slot) -> Self {
        Self {
            slot: RwLock::new(slot),
            saves: RwLock::new(0),
        }
    }

    /// Current persisted snapshot, if anything has been stored.
    pub fn contents(&self) -> Option<BTreeMap<String, u64>> {
        match &*self.slot.read().ok()? {
            Slot::Present(snapshot) => Some(snapshot.clone()),
            _ => None,
        }
    }

    fn poisoned(&self) -> StoreError {
        StoreError::Io {
            location: self.location(),
            source: io::Error::other("lock poisoned"),
        }
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> u64 {
        self.saves.read().map(|n| *n).unwrap_or(0)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryStore for InMemoryStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn load(&self) -> Result<Inventory, StoreError> {
        let slot = self
            .slot
            .read()
            .map_err(|_| self.poisoned())?;

        match &*slot {
            Slot::Missing => Err(StoreError::NotFound {
                location: self.location(),
            }),
            Slot::Corrupt(reason) => Err(StoreError::malformed(self.location(), reason.clone())),
            Slot::Present(snapshot) => Inventory::from_snapshot(snapshot.clone())
                .map_err(|e| StoreError::malformed(self.location(), e.to_string())),
        }
    }

    fn save(&self, inventory: &Inventory) -> Result<(), StoreError> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| self.poisoned())?;
        *slot = Slot::Present(inventory.snapshot());

        if let Ok(mut saves) = self.saves.write() {
            *saves += 1;
        }
        Ok(())
    }
}
