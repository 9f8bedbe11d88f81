//! Load -> mutate -> save orchestration.
//!
//! ```text
//! open(store)        load the mapping (strict or missing-as-empty)
//!   ↓
//! add/adjust/remove  parse name, timestamp, handle + apply, record in activity log
//!   ↓
//! save()             write the mapping back through the same store
//! ```
//!
//! Rejected operations are logged at `warn` and returned; the inventory is
//! left exactly as it was.

use chrono::Utc;

use stockpile_core::{Aggregate, AggregateRoot, DomainError, ItemName};
use stockpile_events::ActivityLog;
use stockpile_inventory::{
    AddItem, AdjustQuantity, Inventory, InventoryCommand, InventoryEvent, RemoveItem,
};

use crate::error::SessionError;
use crate::store::InventoryStore;

/// One working session over a single inventory store.
#[derive(Debug)]
pub struct InventorySession<S> {
    store: S,
    inventory: Inventory,
    activity: ActivityLog<InventoryEvent>,
    saved_version: u64,
}

impl<S: InventoryStore> InventorySession<S> {
    /// Open a session; a missing backing file is an error.
    pub fn open(store: S) -> Result<Self, SessionError> {
        let inventory = store.load().inspect_err(|err| {
            tracing::error!(location = %store.location(), "failed to load inventory: {err}");
        })?;
        Ok(Self::with_inventory(store, inventory))
    }

    /// Open a session; a missing backing file starts an empty inventory.
    pub fn open_or_empty(store: S) -> Result<Self, SessionError> {
        let inventory = store.load_or_empty().inspect_err(|err| {
            tracing::error!(location = %store.location(), "failed to load inventory: {err}");
        })?;
        Ok(Self::with_inventory(store, inventory))
    }

    fn with_inventory(store: S, inventory: Inventory) -> Self {
        let saved_version = inventory.version();
        Self {
            store,
            inventory,
            activity: ActivityLog::new(),
            saved_version,
        }
    }

    /// Add units of an item (creating it if needed). Returns the new quantity.
    pub fn add_item(&mut self, item: &str, quantity: u64) -> Result<u64, SessionError> {
        let item = Self::item_name(item)?;
        self.dispatch(InventoryCommand::AddItem(AddItem {
            item: item.clone(),
            quantity,
            occurred_at: Utc::now(),
        }))?;
        Ok(self.inventory.quantity(&item).unwrap_or_default())
    }

    /// Apply a signed change to an existing item. Returns the new quantity.
    pub fn adjust(&mut self, item: &str, delta: i64) -> Result<u64, SessionError> {
        let item = Self::item_name(item)?;
        self.dispatch(InventoryCommand::AdjustQuantity(AdjustQuantity {
            item: item.clone(),
            delta,
            occurred_at: Utc::now(),
        }))?;
        Ok(self.inventory.quantity(&item).unwrap_or_default())
    }

    /// Drop an item entirely. Returns the quantity it had.
    pub fn remove_item(&mut self, item: &str) -> Result<u64, SessionError> {
        let item = Self::item_name(item)?;
        let previous = self.inventory.quantity(&item).unwrap_or_default();
        self.dispatch(InventoryCommand::RemoveItem(RemoveItem {
            item,
            occurred_at: Utc::now(),
        }))?;
        Ok(previous)
    }

    /// Quantity of an item; unknown items are a key error.
    pub fn quantity(&self, item: &str) -> Result<u64, SessionError> {
        let item = Self::item_name(item)?;
        self.inventory
            .quantity(&item)
            .ok_or_else(|| DomainError::not_found(item.as_str()).into())
    }

    pub fn low_stock(&self, threshold: u64) -> Vec<(ItemName, u64)> {
        self.inventory.low_stock(threshold)
    }

    /// Report lines, one per item in name order: `"<name> -> <qty>"`.
    pub fn report(&self) -> Vec<String> {
        self.inventory
            .items()
            .map(|(name, qty)| format!("{name} -> {qty}"))
            .collect()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.inventory.version() != self.saved_version
    }

    /// Write the current mapping back to the store.
    pub fn save(&mut self) -> Result<(), SessionError> {
        self.store.save(&self.inventory).inspect_err(|err| {
            tracing::error!(location = %self.store.location(), "failed to save inventory: {err}");
        })?;
        self.saved_version = self.inventory.version();
        Ok(())
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn activity(&self) -> &ActivityLog<InventoryEvent> {
        &self.activity
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn item_name(raw: &str) -> Result<ItemName, SessionError> {
        ItemName::parse(raw).map_err(|err| {
            tracing::warn!("rejected item name {raw:?}: {err}");
            SessionError::from(err)
        })
    }

    fn dispatch(&mut self, command: InventoryCommand) -> Result<(), SessionError> {
        match self.inventory.execute(&command) {
            Ok(events) => {
                self.activity.record_all(events);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(?command, "inventory command rejected: {err}");
                Err(err.into())
            }
        }
    }
}
