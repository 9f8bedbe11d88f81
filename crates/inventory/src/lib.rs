//! Inventory domain module.
//!
//! This crate contains the stock-keeping rules, implemented purely as
//! deterministic domain logic (no IO, no storage).

pub mod stock;

pub use stock::{
    AddItem, AdjustQuantity, Inventory, InventoryCommand, InventoryEvent, ItemAdded, ItemRemoved,
    QuantityAdjusted, RemoveItem,
};
