//! JSON file persistence for the inventory mapping.
//!
//! On-disk format: a single JSON object mapping item names to non-negative
//! integer quantities, pretty-printed with keys in sorted order.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;

use stockpile_inventory::Inventory;

use super::r#trait::{InventoryStore, StoreError};

/// Inventory store backed by one JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse file content into an inventory.
    pub fn parse(&self, content: &str) -> Result<Inventory, StoreError> {
        let location = self.location();

        let value: JsonValue = serde_json::from_str(content)
            .map_err(|e| StoreError::malformed(&location, format!("invalid JSON: {e}")))?;

        let map = match value {
            JsonValue::Object(map) => map,
            other => {
                return Err(StoreError::malformed(
                    &location,
                    format!("expected a JSON object of item quantities, found {}", kind_of(&other)),
                ));
            }
        };

        let mut entries = Vec::with_capacity(map.len());
        for (item, qty) in map {
            let Some(units) = qty.as_u64() else {
                return Err(StoreError::malformed(
                    &location,
                    format!("quantity for '{item}' must be a non-negative integer, found {qty}"),
                ));
            };
            entries.push((item, units));
        }

        Inventory::from_snapshot(entries).map_err(|e| StoreError::malformed(&location, e.to_string()))
    }

    /// Render the persisted form (trailing newline included).
    pub fn render(&self, inventory: &Inventory) -> Result<String, StoreError> {
        let mut content = serde_json::to_string_pretty(&inventory.snapshot())
            .map_err(|e| StoreError::malformed(self.location(), e.to_string()))?;
        content.push('\n');
        Ok(content)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("inventory"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl InventoryStore for JsonFileStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Inventory, StoreError> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| StoreError::from_io(self.location(), e))?;
        let inventory = self.parse(&content)?;

        tracing::info!(path = %self.path.display(), items = inventory.len(), "loaded inventory");
        Ok(inventory)
    }

    /// Write via a sibling temp file + rename; a failed write never truncates
    /// the existing file and never leaves the temp file behind.
    fn save(&self, inventory: &Inventory) -> Result<(), StoreError> {
        let content = self.render(inventory)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::from_io(self.location(), e))?;
        }

        let tmp = self.temp_path();
        if let Err(e) = fs::write(&tmp, content).and_then(|()| fs::rename(&tmp, &self.path)) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::from_io(self.location(), e));
        }

        tracing::info!(path = %self.path.display(), items = inventory.len(), "saved inventory");
        Ok(())
    }
}

fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
