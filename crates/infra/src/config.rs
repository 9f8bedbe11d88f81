//! Configuration loading and representation.
//!
//! Values come from the process environment; command-line flags override them
//! at the binary edge. Reading never fails: a value is only validated when the
//! operation that needs it asks for it.

use std::path::PathBuf;

use thiserror::Error;

pub const ENV_INVENTORY_FILE: &str = "STOCKPILE_FILE";
pub const ENV_LOW_STOCK_THRESHOLD: &str = "STOCKPILE_LOW_STOCK_THRESHOLD";

pub const DEFAULT_INVENTORY_FILE: &str = "inventory.json";
pub const DEFAULT_LOW_STOCK_THRESHOLD: u64 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub inventory_path: PathBuf,
    low_stock_threshold: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            inventory_path: PathBuf::from(DEFAULT_INVENTORY_FILE),
            low_stock_threshold: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            inventory_path: get(ENV_INVENTORY_FILE)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INVENTORY_FILE)),
            low_stock_threshold: get(ENV_LOW_STOCK_THRESHOLD),
        }
    }

    /// Configured low-stock threshold, or the default when unset.
    pub fn low_stock_threshold(&self) -> Result<u64, ConfigError> {
        let Some(raw) = &self.low_stock_threshold else {
            return Ok(DEFAULT_LOW_STOCK_THRESHOLD);
        };
        raw.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
            key: ENV_LOW_STOCK_THRESHOLD,
            value: raw.clone(),
            reason: e.to_string(),
        })
    }
}
