use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stockpile_observability::LogFormat;

/// Stockpile - track item quantities in a JSON inventory file
#[derive(Parser, Debug)]
#[command(name = "stockpile")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Inventory file (defaults to $STOCKPILE_FILE, then ./inventory.json)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Treat a missing inventory file as empty instead of failing
    #[arg(long, global = true)]
    pub create: bool,

    /// Log output format: text or json (defaults to $STOCKPILE_LOG_FORMAT)
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every item and its quantity
    Show,

    /// Print the quantity of one item
    Get {
        /// Item name
        item: String,
    },

    /// Add units of an item, creating it if needed
    Add {
        /// Item name
        item: String,

        /// Units to add (must be greater than zero)
        quantity: u64,
    },

    /// Change an existing item's quantity by a signed amount
    Adjust {
        /// Item name
        item: String,

        /// Signed change, e.g. 5 or -3; the result must stay above zero
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },

    /// Remove an item from the inventory
    Remove {
        /// Item name
        item: String,
    },

    /// List items whose quantity is below a threshold
    Low {
        /// Threshold (defaults to $STOCKPILE_LOW_STOCK_THRESHOLD, then 5)
        #[arg(short, long)]
        threshold: Option<u64>,
    },
}
