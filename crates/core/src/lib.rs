//! `stockpile-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no logging setup).

pub mod aggregate;
pub mod error;
pub mod name;
pub mod quantity;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use error::{DomainError, DomainResult};
pub use name::ItemName;
pub use quantity::Quantity;
pub use value_object::ValueObject;
