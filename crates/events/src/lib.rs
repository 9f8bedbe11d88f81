//! Domain events and the session activity log.

pub mod entry;
pub mod event;
pub mod log;

pub use entry::LogEntry;
pub use event::Event;
pub use log::ActivityLog;
