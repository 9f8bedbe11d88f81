use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::Event;

/// One recorded action in an activity log.
///
/// Notes:
/// - `sequence` starts at 1 and increases by one per entry within a log.
/// - `message` is captured at record time so the entry stays readable even if
///   the event's `describe` output changes later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry<E> {
    entry_id: Uuid,
    sequence: u64,
    occurred_at: DateTime<Utc>,
    message: String,
    event: E,
}

impl<E: Event> LogEntry<E> {
    pub fn new(entry_id: Uuid, sequence: u64, event: E) -> Self {
        Self {
            entry_id,
            sequence,
            occurred_at: event.occurred_at(),
            message: event.describe(),
            event,
        }
    }
}

impl<E> LogEntry<E> {
    pub fn entry_id(&self) -> Uuid {
        self.entry_id
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn event(&self) -> &E {
        &self.event
    }
}

impl<E> core::fmt::Display for LogEntry<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.occurred_at.to_rfc3339(), self.message)
    }
}
