//! In-memory, append-only activity log.

use uuid::Uuid;

use crate::entry::LogEntry;
use crate::event::Event;

/// Append-only record of the events produced during one session.
///
/// Every recorded event is also emitted as a `tracing` info record, so the
/// log doubles as the console trail of what changed.
#[derive(Debug, Clone)]
pub struct ActivityLog<E> {
    entries: Vec<LogEntry<E>>,
}

impl<E: Event> ActivityLog<E> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Append an event and return the stored entry.
    pub fn record(&mut self, event: E) -> &LogEntry<E> {
        let sequence = self.entries.len() as u64 + 1;
        let entry = LogEntry::new(Uuid::now_v7(), sequence, event);

        tracing::info!(
            entry_id = %entry.entry_id(),
            sequence = entry.sequence(),
            event_type = entry.event().event_type(),
            "{}",
            entry.message()
        );

        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Append several events in order.
    pub fn record_all(&mut self, events: impl IntoIterator<Item = E>) {
        for event in events {
            self.record(event);
        }
    }

    pub fn entries(&self) -> &[LogEntry<E>] {
        &self.entries
    }

    pub fn messages(&self) -> Vec<&str> {
        self.entries.iter().map(LogEntry::message).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E: Event> Default for ActivityLog<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    #[derive(Debug, Clone)]
    struct Restocked {
        item: &'static str,
        units: u64,
        at: DateTime<Utc>,
    }

    impl Event for Restocked {
        fn event_type(&self) -> &'static str {
            "test.restocked"
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            self.at
        }

        fn describe(&self) -> String {
            format!("Restocked {} of {}", self.units, self.item)
        }
    }

    fn restocked(item: &'static str, units: u64) -> Restocked {
        Restocked {
            item,
            units,
            at: Utc::now(),
        }
    }

    #[test]
    fn new_log_is_empty() {
        let log: ActivityLog<Restocked> = ActivityLog::new();
        assert!(log.is_empty());
        assert!(log.entries().is_empty());
    }

    #[test]
    fn record_assigns_increasing_sequence_numbers() {
        let mut log = ActivityLog::new();
        log.record(restocked("apple", 10));
        log.record(restocked("pear", 2));
        log.record(restocked("apple", 1));

        let sequences: Vec<u64> = log.entries().iter().map(LogEntry::sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
    }

    #[test]
    fn entry_ids_are_unique() {
        let mut log = ActivityLog::new();
        log.record_all([restocked("apple", 1), restocked("apple", 1)]);

        let entries = log.entries();
        assert_ne!(entries[0].entry_id(), entries[1].entry_id());
    }

    #[test]
    fn messages_come_from_describe() {
        let mut log = ActivityLog::new();
        let entry = log.record(restocked("apple", 10));
        assert_eq!(entry.message(), "Restocked 10 of apple");
        assert_eq!(log.messages(), vec!["Restocked 10 of apple"]);
    }

    #[test]
    fn display_prefixes_the_timestamp() {
        let event = restocked("apple", 3);
        let at = event.at;
        let mut log = ActivityLog::new();
        let rendered = log.record(event).to_string();
        assert_eq!(rendered, format!("{}: Restocked 3 of apple", at.to_rfc3339()));
    }
}
