//! Bookkeeping for screen-name uniqueness checks.
//!
//! Checks run while the user keeps typing. Each check is tagged with the
//! name it was issued for; a response is only applied if it belongs to the
//! most recent check and the name has not changed since.

use serde::Serialize;

/// Handle for one outstanding check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCheckTicket {
    pub seq: u64,
    pub name: String,
}

/// Result of a uniqueness check as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NameCheckOutcome {
    Available,
    Taken,
    /// The check failed; treated as unknown and never blocks navigation.
    Unknown,
    /// A newer edit or check made this response stale; it was discarded.
    Superseded,
    /// Nothing to check (blank name or a read-only name).
    Skipped,
}

#[derive(Debug, Default)]
pub struct NameCheckTracker {
    next_seq: u64,
    latest: Option<NameCheckTicket>,
}

impl NameCheckTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new check for `name`, superseding any outstanding one.
    pub fn issue(&mut self, name: &str) -> NameCheckTicket {
        self.next_seq += 1;
        let ticket = NameCheckTicket {
            seq: self.next_seq,
            name: name.to_string(),
        };
        self.latest = Some(ticket.clone());
        ticket
    }

    /// Whether a response for `ticket` may still be applied given the name
    /// currently in the record.
    pub fn is_current(&self, ticket: &NameCheckTicket, current_name: Option<&str>) -> bool {
        self.latest.as_ref() == Some(ticket) && current_name == Some(ticket.name.as_str())
    }
}
