//! Activity feed for dashboard-wide tracking
//!
//! An ActivityEntry records any notable event, from an agent being spawned
//! to a trade approval being resolved. The log keeps only the most recent
//! entries and evicts the oldest on overflow.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config_value::ConfigMap;
use crate::events::{EventBus, StoreEvent};
use crate::new_id;

/// Default number of entries the log retains
pub const DEFAULT_ACTIVITY_CAPACITY: usize = 100;

/// A single activity entry in the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Unique ID for this entry
    pub id: String,
    /// Which part of the system this concerns
    pub kind: ActivityKind,
    /// Human-readable description
    pub message: String,
    /// When this activity occurred
    pub timestamp: DateTime<Utc>,
    /// Optional structured data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ConfigMap>,
}

/// Categories of activities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Agent,
    Tool,
    Approval,
    Workflow,
    System,
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActivityKind::Agent => "agent",
            ActivityKind::Tool => "tool",
            ActivityKind::Approval => "approval",
            ActivityKind::Workflow => "workflow",
            ActivityKind::System => "system",
        };
        f.write_str(name)
    }
}

impl ActivityEntry {
    /// Create an entry stamped now
    pub fn new(kind: ActivityKind, message: impl Into<String>) -> Self {
        Self {
            id: new_id("act"),
            kind,
            message: message.into(),
            timestamp: Utc::now(),
            metadata: None,
        }
    }

    /// Attach structured data
    pub fn with_metadata(mut self, metadata: ConfigMap) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Backdate an entry (seed data)
    pub(crate) fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Bounded, newest-first activity log
#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    capacity: usize,
    events: EventBus,
}

impl ActivityLog {
    /// Create an empty log holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            events: EventBus::default(),
        }
    }

    /// Create a log pre-filled with entries given newest first
    pub fn with_entries(capacity: usize, entries: Vec<ActivityEntry>) -> Self {
        let mut log = Self::new(capacity);
        for entry in entries.into_iter().rev() {
            log.push(entry);
        }
        log
    }

    /// Route append events to a shared bus
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    /// Record a new activity and return its id
    pub fn append(
        &mut self,
        kind: ActivityKind,
        message: impl Into<String>,
        metadata: Option<ConfigMap>,
    ) -> String {
        let mut entry = ActivityEntry::new(kind, message);
        entry.metadata = metadata;
        let id = entry.id.clone();
        self.push(entry);
        id
    }

    /// Insert a prepared entry at the front, evicting the oldest on overflow
    pub fn push(&mut self, entry: ActivityEntry) {
        let event = StoreEvent::ActivityAppended {
            activity_id: entry.id.clone(),
            kind: entry.kind,
            timestamp: entry.timestamp,
        };
        self.entries.push_front(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
        self.events.emit(event);
    }

    /// Entries newest to oldest
    pub fn entries(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    /// The `n` most recent entries
    pub fn recent(&self, n: usize) -> Vec<&ActivityEntry> {
        self.entries.iter().take(n).collect()
    }

    pub fn filter_by_kind(&self, kind: ActivityKind) -> Vec<&ActivityEntry> {
        self.entries.iter().filter(|e| e.kind == kind).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVITY_CAPACITY)
    }
}
