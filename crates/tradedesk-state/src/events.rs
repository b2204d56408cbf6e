//! Change events emitted by the stores
//!
//! Every successful mutation broadcasts a `StoreEvent`. Views subscribe to
//! the bus to learn that a collection changed; the event carries enough to
//! describe the change, not the new collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::activity::ActivityKind;
use crate::agents::AgentStatus;
use crate::approvals::ApprovalStatus;
use crate::tools::ToolStatus;
use crate::workflows::WorkflowStatus;

/// Default channel capacity for a fresh bus
pub const DEFAULT_EVENT_CAPACITY: usize = 1000;

/// Store change events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StoreEvent {
    AgentSpawned {
        agent_id: String,
        name: String,
        timestamp: DateTime<Utc>,
    },

    AgentKilled {
        agent_id: String,
        timestamp: DateTime<Utc>,
    },

    AgentStatusChanged {
        agent_id: String,
        status: AgentStatus,
        progress: u8,
        timestamp: DateTime<Utc>,
    },

    AgentProgress {
        agent_id: String,
        progress: u8,
        timestamp: DateTime<Utc>,
    },

    ToolCreated {
        tool_id: String,
        name: String,
        timestamp: DateTime<Utc>,
    },

    ToolStatusChanged {
        tool_id: String,
        status: ToolStatus,
        timestamp: DateTime<Utc>,
    },

    ToolConfigUpdated {
        tool_id: String,
        keys: Vec<String>,
        timestamp: DateTime<Utc>,
    },

    ToolUsed {
        tool_id: String,
        usage_count: u64,
        timestamp: DateTime<Utc>,
    },

    ApprovalRequested {
        approval_id: String,
        title: String,
        timestamp: DateTime<Utc>,
    },

    ApprovalResolved {
        approval_id: String,
        status: ApprovalStatus,
        timestamp: DateTime<Utc>,
    },

    WorkflowCreated {
        workflow_id: String,
        name: String,
        timestamp: DateTime<Utc>,
    },

    WorkflowStatusChanged {
        workflow_id: String,
        status: WorkflowStatus,
        timestamp: DateTime<Utc>,
    },

    WorkflowRun {
        workflow_id: String,
        run_count: u64,
        timestamp: DateTime<Utc>,
    },

    WorkflowDeleted {
        workflow_id: String,
        timestamp: DateTime<Utc>,
    },

    ActivityAppended {
        activity_id: String,
        kind: ActivityKind,
        timestamp: DateTime<Utc>,
    },

    StatsUpdated {
        cpu_usage: f64,
        memory_usage: f64,
        uptime_ms: u64,
        timestamp: DateTime<Utc>,
    },
}

impl StoreEvent {
    /// Get the timestamp of this event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            StoreEvent::AgentSpawned { timestamp, .. } => *timestamp,
            StoreEvent::AgentKilled { timestamp, .. } => *timestamp,
            StoreEvent::AgentStatusChanged { timestamp, .. } => *timestamp,
            StoreEvent::AgentProgress { timestamp, .. } => *timestamp,
            StoreEvent::ToolCreated { timestamp, .. } => *timestamp,
            StoreEvent::ToolStatusChanged { timestamp, .. } => *timestamp,
            StoreEvent::ToolConfigUpdated { timestamp, .. } => *timestamp,
            StoreEvent::ToolUsed { timestamp, .. } => *timestamp,
            StoreEvent::ApprovalRequested { timestamp, .. } => *timestamp,
            StoreEvent::ApprovalResolved { timestamp, .. } => *timestamp,
            StoreEvent::WorkflowCreated { timestamp, .. } => *timestamp,
            StoreEvent::WorkflowStatusChanged { timestamp, .. } => *timestamp,
            StoreEvent::WorkflowRun { timestamp, .. } => *timestamp,
            StoreEvent::WorkflowDeleted { timestamp, .. } => *timestamp,
            StoreEvent::ActivityAppended { timestamp, .. } => *timestamp,
            StoreEvent::StatsUpdated { timestamp, .. } => *timestamp,
        }
    }

    /// Get a short description for logging
    pub fn summary(&self) -> String {
        match self {
            StoreEvent::AgentSpawned { name, .. } => format!("Agent spawned: {}", name),
            StoreEvent::AgentKilled { agent_id, .. } => format!("Agent killed: {}", agent_id),
            StoreEvent::AgentStatusChanged { agent_id, status, .. } => {
                format!("Agent {} → {}", agent_id, status)
            }
            StoreEvent::AgentProgress { agent_id, progress, .. } => {
                format!("Agent {} at {}%", agent_id, progress)
            }
            StoreEvent::ToolCreated { name, .. } => format!("Tool created: {}", name),
            StoreEvent::ToolStatusChanged { tool_id, status, .. } => {
                format!("Tool {} → {}", tool_id, status)
            }
            StoreEvent::ToolConfigUpdated { tool_id, keys, .. } => {
                format!("Tool {} config: {}", tool_id, keys.join(", "))
            }
            StoreEvent::ToolUsed { tool_id, usage_count, .. } => {
                format!("Tool {} used ({} total)", tool_id, usage_count)
            }
            StoreEvent::ApprovalRequested { title, .. } => format!("Approval requested: {}", title),
            StoreEvent::ApprovalResolved { approval_id, status, .. } => {
                format!("Approval {} {}", approval_id, status)
            }
            StoreEvent::WorkflowCreated { name, .. } => format!("Workflow created: {}", name),
            StoreEvent::WorkflowStatusChanged { workflow_id, status, .. } => {
                format!("Workflow {} → {}", workflow_id, status)
            }
            StoreEvent::WorkflowRun { workflow_id, run_count, .. } => {
                format!("Workflow {} run #{}", workflow_id, run_count)
            }
            StoreEvent::WorkflowDeleted { workflow_id, .. } => {
                format!("Workflow deleted: {}", workflow_id)
            }
            StoreEvent::ActivityAppended { activity_id, kind, .. } => {
                format!("Activity {} ({})", activity_id, kind)
            }
            StoreEvent::StatsUpdated { cpu_usage, memory_usage, .. } => {
                format!("Stats: cpu {:.1}%, memory {:.1}%", cpu_usage, memory_usage)
            }
        }
    }
}

/// Broadcast bus shared by the stores of one dashboard
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Broadcast an event
    pub fn emit(&self, event: StoreEvent) {
        // Ignore send errors (no receivers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to store events
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = StoreEvent::AgentSpawned {
            agent_id: "agent_1".to_string(),
            name: "Scanner Agent".to_string(),
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("AgentSpawned"));
        assert!(json.contains("Scanner Agent"));

        let back: StoreEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.summary(), event.summary());
    }

    #[test]
    fn test_event_summary() {
        let event = StoreEvent::WorkflowRun {
            workflow_id: "wf_1".to_string(),
            run_count: 128,
            timestamp: Utc::now(),
        };
        assert_eq!(event.summary(), "Workflow wf_1 run #128");
    }

    #[test]
    fn test_emit_without_receivers() {
        let bus = EventBus::default();
        assert_eq!(bus.receiver_count(), 0);
        bus.emit(StoreEvent::AgentKilled {
            agent_id: "agent_1".to_string(),
            timestamp: Utc::now(),
        });
    }

    #[test]
    fn test_subscriber_receives() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        let event = StoreEvent::ToolUsed {
            tool_id: "tool_1".to_string(),
            usage_count: 3,
            timestamp: Utc::now(),
        };
        bus.emit(event.clone());
        assert_eq!(rx.try_recv().unwrap(), event);
    }
}
