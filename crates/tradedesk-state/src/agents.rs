//! Agent store
//!
//! Agents are simulated task runners. Status changes are caller-directed:
//! any operation is accepted from any status (starting a completed agent
//! simply marks it running again).

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EntityKind, StoreError, StoreResult};
use crate::events::{EventBus, StoreEvent};
use crate::new_id;

/// Agent status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Running,
    Idle,
    Error,
    Completed,
}

impl AgentStatus {
    pub const ALL: [AgentStatus; 4] = [
        AgentStatus::Running,
        AgentStatus::Idle,
        AgentStatus::Error,
        AgentStatus::Completed,
    ];
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgentStatus::Running => "running",
            AgentStatus::Idle => "idle",
            AgentStatus::Error => "error",
            AgentStatus::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// A simulated autonomous task runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub task: String,
    pub status: AgentStatus,
    /// Percent complete, always within 0..=100
    pub progress: u8,
    pub start_time: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Agent {
    /// A fresh idle agent, as produced by `spawn`
    pub fn new(name: impl Into<String>, task: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id("agent"),
            name: name.into(),
            task: task.into(),
            status: AgentStatus::Idle,
            progress: 0,
            start_time: now,
            last_activity: now,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_running(&self) -> bool {
        self.status == AgentStatus::Running
    }
}

/// Clamp a requested progress value into 0..=100, rounding to a whole
/// percent. NaN counts as 0.
pub fn clamp_progress(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 100.0).round() as u8
}

/// Owns the agent collection, newest first
#[derive(Debug, Default)]
pub struct AgentStore {
    agents: Vec<Agent>,
    events: EventBus,
}

impl AgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store over existing agents, ordered newest first
    pub fn with_agents(agents: Vec<Agent>) -> Self {
        Self {
            agents,
            events: EventBus::default(),
        }
    }

    /// Route change events to a shared bus
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    /// Current collection snapshot
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn get(&self, id: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    fn find_mut(&mut self, id: &str) -> StoreResult<&mut Agent> {
        self.agents
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Agent, id))
    }

    /// Create an idle agent at the front of the collection
    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        task: impl Into<String>,
        description: Option<String>,
    ) -> String {
        let mut agent = Agent::new(name, task);
        agent.description = description;
        let id = agent.id.clone();

        tracing::debug!(agent_id = %id, name = %agent.name, "agent spawned");
        self.events.emit(StoreEvent::AgentSpawned {
            agent_id: id.clone(),
            name: agent.name.clone(),
            timestamp: agent.start_time,
        });

        self.agents.insert(0, agent);
        id
    }

    /// Remove an agent, returning it
    pub fn try_kill(&mut self, id: &str) -> StoreResult<Agent> {
        let index = self
            .agents
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Agent, id))?;
        let agent = self.agents.remove(index);

        tracing::debug!(agent_id = %id, "agent killed");
        self.events.emit(StoreEvent::AgentKilled {
            agent_id: id.to_string(),
            timestamp: Utc::now(),
        });
        Ok(agent)
    }

    pub fn kill(&mut self, id: &str) {
        let _ = self.try_kill(id);
    }

    /// Mark idle and reset progress
    pub fn try_stop(&mut self, id: &str) -> StoreResult<()> {
        self.set_status(id, AgentStatus::Idle, Some(0))
    }

    pub fn stop(&mut self, id: &str) {
        let _ = self.try_stop(id);
    }

    /// Mark running; progress is left as it was
    pub fn try_start(&mut self, id: &str) -> StoreResult<()> {
        self.set_status(id, AgentStatus::Running, None)
    }

    pub fn start(&mut self, id: &str) {
        let _ = self.try_start(id);
    }

    /// Assign a status directly, e.g. when a run finishes or fails
    pub fn try_set_status(&mut self, id: &str, status: AgentStatus) -> StoreResult<()> {
        self.set_status(id, status, None)
    }

    fn set_status(
        &mut self,
        id: &str,
        status: AgentStatus,
        progress: Option<u8>,
    ) -> StoreResult<()> {
        let agent = self.find_mut(id)?;
        agent.status = status;
        if let Some(progress) = progress {
            agent.progress = progress;
        }
        agent.last_activity = Utc::now();

        tracing::debug!(agent_id = %id, %status, "agent status changed");
        let event = StoreEvent::AgentStatusChanged {
            agent_id: id.to_string(),
            status,
            progress: agent.progress,
            timestamp: agent.last_activity,
        };
        self.events.emit(event);
        Ok(())
    }

    /// Set progress, clamped into 0..=100
    pub fn try_update_progress(&mut self, id: &str, value: f64) -> StoreResult<u8> {
        let agent = self.find_mut(id)?;
        agent.progress = clamp_progress(value);
        agent.last_activity = Utc::now();

        let event = StoreEvent::AgentProgress {
            agent_id: id.to_string(),
            progress: agent.progress,
            timestamp: agent.last_activity,
        };
        let progress = agent.progress;
        self.events.emit(event);
        Ok(progress)
    }

    pub fn update_progress(&mut self, id: &str, value: f64) {
        let _ = self.try_update_progress(id, value);
    }

    /// Agents matching `status`, or all of them for `None`
    pub fn filter_by_status(&self, status: Option<AgentStatus>) -> Vec<&Agent> {
        self.agents
            .iter()
            .filter(|a| status.map_or(true, |s| a.status == s))
            .collect()
    }

    /// Number of agents in each status (zero entries included)
    pub fn status_counts(&self) -> HashMap<AgentStatus, usize> {
        let mut counts: HashMap<AgentStatus, usize> =
            AgentStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for agent in &self.agents {
            *counts.entry(agent.status).or_insert(0) += 1;
        }
        counts
    }

    pub fn running_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_running()).count()
    }
}
