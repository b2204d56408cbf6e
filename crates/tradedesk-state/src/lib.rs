//! TradeDesk State - In-memory state for the trading-automation dashboard
//!
//! This crate owns the collections a dashboard view renders:
//! - Agents (simulated task runners with a progress gauge)
//! - Tools (integrations with an on/off switch and usage counter)
//! - Approvals (trade/expense/action requests awaiting a decision)
//! - Workflows (triggered action sequences with a run counter)
//! - Activity (a bounded, newest-first event feed)
//!
//! plus `SystemStats`, which a background simulator jitters to look live.
//!
//! # Architecture
//!
//! ```text
//! Dashboard ──owns──→ AgentStore / ToolStore / ApprovalStore
//!     │                WorkflowStore / ActivityLog
//!     │                        │ every successful mutation
//!     │                        ↓
//!     └──subscribe()──→ EventBus (broadcast) ──→ views
//!
//! SimulatorHandle ──tick every N s──→ Arc<RwLock<SystemStats>>
//! ```
//!
//! Stores never fail on an unknown id; the `try_*` variants report
//! `StoreError::NotFound` instead.

pub mod activity;
pub mod agents;
pub mod approvals;
pub mod config;
pub mod config_value;
pub mod error;
pub mod events;
pub mod seed;
pub mod stats;
pub mod tools;
pub mod workflows;

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;

pub use activity::{ActivityEntry, ActivityKind, ActivityLog};
pub use agents::{Agent, AgentStatus, AgentStore};
pub use approvals::{
    Approval, ApprovalFilter, ApprovalKind, ApprovalStatus, ApprovalStore, NewApproval, Priority,
    TransitionPolicy,
};
pub use config::DashboardConfig;
pub use config_value::{parse_config_json, ConfigMap, ConfigValue};
pub use error::{EntityKind, StoreError, StoreResult};
pub use events::{EventBus, StoreEvent};
pub use stats::{
    SharedStats, SimulatorHandle, StatsPatch, StatsSimulator, SystemHealth, SystemStats,
};
pub use tools::{Tool, ToolStatus, ToolStore};
pub use workflows::{Trigger, Workflow, WorkflowStatus, WorkflowStore};

/// Generate an opaque unique id such as `agent_3f2c…`
pub(crate) fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
}

// ============================================================================
// Dashboard
// ============================================================================

/// Application context owning every store
///
/// The stores stay independent; the dashboard only routes their events to
/// one bus and records an activity entry for each user-facing action.
pub struct Dashboard {
    pub agents: AgentStore,
    pub tools: ToolStore,
    pub approvals: ApprovalStore,
    pub workflows: WorkflowStore,
    pub activity: ActivityLog,
    stats: SharedStats,
    events: EventBus,
    config: DashboardConfig,
}

impl Dashboard {
    /// Create an empty dashboard
    pub fn new(config: DashboardConfig) -> Self {
        Self::build(
            config,
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            SystemStats::default(),
        )
    }

    /// Create a dashboard populated with the reference mock data
    pub fn seeded(config: DashboardConfig) -> Self {
        Self::build(
            config,
            seed::agents(),
            seed::tools(),
            seed::approvals(),
            seed::workflows(),
            seed::activities(),
            seed::system_stats(),
        )
    }

    /// Seeded or empty, as the config says
    pub fn from_config(config: DashboardConfig) -> Self {
        if config.seed_mock_data {
            Self::seeded(config)
        } else {
            Self::new(config)
        }
    }

    fn build(
        config: DashboardConfig,
        agents: Vec<Agent>,
        tools: Vec<Tool>,
        approvals: Vec<Approval>,
        workflows: Vec<Workflow>,
        activities: Vec<ActivityEntry>,
        stats: SystemStats,
    ) -> Self {
        let events = EventBus::new(config.event_capacity);

        Self {
            agents: AgentStore::with_agents(agents).with_events(events.clone()),
            tools: ToolStore::with_tools(tools).with_events(events.clone()),
            approvals: ApprovalStore::with_approvals(approvals)
                .with_policy(config.approval_policy)
                .with_events(events.clone()),
            workflows: WorkflowStore::with_workflows(workflows).with_events(events.clone()),
            activity: ActivityLog::with_entries(config.activity_capacity, activities)
                .with_events(events.clone()),
            stats: Arc::new(RwLock::new(stats)),
            events,
            config,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Subscribe to store events
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the current stats
    pub fn stats(&self) -> SystemStats {
        self.stats.read().clone()
    }

    /// Handle to the stats record for long-lived readers
    pub fn shared_stats(&self) -> SharedStats {
        self.stats.clone()
    }

    /// Overwrite any subset of stats fields
    pub fn update_stats(&self, patch: StatsPatch) {
        patch.apply(&mut self.stats.write());
    }

    /// Recompute the counters and health from the stores
    pub fn refresh_stats(&self) -> SystemStats {
        let mut stats = self.stats.write();
        stats.active_agents = self.agents.running_count();
        stats.pending_approvals = self.approvals.pending_count();
        stats.active_workflows = self.workflows.active_count();
        stats.tools_active = self.tools.active_count();
        stats.system_health = SystemHealth::from_usage(stats.cpu_usage, stats.memory_usage);
        stats.clone()
    }

    /// Start jittering the stats; stops when the handle is dropped
    pub fn start_simulator(&self) -> SimulatorHandle {
        StatsSimulator::new(self.stats.clone())
            .with_period(self.config.stats_interval())
            .with_events(self.events.clone())
            .spawn()
    }

    // ========================================================================
    // Logged operations
    // ========================================================================

    pub fn spawn_agent(
        &mut self,
        name: impl Into<String>,
        task: impl Into<String>,
        description: Option<String>,
    ) -> String {
        let name = name.into();
        let id = self.agents.spawn(name.clone(), task, description);
        self.activity
            .append(ActivityKind::Agent, format!("Agent '{}' spawned", name), None);
        id
    }

    pub fn kill_agent(&mut self, id: &str) {
        if let Ok(agent) = self.agents.try_kill(id) {
            self.activity.append(
                ActivityKind::Agent,
                format!("Agent '{}' terminated", agent.name),
                None,
            );
        }
    }

    pub fn start_agent(&mut self, id: &str) {
        if self.agents.try_start(id).is_ok() {
            self.log_agent(id, "started");
        }
    }

    pub fn stop_agent(&mut self, id: &str) {
        if self.agents.try_stop(id).is_ok() {
            self.log_agent(id, "stopped");
        }
    }

    fn log_agent(&mut self, id: &str, verb: &str) {
        if let Some(agent) = self.agents.get(id) {
            let message = format!("Agent '{}' {}", agent.name, verb);
            self.activity.append(ActivityKind::Agent, message, None);
        }
    }

    pub fn toggle_tool(&mut self, id: &str) {
        if let Ok(status) = self.tools.try_toggle(id) {
            if let Some(tool) = self.tools.get(id) {
                let verb = if status == ToolStatus::Active {
                    "enabled"
                } else {
                    "disabled"
                };
                let message = format!("Tool '{}' {}", tool.name, verb);
                self.activity.append(ActivityKind::Tool, message, None);
            }
        }
    }

    pub fn create_tool(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        config: ConfigMap,
    ) -> String {
        let name = name.into();
        let id = self.tools.create(name.clone(), description, config);
        self.activity
            .append(ActivityKind::Tool, format!("Tool '{}' created", name), None);
        id
    }

    pub fn approve(&mut self, id: &str) {
        if self.approvals.try_approve(id).is_ok() {
            self.log_approval(id);
        }
    }

    pub fn reject(&mut self, id: &str) {
        if self.approvals.try_reject(id).is_ok() {
            self.log_approval(id);
        }
    }

    fn log_approval(&mut self, id: &str) {
        if let Some(approval) = self.approvals.get(id) {
            let message = format!(
                "{} '{}' {}",
                approval.kind.label(),
                approval.title,
                approval.status
            );
            let metadata = approval
                .amount
                .map(|amount| config_value::config_map([("amount", amount)]));
            self.activity.append(ActivityKind::Approval, message, metadata);
        }
    }

    pub fn create_approval(&mut self, request: NewApproval) -> String {
        let message = format!("{} requested: {}", request.kind.label(), request.title);
        let id = self.approvals.create(request);
        self.activity.append(ActivityKind::Approval, message, None);
        id
    }

    pub fn run_workflow(&mut self, id: &str) {
        if self.workflows.try_run(id).is_ok() {
            if let Some(wf) = self.workflows.get(id) {
                let message = format!("{} triggered (run #{})", wf.name, wf.run_count);
                self.activity.append(ActivityKind::Workflow, message, None);
            }
        }
    }

    pub fn toggle_workflow(&mut self, id: &str) {
        if let Ok(status) = self.workflows.try_toggle(id) {
            if let Some(wf) = self.workflows.get(id) {
                let message = format!("Workflow '{}' {}", wf.name, status);
                self.activity.append(ActivityKind::Workflow, message, None);
            }
        }
    }

    pub fn create_workflow(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        trigger: impl Into<String>,
        actions: Vec<String>,
    ) -> String {
        let name = name.into();
        let id = self.workflows.create(name.clone(), description, trigger, actions);
        self.activity.append(
            ActivityKind::Workflow,
            format!("Workflow '{}' created", name),
            None,
        );
        id
    }

    pub fn delete_workflow(&mut self, id: &str) {
        if let Ok(wf) = self.workflows.try_delete(id) {
            self.activity.append(
                ActivityKind::Workflow,
                format!("Workflow '{}' deleted", wf.name),
                None,
            );
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_is_prefixed_and_unique() {
        let a = new_id("wf");
        let b = new_id("wf");
        assert!(a.starts_with("wf_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_seeded_dashboard() {
        let dashboard = Dashboard::seeded(DashboardConfig::default());
        assert_eq!(dashboard.agents.len(), 6);
        assert_eq!(dashboard.tools.len(), 6);
        assert_eq!(dashboard.approvals.len(), 5);
        assert_eq!(dashboard.workflows.len(), 5);
        assert_eq!(dashboard.activity.len(), 8);
        assert_eq!(dashboard.stats().cpu_usage, 34.0);
    }

    #[test]
    fn test_from_config_respects_seed_flag() {
        let config = DashboardConfig {
            seed_mock_data: false,
            ..DashboardConfig::default()
        };
        let dashboard = Dashboard::from_config(config);
        assert!(dashboard.agents.is_empty());
        assert!(dashboard.activity.is_empty());
    }

    #[test]
    fn test_logged_operation_appends_activity() {
        let mut dashboard = Dashboard::default();
        let id = dashboard.spawn_agent("Scanner Agent", "scan", None);
        dashboard.start_agent(&id);
        dashboard.start_agent("agent_missing");

        let messages: Vec<_> = dashboard.activity.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["Agent 'Scanner Agent' started", "Agent 'Scanner Agent' spawned"]
        );
    }

    #[test]
    fn test_refresh_stats_counts_stores() {
        let dashboard = Dashboard::seeded(DashboardConfig::default());
        let stats = dashboard.refresh_stats();
        assert_eq!(stats.active_agents, 3);
        assert_eq!(stats.pending_approvals, 4);
        assert_eq!(stats.active_workflows, 3);
        assert_eq!(stats.tools_active, 4);
        assert_eq!(stats.system_health, SystemHealth::Healthy);
    }

    #[test]
    fn test_update_stats_patch() {
        let dashboard = Dashboard::default();
        dashboard.update_stats(StatsPatch {
            cpu_usage: Some(88.0),
            ..StatsPatch::default()
        });
        assert_eq!(dashboard.stats().cpu_usage, 88.0);
        assert_eq!(dashboard.refresh_stats().system_health, SystemHealth::Critical);
    }
}
