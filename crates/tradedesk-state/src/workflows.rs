//! Workflow store
//!
//! Workflows are named action sequences with a trigger description. Running
//! one only bumps its counter and stamps the time; nothing is executed.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EntityKind, StoreError, StoreResult};
use crate::events::{EventBus, StoreEvent};
use crate::new_id;

/// Workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Active,
    Paused,
    Error,
    Completed,
}

impl WorkflowStatus {
    /// Binary flip: active goes paused, anything else goes active
    pub fn toggled(self) -> Self {
        if self == WorkflowStatus::Active {
            WorkflowStatus::Paused
        } else {
            WorkflowStatus::Active
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowStatus::Active => "active",
            WorkflowStatus::Paused => "paused",
            WorkflowStatus::Error => "error",
            WorkflowStatus::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Parsed form of a trigger string such as `schedule: 0 8 * * 1-5`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Cron expression
    Schedule(String),
    /// Named event
    Event(String),
    /// Period in seconds
    Interval(u64),
    Manual,
    /// Anything not in the forms above
    Other(String),
}

impl Trigger {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("manual") {
            return Trigger::Manual;
        }

        let Some((head, rest)) = raw.split_once(':') else {
            return Trigger::Other(raw.to_string());
        };
        let rest = rest.trim();
        match head.trim().to_lowercase().as_str() {
            "schedule" if !rest.is_empty() => Trigger::Schedule(rest.to_string()),
            "event" if !rest.is_empty() => Trigger::Event(rest.to_string()),
            "interval" => rest
                .parse()
                .map(Trigger::Interval)
                .unwrap_or_else(|_| Trigger::Other(raw.to_string())),
            _ => Trigger::Other(raw.to_string()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Trigger::Schedule(_) => "schedule",
            Trigger::Event(_) => "event",
            Trigger::Interval(_) => "interval",
            Trigger::Manual => "manual",
            Trigger::Other(_) => "other",
        }
    }
}

/// A simulated triggered action sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: WorkflowStatus,
    pub trigger: String,
    pub actions: Vec<String>,
    pub run_count: u64,
    pub last_run: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Workflow {
    /// A fresh paused workflow, as produced by `create`
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        trigger: impl Into<String>,
        actions: Vec<String>,
    ) -> Self {
        Self {
            id: new_id("wf"),
            name: name.into(),
            description: description.into(),
            status: WorkflowStatus::Paused,
            trigger: trigger.into(),
            actions,
            run_count: 0,
            last_run: None,
            created_at: Utc::now(),
        }
    }

    pub fn trigger_kind(&self) -> Trigger {
        Trigger::parse(&self.trigger)
    }
}

/// Owns the workflow collection, oldest first
#[derive(Debug, Default)]
pub struct WorkflowStore {
    workflows: Vec<Workflow>,
    events: EventBus,
}

impl WorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workflows(workflows: Vec<Workflow>) -> Self {
        Self {
            workflows,
            events: EventBus::default(),
        }
    }

    /// Route change events to a shared bus
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn workflows(&self) -> &[Workflow] {
        &self.workflows
    }

    pub fn get(&self, id: &str) -> Option<&Workflow> {
        self.workflows.iter().find(|w| w.id == id)
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }

    fn find_mut(&mut self, id: &str) -> StoreResult<&mut Workflow> {
        self.workflows
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Workflow, id))
    }

    /// Flip active/paused, returning the new status
    pub fn try_toggle(&mut self, id: &str) -> StoreResult<WorkflowStatus> {
        let status = self.find_mut(id)?.status.toggled();
        self.try_set_status(id, status)
    }

    pub fn toggle(&mut self, id: &str) {
        let _ = self.try_toggle(id);
    }

    /// Assign a status directly; error/completed are only reachable here
    pub fn try_set_status(
        &mut self,
        id: &str,
        status: WorkflowStatus,
    ) -> StoreResult<WorkflowStatus> {
        self.find_mut(id)?.status = status;

        tracing::debug!(workflow_id = %id, %status, "workflow status changed");
        self.events.emit(StoreEvent::WorkflowStatusChanged {
            workflow_id: id.to_string(),
            status,
            timestamp: Utc::now(),
        });
        Ok(status)
    }

    pub fn set_status(&mut self, id: &str, status: WorkflowStatus) {
        let _ = self.try_set_status(id, status);
    }

    /// Record one run, returning the time it was stamped with
    pub fn try_run(&mut self, id: &str) -> StoreResult<DateTime<Utc>> {
        let workflow = self.find_mut(id)?;
        let now = Utc::now();
        workflow.last_run = Some(now);
        workflow.run_count += 1;
        let run_count = workflow.run_count;

        tracing::debug!(workflow_id = %id, run_count, "workflow run");
        self.events.emit(StoreEvent::WorkflowRun {
            workflow_id: id.to_string(),
            run_count,
            timestamp: now,
        });
        Ok(now)
    }

    pub fn run(&mut self, id: &str) {
        let _ = self.try_run(id);
    }

    /// Create a paused workflow at the end of the collection
    pub fn create(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        trigger: impl Into<String>,
        actions: Vec<String>,
    ) -> String {
        let workflow = Workflow::new(name, description, trigger, actions);
        let id = workflow.id.clone();

        tracing::debug!(workflow_id = %id, name = %workflow.name, "workflow created");
        self.events.emit(StoreEvent::WorkflowCreated {
            workflow_id: id.clone(),
            name: workflow.name.clone(),
            timestamp: workflow.created_at,
        });

        self.workflows.push(workflow);
        id
    }

    /// Remove a workflow, returning it
    pub fn try_delete(&mut self, id: &str) -> StoreResult<Workflow> {
        let index = self
            .workflows
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Workflow, id))?;
        let workflow = self.workflows.remove(index);

        tracing::debug!(workflow_id = %id, "workflow deleted");
        self.events.emit(StoreEvent::WorkflowDeleted {
            workflow_id: id.to_string(),
            timestamp: Utc::now(),
        });
        Ok(workflow)
    }

    pub fn delete(&mut self, id: &str) {
        let _ = self.try_delete(id);
    }

    pub fn filter_by_status(&self, status: Option<WorkflowStatus>) -> Vec<&Workflow> {
        self.workflows
            .iter()
            .filter(|w| status.map_or(true, |s| w.status == s))
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.workflows
            .iter()
            .filter(|w| w.status == WorkflowStatus::Active)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn store_with_one() -> (WorkflowStore, String) {
        let mut store = WorkflowStore::new();
        let id = store.create(
            "Morning Market Scan",
            "Daily regime scan",
            "schedule: 0 8 * * 1-5",
            actions(&["Fetch SPY/QQQ data", "Calculate MAs"]),
        );
        (store, id)
    }

    #[test]
    fn test_create_defaults() {
        let (store, id) = store_with_one();
        let wf = store.get(&id).unwrap();
        assert!(id.starts_with("wf_"));
        assert_eq!(wf.status, WorkflowStatus::Paused);
        assert_eq!(wf.run_count, 0);
        assert!(wf.last_run.is_none());
        assert_eq!(wf.actions.len(), 2);
    }

    #[test]
    fn test_create_appends() {
        let (mut store, first) = store_with_one();
        let second = store.create("Risk Check", "Hourly", "interval: 3600", Vec::new());
        assert_eq!(store.workflows()[0].id, first);
        assert_eq!(store.workflows()[1].id, second);
    }

    #[test]
    fn test_run_three_times() {
        let (mut store, id) = store_with_one();
        store.try_run(&id).unwrap();
        store.try_run(&id).unwrap();
        let third = store.try_run(&id).unwrap();

        let wf = store.get(&id).unwrap();
        assert_eq!(wf.run_count, 3);
        assert_eq!(wf.last_run, Some(third));
        assert_eq!(wf.status, WorkflowStatus::Paused);
    }

    #[test]
    fn test_toggle_flip() {
        let (mut store, id) = store_with_one();
        assert_eq!(store.try_toggle(&id).unwrap(), WorkflowStatus::Active);
        assert_eq!(store.try_toggle(&id).unwrap(), WorkflowStatus::Paused);

        store.set_status(&id, WorkflowStatus::Error);
        store.toggle(&id);
        assert_eq!(store.get(&id).unwrap().status, WorkflowStatus::Active);
        assert_eq!(store.active_count(), 1);
    }

    #[test]
    fn test_delete() {
        let (mut store, id) = store_with_one();
        let removed = store.try_delete(&id).unwrap();
        assert_eq!(removed.name, "Morning Market Scan");
        assert!(store.is_empty());
        assert!(store.try_delete(&id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let (mut store, _) = store_with_one();
        let before = store.workflows().to_vec();

        store.toggle("wf_missing");
        store.run("wf_missing");
        store.delete("wf_missing");
        store.set_status("wf_missing", WorkflowStatus::Completed);

        assert_eq!(store.workflows(), before.as_slice());
    }

    #[test]
    fn test_trigger_parse() {
        assert_eq!(
            Trigger::parse("schedule: 0 8 * * 1-5"),
            Trigger::Schedule("0 8 * * 1-5".to_string())
        );
        assert_eq!(
            Trigger::parse("event: market_open"),
            Trigger::Event("market_open".to_string())
        );
        assert_eq!(Trigger::parse("interval: 3600"), Trigger::Interval(3600));
        assert_eq!(Trigger::parse("Manual"), Trigger::Manual);
        assert_eq!(
            Trigger::parse("interval: hourly"),
            Trigger::Other("interval: hourly".to_string())
        );
        assert_eq!(Trigger::parse("whenever").kind(), "other");
    }
}
