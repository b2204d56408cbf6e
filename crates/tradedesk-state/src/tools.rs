//! Tool store
//!
//! Tools are integrations (brokerage API, market data, chat webhooks) with
//! an on/off switch and a usage counter.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config_value::ConfigMap;
use crate::error::{EntityKind, StoreError, StoreResult};
use crate::events::{EventBus, StoreEvent};
use crate::new_id;

/// Tool status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Active,
    Inactive,
    Error,
}

impl ToolStatus {
    pub const ALL: [ToolStatus; 3] = [ToolStatus::Active, ToolStatus::Inactive, ToolStatus::Error];

    /// Binary flip: active goes inactive, anything else goes active
    pub fn toggled(self) -> Self {
        if self == ToolStatus::Active {
            ToolStatus::Inactive
        } else {
            ToolStatus::Active
        }
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ToolStatus::Active => "active",
            ToolStatus::Inactive => "inactive",
            ToolStatus::Error => "error",
        };
        f.write_str(name)
    }
}

/// A simulated integration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: ToolStatus,
    pub usage_count: u64,
    pub last_used: Option<DateTime<Utc>>,
    pub config: ConfigMap,
    /// Icon name for the view; unknown names fall back to a default glyph
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Tool {
    /// A fresh inactive tool, as produced by `create`
    pub fn new(name: impl Into<String>, description: impl Into<String>, config: ConfigMap) -> Self {
        Self {
            id: new_id("tool"),
            name: name.into(),
            description: description.into(),
            status: ToolStatus::Inactive,
            usage_count: 0,
            last_used: None,
            config,
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Owns the tool collection, oldest first
#[derive(Debug, Default)]
pub struct ToolStore {
    tools: Vec<Tool>,
    events: EventBus,
}

impl ToolStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tools(tools: Vec<Tool>) -> Self {
        Self {
            tools,
            events: EventBus::default(),
        }
    }

    /// Route change events to a shared bus
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn get(&self, id: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    fn find_mut(&mut self, id: &str) -> StoreResult<&mut Tool> {
        self.tools
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Tool, id))
    }

    /// Flip active/inactive, returning the new status
    pub fn try_toggle(&mut self, id: &str) -> StoreResult<ToolStatus> {
        let tool = self.find_mut(id)?;
        let status = tool.status.toggled();
        self.apply_status(id, status)
    }

    pub fn toggle(&mut self, id: &str) {
        let _ = self.try_toggle(id);
    }

    /// Assign a status directly; the only way a tool reaches `error`
    pub fn try_set_status(&mut self, id: &str, status: ToolStatus) -> StoreResult<ToolStatus> {
        self.apply_status(id, status)
    }

    pub fn set_status(&mut self, id: &str, status: ToolStatus) {
        let _ = self.try_set_status(id, status);
    }

    fn apply_status(&mut self, id: &str, status: ToolStatus) -> StoreResult<ToolStatus> {
        self.find_mut(id)?.status = status;

        tracing::debug!(tool_id = %id, %status, "tool status changed");
        self.events.emit(StoreEvent::ToolStatusChanged {
            tool_id: id.to_string(),
            status,
            timestamp: Utc::now(),
        });
        Ok(status)
    }

    /// Shallow-merge `partial` into the tool's config
    pub fn try_update_config(&mut self, id: &str, partial: ConfigMap) -> StoreResult<()> {
        let tool = self.find_mut(id)?;
        let keys: Vec<String> = partial.keys().cloned().collect();
        tool.config.extend(partial);

        tracing::debug!(tool_id = %id, keys = ?keys, "tool config updated");
        self.events.emit(StoreEvent::ToolConfigUpdated {
            tool_id: id.to_string(),
            keys,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    pub fn update_config(&mut self, id: &str, partial: ConfigMap) {
        let _ = self.try_update_config(id, partial);
    }

    /// Count one use, returning the time it was stamped with
    pub fn try_increment_usage(&mut self, id: &str) -> StoreResult<DateTime<Utc>> {
        let tool = self.find_mut(id)?;
        let now = Utc::now();
        tool.usage_count += 1;
        tool.last_used = Some(now);
        let usage_count = tool.usage_count;

        self.events.emit(StoreEvent::ToolUsed {
            tool_id: id.to_string(),
            usage_count,
            timestamp: now,
        });
        Ok(now)
    }

    pub fn increment_usage(&mut self, id: &str) {
        let _ = self.try_increment_usage(id);
    }

    /// Create an inactive tool at the end of the collection
    pub fn create(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        config: ConfigMap,
    ) -> String {
        self.insert(Tool::new(name, description, config))
    }

    pub fn create_with_icon(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        config: ConfigMap,
        icon: impl Into<String>,
    ) -> String {
        self.insert(Tool::new(name, description, config).with_icon(icon))
    }

    fn insert(&mut self, tool: Tool) -> String {
        let id = tool.id.clone();

        tracing::debug!(tool_id = %id, name = %tool.name, "tool created");
        self.events.emit(StoreEvent::ToolCreated {
            tool_id: id.clone(),
            name: tool.name.clone(),
            timestamp: Utc::now(),
        });

        self.tools.push(tool);
        id
    }

    pub fn filter_by_status(&self, status: Option<ToolStatus>) -> Vec<&Tool> {
        self.tools
            .iter()
            .filter(|t| status.map_or(true, |s| t.status == s))
            .collect()
    }

    pub fn status_counts(&self) -> HashMap<ToolStatus, usize> {
        let mut counts: HashMap<ToolStatus, usize> =
            ToolStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for tool in &self.tools {
            *counts.entry(tool.status).or_insert(0) += 1;
        }
        counts
    }

    pub fn active_count(&self) -> usize {
        self.tools
            .iter()
            .filter(|t| t.status == ToolStatus::Active)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_value::{config_map, ConfigValue};

    fn store_with_one() -> (ToolStore, String) {
        let mut store = ToolStore::new();
        let id = store.create(
            "Alpaca API",
            "Brokerage integration",
            config_map([("mode", "paper"), ("endpoint", "paper-api.alpaca.markets")]),
        );
        (store, id)
    }

    #[test]
    fn test_create_defaults() {
        let (store, id) = store_with_one();
        let tool = store.get(&id).unwrap();
        assert!(id.starts_with("tool_"));
        assert_eq!(tool.status, ToolStatus::Inactive);
        assert_eq!(tool.usage_count, 0);
        assert!(tool.last_used.is_none());
        assert!(tool.icon.is_none());
    }

    #[test]
    fn test_create_appends() {
        let (mut store, first) = store_with_one();
        let second = store.create_with_icon("Web Search", "Research", ConfigMap::new(), "Search");
        assert_eq!(store.tools()[0].id, first);
        assert_eq!(store.tools()[1].id, second);
        assert_eq!(store.tools()[1].icon.as_deref(), Some("Search"));
    }

    #[test]
    fn test_toggle_flips_and_recovers_from_error() {
        let (mut store, id) = store_with_one();

        store.toggle(&id);
        assert_eq!(store.get(&id).unwrap().status, ToolStatus::Active);
        store.toggle(&id);
        assert_eq!(store.get(&id).unwrap().status, ToolStatus::Inactive);

        store.set_status(&id, ToolStatus::Error);
        assert_eq!(store.try_toggle(&id).unwrap(), ToolStatus::Active);
    }

    #[test]
    fn test_update_config_merges() {
        let (mut store, id) = store_with_one();
        store.update_config(
            &id,
            config_map([
                ("mode", ConfigValue::from("live")),
                ("rateLimit", ConfigValue::from(100i64)),
            ]),
        );

        let config = &store.get(&id).unwrap().config;
        assert_eq!(config["mode"], ConfigValue::from("live"));
        assert_eq!(config["endpoint"], ConfigValue::from("paper-api.alpaca.markets"));
        assert_eq!(config["rateLimit"].as_f64(), Some(100.0));
    }

    #[test]
    fn test_increment_usage_n_times() {
        let (mut store, id) = store_with_one();
        let mut last = None;
        for _ in 0..5 {
            last = Some(store.try_increment_usage(&id).unwrap());
        }

        let tool = store.get(&id).unwrap();
        assert_eq!(tool.usage_count, 5);
        assert_eq!(tool.last_used, last);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let (mut store, _) = store_with_one();
        let before = store.tools().to_vec();

        store.toggle("tool_missing");
        store.update_config("tool_missing", config_map([("k", true)]));
        store.increment_usage("tool_missing");
        store.set_status("tool_missing", ToolStatus::Error);

        assert_eq!(store.tools(), before.as_slice());
        assert!(store.try_increment_usage("tool_missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_counts() {
        let (mut store, id) = store_with_one();
        store.create("Other", "desc", ConfigMap::new());
        store.toggle(&id);

        assert_eq!(store.active_count(), 1);
        let counts = store.status_counts();
        assert_eq!(counts[&ToolStatus::Active], 1);
        assert_eq!(counts[&ToolStatus::Inactive], 1);
        assert_eq!(counts[&ToolStatus::Error], 0);
        assert_eq!(store.filter_by_status(Some(ToolStatus::Inactive)).len(), 1);
    }
}
