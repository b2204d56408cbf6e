//! Dashboard configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::activity::DEFAULT_ACTIVITY_CAPACITY;
use crate::approvals::TransitionPolicy;
use crate::events::DEFAULT_EVENT_CAPACITY;

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Entries kept in the activity feed
    pub activity_capacity: usize,
    /// Seconds between simulated stats updates
    pub stats_interval_secs: u64,
    /// Which approve/reject calls are accepted
    pub approval_policy: TransitionPolicy,
    /// Start from the reference mock data
    pub seed_mock_data: bool,
    /// Buffer size of the change event channel
    pub event_capacity: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            activity_capacity: DEFAULT_ACTIVITY_CAPACITY,
            stats_interval_secs: 5,
            approval_policy: TransitionPolicy::Permissive,
            seed_mock_data: true,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl DashboardConfig {
    /// Create config from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            activity_capacity: lookup("TRADEDESK_ACTIVITY_CAPACITY")
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.activity_capacity),
            stats_interval_secs: lookup("TRADEDESK_STATS_INTERVAL_SECS")
                .and_then(|s| s.parse().ok())
                .filter(|n: &u64| *n > 0)
                .unwrap_or(defaults.stats_interval_secs),
            approval_policy: lookup("TRADEDESK_APPROVAL_POLICY")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.approval_policy),
            seed_mock_data: lookup("TRADEDESK_SEED")
                .and_then(|s| parse_bool(&s))
                .unwrap_or(defaults.seed_mock_data),
            event_capacity: lookup("TRADEDESK_EVENT_CAPACITY")
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.event_capacity),
        }
    }

    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats_interval_secs)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
