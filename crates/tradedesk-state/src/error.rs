//! Error types for the dashboard stores
//!
//! The base store operations never fail: an unknown id is a silent no-op.
//! The `try_*` variants surface these errors instead.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Which store an id was looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Agent,
    Tool,
    Approval,
    Workflow,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Agent => "agent",
            EntityKind::Tool => "tool",
            EntityKind::Approval => "approval",
            EntityKind::Workflow => "workflow",
        };
        f.write_str(name)
    }
}

/// Store error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// No entity with this id in the store
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },

    /// Status change rejected by the store's transition policy
    #[error("Approval {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: String,
        to: String,
    },

    /// Config text could not be turned into a config map
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl StoreError {
    pub(crate) fn not_found(kind: EntityKind, id: &str) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// True for the missing-id case that base operations swallow
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = StoreError::not_found(EntityKind::Workflow, "wf_1");
        assert_eq!(err.to_string(), "workflow wf_1 not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = StoreError::InvalidTransition {
            id: "appr_1".to_string(),
            from: "rejected".to_string(),
            to: "approved".to_string(),
        };
        assert!(err.to_string().contains("rejected"));
        assert!(!err.is_not_found());
    }
}
