//! Approval queue
//!
//! Approvals are decision requests (trades, expenses, mode switches) that a
//! human resolves. Under the default `Permissive` policy approve/reject are
//! accepted from any status, so a rejected item can later be approved.
//! `PendingOnly` turns that into an `InvalidTransition` error.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config_value::ConfigMap;
use crate::error::{EntityKind, StoreError, StoreResult};
use crate::events::{EventBus, StoreEvent};
use crate::new_id;

/// What is being approved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalKind {
    Trade,
    Expense,
    Action,
    Workflow,
}

impl ApprovalKind {
    /// Title-case label for display
    pub fn label(&self) -> &'static str {
        match self {
            ApprovalKind::Trade => "Trade",
            ApprovalKind::Expense => "Expense",
            ApprovalKind::Action => "Action",
            ApprovalKind::Workflow => "Workflow",
        }
    }
}

impl fmt::Display for ApprovalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_lowercase())
    }
}

/// Request priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Queue order: urgent first, low last
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Urgent => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        };
        f.write_str(name)
    }
}

/// Approval status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Which status changes the store accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionPolicy {
    /// approve/reject from any status
    #[default]
    Permissive,
    /// only pending → approved and pending → rejected
    PendingOnly,
}

impl TransitionPolicy {
    pub fn allows(&self, from: ApprovalStatus, to: ApprovalStatus) -> bool {
        match self {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::PendingOnly => {
                from == ApprovalStatus::Pending && to != ApprovalStatus::Pending
            }
        }
    }
}

impl std::str::FromStr for TransitionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "permissive" => Ok(TransitionPolicy::Permissive),
            "pending-only" | "pending_only" | "strict" => Ok(TransitionPolicy::PendingOnly),
            other => Err(format!("unknown approval policy '{}'", other)),
        }
    }
}

/// A pending decision request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Approval {
    pub id: String,
    pub kind: ApprovalKind,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: ApprovalStatus,
    pub requested_by: String,
    pub requested_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ConfigMap>,
}

impl Approval {
    pub fn is_pending(&self) -> bool {
        self.status == ApprovalStatus::Pending
    }
}

/// Caller-supplied fields of a new approval; id, time and status are
/// assigned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewApproval {
    pub kind: ApprovalKind,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub requested_by: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub data: Option<ConfigMap>,
}

impl NewApproval {
    pub fn new(
        kind: ApprovalKind,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        requested_by: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
            priority,
            requested_by: requested_by.into(),
            amount: None,
            data: None,
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_data(mut self, data: ConfigMap) -> Self {
        self.data = Some(data);
        self
    }

    pub(crate) fn into_approval(self, requested_at: DateTime<Utc>) -> Approval {
        Approval {
            id: new_id("appr"),
            kind: self.kind,
            title: self.title,
            description: self.description,
            priority: self.priority,
            status: ApprovalStatus::Pending,
            requested_by: self.requested_by,
            requested_at,
            amount: self.amount,
            data: self.data,
        }
    }
}

/// Priority/type dropdowns of the queue view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApprovalFilter {
    pub priority: Option<Priority>,
    pub kind: Option<ApprovalKind>,
}

impl ApprovalFilter {
    pub fn matches(&self, approval: &Approval) -> bool {
        self.priority.map_or(true, |p| approval.priority == p)
            && self.kind.map_or(true, |k| approval.kind == k)
    }
}

/// Stable sort by priority rank, urgent first
pub fn sort_by_priority(approvals: &mut [&Approval]) {
    approvals.sort_by_key(|a| a.priority.rank());
}

/// Sort by request time, most recent first
pub fn sort_by_recency(approvals: &mut [&Approval]) {
    approvals.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
}

/// Owns the approval collection, newest first
#[derive(Debug, Default)]
pub struct ApprovalStore {
    approvals: Vec<Approval>,
    policy: TransitionPolicy,
    events: EventBus,
}

impl ApprovalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_approvals(approvals: Vec<Approval>) -> Self {
        Self {
            approvals,
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Route change events to a shared bus
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    pub fn approvals(&self) -> &[Approval] {
        &self.approvals
    }

    pub fn get(&self, id: &str) -> Option<&Approval> {
        self.approvals.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.approvals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.approvals.is_empty()
    }

    /// Queue a new request; it always starts pending
    pub fn create(&mut self, request: NewApproval) -> String {
        let approval = request.into_approval(Utc::now());
        let id = approval.id.clone();

        tracing::debug!(approval_id = %id, priority = %approval.priority, "approval requested");
        self.events.emit(StoreEvent::ApprovalRequested {
            approval_id: id.clone(),
            title: approval.title.clone(),
            timestamp: approval.requested_at,
        });

        self.approvals.insert(0, approval);
        id
    }

    pub fn try_approve(&mut self, id: &str) -> StoreResult<()> {
        self.resolve(id, ApprovalStatus::Approved)
    }

    pub fn approve(&mut self, id: &str) {
        let _ = self.try_approve(id);
    }

    pub fn try_reject(&mut self, id: &str) -> StoreResult<()> {
        self.resolve(id, ApprovalStatus::Rejected)
    }

    pub fn reject(&mut self, id: &str) {
        let _ = self.try_reject(id);
    }

    fn resolve(&mut self, id: &str, to: ApprovalStatus) -> StoreResult<()> {
        let policy = self.policy;
        let approval = self
            .approvals
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Approval, id))?;

        if !policy.allows(approval.status, to) {
            return Err(StoreError::InvalidTransition {
                id: id.to_string(),
                from: approval.status.to_string(),
                to: to.to_string(),
            });
        }
        approval.status = to;

        tracing::debug!(approval_id = %id, status = %to, "approval resolved");
        self.events.emit(StoreEvent::ApprovalResolved {
            approval_id: id.to_string(),
            status: to,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Approvals still awaiting a decision, in collection order
    pub fn pending(&self) -> Vec<&Approval> {
        self.approvals.iter().filter(|a| a.is_pending()).collect()
    }

    /// Resolved approvals, in collection order
    pub fn history(&self) -> Vec<&Approval> {
        self.approvals.iter().filter(|a| !a.is_pending()).collect()
    }

    /// Pending approvals matching `filter`, urgent first
    pub fn pending_sorted(&self, filter: &ApprovalFilter) -> Vec<&Approval> {
        let mut pending: Vec<&Approval> = self
            .pending()
            .into_iter()
            .filter(|a| filter.matches(a))
            .collect();
        sort_by_priority(&mut pending);
        pending
    }

    /// Resolved approvals matching `filter`, most recent first
    pub fn history_sorted(&self, filter: &ApprovalFilter) -> Vec<&Approval> {
        let mut history: Vec<&Approval> = self
            .history()
            .into_iter()
            .filter(|a| filter.matches(a))
            .collect();
        sort_by_recency(&mut history);
        history
    }

    pub fn pending_count(&self) -> usize {
        self.approvals.iter().filter(|a| a.is_pending()).count()
    }

    pub fn urgent_count(&self) -> usize {
        self.approvals
            .iter()
            .filter(|a| a.is_pending() && a.priority == Priority::Urgent)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn request(title: &str, priority: Priority) -> NewApproval {
        NewApproval::new(ApprovalKind::Trade, title, "desc", priority, "Trade Proposer")
    }

    #[test]
    fn test_create_is_pending_and_prepended() {
        let mut store = ApprovalStore::new();
        let first =
            store.create(request("NVDA Long Breakout", Priority::High).with_amount(15000.0));
        let second = store.create(request("TSLA Episodic Pivot", Priority::Urgent));

        assert!(first.starts_with("appr_"));
        assert_eq!(store.approvals()[0].id, second);
        let approval = store.get(&first).unwrap();
        assert_eq!(approval.status, ApprovalStatus::Pending);
        assert_eq!(approval.amount, Some(15000.0));
    }

    #[test]
    fn test_approve_and_reject_are_unguarded_by_default() {
        let mut store = ApprovalStore::new();
        let id = store.create(request("Data Subscription", Priority::Low));

        store.reject(&id);
        assert_eq!(store.get(&id).unwrap().status, ApprovalStatus::Rejected);

        store.approve(&id);
        assert_eq!(store.get(&id).unwrap().status, ApprovalStatus::Approved);

        store.approve(&id);
        assert_eq!(store.get(&id).unwrap().status, ApprovalStatus::Approved);
    }

    #[test]
    fn test_pending_only_policy_guards_resolved() {
        let mut store = ApprovalStore::new().with_policy(TransitionPolicy::PendingOnly);
        let id = store.create(request("Switch to Live Trading", Priority::Medium));

        store.try_reject(&id).unwrap();
        let err = store.try_approve(&id).unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition { .. }));
        assert_eq!(store.get(&id).unwrap().status, ApprovalStatus::Rejected);

        store.approve(&id);
        assert_eq!(store.get(&id).unwrap().status, ApprovalStatus::Rejected);
    }

    #[test]
    fn test_pending_and_history_partition() {
        let mut store = ApprovalStore::new();
        let a = store.create(request("a", Priority::Low));
        store.create(request("b", Priority::High));
        store.approve(&a);

        assert_eq!(store.pending().len(), 1);
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.pending_count(), 1);
        assert_eq!(store.history()[0].id, a);
    }

    #[test]
    fn test_pending_sort_is_stable_by_priority() {
        let mut store = ApprovalStore::new();
        // prepended, so create in reverse to get [low, urgent(1), medium, urgent(2)]
        store.create(request("urgent-2", Priority::Urgent));
        store.create(request("medium", Priority::Medium));
        store.create(request("urgent-1", Priority::Urgent));
        store.create(request("low", Priority::Low));

        let titles: Vec<_> = store
            .pending_sorted(&ApprovalFilter::default())
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(titles, vec!["urgent-1", "urgent-2", "medium", "low"]);
        assert_eq!(store.urgent_count(), 2);
    }

    #[test]
    fn test_history_sorted_most_recent_first() {
        let now = Utc::now();
        let mut old = request("old", Priority::Low).into_approval(now - Duration::hours(48));
        old.status = ApprovalStatus::Approved;
        let mut recent = request("recent", Priority::Low).into_approval(now - Duration::hours(1));
        recent.status = ApprovalStatus::Rejected;
        let store = ApprovalStore::with_approvals(vec![old, recent]);

        let titles: Vec<_> = store
            .history_sorted(&ApprovalFilter::default())
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(titles, vec!["recent", "old"]);
    }

    #[test]
    fn test_filter_by_priority_and_kind() {
        let mut store = ApprovalStore::new();
        store.create(request("trade-high", Priority::High));
        store.create(NewApproval::new(
            ApprovalKind::Expense,
            "expense-high",
            "desc",
            Priority::High,
            "Admin",
        ));
        store.create(request("trade-low", Priority::Low));

        let filter = ApprovalFilter {
            priority: Some(Priority::High),
            kind: Some(ApprovalKind::Trade),
        };
        let matched = store.pending_sorted(&filter);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "trade-high");
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut store = ApprovalStore::new();
        store.create(request("a", Priority::Low));
        let before = store.approvals().to_vec();

        store.approve("appr_missing");
        store.reject("appr_missing");

        assert_eq!(store.approvals(), before.as_slice());
        assert!(store.try_approve("appr_missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "permissive".parse::<TransitionPolicy>().unwrap(),
            TransitionPolicy::Permissive
        );
        assert_eq!(
            "pending-only".parse::<TransitionPolicy>().unwrap(),
            TransitionPolicy::PendingOnly
        );
        assert!("sometimes".parse::<TransitionPolicy>().is_err());
    }
}
