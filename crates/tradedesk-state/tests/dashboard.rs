use std::time::Duration;

use tradedesk_state::{
    parse_config_json, ActivityKind, ApprovalFilter, ApprovalKind, ApprovalStatus, Dashboard,
    DashboardConfig, NewApproval, Priority, StoreError, StoreEvent, ToolStatus,
    TransitionPolicy, WorkflowStatus,
};

fn seeded() -> Dashboard {
    Dashboard::seeded(DashboardConfig::default())
}

fn empty() -> Dashboard {
    Dashboard::new(DashboardConfig::default())
}

#[test]
fn unknown_ids_leave_every_store_unchanged() {
    let mut dashboard = seeded();
    let agents = dashboard.agents.agents().to_vec();
    let tools = dashboard.tools.tools().to_vec();
    let approvals = dashboard.approvals.approvals().to_vec();
    let workflows = dashboard.workflows.workflows().to_vec();
    let activity_len = dashboard.activity.len();

    dashboard.kill_agent("nope");
    dashboard.start_agent("nope");
    dashboard.stop_agent("nope");
    dashboard.agents.update_progress("nope", 10.0);
    dashboard.toggle_tool("nope");
    dashboard.tools.increment_usage("nope");
    dashboard.approve("nope");
    dashboard.reject("nope");
    dashboard.run_workflow("nope");
    dashboard.toggle_workflow("nope");
    dashboard.delete_workflow("nope");

    assert_eq!(dashboard.agents.agents(), agents.as_slice());
    assert_eq!(dashboard.tools.tools(), tools.as_slice());
    assert_eq!(dashboard.approvals.approvals(), approvals.as_slice());
    assert_eq!(dashboard.workflows.workflows(), workflows.as_slice());
    assert_eq!(dashboard.activity.len(), activity_len);
}

#[test]
fn seeded_pending_queue_orders_urgent_first() {
    let dashboard = seeded();
    let ids: Vec<_> = dashboard
        .approvals
        .pending_sorted(&ApprovalFilter::default())
        .iter()
        .map(|a| a.id.as_str())
        .collect();
    assert_eq!(ids, vec!["appr_2", "appr_1", "appr_3", "appr_4"]);

    let history = dashboard.approvals.history_sorted(&ApprovalFilter::default());
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, ApprovalStatus::Approved);
}

#[test]
fn approving_moves_item_into_history_and_logs_it() {
    let mut dashboard = seeded();
    dashboard.approve("appr_1");

    assert_eq!(dashboard.approvals.pending_count(), 3);
    assert_eq!(dashboard.approvals.history().len(), 2);

    let latest = dashboard.activity.entries().next().unwrap();
    assert_eq!(latest.kind, ActivityKind::Approval);
    assert_eq!(latest.message, "Trade 'NVDA Long Breakout' approved");
    assert!(latest.metadata.as_ref().unwrap().contains_key("amount"));
}

#[test]
fn pending_only_policy_blocks_re_resolution() {
    let config = DashboardConfig {
        approval_policy: TransitionPolicy::PendingOnly,
        ..DashboardConfig::default()
    };
    let mut dashboard = Dashboard::seeded(config);

    let err = dashboard.approvals.try_reject("appr_5").unwrap_err();
    assert!(matches!(err, StoreError::InvalidTransition { .. }));

    let before = dashboard.activity.len();
    dashboard.reject("appr_5");
    assert_eq!(dashboard.activity.len(), before);
    assert_eq!(
        dashboard.approvals.get("appr_5").unwrap().status,
        ApprovalStatus::Approved
    );
}

#[test]
fn created_approval_is_pending_and_first() {
    let mut dashboard = seeded();
    let id = dashboard.create_approval(
        NewApproval::new(
            ApprovalKind::Expense,
            "Extra data feed",
            "Options flow subscription",
            Priority::High,
            "Admin",
        )
        .with_amount(49.0),
    );

    assert_eq!(dashboard.approvals.approvals()[0].id, id);
    assert_eq!(
        dashboard.approvals.get(&id).unwrap().status,
        ApprovalStatus::Pending
    );
}

#[test]
fn tool_created_from_json_form() {
    let mut dashboard = empty();
    let config = parse_config_json(r##"{"channel": "#alerts", "enabled": true}"##).unwrap();
    let id = dashboard.create_tool("Slack", "Notifications", config);

    dashboard.toggle_tool(&id);
    let tool = dashboard.tools.get(&id).unwrap();
    assert_eq!(tool.status, ToolStatus::Active);
    assert_eq!(tool.config["enabled"].as_bool(), Some(true));

    let messages: Vec<_> = dashboard
        .activity
        .entries()
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(messages, vec!["Tool 'Slack' enabled", "Tool 'Slack' created"]);

    assert!(parse_config_json("{oops").is_err());
}

#[test]
fn workflow_lifecycle() {
    let mut dashboard = empty();
    let id = dashboard.create_workflow(
        "Risk Check",
        "Hourly heat check",
        "interval: 3600",
        vec!["Calculate heat".to_string()],
    );

    dashboard.toggle_workflow(&id);
    assert_eq!(
        dashboard.workflows.get(&id).unwrap().status,
        WorkflowStatus::Active
    );

    for _ in 0..3 {
        dashboard.run_workflow(&id);
    }
    assert_eq!(dashboard.workflows.get(&id).unwrap().run_count, 3);
    assert_eq!(
        dashboard.activity.entries().next().unwrap().message,
        "Risk Check triggered (run #3)"
    );

    dashboard.delete_workflow(&id);
    assert!(dashboard.workflows.is_empty());
}

#[test]
fn activity_feed_is_bounded_by_config() {
    let config = DashboardConfig {
        activity_capacity: 10,
        seed_mock_data: false,
        ..DashboardConfig::default()
    };
    let mut dashboard = Dashboard::from_config(config);
    for i in 0..25 {
        dashboard.spawn_agent(format!("agent-{}", i), "task", None);
    }

    assert_eq!(dashboard.activity.len(), 10);
    assert_eq!(
        dashboard.activity.entries().next().unwrap().message,
        "Agent 'agent-24' spawned"
    );
    assert_eq!(dashboard.agents.len(), 25);
}

#[test]
fn events_reach_subscribers() {
    let mut dashboard = empty();
    let mut rx = dashboard.subscribe();

    let id = dashboard.spawn_agent("Scanner", "scan", None);
    dashboard.kill_agent(&id);
    dashboard.kill_agent(&id);

    match rx.try_recv().unwrap() {
        StoreEvent::AgentSpawned { agent_id, .. } => assert_eq!(agent_id, id),
        other => panic!("unexpected event {:?}", other),
    }
    assert!(matches!(
        rx.try_recv().unwrap(),
        StoreEvent::ActivityAppended {
            kind: ActivityKind::Agent,
            ..
        }
    ));
    assert!(matches!(
        rx.try_recv().unwrap(),
        StoreEvent::AgentKilled { .. }
    ));
    assert!(matches!(
        rx.try_recv().unwrap(),
        StoreEvent::ActivityAppended { .. }
    ));
    assert!(rx.try_recv().is_err());
}

#[test]
fn direct_activity_append_is_broadcast() {
    let mut dashboard = empty();
    let mut rx = dashboard.subscribe();

    let id = dashboard
        .activity
        .append(ActivityKind::System, "health check", None);

    assert_eq!(dashboard.activity.len(), 1);
    match rx.try_recv().unwrap() {
        StoreEvent::ActivityAppended { activity_id, .. } => assert_eq!(activity_id, id),
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn simulator_runs_until_handle_dropped() {
    let config = DashboardConfig {
        stats_interval_secs: 5,
        ..DashboardConfig::default()
    };
    let dashboard = Dashboard::seeded(config);
    let start = dashboard.stats().uptime;

    let handle = dashboard.start_simulator();
    tokio::time::sleep(Duration::from_millis(10_500)).await;

    let stats = dashboard.stats();
    assert_eq!(stats.uptime, start + 10_000);
    assert!((10.0..=90.0).contains(&stats.cpu_usage));
    assert!((20.0..=95.0).contains(&stats.memory_usage));

    drop(handle);
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(dashboard.stats().uptime, start + 10_000);
}
