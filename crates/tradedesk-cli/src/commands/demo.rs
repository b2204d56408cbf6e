//! Demo command - a scripted session against the seeded dashboard

use colored::*;

use tradedesk_state::{
    parse_config_json, ApprovalKind, Dashboard, NewApproval, Priority, StoreEvent,
};

use crate::commands::entities::list_activity;
use crate::commands::status::print_stats;
use crate::display;

/// Walk through one action per store and show the resulting feed
pub fn run_demo(dashboard: &mut Dashboard) -> anyhow::Result<()> {
    println!("{}", "TradeDesk walkthrough".bright_white().bold());
    let mut events = dashboard.subscribe();

    display::section("Step 1: Agents");
    let id = dashboard.spawn_agent(
        "Sector Rotation Scout",
        "Ranking sector ETFs by relative strength",
        Some("Looks for money flowing between sectors".to_string()),
    );
    display::success(&format!("Spawned agent {}", id));
    dashboard.start_agent(&id);
    dashboard.agents.update_progress(&id, 35.0);
    display::success("Started it and reported 35% progress");
    dashboard.stop_agent("agent_6");
    display::info("Stopped the failing Report Generator");

    display::section("Step 2: Tools");
    let config = parse_config_json(r#"{"provider": "polygon", "realtime": true, "rateLimit": 5}"#)?;
    let tool_id = dashboard.create_tool("Options Flow", "Unusual options activity feed", config);
    dashboard.toggle_tool(&tool_id);
    dashboard.tools.increment_usage(&tool_id);
    display::success("Created and enabled Options Flow");
    if let Err(e) = parse_config_json(r#"{"sources": ["a", "b"]}"#) {
        display::warning(&format!("Rejected config form: {}", e));
    }

    display::section("Step 3: Approvals");
    let request = NewApproval::new(
        ApprovalKind::Trade,
        "XLE Rotation Entry",
        "Energy leadership breakout - Entry $92.10, Stop $89.80",
        Priority::High,
        "Sector Rotation Scout",
    )
    .with_amount(8000.0);
    let approval_id = dashboard.create_approval(request);
    display::success(&format!("Queued {}", approval_id));
    dashboard.approve("appr_2");
    dashboard.reject("appr_4");
    display::info(&format!(
        "Approved the urgent TSLA pivot, rejected the data renewal; {} still pending",
        dashboard.approvals.pending_count()
    ));

    display::section("Step 4: Workflows");
    dashboard.run_workflow("wf_3");
    dashboard.toggle_workflow("wf_4");
    let wf_id = dashboard.create_workflow(
        "Rotation Digest",
        "Weekly sector rotation summary",
        "schedule: 0 17 * * 5",
        vec!["Rank sectors".to_string(), "Post to Slack".to_string()],
    );
    display::success(&format!("Created workflow {}", wf_id));
    dashboard.delete_workflow("wf_5");
    display::info("Removed the broken earnings check");

    let mut emitted = 0;
    while let Ok(event) = events.try_recv() {
        tracing::debug!(event = %event.summary(), "demo event");
        if !matches!(event, StoreEvent::StatsUpdated { .. }) {
            emitted += 1;
        }
    }
    display::labeled("Store events emitted", &emitted.to_string());

    print_stats(&dashboard.refresh_stats());
    list_activity(dashboard, 12);
    Ok(())
}
