//! Listing commands - agents, tools, approvals, workflows and the activity feed

use chrono::Utc;
use colored::*;

use tradedesk_state::{
    ActivityKind, AgentStatus, ApprovalFilter, Dashboard, ToolStatus, Trigger,
};

use crate::display;

/// List agents, optionally narrowed to one status
pub fn list_agents(dashboard: &Dashboard, status: Option<AgentStatus>) {
    display::section("Agents");

    let counts = dashboard.agents.status_counts();
    let summary: Vec<String> = AgentStatus::ALL
        .iter()
        .map(|s| format!("{} {}", counts.get(s).copied().unwrap_or(0), s))
        .collect();
    display::info(&summary.join(" · "));
    println!();

    let agents = dashboard.agents.filter_by_status(status);
    if agents.is_empty() {
        display::warning("No agents match");
        return;
    }

    let now = Utc::now();
    for agent in agents {
        println!(
            "  {} {} [{}]",
            "●".bright_white(),
            agent.name.bright_white().bold(),
            display::status_badge(&agent.status.to_string())
        );
        display::kv("ID", &agent.id);
        display::kv("Task", &agent.task);
        display::kv(
            "Progress",
            &format!("{} {}%", display::gauge(agent.progress as f64), agent.progress),
        );
        let running_for = (now - agent.start_time).num_milliseconds().max(0) as u64;
        display::kv("Running for", &display::format_duration(running_for));
        display::kv("Last activity", &display::format_time_ago(agent.last_activity));
        if let Some(description) = &agent.description {
            display::kv("About", description);
        }
        println!();
    }
}

/// List tools, optionally narrowed to one status
pub fn list_tools(dashboard: &Dashboard, status: Option<ToolStatus>) {
    display::section("Tools");
    display::info(&format!(
        "{} of {} active",
        dashboard.tools.active_count(),
        dashboard.tools.len()
    ));
    println!();

    let tools = dashboard.tools.filter_by_status(status);
    if tools.is_empty() {
        display::warning("No tools match");
        return;
    }

    for tool in tools {
        println!(
            "  {} {} [{}]",
            "◆".bright_white(),
            tool.name.bright_white().bold(),
            display::status_badge(&tool.status.to_string())
        );
        display::kv("ID", &tool.id);
        display::kv("Description", &tool.description);
        display::kv("Usage", &tool.usage_count.to_string());
        let last_used = tool
            .last_used
            .map(display::format_time_ago)
            .unwrap_or_else(|| "never".to_string());
        display::kv("Last used", &last_used);
        if !tool.config.is_empty() {
            let config: Vec<String> = tool
                .config
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            display::kv("Config", &config.join(", "));
        }
        println!();
    }
}

/// Show the pending queue, or the decided history
pub fn list_approvals(dashboard: &Dashboard, history: bool, filter: ApprovalFilter) {
    let (title, approvals) = if history {
        ("Approval History", dashboard.approvals.history_sorted(&filter))
    } else {
        ("Approval Queue", dashboard.approvals.pending_sorted(&filter))
    };
    display::section(title);

    if !history {
        display::info(&format!(
            "{} pending, {} urgent",
            dashboard.approvals.pending_count(),
            dashboard.approvals.urgent_count()
        ));
        println!();
    }

    if approvals.is_empty() {
        display::warning("Nothing to show");
        return;
    }

    for approval in approvals {
        println!(
            "  {} {} [{} · {}]",
            approval.kind.label().bright_white(),
            approval.title.bright_white().bold(),
            display::priority_badge(&approval.priority.to_string()),
            display::status_badge(&approval.status.to_string())
        );
        display::kv("ID", &approval.id);
        display::kv("Details", &approval.description);
        if let Some(amount) = approval.amount {
            display::kv("Amount", &format!("${:.2}", amount));
        }
        display::kv(
            "Requested",
            &format!(
                "by {} {}",
                approval.requested_by,
                display::format_time_ago(approval.requested_at)
            ),
        );
        if let Some(data) = &approval.data {
            let fields: Vec<String> = data.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            display::kv("Data", &fields.join(", "));
        }
        println!();
    }
}

/// List workflows with their trigger and action chain
pub fn list_workflows(dashboard: &Dashboard) {
    display::section("Workflows");
    display::info(&format!(
        "{} of {} active",
        dashboard.workflows.active_count(),
        dashboard.workflows.len()
    ));
    println!();

    for wf in dashboard.workflows.workflows() {
        println!(
            "  {} {} [{}]",
            "⚙".bright_white(),
            wf.name.bright_white().bold(),
            display::status_badge(&wf.status.to_string())
        );
        display::kv("ID", &wf.id);
        display::kv("Description", &wf.description);
        display::kv("Trigger", &describe_trigger(&wf.trigger_kind()));
        display::kv("Actions", &wf.actions.join(" → "));
        let last_run = wf
            .last_run
            .map(display::format_time_ago)
            .unwrap_or_else(|| "never".to_string());
        display::kv("Runs", &format!("{} (last {})", wf.run_count, last_run));
        println!();
    }
}

fn describe_trigger(trigger: &Trigger) -> String {
    match trigger {
        Trigger::Schedule(cron) => format!("cron `{}`", cron),
        Trigger::Event(name) => format!("on {}", name),
        Trigger::Interval(secs) => {
            format!("every {}", display::format_duration(secs.saturating_mul(1000)))
        }
        Trigger::Manual => "manual".to_string(),
        Trigger::Other(raw) => raw.clone(),
    }
}

/// Show the newest `limit` activity entries
pub fn list_activity(dashboard: &Dashboard, limit: usize) {
    display::section("Recent Activity");

    let entries = dashboard.activity.recent(limit);
    if entries.is_empty() {
        display::warning("No activity yet");
        return;
    }

    for entry in entries {
        println!(
            "  {} {:<8} {} {}",
            kind_glyph(entry.kind),
            entry.kind.to_string().bright_black(),
            entry.message,
            format!("({})", display::format_time_ago(entry.timestamp)).bright_black()
        );
    }
}

fn kind_glyph(kind: ActivityKind) -> ColoredString {
    match kind {
        ActivityKind::Agent => "●".bright_green(),
        ActivityKind::Tool => "◆".bright_blue(),
        ActivityKind::Approval => "✓".yellow(),
        ActivityKind::Workflow => "⚙".bright_magenta(),
        ActivityKind::System => "ℹ".bright_cyan(),
    }
}
