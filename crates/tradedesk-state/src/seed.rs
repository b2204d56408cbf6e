//! Reference mock data for a freshly seeded dashboard

use chrono::{DateTime, Duration, Utc};

use crate::activity::{ActivityEntry, ActivityKind};
use crate::agents::{Agent, AgentStatus};
use crate::approvals::{Approval, ApprovalKind, ApprovalStatus, NewApproval, Priority};
use crate::config_value::{config_map, ConfigMap, ConfigValue};
use crate::stats::{SystemHealth, SystemStats};
use crate::tools::{Tool, ToolStatus};
use crate::workflows::{Workflow, WorkflowStatus};

fn ago(now: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    now - Duration::minutes(minutes)
}

fn agent(id: &str, name: &str, task: &str, description: &str) -> Agent {
    Agent {
        id: id.to_string(),
        ..Agent::new(name, task).with_description(description)
    }
}

fn tool(id: &str, name: &str, description: &str, icon: &str, config: ConfigMap) -> Tool {
    Tool {
        id: id.to_string(),
        ..Tool::new(name, description, config).with_icon(icon)
    }
}

fn workflow(id: &str, name: &str, description: &str, trigger: &str, actions: &[&str]) -> Workflow {
    let actions = actions.iter().map(|a| a.to_string()).collect();
    Workflow {
        id: id.to_string(),
        ..Workflow::new(name, description, trigger, actions)
    }
}

/// Agents, newest first
pub fn agents() -> Vec<Agent> {
    let now = Utc::now();

    vec![
        Agent {
            status: AgentStatus::Running,
            progress: 78,
            start_time: ago(now, 45),
            last_activity: ago(now, 2),
            ..agent(
                "agent_1",
                "Scanner Agent",
                "Market scanning for breakout setups",
                "Scans market for momentum stocks and breakout patterns",
            )
        },
        Agent {
            status: AgentStatus::Idle,
            progress: 0,
            start_time: ago(now, 120),
            last_activity: ago(now, 15),
            ..agent(
                "agent_2",
                "Trade Proposer",
                "Building trade proposals",
                "Analyzes setups and builds detailed trade proposals",
            )
        },
        Agent {
            status: AgentStatus::Running,
            progress: 45,
            start_time: ago(now, 30),
            last_activity: now,
            ..agent(
                "agent_3",
                "Review Agent",
                "Reviewing trade proposals",
                "Validates trade proposals against risk criteria",
            )
        },
        Agent {
            status: AgentStatus::Running,
            progress: 92,
            start_time: ago(now, 240),
            last_activity: ago(now, 1),
            ..agent(
                "agent_4",
                "Risk Monitor",
                "Portfolio risk monitoring",
                "Monitors portfolio heat and risk exposure",
            )
        },
        Agent {
            status: AgentStatus::Completed,
            progress: 100,
            start_time: ago(now, 360),
            last_activity: ago(now, 300),
            ..agent(
                "agent_5",
                "Data Sync",
                "Syncing market data",
                "Synchronizes market data and price feeds",
            )
        },
        Agent {
            status: AgentStatus::Error,
            progress: 34,
            start_time: ago(now, 20),
            last_activity: ago(now, 5),
            ..agent(
                "agent_6",
                "Report Generator",
                "Generating daily report",
                "Generates daily and weekly trading reports",
            )
        },
    ]
}

/// Tools, oldest first
pub fn tools() -> Vec<Tool> {
    let now = Utc::now();

    vec![
        Tool {
            status: ToolStatus::Active,
            usage_count: 1247,
            last_used: Some(ago(now, 5)),
            ..tool(
                "tool_1",
                "Alpaca API",
                "Brokerage integration for trade execution",
                "TrendingUp",
                config_map([("endpoint", "paper-api.alpaca.markets"), ("mode", "paper")]),
            )
        },
        Tool {
            status: ToolStatus::Active,
            usage_count: 3892,
            last_used: Some(ago(now, 2)),
            ..tool(
                "tool_2",
                "Yahoo Finance",
                "Market data and historical prices",
                "BarChart3",
                config_map([
                    ("cacheEnabled", ConfigValue::from(true)),
                    ("cacheDuration", ConfigValue::from(300i64)),
                ]),
            )
        },
        Tool {
            status: ToolStatus::Active,
            usage_count: 567,
            last_used: Some(ago(now, 10)),
            ..tool(
                "tool_3",
                "Slack Integration",
                "Notifications and approval requests",
                "MessageSquare",
                config_map([("channel", "#trading-alerts"), ("webhook", "configured")]),
            )
        },
        Tool {
            status: ToolStatus::Inactive,
            usage_count: 89,
            last_used: Some(ago(now, 24 * 60)),
            ..tool(
                "tool_4",
                "Earnings Calendar",
                "Upcoming earnings dates and alerts",
                "Calendar",
                config_map([
                    ("source", ConfigValue::from("earningswhispers")),
                    ("autoCheck", ConfigValue::from(false)),
                ]),
            )
        },
        Tool {
            status: ToolStatus::Active,
            usage_count: 234,
            last_used: Some(ago(now, 120)),
            ..tool(
                "tool_5",
                "Web Search",
                "Brave Search API for research",
                "Search",
                config_map([
                    ("apiKey", ConfigValue::from("***")),
                    ("rateLimit", ConfigValue::from(100i64)),
                ]),
            )
        },
        Tool {
            status: ToolStatus::Error,
            usage_count: 445,
            last_used: Some(ago(now, 480)),
            ..tool(
                "tool_6",
                "News Feed",
                "Real-time market news aggregator",
                "Newspaper",
                config_map([("sources", "bloomberg,reuters"), ("filter", "finance")]),
            )
        },
    ]
}

/// Approvals, newest first
pub fn approvals() -> Vec<Approval> {
    let now = Utc::now();
    let build = |id: &str, request: NewApproval, status, requested_min_ago| Approval {
        id: id.to_string(),
        status,
        ..request.into_approval(ago(now, requested_min_ago))
    };

    vec![
        build(
            "appr_1",
            NewApproval::new(
                ApprovalKind::Trade,
                "NVDA Long Breakout",
                "Setup 1 Breakout - Entry $142.50, Stop $140.20, Size 15%",
                Priority::High,
                "Trade Proposer",
            )
            .with_amount(15000.0)
            .with_data(config_map([
                ("ticker", "NVDA"),
                ("setup", "breakout"),
                ("riskReward", "3.2:1"),
            ])),
            ApprovalStatus::Pending,
            15,
        ),
        build(
            "appr_2",
            NewApproval::new(
                ApprovalKind::Trade,
                "TSLA Episodic Pivot",
                "EP on earnings beat - Entry $245.00, Stop $238.50",
                Priority::Urgent,
                "Trade Proposer",
            )
            .with_amount(12000.0)
            .with_data(config_map([("ticker", "TSLA"), ("setup", "ep"), ("gap", "12%")])),
            ApprovalStatus::Pending,
            5,
        ),
        build(
            "appr_3",
            NewApproval::new(
                ApprovalKind::Action,
                "Switch to Live Trading",
                "Request to switch from paper to live trading mode",
                Priority::Medium,
                "System",
            )
            .with_data(config_map([("current", "paper"), ("requested", "live")])),
            ApprovalStatus::Pending,
            120,
        ),
        build(
            "appr_4",
            NewApproval::new(
                ApprovalKind::Expense,
                "Data Subscription",
                "Polygon.io API subscription renewal",
                Priority::Low,
                "Admin",
            )
            .with_amount(199.0)
            .with_data(config_map([("service", "polygon.io"), ("period", "monthly")])),
            ApprovalStatus::Pending,
            24 * 60,
        ),
        build(
            "appr_5",
            NewApproval::new(
                ApprovalKind::Workflow,
                "Auto-Scan Workflow",
                "Enable automated market scanning every 30 minutes",
                Priority::Medium,
                "Scanner Agent",
            )
            .with_data(config_map([
                ("interval", ConfigValue::from(30i64)),
                ("enabled", ConfigValue::from(true)),
            ])),
            ApprovalStatus::Approved,
            48 * 60,
        ),
    ]
}

/// Workflows, oldest first
pub fn workflows() -> Vec<Workflow> {
    let now = Utc::now();

    vec![
        Workflow {
            status: WorkflowStatus::Active,
            run_count: 127,
            last_run: Some(ago(now, 15 * 60)),
            created_at: now - Duration::days(30),
            ..workflow(
                "wf_1",
                "Morning Market Scan",
                "Daily 8:00 AM market regime and leadership scan",
                "schedule: 0 8 * * 1-5",
                &[
                    "Fetch SPY/QQQ data",
                    "Calculate MAs",
                    "Run leadership scans",
                    "Send briefing",
                ],
            )
        },
        Workflow {
            status: WorkflowStatus::Active,
            run_count: 45,
            last_run: Some(ago(now, 7 * 60)),
            created_at: now - Duration::days(14),
            ..workflow(
                "wf_2",
                "EP Opportunity Alert",
                "Detect and alert on earnings gap opportunities",
                "event: market_open",
                &[
                    "Scan pre-market gaps",
                    "Check volume",
                    "Validate setup",
                    "Send alert",
                ],
            )
        },
        Workflow {
            status: WorkflowStatus::Active,
            run_count: 892,
            last_run: Some(ago(now, 45)),
            created_at: now - Duration::days(60),
            ..workflow(
                "wf_3",
                "Portfolio Risk Check",
                "Hourly portfolio heat monitoring",
                "interval: 3600",
                &["Calculate heat", "Check exposure", "Alert if >10%"],
            )
        },
        Workflow {
            status: WorkflowStatus::Paused,
            run_count: 89,
            last_run: Some(ago(now, 2 * 24 * 60)),
            created_at: now - Duration::days(45),
            ..workflow(
                "wf_4",
                "Daily Summary Report",
                "Generate and send EOD trading summary",
                "schedule: 0 16 * * 1-5",
                &[
                    "Compile P&L",
                    "Update positions",
                    "Generate report",
                    "Send to Slack",
                ],
            )
        },
        Workflow {
            status: WorkflowStatus::Error,
            run_count: 34,
            last_run: Some(ago(now, 20 * 60)),
            created_at: now - Duration::days(20),
            ..workflow(
                "wf_5",
                "Earnings Conflict Check",
                "Check for earnings on open positions",
                "schedule: 0 6 * * 1-5",
                &["Get positions", "Check earnings calendar", "Flag conflicts"],
            )
        },
    ]
}

/// Activity entries, newest first
pub fn activities() -> Vec<ActivityEntry> {
    let now = Utc::now();
    let mut entries: Vec<ActivityEntry> = [
        (ActivityKind::Agent, "Scanner Agent completed market scan", 5),
        (ActivityKind::Approval, "Trade proposal submitted for NVDA", 15),
        (ActivityKind::Workflow, "Morning Market Scan triggered", 15 * 60),
        (ActivityKind::Tool, "Alpaca API executed 2 orders", 30),
        (ActivityKind::System, "System health check passed", 60),
        (ActivityKind::Agent, "Review Agent approved TSLA trade", 120),
        (ActivityKind::Workflow, "Portfolio Risk Check completed", 45),
        (ActivityKind::Tool, "Yahoo Finance data sync completed", 2),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (kind, message, minutes))| {
        let mut entry = ActivityEntry::new(kind, message).at(ago(now, minutes));
        entry.id = format!("act_{}", i + 1);
        entry
    })
    .collect();

    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries
}

/// Starting stats: five days of uptime, moderate load
pub fn system_stats() -> SystemStats {
    SystemStats {
        active_agents: 4,
        pending_approvals: 4,
        active_workflows: 3,
        tools_active: 4,
        system_health: SystemHealth::Healthy,
        cpu_usage: 34.0,
        memory_usage: 62.0,
        uptime: 5 * 24 * 60 * 60 * 1000,
    }
}
