//! TradeDesk CLI - Terminal view of the trading-automation dashboard
//!
//! Every invocation builds a fresh in-memory dashboard (seeded with the
//! reference mock data unless `TRADEDESK_SEED=false`) and renders one view.
//!
//! # Quick Start
//!
//! ```bash
//! tradedesk status
//! tradedesk agents --status running
//! tradedesk approvals --priority urgent
//! tradedesk simulate --ticks 10 --interval-ms 500
//! tradedesk demo
//! ```

use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tradedesk_state::{
    AgentStatus, ApprovalFilter, ApprovalKind, Dashboard, DashboardConfig, Priority, ToolStatus,
};

mod commands;
mod display;

use commands::{demo, entities, simulate, status};

/// TradeDesk CLI - agents, tools, approvals and workflows at a glance
#[derive(Parser)]
#[command(name = "tradedesk")]
#[command(author = "TradeDesk Contributors")]
#[command(version)]
#[command(about = "Admin dashboard for a trading-automation system", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Start from an empty dashboard instead of the mock data
    #[arg(long, global = true)]
    empty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show headline stats and system health
    Status {
        /// Print the stats record as JSON
        #[arg(long)]
        json: bool,
    },

    /// List agents
    Agents {
        #[arg(short, long, value_enum)]
        status: Option<AgentStatusArg>,
    },

    /// List tools
    Tools {
        #[arg(short, long, value_enum)]
        status: Option<ToolStatusArg>,
    },

    /// Show the approval queue
    Approvals {
        /// Show decided approvals instead of pending ones
        #[arg(long)]
        history: bool,

        #[arg(short, long, value_enum)]
        priority: Option<PriorityArg>,

        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
    },

    /// List workflows
    Workflows,

    /// Show the activity feed
    Activity {
        /// Number of entries to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Run the stats simulator for a few ticks
    Simulate {
        #[arg(short, long, default_value = "5")]
        ticks: u32,

        /// Tick period in milliseconds (defaults to the configured interval)
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Scripted walkthrough touching every store
    Demo,
}

#[derive(Clone, Copy, ValueEnum)]
enum AgentStatusArg {
    Running,
    Idle,
    Error,
    Completed,
}

impl From<AgentStatusArg> for AgentStatus {
    fn from(arg: AgentStatusArg) -> Self {
        match arg {
            AgentStatusArg::Running => AgentStatus::Running,
            AgentStatusArg::Idle => AgentStatus::Idle,
            AgentStatusArg::Error => AgentStatus::Error,
            AgentStatusArg::Completed => AgentStatus::Completed,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ToolStatusArg {
    Active,
    Inactive,
    Error,
}

impl From<ToolStatusArg> for ToolStatus {
    fn from(arg: ToolStatusArg) -> Self {
        match arg {
            ToolStatusArg::Active => ToolStatus::Active,
            ToolStatusArg::Inactive => ToolStatus::Inactive,
            ToolStatusArg::Error => ToolStatus::Error,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PriorityArg {
    Low,
    Medium,
    High,
    Urgent,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
            PriorityArg::Urgent => Priority::Urgent,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Trade,
    Expense,
    Action,
    Workflow,
}

impl From<KindArg> for ApprovalKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Trade => ApprovalKind::Trade,
            KindArg::Expense => ApprovalKind::Expense,
            KindArg::Action => ApprovalKind::Action,
            KindArg::Workflow => ApprovalKind::Workflow,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = DashboardConfig::from_env();
    if cli.empty {
        config.seed_mock_data = false;
    }
    tracing::debug!(?config, "dashboard config");
    let mut dashboard = Dashboard::from_config(config);

    print_banner();

    match cli.command {
        Commands::Status { json } => status::show_status(&dashboard, json)?,
        Commands::Agents { status } => {
            entities::list_agents(&dashboard, status.map(Into::into));
        }
        Commands::Tools { status } => {
            entities::list_tools(&dashboard, status.map(Into::into));
        }
        Commands::Approvals {
            history,
            priority,
            kind,
        } => {
            let filter = ApprovalFilter {
                priority: priority.map(Into::into),
                kind: kind.map(Into::into),
            };
            entities::list_approvals(&dashboard, history, filter);
        }
        Commands::Workflows => entities::list_workflows(&dashboard),
        Commands::Activity { limit } => entities::list_activity(&dashboard, limit),
        Commands::Simulate { ticks, interval_ms } => {
            let interval = interval_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| dashboard.config().stats_interval());
            simulate::run_simulation(&dashboard, ticks, interval).await?;
        }
        Commands::Demo => demo::run_demo(&mut dashboard)?,
    }

    println!();
    Ok(())
}

fn print_banner() {
    println!(
        "{} {}",
        "TradeDesk".bright_cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
}
