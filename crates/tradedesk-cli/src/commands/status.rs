//! Status command - headline stats and health gauges

use colored::*;

use tradedesk_state::{Dashboard, SystemStats};

use crate::display;

/// Show the headline numbers, recomputed from the stores
pub fn show_status(dashboard: &Dashboard, json: bool) -> anyhow::Result<()> {
    let stats = dashboard.refresh_stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    print_stats(&stats);

    let urgent = dashboard.approvals.urgent_count();
    if urgent > 0 {
        println!();
        display::warning(&format!("{} urgent approval(s) waiting", urgent));
    }
    Ok(())
}

pub fn print_stats(stats: &SystemStats) {
    display::section("System Status");
    display::labeled("Active agents", &stats.active_agents.to_string());
    display::labeled("Pending approvals", &stats.pending_approvals.to_string());
    display::labeled("Active workflows", &stats.active_workflows.to_string());
    display::labeled("Tools active", &stats.tools_active.to_string());

    display::section("System Health");
    println!(
        "  {}: {}",
        "Status".bright_white(),
        display::status_badge(&stats.system_health.to_string().to_lowercase())
    );
    print_gauge("CPU", stats.cpu_usage);
    print_gauge("Memory", stats.memory_usage);
    display::labeled("Uptime", &display::format_uptime(stats.uptime));
}

fn print_gauge(label: &str, percent: f64) {
    println!(
        "  {:<8} {} {:>5.1}%",
        label.bright_white(),
        display::gauge(percent).bright_cyan(),
        percent
    );
}
