//! Simulate command - watch the stats drift for a few ticks

use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::broadcast::error::RecvError;

use tradedesk_state::{Dashboard, EventBus, StatsSimulator, StoreEvent};

use crate::commands::status::print_stats;
use crate::display;

/// Run the stats simulator for `ticks` periods of `interval`
pub async fn run_simulation(
    dashboard: &Dashboard,
    ticks: u32,
    interval: Duration,
) -> anyhow::Result<()> {
    display::section("Stats Simulator");
    display::info(&format!(
        "{} ticks every {}",
        ticks,
        display::format_duration(interval.as_millis() as u64)
    ));
    println!();

    let bus = EventBus::new(64);
    let mut rx = bus.subscribe();
    let handle = StatsSimulator::new(dashboard.shared_stats())
        .with_period(interval)
        .with_events(bus)
        .spawn();

    let pb = ProgressBar::new(ticks as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );

    let target = ticks as u64;
    let mut seen = 0;
    while seen < target {
        let result = rx.recv().await;
        match &result {
            Ok(StoreEvent::StatsUpdated {
                cpu_usage,
                memory_usage,
                ..
            }) => {
                pb.set_message(format!("cpu {:>5.1}%  mem {:>5.1}%", cpu_usage, memory_usage));
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "simulation display fell behind");
            }
            _ => {}
        }

        let Some(count) = ticks_in(&result) else {
            break;
        };
        let count = count.min(target - seen);
        seen += count;
        pb.inc(count);
    }
    pb.finish_with_message("done".bright_green().to_string());
    handle.stop();

    print_stats(&dashboard.refresh_stats());
    Ok(())
}

/// Simulator ticks accounted for by one receive; `None` once the bus is closed.
/// The bus carries only stats updates, so every skipped message was a tick.
fn ticks_in(result: &Result<StoreEvent, RecvError>) -> Option<u64> {
    match result {
        Ok(StoreEvent::StatsUpdated { .. }) => Some(1),
        Ok(_) => Some(0),
        Err(RecvError::Lagged(skipped)) => Some(*skipped),
        Err(RecvError::Closed) => None,
    }
}
