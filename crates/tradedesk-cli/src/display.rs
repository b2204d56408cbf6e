//! Display utilities for the CLI

use chrono::{DateTime, Utc};
use colored::*;

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", "━".repeat(60).bright_black());
    println!(" {}", title.bright_white().bold());
    println!("{}", "━".repeat(60).bright_black());
}

/// Print a success message
pub fn success(message: &str) {
    println!("  {} {}", "✓".bright_green(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("  {} {}", "→".bright_blue(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("  {} {}", "⚠".yellow(), message.yellow());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("      {}: {}", key, value.bright_cyan());
}

/// Print a labeled value
pub fn labeled(label: &str, value: &str) {
    println!("  {}: {}", label.bright_white(), value.bright_cyan());
}

/// Color a status word the way the dashboard badges do
pub fn status_badge(status: &str) -> ColoredString {
    match status {
        "running" | "active" | "approved" | "healthy" => status.bright_green(),
        "error" | "rejected" | "critical" => status.bright_red(),
        "paused" | "pending" | "warning" => status.yellow(),
        "completed" => status.bright_blue(),
        _ => status.bright_black(),
    }
}

/// Color a priority word
pub fn priority_badge(priority: &str) -> ColoredString {
    match priority {
        "urgent" => priority.bright_red().bold(),
        "high" => priority.truecolor(255, 165, 0),
        "low" => priority.bright_blue(),
        _ => priority.normal(),
    }
}

/// Ten-cell text gauge for a 0..=100 value
pub fn gauge(percent: f64) -> String {
    let filled = (percent.clamp(0.0, 100.0) / 10.0).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

/// Relative age of a timestamp, e.g. `5 minutes ago`
pub fn format_time_ago(then: DateTime<Utc>) -> String {
    time_ago_between(then, Utc::now())
}

fn time_ago_between(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();

    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 120 {
        "1 minute ago".to_string()
    } else if seconds < 3600 {
        format!("{} minutes ago", seconds / 60)
    } else if seconds < 7200 {
        "1 hour ago".to_string()
    } else if seconds < 86_400 {
        format!("{} hours ago", seconds / 3600)
    } else if seconds < 172_800 {
        "1 day ago".to_string()
    } else {
        format!("{} days ago", seconds / 86_400)
    }
}

/// Compact duration using the two largest units, e.g. `2h 15m`
pub fn format_duration(ms: u64) -> String {
    let seconds = ms / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d {}h", days, hours % 24)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}

/// Uptime in days and hours; hours only below a day
pub fn format_uptime(ms: u64) -> String {
    const DAY: u64 = 24 * 60 * 60 * 1000;
    const HOUR: u64 = 60 * 60 * 1000;

    let days = ms / DAY;
    let hours = (ms % DAY) / HOUR;
    if days > 0 {
        format!("{}d {}h", days, hours)
    } else {
        format!("{}h", hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ago(seconds: i64) -> String {
        let now = Utc::now();
        time_ago_between(now - Duration::seconds(seconds), now)
    }

    #[test]
    fn test_time_ago_buckets() {
        assert_eq!(ago(0), "just now");
        assert_eq!(ago(59), "just now");
        assert_eq!(ago(60), "1 minute ago");
        assert_eq!(ago(119), "1 minute ago");
        assert_eq!(ago(120), "2 minutes ago");
        assert_eq!(ago(3599), "59 minutes ago");
        assert_eq!(ago(3600), "1 hour ago");
        assert_eq!(ago(7200), "2 hours ago");
        assert_eq!(ago(86_399), "23 hours ago");
        assert_eq!(ago(86_400), "1 day ago");
        assert_eq!(ago(172_800), "2 days ago");
    }

    #[test]
    fn test_future_timestamp_is_just_now() {
        assert_eq!(ago(-30), "just now");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59_999), "59s");
        assert_eq!(format_duration(61_000), "1m 1s");
        assert_eq!(format_duration(2 * 3_600_000 + 15 * 60_000), "2h 15m");
        assert_eq!(format_duration(3 * 86_400_000 + 5 * 3_600_000), "3d 5h");
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(5 * 86_400_000), "5d 0h");
        assert_eq!(format_uptime(5 * 86_400_000 + 7 * 3_600_000 + 59_000), "5d 7h");
        assert_eq!(format_uptime(90 * 60_000), "1h");
        assert_eq!(format_uptime(0), "0h");
    }

    #[test]
    fn test_gauge_clamps() {
        assert_eq!(gauge(0.0), "░".repeat(10));
        assert_eq!(gauge(150.0), "█".repeat(10));
        assert_eq!(gauge(44.0).chars().filter(|c| *c == '█').count(), 4);
    }
}
