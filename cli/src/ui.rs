//! Shared UI utilities for consistent terminal output.

use colored::Colorize;

/// Standard symbols used throughout the CLI.
pub mod symbols {
    pub const ARROW: &str = "→";
    pub const SUCCESS: &str = "✓";
    pub const FAILURE: &str = "✗";
    pub const WARNING: &str = "!";
    pub const BULLET: &str = "•";
    pub const MINUS: &str = "-";
}

/// Print a step header with the action arrow.
pub fn print_step(message: &str) {
    println!("{} {}", symbols::ARROW.blue().bold(), message);
}

pub fn print_success(message: &str) {
    println!("{} {}", symbols::SUCCESS.green().bold(), message);
}

pub fn print_error(message: &str) {
    println!("{} {}", symbols::FAILURE.red().bold(), message);
}

pub fn print_warning(message: &str) {
    println!("{} {}", symbols::WARNING.yellow().bold(), message);
}

/// Print a dimmed info line (indented).
pub fn print_info(message: &str) {
    println!("  {}", message.dimmed());
}

/// Print an indented bullet item.
pub fn print_item(message: &str) {
    println!("  {} {}", symbols::BULLET.dimmed(), message);
}

pub fn print_removed(message: &str) {
    println!("  {} {}", symbols::MINUS.red(), message);
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(50).dimmed());
}

/// Print a key/value line inside a section.
pub fn print_field(key: &str, value: &str) {
    println!("  {:<18} {}", format!("{}:", key), value);
}

/// Format a relative time string from a timestamp.
pub fn format_relative_time(timestamp: chrono::DateTime<chrono::Utc>) -> String {
    let duration = chrono::Utc::now().signed_duration_since(timestamp);

    let seconds = duration.num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }

    let minutes = duration.num_minutes();
    if minutes < 60 {
        return format!("{} minute{} ago", minutes, plural(minutes));
    }

    let hours = duration.num_hours();
    if hours < 24 {
        return format!("{} hour{} ago", hours, plural(hours));
    }

    let days = duration.num_days();
    if days < 30 {
        return format!("{} day{} ago", days, plural(days));
    }

    timestamp.format("%Y-%m-%d").to_string()
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_format_relative_time() {
        let now = Utc::now();
        assert_eq!(format_relative_time(now), "just now");
        assert_eq!(format_relative_time(now - Duration::minutes(1)), "1 minute ago");
        assert_eq!(format_relative_time(now - Duration::hours(3)), "3 hours ago");
        assert_eq!(format_relative_time(now - Duration::days(2)), "2 days ago");

        let old = now - Duration::days(90);
        assert_eq!(format_relative_time(old), old.format("%Y-%m-%d").to_string());
    }
}
