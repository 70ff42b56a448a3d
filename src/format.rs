//! Human-readable rendering of byte counts, durations and disk usage.

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
const STEP: f64 = 1024.0;

/// Formats a byte count with base-1024 units, two decimals at most and no
/// trailing zeros: `1536` is `"1.5 KB"`, `10240` is `"10 KB"`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= STEP && unit < UNITS.len() - 1 {
        value /= STEP;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

/// Formats elapsed milliseconds as `"1 h 1 m 1 s"`.
///
/// Leading zero units are dropped, minutes are kept whenever hours are shown,
/// and a zero duration reads `"0 s"`. Negative input yields `"N/A"`.
pub fn format_duration(millis: i64) -> String {
    if millis < 0 {
        return "N/A".to_string();
    }

    let total_seconds = millis / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{hours} h"));
    }
    if minutes > 0 || hours > 0 {
        parts.push(format!("{minutes} m"));
    }
    if seconds > 0 || total_seconds == 0 {
        parts.push(format!("{seconds} s"));
    }
    parts.join(" ")
}

/// Renders `"<percent>% (<used bytes>)"` for a disk with `total` bytes of which
/// `free` are free. An empty disk has no meaningful ratio and renders `"N/A (0 B)"`.
pub fn used_space_percentage(total: u64, free: u64) -> String {
    // free > total only happens on a misreporting backend; clamp rather than wrap.
    let used = total.saturating_sub(free);
    if total == 0 {
        return format!("N/A ({})", format_bytes(used));
    }
    let percentage = (used as f64 / total as f64 * 100.0).round() as u64;
    format!("{}% ({})", percentage, format_bytes(used))
}
