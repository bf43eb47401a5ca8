const MS_PER_SECOND: u64 = 1_000;

/// Format a duration in milliseconds as a compact uptime string.
///
/// Only the largest non-zero unit and the next smaller one are shown.
///
/// # Examples
///
/// ```
/// use logsbot_core::formatting::format_uptime;
///
/// assert_eq!(format_uptime(0), "0s");
/// assert_eq!(format_uptime(17_000), "17s");
/// assert_eq!(format_uptime(65_000), "1m 5s");
/// assert_eq!(format_uptime(3_661_000), "1h 1m");
/// assert_eq!(format_uptime(90_000_000), "1d 1h");
/// ```
pub fn format_uptime(milliseconds: u64) -> String {
    let seconds = milliseconds / MS_PER_SECOND;
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

/// Format a chrono duration with [`format_uptime`]; negative spans render as
/// zero.
pub fn format_uptime_delta(delta: chrono::TimeDelta) -> String {
    format_uptime(u64::try_from(delta.num_milliseconds()).unwrap_or(0))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
