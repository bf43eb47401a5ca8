use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// Layout of every timestamp printed in a notification (`DD/MM/YYYY HH:mm:ss`).
pub const LOG_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails or yields a name chrono-tz does
/// not know.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone()
        .ok()
        .filter(|name| TimezoneHandler::validate_timezone(name))
        .unwrap_or_else(|| "UTC".to_string())
}

/// Resolve the `"auto"` sentinel to the system timezone; other names pass
/// through unchanged.
pub fn resolve_timezone(name: &str) -> String {
    if name.eq_ignore_ascii_case("auto") {
        get_system_timezone()
    } else {
        name.to_string()
    }
}

// ── TimezoneHandler ───────────────────────────────────────────────────────────

/// Renders instants in the operator's timezone.
#[derive(Debug, Clone, Copy)]
pub struct TimezoneHandler {
    tz: Tz,
}

impl TimezoneHandler {
    /// Create a handler for the given IANA timezone name.
    ///
    /// If `tz_name` is not a recognised IANA timezone, falls back to UTC
    /// and logs a warning.
    pub fn new(tz_name: &str) -> Self {
        let tz = tz_name.parse::<Tz>().unwrap_or_else(|_| {
            warn!(timezone = tz_name, "unknown timezone; printing times in UTC");
            Tz::UTC
        });
        Self { tz }
    }

    /// Whether `tz_name` names an IANA timezone.
    pub fn validate_timezone(tz_name: &str) -> bool {
        tz_name.parse::<Tz>().is_ok()
    }

    /// Format `dt` as `DD/MM/YYYY HH:mm:ss` in the configured timezone.
    pub fn format_log_time(&self, dt: DateTime<Utc>) -> String {
        dt.with_timezone(&self.tz).format(LOG_TIME_FORMAT).to_string()
    }

    /// The configured timezone.
    pub fn tz(&self) -> Tz {
        self.tz
    }
}

impl Default for TimezoneHandler {
    fn default() -> Self {
        Self { tz: Tz::UTC }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    #[test]
    fn test_validate_timezone() {
        assert!(TimezoneHandler::validate_timezone("Asia/Dhaka"));
        assert!(TimezoneHandler::validate_timezone("UTC"));
        assert!(!TimezoneHandler::validate_timezone("Mars/Olympus"));
        assert!(!TimezoneHandler::validate_timezone(""));
    }

    #[test]
    fn test_new_invalid_timezone_falls_back_to_utc() {
        let handler = TimezoneHandler::new("Invalid/Timezone");
        assert_eq!(handler.tz(), Tz::UTC);
    }

    #[test]
    fn test_format_log_time_utc() {
        let handler = TimezoneHandler::new("UTC");
        let dt = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(handler.format_log_time(dt), "07/03/2024 09:05:02");
    }

    #[test]
    fn test_format_log_time_converts_timezone() {
        let handler = TimezoneHandler::new("Asia/Dhaka");
        let dt = Utc.with_ymd_and_hms(2024, 12, 31, 20, 0, 0).unwrap();
        // UTC+6 crosses midnight into the new year.
        assert_eq!(handler.format_log_time(dt), "01/01/2025 02:00:00");
    }

    #[test]
    fn test_resolve_timezone_passthrough() {
        assert_eq!(resolve_timezone("Europe/Paris"), "Europe/Paris");
    }

    #[test]
    fn test_resolve_timezone_auto_is_not_sentinel() {
        assert_ne!(resolve_timezone("auto"), "auto");
        assert_ne!(resolve_timezone("AUTO"), "AUTO");
    }
}
