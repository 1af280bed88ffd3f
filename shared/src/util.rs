use chrono::{DateTime, NaiveTime, Utc};

/// Wire format of every timestamp in API responses
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Render a millisecond timestamp as `YYYY-MM-DD HH:MM:SS` (UTC)
pub fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format(DATETIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// Parse `HH:MM` (seconds are not accepted)
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// Render a time of day as `HH:MM`
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_millis() {
        // 2024-03-04 09:10:00 UTC
        assert_eq!(format_millis(1_709_543_400_000), "2024-03-04 09:10:00");
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("07:30"), NaiveTime::from_hms_opt(7, 30, 0));
        assert_eq!(parse_hhmm(" 14:10 "), NaiveTime::from_hms_opt(14, 10, 0));
        assert!(parse_hhmm("7.30").is_none());
        assert!(parse_hhmm("25:00").is_none());
        assert!(parse_hhmm("").is_none());
    }

    #[test]
    fn test_format_hhmm() {
        let t = NaiveTime::from_hms_opt(9, 5, 0).unwrap();
        assert_eq!(format_hhmm(t), "09:05");
    }
}
