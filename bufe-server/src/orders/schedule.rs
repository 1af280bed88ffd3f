//! Pickup time resolution
//!
//! A pickup time is either an explicit timestamp or one of the school's
//! break slots. Either way it must be at least [`MIN_LEAD_MINUTES`] ahead.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use shared::util::parse_hhmm;

use super::error::OrderError;

pub const MIN_LEAD_MINUTES: i64 = 10;

/// Break slots offered as pickup times
pub const BREAK_SLOTS: [&str; 6] = ["09:10", "10:05", "11:05", "12:00", "13:05", "14:10"];

/// Earliest allowed pickup time for an order placed at `now`
pub fn earliest_pickup(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::minutes(MIN_LEAD_MINUTES)
}

/// Today's slot, or tomorrow's when today's is within the lead time
pub fn resolve_break_slot(slot: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, OrderError> {
    let slot = slot.trim();
    if !BREAK_SLOTS.contains(&slot) {
        return Err(OrderError::InvalidBreakSlot(slot.to_string()));
    }
    let time = parse_hhmm(slot).ok_or_else(|| OrderError::InvalidBreakSlot(slot.to_string()))?;

    let today = now.date_naive().and_time(time).and_utc();
    if today < earliest_pickup(now) {
        Ok(today + Duration::days(1))
    } else {
        Ok(today)
    }
}

/// RFC 3339, or `YYYY-MM-DDTHH:MM[:SS]` / `YYYY-MM-DD HH:MM[:SS]` taken as UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, OrderError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| OrderError::InvalidSchedule(value.to_string()))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolve the requested pickup time. A break slot wins over `idozitve`;
/// blank inputs mean no schedule.
pub fn resolve_schedule(
    idozitve: Option<&str>,
    szunet: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, OrderError> {
    let at = match (non_blank(szunet), non_blank(idozitve)) {
        (Some(slot), _) => resolve_break_slot(slot, now)?,
        (None, Some(ts)) => parse_timestamp(ts)?,
        (None, None) => return Ok(None),
    };

    if at < earliest_pickup(now) {
        return Err(OrderError::ScheduleTooSoon);
    }
    Ok(Some(at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn blank_inputs_are_dropped() {
        assert_eq!(non_blank(Some("  10:05 ")), Some("10:05"));
        assert_eq!(non_blank(Some(" \t")), None);
        assert_eq!(non_blank(None), None);
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, h, m, s).unwrap()
    }

    #[test]
    fn break_slot_today_when_far_enough() {
        let now = at(8, 0, 0);
        assert_eq!(resolve_break_slot("09:10", now).unwrap(), at(9, 10, 0));
    }

    #[test]
    fn break_slot_rolls_to_tomorrow() {
        let now = at(9, 5, 0);
        let resolved = resolve_break_slot("09:10", now).unwrap();
        assert_eq!(resolved, at(9, 10, 0) + Duration::days(1));
    }

    #[test]
    fn break_slot_exactly_at_lead_time_stays_today() {
        let now = at(9, 0, 0);
        assert_eq!(resolve_break_slot("09:10", now).unwrap(), at(9, 10, 0));
    }

    #[test]
    fn unknown_break_slot() {
        assert!(matches!(
            resolve_break_slot("09:15", at(8, 0, 0)),
            Err(OrderError::InvalidBreakSlot(_))
        ));
    }

    #[test]
    fn schedule_boundary() {
        let now = at(10, 0, 0);
        // exactly now + 10 min is accepted
        assert_eq!(
            resolve_schedule(Some("2024-03-04T10:10:00Z"), None, now).unwrap(),
            Some(at(10, 10, 0))
        );
        // one second short is rejected
        assert!(matches!(
            resolve_schedule(Some("2024-03-04T10:09:59Z"), None, now),
            Err(OrderError::ScheduleTooSoon)
        ));
        // past time is rejected
        assert!(matches!(
            resolve_schedule(Some("2024-03-04 09:00"), None, now),
            Err(OrderError::ScheduleTooSoon)
        ));
    }

    #[test]
    fn timestamp_formats() {
        let expected = at(12, 30, 0);
        for value in [
            "2024-03-04T12:30:00Z",
            "2024-03-04T13:30:00+01:00",
            "2024-03-04T12:30",
            "2024-03-04T12:30:00",
            "2024-03-04 12:30",
        ] {
            assert_eq!(parse_timestamp(value).unwrap(), expected, "{value}");
        }
        assert!(matches!(
            parse_timestamp("holnap délben"),
            Err(OrderError::InvalidSchedule(_))
        ));
    }

    #[test]
    fn break_slot_wins_and_blank_means_none() {
        let now = at(8, 0, 0);
        assert_eq!(
            resolve_schedule(Some("2024-03-04T12:30"), Some("10:05"), now).unwrap(),
            Some(at(10, 5, 0))
        );
        assert_eq!(resolve_schedule(Some("  "), Some(""), now).unwrap(), None);
        assert_eq!(resolve_schedule(None, None, now).unwrap(), None);
    }
}
