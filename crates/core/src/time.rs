//! # Clock Time Helpers
//!
//! Times travel on the wire as zero-padded 24-hour `HH:MM` strings with no
//! timezone. Internally they are `NaiveTime` values, which order the same way
//! the fixed-width strings do.

use chrono::{Local, NaiveDateTime, NaiveTime, Timelike};

use crate::errors::ValidationError;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parses `HH:MM`, also accepting `HH:MM:SS` as some backends echo seconds.
pub fn parse_clock_time(raw: &str) -> Result<NaiveTime, ValidationError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| ValidationError::InvalidTime(raw.to_string()))
}

/// Parses a user-entered `HH:MM`. Seconds are refused because requests
/// carry minute precision only.
pub fn parse_draft_time(raw: &str) -> Result<NaiveTime, ValidationError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| ValidationError::InvalidTime(raw.to_string()))
}

/// Formats a time the way the API expects it.
pub fn clock_string(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Rounds `now` up to the next multiple of `granularity_minutes` past
/// midnight. Seconds are ignored, so 09:00:30 stays 09:00.
///
/// Returns `None` when rounding would cross midnight, i.e. nothing of the
/// current day is left.
pub fn round_up_to_slot(now: NaiveTime, granularity_minutes: u32) -> Option<NaiveTime> {
    let granularity = granularity_minutes.max(1);
    let minutes = now.hour() * 60 + now.minute();
    let rounded = minutes.div_ceil(granularity) * granularity;

    if rounded >= MINUTES_PER_DAY {
        return None;
    }

    NaiveTime::from_hms_opt(rounded / 60, rounded % 60, 0)
}

/// Source of the current local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant. Used by tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[rstest]
    #[case(t(9, 0), Some(t(9, 0)))]
    #[case(t(9, 1), Some(t(9, 15)))]
    #[case(t(9, 14), Some(t(9, 15)))]
    #[case(t(9, 46), Some(t(10, 0)))]
    #[case(t(23, 45), Some(t(23, 45)))]
    #[case(t(23, 46), None)]
    fn test_round_up_to_slot(#[case] now: NaiveTime, #[case] expected: Option<NaiveTime>) {
        assert_eq!(round_up_to_slot(now, 15), expected);
    }

    #[test]
    fn test_round_up_ignores_seconds() {
        let now = NaiveTime::from_hms_opt(9, 0, 30).unwrap();
        assert_eq!(round_up_to_slot(now, 15), Some(t(9, 0)));
    }

    #[rstest]
    #[case("09:00", t(9, 0))]
    #[case("17:30:00", t(17, 30))]
    #[case(" 08:45 ", t(8, 45))]
    fn test_parse_clock_time(#[case] raw: &str, #[case] expected: NaiveTime) {
        assert_eq!(parse_clock_time(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("9am")]
    #[case("25:00")]
    fn test_parse_clock_time_rejects(#[case] raw: &str) {
        assert!(matches!(
            parse_clock_time(raw),
            Err(ValidationError::InvalidTime(_))
        ));
    }

    #[rstest]
    #[case("09:00", Some(t(9, 0)))]
    #[case(" 17:30 ", Some(t(17, 30)))]
    #[case("09:00:10", None)]
    #[case("09:00:00", None)]
    fn test_parse_draft_time(#[case] raw: &str, #[case] expected: Option<NaiveTime>) {
        assert_eq!(parse_draft_time(raw).ok(), expected);
    }

    #[test]
    fn test_clock_string_is_zero_padded() {
        assert_eq!(clock_string(t(8, 5)), "08:05");
    }
}
