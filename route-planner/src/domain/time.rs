//! Clock-of-day time handling for timetable legs.
//!
//! Timetables give times as "HH:MM" strings with no date attached. A leg
//! whose arrival is numerically before its departure finishes on the next
//! day, so every difference between two clock times wraps around midnight.

use chrono::{Duration, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;

/// Minutes in one day, the modulus for all clock arithmetic.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day with minute precision and no date component.
///
/// # Examples
///
/// ```
/// use route_planner::domain::ClockTime;
///
/// let t = ClockTime::parse_hhmm("14:30").unwrap();
/// assert_eq!(t.to_string(), "14:30");
/// assert_eq!(t.minute_of_day(), 870);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Midnight, the earliest clock time.
    pub fn midnight() -> Self {
        Self(NaiveTime::default())
    }

    /// Create a clock time from hour and minute, or `None` if out of range.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Create a clock time from minutes after midnight, wrapping past 24h.
    pub fn from_minute_of_day(minutes: i64) -> Self {
        let m = minutes.rem_euclid(MINUTES_PER_DAY) as u32;
        // Safe: rem_euclid keeps the value inside one day
        Self(NaiveTime::from_hms_opt(m / 60, m % 60, 0).unwrap())
    }

    /// Parse a time in strict "HH:MM" format.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_planner::domain::ClockTime;
    ///
    /// assert!(ClockTime::parse_hhmm("00:00").is_ok());
    /// assert!(ClockTime::parse_hhmm("23:59").is_ok());
    ///
    /// assert!(ClockTime::parse_hhmm("1430").is_err());
    /// assert!(ClockTime::parse_hhmm("14:3").is_err());
    /// assert!(ClockTime::parse_hhmm("24:00").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        if s.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }

        let bytes = s.as_bytes();
        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        Self::from_hm(hour, minute).ok_or_else(|| TimeError::new("invalid time"))
    }

    /// Returns the underlying chrono time.
    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Minutes elapsed since midnight.
    pub fn minute_of_day(&self) -> i64 {
        self.hour() as i64 * 60 + self.minute() as i64
    }

    /// Minutes from `self` forward to `later`, wrapping past midnight.
    pub fn minutes_until(&self, later: ClockTime) -> i64 {
        minutes_between(*self, later)
    }
}

/// Wraparound minutes from `from` to `to`, always in `0..MINUTES_PER_DAY`.
///
/// # Examples
///
/// ```
/// use route_planner::domain::{ClockTime, minutes_between};
///
/// let t = |s| ClockTime::parse_hhmm(s).unwrap();
/// assert_eq!(minutes_between(t("08:00"), t("10:00")), 120);
/// assert_eq!(minutes_between(t("23:30"), t("00:30")), 60);
/// assert_eq!(minutes_between(t("10:00"), t("10:00")), 0);
/// ```
pub fn minutes_between(from: ClockTime, to: ClockTime) -> i64 {
    let diff = to.minute_of_day() - from.minute_of_day();
    if diff < 0 { diff + MINUTES_PER_DAY } else { diff }
}

/// [`minutes_between`] as a chrono duration.
pub fn duration_between(from: ClockTime, to: ClockTime) -> Duration {
    Duration::minutes(minutes_between(from, to))
}

impl FromStr for ClockTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hhmm(s)
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_hhmm(&s).map_err(de::Error::custom)
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        ClockTime::parse_hhmm(s).unwrap()
    }

    #[test]
    fn parse_valid_times() {
        let c = t("00:00");
        assert_eq!(c.hour(), 0);
        assert_eq!(c.minute(), 0);

        let c = t("23:59");
        assert_eq!(c.hour(), 23);
        assert_eq!(c.minute(), 59);
        assert_eq!(c.minute_of_day(), 1439);
    }

    #[test]
    fn parse_rejects_bad_formats() {
        assert!(ClockTime::parse_hhmm("").is_err());
        assert!(ClockTime::parse_hhmm("9:30").is_err());
        assert!(ClockTime::parse_hhmm("09-30").is_err());
        assert!(ClockTime::parse_hhmm("ab:cd").is_err());
        assert!(ClockTime::parse_hhmm("12:60").is_err());
        assert!(ClockTime::parse_hhmm("24:00").is_err());
        assert!(ClockTime::parse_hhmm("12:30:00").is_err());
    }

    #[test]
    fn minutes_between_wraps_past_midnight() {
        assert_eq!(minutes_between(t("08:00"), t("10:00")), 120);
        assert_eq!(minutes_between(t("10:00"), t("08:00")), 22 * 60);
        assert_eq!(minutes_between(t("23:30"), t("00:30")), 60);
        assert_eq!(minutes_between(t("00:30"), t("01:00")), 30);
        assert_eq!(minutes_between(t("12:00"), t("12:00")), 0);
    }

    #[test]
    fn duration_between_matches_minutes() {
        assert_eq!(
            duration_between(t("23:45"), t("00:15")),
            Duration::minutes(30)
        );
    }

    #[test]
    fn from_minute_of_day_wraps() {
        assert_eq!(ClockTime::from_minute_of_day(0), ClockTime::midnight());
        assert_eq!(ClockTime::from_minute_of_day(1500), t("01:00"));
        assert_eq!(ClockTime::from_minute_of_day(-30), t("23:30"));
    }

    #[test]
    fn ordering_is_clock_order() {
        assert!(t("06:00") < t("22:00"));
        assert!(t("00:00") < t("23:59"));
    }

    #[test]
    fn serde_as_hhmm_string() {
        let json = serde_json::to_string(&t("07:05")).unwrap();
        assert_eq!(json, "\"07:05\"");

        let back: ClockTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t("07:05"));

        assert!(serde_json::from_str::<ClockTime>("\"7:05\"").is_err());
    }
}
