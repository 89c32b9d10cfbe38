//! Weekly operating-day sets.
//!
//! A leg runs on some subset of the seven weekdays. The set is stored as a
//! 7-bit mask (bit 0 = Monday ... bit 6 = Sunday) so intersection and the
//! one-day shift used across overnight transfers are single bit operations.

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// All weekdays in calendar order, Monday first.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const ALL_BITS: u8 = 0b111_1111;

/// Error returned when a day specification cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidDays {
    /// A token was not a recognised day name or range
    #[error("unrecognised day: {0:?}")]
    UnknownDay(String),

    /// The specification named no days at all
    #[error("day specification is empty")]
    Empty,
}

/// An immutable set of weekdays.
///
/// # Examples
///
/// ```
/// use route_planner::domain::OperatingDays;
/// use chrono::Weekday;
///
/// let weekdays = OperatingDays::parse("Mon-Fri").unwrap();
/// assert!(weekdays.contains(Weekday::Wed));
/// assert!(!weekdays.contains(Weekday::Sat));
///
/// // Friday shifts to Saturday, so the shifted set now covers Saturday
/// assert!(weekdays.shifted_forward().contains(Weekday::Sat));
///
/// assert_eq!(OperatingDays::parse("Daily").unwrap(), OperatingDays::DAILY);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OperatingDays(u8);

impl OperatingDays {
    /// No days at all. Never valid on a leg, but a legitimate search result.
    pub const EMPTY: OperatingDays = OperatingDays(0);

    /// Every day of the week.
    pub const DAILY: OperatingDays = OperatingDays(ALL_BITS);

    /// Build from a raw mask; bits above the seventh are ignored.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & ALL_BITS)
    }

    /// Returns the raw mask.
    pub fn bits(&self) -> u8 {
        self.0
    }

    /// A set holding exactly one day.
    pub fn single(day: Weekday) -> Self {
        Self(bit(day))
    }

    /// Returns a copy of this set with `day` added.
    pub fn with(self, day: Weekday) -> Self {
        Self(self.0 | bit(day))
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & bit(day) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True when the set covers all seven days.
    pub fn is_daily(&self) -> bool {
        self.0 == ALL_BITS
    }

    /// Number of days in the set.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn intersects(&self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Every day moved one day later (Sunday wraps to Monday).
    pub fn shifted_forward(self) -> Self {
        Self(((self.0 << 1) | (self.0 >> 6)) & ALL_BITS)
    }

    /// Every day moved one day earlier (Monday wraps to Sunday).
    pub fn shifted_backward(self) -> Self {
        Self(((self.0 >> 1) | (self.0 << 6)) & ALL_BITS)
    }

    /// Every day moved `days` days later, modulo the week.
    pub fn shifted_by(self, days: i64) -> Self {
        let steps = days.rem_euclid(7);
        (0..steps).fold(self, |acc, _| acc.shifted_forward())
    }

    /// Iterate over the days in calendar order, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEKDAYS.into_iter().filter(|d| self.contains(*d))
    }

    /// Parse a day specification.
    ///
    /// Accepts "Daily", or a comma-separated list whose entries are day
    /// names ("Mon", "monday") or ranges ("Mon-Fri"). Ranges wrap around the
    /// end of the week, so "Fri-Mon" covers Friday to Monday.
    pub fn parse(s: &str) -> Result<Self, InvalidDays> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("daily") {
            return Ok(Self::DAILY);
        }

        let mut days = Self::EMPTY;
        for part in trimmed.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('-') {
                Some((start, end)) => {
                    let start = parse_weekday(start)
                        .ok_or_else(|| InvalidDays::UnknownDay(part.to_string()))?;
                    let end = parse_weekday(end)
                        .ok_or_else(|| InvalidDays::UnknownDay(part.to_string()))?;
                    let mut day = start;
                    loop {
                        days = days.with(day);
                        if day == end {
                            break;
                        }
                        day = day.succ();
                    }
                }
                None => {
                    let day = parse_weekday(part)
                        .ok_or_else(|| InvalidDays::UnknownDay(part.to_string()))?;
                    days = days.with(day);
                }
            }
        }

        if days.is_empty() {
            return Err(InvalidDays::Empty);
        }
        Ok(days)
    }
}

impl FromIterator<Weekday> for OperatingDays {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl FromStr for OperatingDays {
    type Err = InvalidDays;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse a single day name, full or three-letter, case-insensitively.
///
/// ```
/// use route_planner::domain::parse_weekday;
/// use chrono::Weekday;
///
/// assert_eq!(parse_weekday("tue"), Some(Weekday::Tue));
/// assert_eq!(parse_weekday(" Sunday "), Some(Weekday::Sun));
/// assert_eq!(parse_weekday("Tues"), None);
/// ```
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.trim().to_lowercase().as_str() {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

fn bit(day: Weekday) -> u8 {
    1 << day.num_days_from_monday()
}

impl fmt::Debug for OperatingDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OperatingDays({self})")
    }
}

impl fmt::Display for OperatingDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_daily() {
            return f.write_str("Daily");
        }
        for (i, day) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{day}")?;
        }
        Ok(())
    }
}

impl Serialize for OperatingDays {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OperatingDays {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days(s: &str) -> OperatingDays {
        OperatingDays::parse(s).unwrap()
    }

    #[test]
    fn parse_daily() {
        assert!(days("Daily").is_daily());
        assert!(days("daily").is_daily());
        assert_eq!(days("Daily").len(), 7);
    }

    #[test]
    fn parse_list_and_ranges() {
        let d = days("Mon, Wed,fri");
        assert_eq!(d.len(), 3);
        assert!(d.contains(Weekday::Mon));
        assert!(d.contains(Weekday::Wed));
        assert!(d.contains(Weekday::Fri));

        let d = days("Mon-Fri");
        assert_eq!(d.len(), 5);
        assert!(!d.contains(Weekday::Sat));

        let d = days("Tue-Thu,Sun");
        assert_eq!(d.iter().collect::<Vec<_>>(), vec![
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Sun
        ]);
    }

    #[test]
    fn parse_wrapping_range() {
        let d = days("Fri-Mon");
        assert_eq!(d.iter().collect::<Vec<_>>(), vec![
            Weekday::Mon,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun
        ]);

        assert_eq!(days("Wed-Wed"), OperatingDays::single(Weekday::Wed));
    }

    #[test]
    fn parse_rejects_unknown_and_empty() {
        assert_eq!(
            OperatingDays::parse("Mon,Funday"),
            Err(InvalidDays::UnknownDay("Funday".into()))
        );
        assert!(matches!(
            OperatingDays::parse("Mon-Xyz"),
            Err(InvalidDays::UnknownDay(_))
        ));
        assert_eq!(OperatingDays::parse(""), Err(InvalidDays::Empty));
        assert_eq!(OperatingDays::parse(" , "), Err(InvalidDays::Empty));
    }

    #[test]
    fn shift_wraps_around_week() {
        let sun = OperatingDays::single(Weekday::Sun);
        assert_eq!(sun.shifted_forward(), OperatingDays::single(Weekday::Mon));

        let mon = OperatingDays::single(Weekday::Mon);
        assert_eq!(mon.shifted_backward(), OperatingDays::single(Weekday::Sun));

        let weekdays = days("Mon-Fri");
        assert_eq!(weekdays.shifted_forward(), days("Tue-Sat"));
        assert_eq!(weekdays.shifted_forward().shifted_backward(), weekdays);
        assert_eq!(weekdays.shifted_by(7), weekdays);
        assert_eq!(weekdays.shifted_by(-1), days("Sun-Thu"));
        assert_eq!(OperatingDays::DAILY.shifted_forward(), OperatingDays::DAILY);
    }

    #[test]
    fn set_operations() {
        let a = days("Mon-Wed");
        let b = days("Wed-Fri");
        assert_eq!(a.intersection(b), OperatingDays::single(Weekday::Wed));
        assert_eq!(a.union(b), days("Mon-Fri"));
        assert!(a.intersects(b));
        assert!(!a.intersects(days("Sat,Sun")));
        assert!(OperatingDays::EMPTY.is_empty());
    }

    #[test]
    fn from_bits_masks_high_bit() {
        assert_eq!(OperatingDays::from_bits(0xFF), OperatingDays::DAILY);
    }

    #[test]
    fn display_formats() {
        assert_eq!(days("Daily").to_string(), "Daily");
        assert_eq!(days("Sun,Mon").to_string(), "Mon, Sun");
        assert_eq!(OperatingDays::EMPTY.to_string(), "");
    }

    #[test]
    fn serde_round_trips_through_day_spec() {
        let d = days("Sat,Sun");
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"Sat, Sun\"");
        let back: OperatingDays = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
        assert!(serde_json::from_str::<OperatingDays>("\"\"").is_err());
    }
}
