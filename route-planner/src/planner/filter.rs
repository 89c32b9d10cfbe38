//! Per-leg filter criteria shared by direct and connection search.
//!
//! Every criterion is optional; an absent criterion imposes no constraint.
//! `RawLegFilter` holds the same criteria as untrusted text and coerces
//! anything malformed to "no filter" instead of failing.

use chrono::Weekday;
use tracing::warn;

use crate::domain::{ClockTime, Fare, LegRecord, parse_weekday};

/// Validated per-leg filter bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegFilter {
    /// Carrier type, compared case-insensitively. Blank means any.
    pub carrier: Option<String>,

    /// A weekday the leg must operate on.
    pub day: Option<Weekday>,

    /// Ceiling (inclusive) on the primary-class fare.
    pub max_fare_a: Option<Fare>,

    /// Ceiling (inclusive) on the secondary-class fare.
    pub max_fare_b: Option<Fare>,

    /// Earliest acceptable departure clock (inclusive).
    pub earliest_departure: Option<ClockTime>,

    /// Latest acceptable departure clock (inclusive).
    pub latest_departure: Option<ClockTime>,

    /// Ceiling (inclusive) on a single leg's travel time in minutes.
    pub max_duration_mins: Option<i64>,
}

impl LegFilter {
    /// A filter that accepts every leg.
    pub fn any() -> Self {
        Self::default()
    }

    /// True if no criterion is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Check the criteria that apply to every leg of an itinerary.
    ///
    /// Carrier, weekday, both fare ceilings and the duration cap.
    pub fn matches_every_leg(&self, leg: &LegRecord) -> bool {
        if let Some(carrier) = self.carrier.as_deref().map(str::trim) {
            if !carrier.is_empty() && !leg.has_carrier(carrier) {
                return false;
            }
        }
        if let Some(day) = self.day {
            if !leg.days().contains(day) {
                return false;
            }
        }
        if self.max_fare_a.is_some_and(|max| leg.fare_a() > max) {
            return false;
        }
        if self.max_fare_b.is_some_and(|max| leg.fare_b() > max) {
            return false;
        }
        if self
            .max_duration_mins
            .is_some_and(|max| leg.duration_mins() > max)
        {
            return false;
        }
        true
    }

    /// Check the departure window, which constrains only where a trip starts.
    pub fn matches_departure_window(&self, leg: &LegRecord) -> bool {
        let dep = leg.departure();
        if self.earliest_departure.is_some_and(|min| dep < min) {
            return false;
        }
        if self.latest_departure.is_some_and(|max| dep > max) {
            return false;
        }
        true
    }

    /// Full check for a leg at a given position in an itinerary.
    pub fn matches_leg(&self, leg: &LegRecord, is_first_leg: bool) -> bool {
        self.matches_every_leg(leg) && (!is_first_leg || self.matches_departure_window(leg))
    }
}

/// Parse a weekday filter value.
///
/// Blank, "daily" and "every day" mean no day filter, as does anything
/// unrecognised (logged as a warning).
///
/// ```
/// use route_planner::planner::parse_day_filter;
/// use chrono::Weekday;
///
/// assert_eq!(parse_day_filter("Wednesday"), Some(Weekday::Wed));
/// assert_eq!(parse_day_filter("Daily"), None);
/// assert_eq!(parse_day_filter("someday"), None);
/// ```
pub fn parse_day_filter(s: &str) -> Option<Weekday> {
    let trimmed = s.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("daily")
        || trimmed.eq_ignore_ascii_case("every day")
    {
        return None;
    }
    let day = parse_weekday(trimmed);
    if day.is_none() {
        warn!(value = trimmed, "unrecognised day, ignoring day filter");
    }
    day
}

/// Filter criteria as entered by a user, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawLegFilter {
    pub carrier: Option<String>,
    pub day: Option<String>,
    pub max_fare_a: Option<String>,
    pub max_fare_b: Option<String>,
    pub earliest_departure: Option<String>,
    pub latest_departure: Option<String>,
    pub max_duration_mins: Option<String>,
}

impl RawLegFilter {
    /// Coerce into a [`LegFilter`], dropping malformed criteria.
    ///
    /// ```
    /// use route_planner::planner::RawLegFilter;
    ///
    /// let raw = RawLegFilter {
    ///     max_fare_b: Some("5".into()),
    ///     earliest_departure: Some("9am".into()),
    ///     ..RawLegFilter::default()
    /// };
    /// let filter = raw.coerce();
    /// assert_eq!(filter.max_fare_b.map(|f| f.amount()), Some(5.0));
    /// assert_eq!(filter.earliest_departure, None);
    /// ```
    pub fn coerce(&self) -> LegFilter {
        LegFilter {
            carrier: non_blank(&self.carrier).map(str::to_string),
            day: non_blank(&self.day).and_then(parse_day_filter),
            max_fare_a: non_blank(&self.max_fare_a).and_then(|s| coerce_fare("max_fare_a", s)),
            max_fare_b: non_blank(&self.max_fare_b).and_then(|s| coerce_fare("max_fare_b", s)),
            earliest_departure: non_blank(&self.earliest_departure)
                .and_then(|s| coerce_clock("earliest_departure", s)),
            latest_departure: non_blank(&self.latest_departure)
                .and_then(|s| coerce_clock("latest_departure", s)),
            max_duration_mins: non_blank(&self.max_duration_mins)
                .and_then(|s| coerce_minutes("max_duration_mins", s)),
        }
    }
}

impl From<&RawLegFilter> for LegFilter {
    fn from(raw: &RawLegFilter) -> Self {
        raw.coerce()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn coerce_fare(field: &'static str, s: &str) -> Option<Fare> {
    match s.parse::<f64>().ok().and_then(|x| Fare::new(x).ok()) {
        Some(fare) => Some(fare),
        None => {
            warn!(field, value = s, "invalid price, ignoring filter");
            None
        }
    }
}

fn coerce_clock(field: &'static str, s: &str) -> Option<ClockTime> {
    match ClockTime::parse_hhmm(s) {
        Ok(t) => Some(t),
        Err(e) => {
            warn!(field, value = s, error = %e, "invalid time, ignoring filter");
            None
        }
    }
}

fn coerce_minutes(field: &'static str, s: &str) -> Option<i64> {
    match s.parse::<i64>() {
        Ok(m) if m >= 0 => Some(m),
        _ => {
            warn!(field, value = s, "invalid minutes, ignoring filter");
            None
        }
    }
}
