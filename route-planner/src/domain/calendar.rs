//! Weekly-day calculus across transfers.
//!
//! Legs carry weekday sets but no dates. To chain two legs we have to decide
//! whether the connecting departure happens on the same calendar day as the
//! arrival or on the next one, and then line the two weekday sets up
//! accordingly.

use std::sync::Arc;

use super::{LegRecord, OperatingDays, minutes_between};

/// Default threshold separating same-day from next-day transfers (23 hours).
///
/// A heuristic rather than a derived rule: a wait shorter than this is
/// assumed to stay on the arrival day.
pub const SAME_DAY_THRESHOLD_MINS: i64 = 23 * 60;

/// Policy for lining up weekday sets across a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayPolicy {
    /// Transfers strictly shorter than this many minutes are same-day.
    pub same_day_threshold_mins: i64,
}

impl Default for DayPolicy {
    fn default() -> Self {
        Self {
            same_day_threshold_mins: SAME_DAY_THRESHOLD_MINS,
        }
    }
}

impl DayPolicy {
    pub fn new(same_day_threshold_mins: i64) -> Self {
        Self {
            same_day_threshold_mins,
        }
    }

    /// True when a transfer of `transfer_mins` stays on the arrival day.
    pub fn is_same_day_transfer(&self, transfer_mins: i64) -> bool {
        transfer_mins < self.same_day_threshold_mins
    }

    /// Whether `next` can be caught after arriving on `prev`.
    ///
    /// The previous leg's days are taken at arrival, so a leg that runs past
    /// midnight on Saturday offers Sunday as its connecting day.
    pub fn legs_compatible(&self, prev: &LegRecord, next: &LegRecord) -> bool {
        let transfer = minutes_between(prev.arrival(), next.departure());
        compatible_pair(
            prev.arrival_days(),
            next.days(),
            self.is_same_day_transfer(transfer),
        )
    }

    /// Weekdays on which the whole path can be ridden end to end.
    ///
    /// Days are expressed as departure days of the first leg. An empty
    /// result means the path is connected but never operable; an empty path
    /// also yields the empty set.
    pub fn valid_days_for_path(&self, legs: &[Arc<LegRecord>]) -> OperatingDays {
        let Some(first) = legs.first() else {
            return OperatingDays::EMPTY;
        };

        let mut valid = first.days();
        // Days between the first leg's departure and the current leg's departure
        let mut offset = 0;

        for pair in legs.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.crosses_midnight() {
                offset += 1;
            }
            let transfer = minutes_between(prev.arrival(), next.departure());
            if !self.is_same_day_transfer(transfer) {
                offset += 1;
            }
            valid = valid.intersection(next.days().shifted_by(-offset));
        }

        valid
    }
}

/// [`DayPolicy::is_same_day_transfer`] with the default 23-hour threshold.
pub fn is_same_day_transfer(transfer_mins: i64) -> bool {
    DayPolicy::default().is_same_day_transfer(transfer_mins)
}

/// Whether two day sets line up across a transfer.
///
/// Same-day transfers need a common day. Otherwise some day of `prev_days`
/// must be followed by a day in `next_days`.
///
/// ```
/// use route_planner::domain::{OperatingDays, compatible_pair};
///
/// let sat = OperatingDays::parse("Sat").unwrap();
/// let sun = OperatingDays::parse("Sun").unwrap();
/// assert!(!compatible_pair(sat, sun, true));
/// assert!(compatible_pair(sat, sun, false));
/// ```
pub fn compatible_pair(prev_days: OperatingDays, next_days: OperatingDays, same_day: bool) -> bool {
    if same_day {
        prev_days.intersects(next_days)
    } else {
        prev_days.shifted_forward().intersects(next_days)
    }
}

/// [`DayPolicy::valid_days_for_path`] with the default threshold.
pub fn valid_days_for_path(legs: &[Arc<LegRecord>]) -> OperatingDays {
    DayPolicy::default().valid_days_for_path(legs)
}
