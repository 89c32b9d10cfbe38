//! Layover limits for connecting itineraries.
//!
//! Caps how long a traveller waits at each change. Waits are shorter at
//! night: if either the arrival or the onward departure falls outside the
//! daytime window, the night limit applies.

use chrono::Duration;

use crate::domain::{ClockTime, Itinerary, minutes_between};

/// Limits on the wait at each change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoverPolicy {
    /// Shortest acceptable wait (minutes).
    pub min_transfer_mins: i64,

    /// Longest acceptable daytime wait (minutes).
    pub max_day_layover_mins: i64,

    /// Longest acceptable wait touching the night (minutes).
    pub max_night_layover_mins: i64,

    /// Daytime starts at this clock (inclusive).
    pub day_start: ClockTime,

    /// Daytime ends at this clock (exclusive).
    pub day_end: ClockTime,
}

impl Default for LayoverPolicy {
    fn default() -> Self {
        Self {
            min_transfer_mins: 5,
            max_day_layover_mins: 120,
            max_night_layover_mins: 30,
            day_start: ClockTime::from_minute_of_day(6 * 60),
            day_end: ClockTime::from_minute_of_day(22 * 60),
        }
    }
}

impl LayoverPolicy {
    pub fn max_day_layover(&self) -> Duration {
        Duration::minutes(self.max_day_layover_mins)
    }

    pub fn max_night_layover(&self) -> Duration {
        Duration::minutes(self.max_night_layover_mins)
    }

    /// True if `t` falls outside [day_start, day_end).
    pub fn is_night(&self, t: ClockTime) -> bool {
        t < self.day_start || t >= self.day_end
    }

    /// Check a single change from an arrival to the next departure.
    pub fn allows_transfer(&self, arrival: ClockTime, departure: ClockTime) -> bool {
        let wait = minutes_between(arrival, departure);
        if wait < self.min_transfer_mins {
            return false;
        }

        let limit = if self.is_night(arrival) || self.is_night(departure) {
            self.max_night_layover_mins
        } else {
            self.max_day_layover_mins
        };
        wait <= limit
    }

    /// Check every change in an itinerary. Direct trips always pass.
    pub fn allows(&self, itinerary: &Itinerary) -> bool {
        itinerary
            .legs()
            .windows(2)
            .all(|pair| self.allows_transfer(pair[0].arrival(), pair[1].departure()))
    }
}
