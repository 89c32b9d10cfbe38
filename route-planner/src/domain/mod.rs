//! Domain types for the timetable planner.
//!
//! This module contains the validated value types the search works on.
//! All types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod calendar;
mod days;
mod error;
mod fare;
mod itinerary;
mod leg;
mod time;

pub use calendar::{
    DayPolicy, SAME_DAY_THRESHOLD_MINS, compatible_pair, is_same_day_transfer,
    valid_days_for_path,
};
pub use days::{InvalidDays, OperatingDays, WEEKDAYS, parse_weekday};
pub use error::DomainError;
pub use fare::{Fare, InvalidFare};
pub use itinerary::{Itinerary, path_duration_mins, path_fare_a, path_fare_b, transfer_gaps};
pub use leg::{LegRecord, RawLeg, location_key, same_name};
pub use time::{ClockTime, MINUTES_PER_DAY, TimeError, duration_between, minutes_between};
