//! Search configuration for the connection planner.

use chrono::Duration;

use crate::domain::{DayPolicy, SAME_DAY_THRESHOLD_MINS};

/// Configuration parameters for connection search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Minimum time required between arriving and departing again (minutes).
    /// Connections tighter than this are rejected.
    pub min_transfer_mins: i64,

    /// Maximum number of legs in one itinerary (1 = direct only).
    pub max_legs: usize,

    /// Transfers shorter than this stay on the arrival day (minutes).
    pub same_day_threshold_mins: i64,

    /// Maximum number of results of each kind to return, if bounded.
    pub max_results: Option<usize>,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        min_transfer_mins: i64,
        max_legs: usize,
        same_day_threshold_mins: i64,
        max_results: Option<usize>,
    ) -> Self {
        Self {
            min_transfer_mins,
            max_legs,
            same_day_threshold_mins,
            max_results,
        }
    }

    /// Returns the minimum transfer time as a Duration.
    pub fn min_transfer(&self) -> Duration {
        Duration::minutes(self.min_transfer_mins)
    }

    /// Returns the same-day threshold as a Duration.
    pub fn same_day_threshold(&self) -> Duration {
        Duration::minutes(self.same_day_threshold_mins)
    }

    /// Returns the weekday policy implied by this configuration.
    pub fn day_policy(&self) -> DayPolicy {
        DayPolicy::new(self.same_day_threshold_mins)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_transfer_mins: 10,
            max_legs: 3, // direct plus two connections
            same_day_threshold_mins: SAME_DAY_THRESHOLD_MINS,
            max_results: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SearchConfig::default();

        assert_eq!(config.min_transfer_mins, 10);
        assert_eq!(config.max_legs, 3);
        assert_eq!(config.same_day_threshold_mins, 23 * 60);
        assert_eq!(config.max_results, None);
    }

    #[test]
    fn duration_methods() {
        let config = SearchConfig::default();

        assert_eq!(config.min_transfer(), Duration::minutes(10));
        assert_eq!(config.same_day_threshold(), Duration::hours(23));
    }

    #[test]
    fn custom_config() {
        let config = SearchConfig::new(45, 2, 600, Some(5));

        assert_eq!(config.min_transfer_mins, 45);
        assert_eq!(config.max_legs, 2);
        assert_eq!(config.max_results, Some(5));
        assert_eq!(config.day_policy(), DayPolicy::new(600));
    }
}
