//! Itinerary types.
//!
//! An `Itinerary` is an ordered chain of legs from an origin to a
//! destination. Totals are computed on demand from the legs.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::{
    ClockTime, DayPolicy, DomainError, Fare, LegRecord, OperatingDays, minutes_between,
};

/// Total travel time of a chain of legs in minutes.
///
/// Each leg's own wraparound duration plus every transfer gap between
/// consecutive legs. An empty chain is zero minutes.
pub fn path_duration_mins(legs: &[Arc<LegRecord>]) -> i64 {
    let riding: i64 = legs.iter().map(|l| l.duration_mins()).sum();
    let waiting: i64 = transfer_gaps(legs).sum();
    riding + waiting
}

/// Sum of primary-class fares over a chain of legs.
pub fn path_fare_a(legs: &[Arc<LegRecord>]) -> Fare {
    legs.iter().map(|l| l.fare_a()).sum()
}

/// Sum of secondary-class fares over a chain of legs.
pub fn path_fare_b(legs: &[Arc<LegRecord>]) -> Fare {
    legs.iter().map(|l| l.fare_b()).sum()
}

/// Wraparound waiting minutes between each pair of consecutive legs.
pub fn transfer_gaps(legs: &[Arc<LegRecord>]) -> impl Iterator<Item = i64> + '_ {
    legs.windows(2)
        .map(|pair| minutes_between(pair[0].arrival(), pair[1].departure()))
}

fn first_repeated_stop<'a>(first: &'a LegRecord, legs: &'a [Arc<LegRecord>]) -> Option<&'a str> {
    let mut seen = HashSet::with_capacity(legs.len() + 1);
    seen.insert(first.origin_key());
    legs.iter()
        .find(|leg| !seen.insert(leg.destination_key()))
        .map(|leg| leg.destination())
}

/// A complete trip from origin to destination.
///
/// # Invariants
///
/// - At least one leg
/// - Each leg departs from where the previous one arrived
/// - No location is visited twice
///
/// Serializes as a JSON array of leg records and is re-validated on the
/// way back in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LegRecord>", into = "Vec<LegRecord>")]
pub struct Itinerary {
    legs: Vec<Arc<LegRecord>>,
}

impl Itinerary {
    /// Constructs an itinerary, validating that the legs form a simple path.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `legs` is empty
    /// - consecutive legs don't share a location
    /// - a location appears twice
    pub fn new(legs: Vec<Arc<LegRecord>>) -> Result<Self, DomainError> {
        let first = legs.first().ok_or(DomainError::EmptyItinerary)?;

        for pair in legs.windows(2) {
            if pair[0].destination_key() != pair[1].origin_key() {
                return Err(DomainError::LegsNotConnected {
                    arrives_at: pair[0].destination().to_string(),
                    departs_from: pair[1].origin().to_string(),
                });
            }
        }

        if let Some(repeated) = first_repeated_stop(first, &legs) {
            return Err(DomainError::RepeatedLocation(repeated.to_string()));
        }

        Ok(Itinerary { legs })
    }

    /// Returns all legs in order.
    pub fn legs(&self) -> &[Arc<LegRecord>] {
        &self.legs
    }

    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Returns the number of changes (legs - 1).
    pub fn change_count(&self) -> usize {
        self.legs.len().saturating_sub(1)
    }

    /// Returns true if this is a single-leg itinerary.
    pub fn is_direct(&self) -> bool {
        self.legs.len() == 1
    }

    fn first(&self) -> &LegRecord {
        // Safe: validated non-empty at construction
        &self.legs[0]
    }

    fn last(&self) -> &LegRecord {
        // Safe: validated non-empty at construction
        &self.legs[self.legs.len() - 1]
    }

    pub fn origin(&self) -> &str {
        self.first().origin()
    }

    pub fn destination(&self) -> &str {
        self.last().destination()
    }

    /// Departure clock of the first leg.
    pub fn departure(&self) -> ClockTime {
        self.first().departure()
    }

    /// Arrival clock of the last leg.
    pub fn arrival(&self) -> ClockTime {
        self.last().arrival()
    }

    /// Waiting minutes at each change, in order.
    pub fn transfers(&self) -> impl Iterator<Item = i64> + '_ {
        transfer_gaps(&self.legs)
    }

    /// Riding plus waiting time in minutes.
    pub fn total_duration_mins(&self) -> i64 {
        path_duration_mins(&self.legs)
    }

    pub fn total_duration(&self) -> Duration {
        Duration::minutes(self.total_duration_mins())
    }

    pub fn total_fare_a(&self) -> Fare {
        path_fare_a(&self.legs)
    }

    pub fn total_fare_b(&self) -> Fare {
        path_fare_b(&self.legs)
    }

    /// Weekdays (of first departure) on which the whole trip runs.
    pub fn valid_days(&self, policy: &DayPolicy) -> OperatingDays {
        policy.valid_days_for_path(&self.legs)
    }
}

impl TryFrom<Vec<LegRecord>> for Itinerary {
    type Error = DomainError;

    fn try_from(legs: Vec<LegRecord>) -> Result<Self, Self::Error> {
        Itinerary::new(legs.into_iter().map(Arc::new).collect())
    }
}

impl From<Itinerary> for Vec<LegRecord> {
    fn from(itinerary: Itinerary) -> Self {
        itinerary
            .legs
            .into_iter()
            .map(Arc::unwrap_or_clone)
            .collect()
    }
}
