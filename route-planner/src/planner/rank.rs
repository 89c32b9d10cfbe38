//! Result ranking.
//!
//! Sorting is stable, so results that tie on every key keep their
//! discovery order. [`SortOrder::Discovery`] leaves the order untouched;
//! that order follows adjacency-list order and is not canonical.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::domain::{Itinerary, LegRecord};

/// How to order search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Keep the order results were found in.
    #[default]
    Discovery,
    /// Earliest first departure first.
    Departure,
    /// Shortest total duration first, then cheapest secondary-class fare.
    Duration,
    /// Cheapest primary-class fare first, then shortest duration.
    FareA,
    /// Cheapest secondary-class fare first, then shortest duration.
    FareB,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort order {0:?}")]
pub struct UnknownSortOrder(pub String);

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "discovery" => Ok(SortOrder::Discovery),
            "departure" => Ok(SortOrder::Departure),
            "duration" => Ok(SortOrder::Duration),
            "farea" | "fare-a" | "fare_a" => Ok(SortOrder::FareA),
            "fareb" | "fare-b" | "fare_b" => Ok(SortOrder::FareB),
            _ => Err(UnknownSortOrder(s.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortOrder::Discovery => "none",
            SortOrder::Departure => "departure",
            SortOrder::Duration => "duration",
            SortOrder::FareA => "fareA",
            SortOrder::FareB => "fareB",
        };
        f.write_str(name)
    }
}

/// Compare two itineraries under `order`.
pub fn compare_itineraries(a: &Itinerary, b: &Itinerary, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Discovery => Ordering::Equal,
        SortOrder::Departure => a
            .departure()
            .cmp(&b.departure())
            .then_with(|| a.total_duration_mins().cmp(&b.total_duration_mins())),
        SortOrder::Duration => a
            .total_duration_mins()
            .cmp(&b.total_duration_mins())
            .then_with(|| a.total_fare_b().cmp(&b.total_fare_b())),
        SortOrder::FareA => a
            .total_fare_a()
            .cmp(&b.total_fare_a())
            .then_with(|| a.total_duration_mins().cmp(&b.total_duration_mins())),
        SortOrder::FareB => a
            .total_fare_b()
            .cmp(&b.total_fare_b())
            .then_with(|| a.total_duration_mins().cmp(&b.total_duration_mins())),
    }
}

/// Compare two single legs under `order`.
pub fn compare_legs(a: &LegRecord, b: &LegRecord, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Discovery => Ordering::Equal,
        SortOrder::Departure => a
            .departure()
            .cmp(&b.departure())
            .then_with(|| a.duration_mins().cmp(&b.duration_mins())),
        SortOrder::Duration => a
            .duration_mins()
            .cmp(&b.duration_mins())
            .then_with(|| a.fare_b().cmp(&b.fare_b())),
        SortOrder::FareA => a
            .fare_a()
            .cmp(&b.fare_a())
            .then_with(|| a.duration_mins().cmp(&b.duration_mins())),
        SortOrder::FareB => a
            .fare_b()
            .cmp(&b.fare_b())
            .then_with(|| a.duration_mins().cmp(&b.duration_mins())),
    }
}

/// Rank itineraries by preference.
///
/// Returns itineraries sorted best-first.
pub fn rank_itineraries(mut itineraries: Vec<Itinerary>, order: SortOrder) -> Vec<Itinerary> {
    if order != SortOrder::Discovery {
        itineraries.sort_by(|a, b| compare_itineraries(a, b, order));
    }
    itineraries
}

/// Rank direct legs by preference.
pub fn rank_legs(mut legs: Vec<Arc<LegRecord>>, order: SortOrder) -> Vec<Arc<LegRecord>> {
    if order != SortOrder::Discovery {
        legs.sort_by(|a, b| compare_legs(a, b, order));
    }
    legs
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{ClockTime, Fare, OperatingDays, RawLeg};
    use proptest::prelude::*;

    /// Build a single-leg itinerary from generated numbers.
    /// `cents_*` keep fares exact so ties are real ties.
    fn make_itinerary(id: usize, dep: i64, ride: i64, cents_a: u32, cents_b: u32) -> Itinerary {
        let leg = LegRecord::try_from(RawLeg {
            id: format!("I{id}"),
            origin: "A".to_string(),
            destination: "B".to_string(),
            departure: ClockTime::from_minute_of_day(dep),
            arrival: ClockTime::from_minute_of_day(dep + ride),
            carrier: "Express".to_string(),
            days: OperatingDays::DAILY,
            fare_a: Fare::new(f64::from(cents_a) / 100.0).unwrap(),
            fare_b: Fare::new(f64::from(cents_b) / 100.0).unwrap(),
        })
        .unwrap();
        Itinerary::new(vec![Arc::new(leg)]).unwrap()
    }

    fn arb_itineraries() -> impl Strategy<Value = Vec<Itinerary>> {
        prop::collection::vec((0..1440i64, 1..1439i64, 0..5000u32, 0..5000u32), 0..20).prop_map(
            |specs| {
                specs
                    .into_iter()
                    .enumerate()
                    .map(|(i, (dep, ride, a, b))| make_itinerary(i, dep, ride, a, b))
                    .collect()
            },
        )
    }

    fn arb_order() -> impl Strategy<Value = SortOrder> {
        prop_oneof![
            Just(SortOrder::Discovery),
            Just(SortOrder::Departure),
            Just(SortOrder::Duration),
            Just(SortOrder::FareA),
            Just(SortOrder::FareB),
        ]
    }

    proptest! {
        #[test]
        fn ranking_is_a_permutation(its in arb_itineraries(), order in arb_order()) {
            let mut before: Vec<String> = its.iter().map(|i| i.legs()[0].id().to_string()).collect();
            let ranked = rank_itineraries(its, order);
            let mut after: Vec<String> = ranked.iter().map(|i| i.legs()[0].id().to_string()).collect();

            before.sort();
            after.sort();
            prop_assert_eq!(before, after);
        }

        #[test]
        fn duration_ranking_is_non_decreasing(its in arb_itineraries()) {
            let ranked = rank_itineraries(its, SortOrder::Duration);
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].total_duration_mins() <= pair[1].total_duration_mins());
            }
        }

        #[test]
        fn fare_rankings_are_non_decreasing(its in arb_itineraries()) {
            let by_a = rank_itineraries(its.clone(), SortOrder::FareA);
            for pair in by_a.windows(2) {
                prop_assert!(pair[0].total_fare_a() <= pair[1].total_fare_a());
            }

            let by_b = rank_itineraries(its, SortOrder::FareB);
            for pair in by_b.windows(2) {
                prop_assert!(pair[0].total_fare_b() <= pair[1].total_fare_b());
            }
        }

        #[test]
        fn ranking_is_idempotent(its in arb_itineraries(), order in arb_order()) {
            let once = rank_itineraries(its, order);
            let twice = rank_itineraries(once.clone(), order);
            prop_assert_eq!(once, twice);
        }
    }
}
