//! Depth-first connection search.
//!
//! Enumerates every simple path of legs from an origin to a destination,
//! subject to a leg limit, a minimum transfer time, weekday compatibility
//! between consecutive legs and an optional per-leg filter.
//!
//! Results come out in discovery order: the outgoing legs of each location
//! are tried in catalog order, recursing as deep as possible before
//! backtracking.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace};

use super::config::SearchConfig;
use super::filter::LegFilter;
use super::route_index::RouteIndex;
use crate::domain::{DayPolicy, Itinerary, LegRecord, location_key, minutes_between};

/// Mutable state for one search, threaded through the recursion.
struct DfsState<'a> {
    path: Vec<Arc<LegRecord>>,
    visited: HashSet<&'a str>,
    found: Vec<Itinerary>,
    expanded: usize,
}

/// Per-search parameters that stay fixed during the recursion.
struct DfsParams<'a> {
    target: &'a str,
    max_legs: usize,
    min_transfer_mins: i64,
    policy: DayPolicy,
    filter: &'a LegFilter,
}

/// Finds multi-leg connections over a [`RouteIndex`].
#[derive(Debug, Clone, Copy)]
pub struct ConnectionFinder<'a> {
    index: &'a RouteIndex,
}

impl<'a> ConnectionFinder<'a> {
    pub fn new(index: &'a RouteIndex) -> Self {
        Self { index }
    }

    /// Find every itinerary from `origin` to `destination`.
    ///
    /// Location names are matched case-insensitively. An origin equal to
    /// the destination yields nothing. When `filter.day` is set, an
    /// itinerary is kept only if the whole chain runs on that weekday;
    /// paths whose chain never runs on any day are dropped.
    pub fn find(
        &self,
        origin: &str,
        destination: &str,
        config: &SearchConfig,
        filter: &LegFilter,
    ) -> Vec<Itinerary> {
        let origin_key = location_key(origin);
        let target = location_key(destination);

        if origin_key == target {
            debug!(origin, "origin equals destination, nothing to search");
            return Vec::new();
        }
        if config.max_legs == 0 {
            return Vec::new();
        }

        let params = DfsParams {
            target: &target,
            max_legs: config.max_legs,
            min_transfer_mins: config.min_transfer_mins,
            policy: config.day_policy(),
            filter,
        };
        let mut state = DfsState {
            // Depth is bounded by the number of distinct locations anyway
            path: Vec::with_capacity(config.max_legs.min(self.index.origin_count() + 1)),
            visited: HashSet::new(),
            found: Vec::new(),
            expanded: 0,
        };

        self.explore(&origin_key, &params, &mut state);

        debug!(
            origin,
            destination,
            found = state.found.len(),
            expanded = state.expanded,
            "connection search complete"
        );

        state.found
    }

    fn explore<'s>(&'s self, location: &'s str, params: &DfsParams<'_>, state: &mut DfsState<'s>) {
        if state.path.len() >= params.max_legs {
            return;
        }

        state.visited.insert(location);
        state.expanded += 1;

        for leg in self.index.legs_from_key(location) {
            if state.visited.contains(leg.destination_key()) {
                continue;
            }
            if !self.accepts(leg, params, state) {
                continue;
            }

            state.path.push(leg.clone());

            if leg.destination_key() == params.target {
                self.record(params, state);
            } else {
                self.explore(leg.destination_key(), params, state);
            }

            state.path.pop();
        }

        state.visited.remove(location);
    }

    /// Check whether `leg` may extend the current path.
    fn accepts(&self, leg: &LegRecord, params: &DfsParams<'_>, state: &DfsState<'_>) -> bool {
        if !params.filter.matches_leg(leg, state.path.is_empty()) {
            return false;
        }

        let Some(prev) = state.path.last() else {
            return true;
        };

        let transfer = minutes_between(prev.arrival(), leg.departure());
        if transfer < params.min_transfer_mins {
            trace!(leg = leg.id(), transfer, "transfer too short");
            return false;
        }
        if !params.policy.legs_compatible(prev, leg) {
            trace!(leg = leg.id(), "no common operating day");
            return false;
        }
        true
    }

    fn record(&self, params: &DfsParams<'_>, state: &mut DfsState<'_>) {
        let Ok(itinerary) = Itinerary::new(state.path.clone()) else {
            return;
        };

        if let Some(day) = params.filter.day {
            let days = itinerary.valid_days(&params.policy);
            if !days.contains(day) {
                trace!(?day, %days, "chain does not run on requested day");
                return;
            }
        }

        state.found.push(itinerary);
    }
}

#[cfg(test)]
#[path = "connections_tests.rs"]
mod tests;
