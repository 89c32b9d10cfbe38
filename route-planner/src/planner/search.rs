//! Planner facade.
//!
//! Runs the direct filter and the connection finder for one origin and
//! destination, then ranks and truncates both result lists.

use std::sync::Arc;

use tracing::{debug, info};

use super::config::SearchConfig;
use super::connections::ConnectionFinder;
use super::direct::{DirectQuery, search_direct};
use super::filter::LegFilter;
use super::layover::LayoverPolicy;
use super::rank::{SortOrder, rank_itineraries, rank_legs};
use super::route_index::RouteIndex;
use crate::domain::{Itinerary, LegRecord};

/// Request for a planner search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Where the trip starts (case-insensitive).
    pub origin: String,

    /// Where the trip ends (case-insensitive).
    pub destination: String,

    /// Per-leg criteria applied to direct legs and connections alike.
    pub filter: LegFilter,

    /// Ordering for both result lists.
    pub sort: SortOrder,
}

impl Query {
    /// Create a new query with no filter and discovery order.
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: LegFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn sorted_by(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }
}

/// Result of a planner search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    /// Single legs from origin to destination, ranked.
    pub direct: Vec<Arc<LegRecord>>,

    /// Itineraries with at least one change, ranked.
    pub connections: Vec<Itinerary>,
}

impl SearchResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.connections.is_empty()
    }

    /// Total number of results of both kinds.
    pub fn len(&self) -> usize {
        self.direct.len() + self.connections.len()
    }
}

/// Search over one catalog and its route index.
///
/// Holds only shared references, so one catalog can back many planners
/// with different configurations.
#[derive(Debug, Clone)]
pub struct Planner<'a> {
    legs: &'a [Arc<LegRecord>],
    index: &'a RouteIndex,
    config: SearchConfig,
    layover: Option<LayoverPolicy>,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(legs: &'a [Arc<LegRecord>], index: &'a RouteIndex, config: SearchConfig) -> Self {
        Self {
            legs,
            index,
            config,
            layover: None,
        }
    }

    /// Also reject connections whose waits break `policy`.
    pub fn with_layover_policy(mut self, policy: LayoverPolicy) -> Self {
        self.layover = Some(policy);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search for direct legs and connections.
    pub fn search(&self, query: &Query) -> SearchResult {
        let direct_query = DirectQuery::between(&query.origin, &query.destination)
            .with_filter(query.filter.clone());
        let direct = rank_legs(search_direct(self.legs, &direct_query), query.sort);

        let finder = ConnectionFinder::new(self.index);
        let mut connections: Vec<Itinerary> = finder
            .find(&query.origin, &query.destination, &self.config, &query.filter)
            .into_iter()
            .filter(|it| !it.is_direct())
            .collect();

        if let Some(policy) = &self.layover {
            let before = connections.len();
            connections.retain(|it| policy.allows(it));
            debug!(
                rejected = before - connections.len(),
                "applied layover policy"
            );
        }

        let connections = rank_itineraries(connections, query.sort);

        let result = SearchResult {
            direct: self.truncate(direct),
            connections: self.truncate(connections),
        };

        info!(
            origin = %query.origin,
            destination = %query.destination,
            sort = %query.sort,
            direct = result.direct.len(),
            connections = result.connections.len(),
            "search complete"
        );

        result
    }

    fn truncate<T>(&self, mut items: Vec<T>) -> Vec<T> {
        if let Some(max) = self.config.max_results {
            items.truncate(max);
        }
        items
    }
}
