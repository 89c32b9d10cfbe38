//! Direct leg search.
//!
//! A conjunction of optional predicates over the flat catalog: exact
//! origin and destination (case-insensitive) plus the shared
//! [`LegFilter`] criteria. Matching legs keep catalog order.

use std::sync::Arc;

use super::filter::LegFilter;
use crate::domain::LegRecord;

/// Criteria for selecting single legs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectQuery {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub filter: LegFilter,
}

impl DirectQuery {
    /// Query for legs between two named locations.
    pub fn between(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: Some(origin.into()),
            destination: Some(destination.into()),
            filter: LegFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: LegFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Check one leg against every active criterion.
    pub fn matches(&self, leg: &LegRecord) -> bool {
        if let Some(origin) = active(&self.origin) {
            if !leg.departs_from(origin) {
                return false;
            }
        }
        if let Some(destination) = active(&self.destination) {
            if !leg.arrives_at(destination) {
                return false;
            }
        }
        self.filter.matches_leg(leg, true)
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Select matching legs from `legs`, preserving their order.
pub fn search_direct(legs: &[Arc<LegRecord>], query: &DirectQuery) -> Vec<Arc<LegRecord>> {
    legs.iter()
        .filter(|leg| query.matches(leg))
        .cloned()
        .collect()
}
