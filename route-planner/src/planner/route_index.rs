//! Adjacency index over the leg catalog.
//!
//! The depth-first search asks one question over and over: "which legs
//! leave this location?". Grouping the catalog once by lower-cased origin
//! turns that into a single map lookup.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{LegRecord, location_key};

/// Legs grouped by departure location.
///
/// Read-only after construction, so one index can serve any number of
/// concurrent searches.
#[derive(Debug, Clone, Default)]
pub struct RouteIndex {
    /// Map from lower-cased origin -> legs departing there, in catalog order.
    by_origin: HashMap<String, Vec<Arc<LegRecord>>>,

    /// Total number of legs indexed.
    leg_count: usize,
}

impl RouteIndex {
    /// Build the index from the full leg catalog.
    ///
    /// Legs with an empty day set cannot exist (rejected at construction),
    /// so every indexed leg can take part in day compatibility checks.
    pub fn build(legs: &[Arc<LegRecord>]) -> Self {
        let mut by_origin: HashMap<String, Vec<Arc<LegRecord>>> = HashMap::new();

        for leg in legs {
            by_origin
                .entry(leg.origin_key().to_string())
                .or_default()
                .push(leg.clone());
        }

        Self {
            by_origin,
            leg_count: legs.len(),
        }
    }

    /// Legs departing `location` (case-insensitive); empty if unknown.
    pub fn legs_from(&self, location: &str) -> &[Arc<LegRecord>] {
        self.legs_from_key(&location_key(location))
    }

    /// Like [`RouteIndex::legs_from`] for an already lower-cased key.
    pub fn legs_from_key(&self, key: &str) -> &[Arc<LegRecord>] {
        self.by_origin
            .get(key)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Check if any leg departs `location`.
    pub fn has_departures(&self, location: &str) -> bool {
        self.by_origin.contains_key(&location_key(location))
    }

    /// Get all locations with at least one departure (lower-cased).
    pub fn origins(&self) -> impl Iterator<Item = &str> {
        self.by_origin.keys().map(String::as_str)
    }

    /// Get the number of distinct departure locations.
    pub fn origin_count(&self) -> usize {
        self.by_origin.len()
    }

    /// Get the total number of indexed legs.
    pub fn leg_count(&self) -> usize {
        self.leg_count
    }
}
