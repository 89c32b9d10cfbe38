//! Connection planner.
//!
//! This module answers: "how can I get from here to there on the
//! timetable, and which option suits me best?"
//!
//! Direct legs come from a linear filter over the catalog. Multi-leg
//! itineraries come from a bounded depth-first search over a
//! [`RouteIndex`], checking transfer times and weekday compatibility at
//! every change.

mod config;
mod connections;
mod direct;
mod filter;
mod layover;
mod rank;
mod route_index;
mod search;

pub use config::SearchConfig;
pub use connections::ConnectionFinder;
pub use direct::{DirectQuery, search_direct};
pub use filter::{LegFilter, RawLegFilter, parse_day_filter};
pub use layover::LayoverPolicy;
pub use rank::{
    SortOrder, UnknownSortOrder, compare_itineraries, compare_legs, rank_itineraries, rank_legs,
};
pub use route_index::RouteIndex;
pub use search::{Planner, Query, SearchResult};
