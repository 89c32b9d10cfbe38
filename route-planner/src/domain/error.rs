//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. The
//! search algorithms themselves never fail; they only ever see values that
//! passed these checks.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A leg record failed validation
    #[error("invalid leg {id:?}: {reason}")]
    InvalidLeg { id: String, reason: &'static str },

    /// Consecutive legs don't share a location
    #[error("legs do not connect: arrives at {arrives_at}, next departs from {departs_from}")]
    LegsNotConnected {
        arrives_at: String,
        departs_from: String,
    },

    /// An itinerary visits the same location twice
    #[error("itinerary visits {0} more than once")]
    RepeatedLocation(String),

    /// Itinerary has no legs
    #[error("itinerary must have at least one leg")]
    EmptyItinerary,
}
