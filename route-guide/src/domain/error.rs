//! Domain error types.
//!
//! These errors represent validation failures when assembling domain values.
//! They are distinct from provider/IO errors.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Itinerary has no segments
    #[error("itinerary must have at least one segment")]
    EmptyItinerary,

    /// Stops and segments don't line up
    #[error("itinerary with {stops} stops cannot hold {segments} segments")]
    SegmentCountMismatch { stops: usize, segments: usize },
}
