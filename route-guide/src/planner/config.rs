//! Aggregation configuration.

/// Default number of segment fetches in flight at once.
const DEFAULT_MAX_CONCURRENT_SEGMENTS: usize = 8;

/// Configuration parameters for itinerary aggregation.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Maximum number of segment fetches issued together.
    /// Segments are fetched in batches of this size, each batch joined
    /// before the next is issued. Zero is treated as one.
    pub max_concurrent_segments: usize,
}

impl AggregatorConfig {
    /// Create a new configuration with the given concurrency bound.
    pub fn new(max_concurrent_segments: usize) -> Self {
        Self {
            max_concurrent_segments,
        }
    }

    /// Set the concurrency bound.
    pub fn with_max_concurrent_segments(mut self, n: usize) -> Self {
        self.max_concurrent_segments = n;
        self
    }

    /// Effective batch size (never zero).
    pub fn batch_size(&self) -> usize {
        self.max_concurrent_segments.max(1)
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_segments: DEFAULT_MAX_CONCURRENT_SEGMENTS,
        }
    }
}
