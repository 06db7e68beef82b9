//! Multi-stop route aggregation.
//!
//! This module turns an ordered stop list into a single itinerary:
//! "I'm here and want to visit these places in order - what is the route?"
//!
//! Each consecutive pair of stops is an independent segment. Segments are
//! fetched concurrently and reassembled in stop order; any failure fails the
//! whole itinerary.

mod aggregate;
mod config;
mod error;
mod fetcher;

pub use aggregate::RouteAggregator;
pub use config::AggregatorConfig;
pub use error::RoutingError;
pub use fetcher::SegmentFetcher;
