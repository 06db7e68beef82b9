//! Live position fixes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Coordinate;

/// One fix from the position stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionFix {
    pub coordinate: Coordinate,
    /// Horizontal accuracy radius in meters (smaller is better).
    pub horizontal_accuracy_m: f64,
    pub timestamp: DateTime<Utc>,
}

impl PositionFix {
    pub fn new(coordinate: Coordinate, horizontal_accuracy_m: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            coordinate,
            horizontal_accuracy_m,
            timestamp,
        }
    }
}
