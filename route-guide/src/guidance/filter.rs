//! Position fix pre-filtering.
//!
//! The engine trusts every fix it is given. Callers that own the position
//! stream run fixes through a [`FixFilter`] first to drop imprecise, stale
//! or out-of-order readings.

use chrono::{DateTime, Duration, Utc};
use tracing::trace;

use crate::domain::PositionFix;

/// Default worst acceptable accuracy radius, in meters.
const DEFAULT_MAX_ACCURACY_M: f64 = 50.0;

/// Default oldest acceptable fix age, in seconds.
const DEFAULT_MAX_AGE_SECS: i64 = 10;

/// Configuration for [`FixFilter`].
#[derive(Debug, Clone)]
pub struct FixFilterConfig {
    /// Fixes with a larger accuracy radius are rejected.
    pub max_accuracy_m: f64,
    /// Fixes older than this relative to "now" are rejected.
    pub max_age: Duration,
}

impl FixFilterConfig {
    pub fn new(max_accuracy_m: f64, max_age: Duration) -> Self {
        Self {
            max_accuracy_m,
            max_age,
        }
    }
}

impl Default for FixFilterConfig {
    fn default() -> Self {
        Self {
            max_accuracy_m: DEFAULT_MAX_ACCURACY_M,
            max_age: Duration::seconds(DEFAULT_MAX_AGE_SECS),
        }
    }
}

/// Why a fix was dropped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FixRejection {
    #[error("accuracy {accuracy_m} m is worse than {max_m} m")]
    Inaccurate { accuracy_m: f64, max_m: f64 },

    #[error("fix is {age_ms} ms old")]
    Stale { age_ms: i64 },

    #[error("fix is not newer than the last accepted fix")]
    OutOfOrder,
}

/// Drops fixes the guidance engine should not see.
#[derive(Debug, Clone, Default)]
pub struct FixFilter {
    config: FixFilterConfig,
    last_accepted: Option<DateTime<Utc>>,
}

impl FixFilter {
    pub fn new(config: FixFilterConfig) -> Self {
        Self {
            config,
            last_accepted: None,
        }
    }

    /// Check `fix` against the filter at time `now`.
    ///
    /// An accepted fix becomes the reference for ordering.
    pub fn accept(&mut self, fix: &PositionFix, now: DateTime<Utc>) -> Result<(), FixRejection> {
        // NaN accuracy is treated as unknown, i.e. not trustworthy.
        if fix.horizontal_accuracy_m.is_nan() || fix.horizontal_accuracy_m > self.config.max_accuracy_m {
            trace!(accuracy_m = fix.horizontal_accuracy_m, "Dropping imprecise fix");
            return Err(FixRejection::Inaccurate {
                accuracy_m: fix.horizontal_accuracy_m,
                max_m: self.config.max_accuracy_m,
            });
        }

        let age = now - fix.timestamp;
        if age > self.config.max_age {
            trace!(age_ms = age.num_milliseconds(), "Dropping stale fix");
            return Err(FixRejection::Stale {
                age_ms: age.num_milliseconds(),
            });
        }

        if let Some(last) = self.last_accepted
            && fix.timestamp <= last
        {
            trace!(%last, timestamp = %fix.timestamp, "Dropping out-of-order fix");
            return Err(FixRejection::OutOfOrder);
        }

        self.last_accepted = Some(fix.timestamp);
        Ok(())
    }

    /// Forget the last accepted fix.
    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}
