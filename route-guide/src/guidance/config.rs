//! Guidance configuration.

use chrono::Duration;

use crate::instructions::Locale;

/// Default radius within which a maneuver point counts as reached, in meters.
const DEFAULT_ADVANCE_THRESHOLD_M: f64 = 50.0;

/// Default distance from the route beyond which a reroute is requested, in meters.
const DEFAULT_OFF_ROUTE_THRESHOLD_M: f64 = 100.0;

/// Default speed used for the ETA estimate.
const DEFAULT_AVERAGE_SPEED_KMH: f64 = 40.0;

/// How the traveler's distance from the route is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OffRouteMeasure {
    /// Distance to the nearest point of the itinerary polyline.
    #[default]
    Polyline,
    /// Distance to the current step's maneuver point only.
    ReferencePoint,
}

/// Configuration parameters for turn-by-turn guidance.
#[derive(Debug, Clone)]
pub struct GuidanceConfig {
    /// A step's maneuver point closer than this (meters) advances guidance.
    pub advance_threshold_m: f64,

    /// Deviation strictly greater than this (meters) requests a reroute.
    pub off_route_threshold_m: f64,

    /// Assumed average speed for the ETA, in km/h.
    pub average_speed_kmh: f64,

    /// Distance measure for the off-route check.
    pub off_route_measure: OffRouteMeasure,

    /// Run the off-route check on every position update.
    /// When false the caller invokes it at its own cadence.
    pub check_off_route_every_tick: bool,

    /// Language of instruction text.
    pub locale: Locale,
}

impl GuidanceConfig {
    /// Set the advance threshold.
    pub fn with_advance_threshold(mut self, meters: f64) -> Self {
        self.advance_threshold_m = meters;
        self
    }

    /// Set the off-route threshold.
    pub fn with_off_route_threshold(mut self, meters: f64) -> Self {
        self.off_route_threshold_m = meters;
        self
    }

    /// Set the average speed used for ETA.
    pub fn with_average_speed(mut self, kmh: f64) -> Self {
        self.average_speed_kmh = kmh;
        self
    }

    pub fn with_off_route_measure(mut self, measure: OffRouteMeasure) -> Self {
        self.off_route_measure = measure;
        self
    }

    pub fn with_off_route_every_tick(mut self, enabled: bool) -> Self {
        self.check_off_route_every_tick = enabled;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Time to cover `distance_m` at the average speed.
    ///
    /// `None` if the configured speed is not positive.
    pub fn eta_for(&self, distance_m: f64) -> Option<Duration> {
        if self.average_speed_kmh.is_nan() || self.average_speed_kmh <= 0.0 {
            return None;
        }
        let meters_per_sec = self.average_speed_kmh / 3.6;
        let secs = distance_m.max(0.0) / meters_per_sec;
        Some(Duration::milliseconds((secs * 1000.0).round() as i64))
    }
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            advance_threshold_m: DEFAULT_ADVANCE_THRESHOLD_M,
            off_route_threshold_m: DEFAULT_OFF_ROUTE_THRESHOLD_M,
            average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
            off_route_measure: OffRouteMeasure::default(),
            check_off_route_every_tick: true,
            locale: Locale::default(),
        }
    }
}
