//! Mock directions client for testing without a routing server.
//!
//! Serves canned routes per (origin, destination) pair, optionally after a
//! simulated delay or as a simulated provider failure. Responses can be
//! registered in code or loaded from a JSON fixture file.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Deserialize;

use crate::domain::{Coordinate, Route, RouteStep, TravelMode};

use super::error::DirectionsError;
use super::provider::DirectionsClient;

/// Exact bit pattern of an (origin, destination) pair.
type PairKey = [u64; 4];

fn pair_key(origin: &Coordinate, destination: &Coordinate) -> PairKey {
    [
        origin.lat().to_bits(),
        origin.lon().to_bits(),
        destination.lat().to_bits(),
        destination.lon().to_bits(),
    ]
}

#[derive(Debug, Clone)]
enum Outcome {
    Routes(Vec<Route>),
    Failure { status: u16, message: String },
}

#[derive(Debug, Clone)]
struct Entry {
    outcome: Outcome,
    delay: Duration,
}

/// A request as seen by the mock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub mode: TravelMode,
    pub allow_alternates: bool,
}

/// Mock directions client with canned per-pair responses.
///
/// Pairs without a registered response return an empty candidate list, the
/// same way a provider reports "no route".
#[derive(Debug, Clone, Default)]
pub struct MockDirectionsClient {
    entries: HashMap<PairKey, Entry>,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockDirectionsClient {
    /// Create a mock with no responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `routes` (best first) for the pair.
    pub fn with_routes(mut self, from: Coordinate, to: Coordinate, routes: Vec<Route>) -> Self {
        self.insert(from, to, Outcome::Routes(routes));
        self
    }

    /// Serve a single route for the pair.
    pub fn with_route(self, from: Coordinate, to: Coordinate, route: Route) -> Self {
        self.with_routes(from, to, vec![route])
    }

    /// Fail requests for the pair with the given status.
    pub fn with_failure(
        mut self,
        from: Coordinate,
        to: Coordinate,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        self.insert(
            from,
            to,
            Outcome::Failure {
                status,
                message: message.into(),
            },
        );
        self
    }

    /// Delay responses for the pair. Applies to whatever outcome is registered.
    pub fn with_delay(mut self, from: Coordinate, to: Coordinate, delay: Duration) -> Self {
        self.entries
            .entry(pair_key(&from, &to))
            .or_insert_with(|| Entry {
                outcome: Outcome::Routes(Vec::new()),
                delay: Duration::ZERO,
            })
            .delay = delay;
        self
    }

    fn insert(&mut self, from: Coordinate, to: Coordinate, outcome: Outcome) {
        let entry = self
            .entries
            .entry(pair_key(&from, &to))
            .or_insert_with(|| Entry {
                outcome: Outcome::Routes(Vec::new()),
                delay: Duration::ZERO,
            });
        entry.outcome = outcome;
    }

    /// Number of requests served so far (shared between clones).
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request served so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Load responses from a JSON fixture file.
    ///
    /// ```json
    /// {"segments": [{
    ///     "from": [0.0, 0.0], "to": [0.0, 0.001], "delay_ms": 20,
    ///     "routes": [{"distance": 100, "duration": 60,
    ///                 "geometry": [[0.0, 0.0], [0.0, 0.001]],
    ///                 "steps": [{"instruction": "Turn left", "distance": 100,
    ///                            "geometry": [[0.0, 0.0], [0.0, 0.001]]}]}]
    /// }]}
    /// ```
    ///
    /// Positions are `[lat, lon]`. A segment may carry
    /// `"error": {"status": 503, "message": "..."}` instead of routes.
    pub fn from_fixture_file(path: impl AsRef<Path>) -> Result<Self, DirectionsError> {
        let path = path.as_ref();

        let json = std::fs::read_to_string(path).map_err(|source| DirectionsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let fixture: FixtureFile = serde_json::from_str(&json).map_err(|e| DirectionsError::Json {
            message: format!("Failed to parse {:?}: {}", path, e),
            body: None,
        })?;

        let mut mock = Self::new();
        for segment in fixture.segments {
            let from = fixture_coordinate(segment.from)?;
            let to = fixture_coordinate(segment.to)?;

            mock = match segment.error {
                Some(err) => mock.with_failure(from, to, err.status, err.message),
                None => {
                    let routes = segment
                        .routes
                        .into_iter()
                        .map(FixtureRoute::into_route)
                        .collect::<Result<Vec<_>, _>>()?;
                    mock.with_routes(from, to, routes)
                }
            };

            if segment.delay_ms > 0 {
                mock = mock.with_delay(from, to, Duration::from_millis(segment.delay_ms));
            }
        }

        Ok(mock)
    }
}

impl DirectionsClient for MockDirectionsClient {
    async fn request(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
        allow_alternates: bool,
    ) -> Result<Vec<Route>, DirectionsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                origin,
                destination,
                mode,
                allow_alternates,
            });
        }

        let Some(entry) = self.entries.get(&pair_key(&origin, &destination)).cloned() else {
            return Ok(Vec::new());
        };

        if !entry.delay.is_zero() {
            tokio::time::sleep(entry.delay).await;
        }

        match entry.outcome {
            Outcome::Routes(mut routes) => {
                if !allow_alternates {
                    routes.truncate(1);
                }
                Ok(routes)
            }
            Outcome::Failure { status, message } => Err(DirectionsError::Api { status, message }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    segments: Vec<FixtureSegment>,
}

#[derive(Debug, Deserialize)]
struct FixtureSegment {
    from: [f64; 2],
    to: [f64; 2],
    #[serde(default)]
    delay_ms: u64,
    #[serde(default)]
    routes: Vec<FixtureRoute>,
    error: Option<FixtureError>,
}

#[derive(Debug, Deserialize)]
struct FixtureError {
    status: u16,
    message: String,
}

#[derive(Debug, Deserialize)]
struct FixtureRoute {
    distance: f64,
    duration: f64,
    #[serde(default)]
    geometry: Vec<[f64; 2]>,
    #[serde(default)]
    steps: Vec<FixtureStep>,
}

#[derive(Debug, Deserialize)]
struct FixtureStep {
    instruction: String,
    distance: f64,
    #[serde(default)]
    geometry: Vec<[f64; 2]>,
}

impl FixtureRoute {
    fn into_route(self) -> Result<Route, DirectionsError> {
        let geometry = fixture_line(self.geometry)?;
        let steps = self
            .steps
            .into_iter()
            .map(|s| Ok(RouteStep::new(s.instruction, s.distance, fixture_line(s.geometry)?)))
            .collect::<Result<Vec<_>, DirectionsError>>()?;
        Ok(Route::new(geometry, steps, self.distance, self.duration))
    }
}

fn fixture_line(points: Vec<[f64; 2]>) -> Result<Vec<Coordinate>, DirectionsError> {
    points.into_iter().map(fixture_coordinate).collect()
}

fn fixture_coordinate([lat, lon]: [f64; 2]) -> Result<Coordinate, DirectionsError> {
    Coordinate::new(lat, lon).map_err(|e| DirectionsError::Json {
        message: e.to_string(),
        body: None,
    })
}
