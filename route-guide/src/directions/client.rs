//! HTTP directions client for OSRM-compatible route APIs.
//!
//! Issues `GET {base}/route/v1/{profile}/{lon},{lat};{lon},{lat}` with
//! `steps=true`, GeoJSON geometries and full overview, then converts the
//! response into domain routes. A semaphore limits concurrent requests so
//! a long itinerary cannot flood the provider.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use tokio::sync::Semaphore;
use tracing::{debug, trace};

use crate::domain::{Coordinate, Route, TravelMode};

use super::convert::convert_route_response;
use super::error::DirectionsError;
use super::provider::DirectionsClient;
use super::types::RouteResponse;

/// Default base URL: the public OSRM demo server.
const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "DIRECTIONS_BASE_URL";

/// Environment variable holding the API key, if the provider needs one.
pub const API_KEY_ENV: &str = "DIRECTIONS_API_KEY";

/// Provider codes meaning "request was fine, there is just no route".
const NO_ROUTE_CODES: &[&str] = &["NoRoute", "NoSegment"];

/// Configuration for the HTTP directions client.
#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    /// Base URL for the API (no trailing slash)
    pub base_url: String,
    /// API key sent as `x-api-key`, if any
    pub api_key: Option<String>,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DirectionsConfig {
    /// Create a new config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Build a config from `DIRECTIONS_BASE_URL` and `DIRECTIONS_API_KEY`.
    ///
    /// Unset or empty variables fall back to defaults.
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut config = Self::new(base_url);
        if let Ok(key) = std::env::var(API_KEY_ENV)
            && !key.is_empty()
        {
            config = config.with_api_key(key);
        }
        config
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Directions client speaking the OSRM route API.
#[derive(Debug, Clone)]
pub struct HttpDirectionsClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl HttpDirectionsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: DirectionsConfig) -> Result<Self, DirectionsError> {
        if config.max_concurrent == 0 {
            return Err(DirectionsError::InvalidConfig(
                "max_concurrent must be at least 1".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| {
                DirectionsError::InvalidConfig("invalid API key format".to_string())
            })?;
            headers.insert("x-api-key", value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    fn route_url(&self, origin: &Coordinate, destination: &Coordinate, mode: TravelMode) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.base_url,
            mode.profile(),
            origin.lon(),
            origin.lat(),
            destination.lon(),
            destination.lat()
        )
    }

    async fn fetch(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
        allow_alternates: bool,
    ) -> Result<Vec<Route>, DirectionsError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| DirectionsError::Internal("request limiter closed".to_string()))?;

        let url = self.route_url(&origin, &destination, mode);
        trace!(%url, allow_alternates, "Requesting route");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("steps", "true"),
                ("geometries", "geojson"),
                ("overview", "full"),
                ("alternatives", if allow_alternates { "true" } else { "false" }),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let routes = interpret_response(status.as_u16(), &body)?;
        debug!(
            %origin,
            %destination,
            candidates = routes.len(),
            "Route request complete"
        );
        Ok(routes)
    }
}

impl DirectionsClient for HttpDirectionsClient {
    async fn request(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
        allow_alternates: bool,
    ) -> Result<Vec<Route>, DirectionsError> {
        self.fetch(origin, destination, mode, allow_alternates).await
    }
}

/// Map an HTTP status and body to routes or an error.
///
/// OSRM reports "no route" as an error code (with HTTP 400); that case is
/// an empty candidate list, not an error.
pub(crate) fn interpret_response(status: u16, body: &str) -> Result<Vec<Route>, DirectionsError> {
    match status {
        401 | 403 => return Err(DirectionsError::Unauthorized),
        429 => return Err(DirectionsError::RateLimited),
        _ => {}
    }

    let parsed: Result<RouteResponse, _> = serde_json::from_str(body);

    if !(200..300).contains(&status) {
        return match parsed {
            Ok(r) if NO_ROUTE_CODES.contains(&r.code.as_str()) => Ok(Vec::new()),
            Ok(r) => Err(DirectionsError::Api {
                status,
                message: r.message.unwrap_or(r.code),
            }),
            Err(_) => Err(DirectionsError::Api {
                status,
                message: body.chars().take(500).collect(),
            }),
        };
    }

    let response = parsed.map_err(|e| DirectionsError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })?;

    if NO_ROUTE_CODES.contains(&response.code.as_str()) {
        return Ok(Vec::new());
    }

    if response.code != "Ok" {
        return Err(DirectionsError::Api {
            status,
            message: response.message.unwrap_or(response.code),
        });
    }

    Ok(convert_route_response(&response)?)
}
