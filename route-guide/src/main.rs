use std::process::ExitCode;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use route_guide::directions::{
    DirectionsClient, DirectionsConfig, HttpDirectionsClient, MockDirectionsClient,
};
use route_guide::domain::{Coordinate, PositionFix, TravelMode};
use route_guide::guidance::{
    FixFilter, FixFilterConfig, GuidanceConfig, GuidanceEngine, GuidanceEvent,
};
use route_guide::instructions::Locale;
use route_guide::planner::{AggregatorConfig, RouteAggregator};

const USAGE: &str = "\
Usage: route-guide [--driving] [--locale CODE] [--fixture FILE] START STOP [STOP...]

Points are given as lat,lon. Without --fixture the provider configured by
DIRECTIONS_BASE_URL (and DIRECTIONS_API_KEY) is queried.";

/// Parsed command line.
struct Args {
    mode: TravelMode,
    locale: Locale,
    fixture: Option<String>,
    start: Coordinate,
    stops: Vec<Coordinate>,
}

fn parse_args(raw: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut mode = TravelMode::Walking;
    let mut locale = std::env::var("LANG")
        .ok()
        .and_then(|lang| lang.parse().ok())
        .unwrap_or_default();
    let mut fixture = None;
    let mut points = Vec::new();

    let mut raw = raw.into_iter();
    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--driving" => mode = TravelMode::Driving,
            "--walking" => mode = TravelMode::Walking,
            "--locale" => {
                let code = raw.next().ok_or("--locale needs a value")?;
                locale = code.parse().map_err(|e| format!("{e}"))?;
            }
            "--fixture" => fixture = Some(raw.next().ok_or("--fixture needs a path")?),
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ => points.push(parse_point(&arg)?),
        }
    }

    let mut points = points.into_iter();
    let start = points.next().ok_or_else(|| USAGE.to_string())?;
    let stops: Vec<Coordinate> = points.collect();
    if stops.is_empty() {
        return Err(USAGE.to_string());
    }

    Ok(Args {
        mode,
        locale,
        fixture,
        start,
        stops,
    })
}

fn parse_point(s: &str) -> Result<Coordinate, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected lat,lon, got {s:?}"))?;
    let lat: f64 = lat.trim().parse().map_err(|_| format!("bad latitude in {s:?}"))?;
    let lon: f64 = lon.trim().parse().map_err(|_| format!("bad longitude in {s:?}"))?;
    Coordinate::new(lat, lon).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    let result = match &args.fixture {
        Some(path) => match MockDirectionsClient::from_fixture_file(path) {
            Ok(client) => run(client, &args).await,
            Err(e) => Err(e.to_string()),
        },
        None => {
            let config = DirectionsConfig::from_env();
            info!(base_url = %config.base_url, "Using directions provider");
            match HttpDirectionsClient::new(config) {
                Ok(client) => run(client, &args).await,
                Err(e) => Err(e.to_string()),
            }
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

/// Compute the itinerary, then replay guidance along its maneuver points.
async fn run<C: DirectionsClient>(client: C, args: &Args) -> Result<(), String> {
    let aggregator = RouteAggregator::new(client, AggregatorConfig::default());

    let itinerary = aggregator
        .compute_itinerary(args.start, &args.stops, args.mode)
        .await
        .map_err(|e| e.to_string())?;
    let itinerary = Arc::new(itinerary);

    println!(
        "Route: {} stops, {:.0} m, {} min, {} steps",
        itinerary.stops().len(),
        itinerary.total_distance(),
        itinerary.total_duration().num_minutes(),
        itinerary.step_count()
    );

    let mut engine = GuidanceEngine::new(GuidanceConfig::default().with_locale(args.locale));
    let destination = itinerary.destination();
    engine.start_navigation(itinerary.clone(), destination);

    for view in engine.step_statuses() {
        println!("  {:>3}. {} ({:.0} m)", view.index + 1, view.instruction, view.distance_m);
    }
    println!();

    let mut filter = FixFilter::new(FixFilterConfig::default());
    let started = Utc::now();

    // One simulated fix per maneuver point, one second apart.
    let mut replay: Vec<Coordinate> = itinerary
        .steps()
        .iter()
        .filter_map(|step| step.anchor().copied())
        .collect();
    replay.push(destination);

    for (tick, position) in replay.into_iter().enumerate() {
        let now = started + Duration::seconds(tick as i64);
        let fix = PositionFix::new(position, 5.0, now);
        if let Err(reason) = filter.accept(&fix, now) {
            warn!(%reason, "Skipping fix");
            continue;
        }

        for event in engine.update_position(fix) {
            match event {
                GuidanceEvent::StepAdvanced { index, instruction } => {
                    println!("[step {}] {}", index + 1, instruction);
                }
                GuidanceEvent::InstructionDue {
                    distance_m,
                    instruction,
                    ..
                } => {
                    println!("  in {distance_m:.0} m: {instruction}");
                }
                GuidanceEvent::RerouteRequested { from, to } => {
                    let rerouted = aggregator
                        .compute_reroute(from, to, args.mode)
                        .await
                        .map_err(|e| e.to_string())?;
                    engine.replace_itinerary(Arc::new(rerouted));
                }
                GuidanceEvent::Arrived => {}
            }
        }

        if let Some(eta) = engine.snapshot().eta {
            println!("  eta {} s", eta.num_seconds());
        }
    }

    let snapshot = engine.snapshot();
    if let Some(instruction) = snapshot.instruction {
        println!("{instruction}");
    }
    engine.complete_navigation();

    Ok(())
}
