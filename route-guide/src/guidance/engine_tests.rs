//! Unit tests for the guidance engine.

use super::*;
use crate::domain::{Route, RouteStep};
use crate::instructions::Locale;
use chrono::{TimeZone, Utc};

fn coord(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

/// Meters per degree of latitude, as measured by `Coordinate::distance_to`.
fn meters_per_degree() -> f64 {
    coord(0.0, 0.0).distance_to(&coord(1.0, 0.0))
}

fn fix(position: Coordinate) -> PositionFix {
    PositionFix::new(
        position,
        5.0,
        Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
    )
}

/// Maneuver points along the equator, `spacing_deg` apart.
fn equator(points: usize, spacing_deg: f64) -> Vec<Coordinate> {
    (0..points)
        .map(|i| coord(0.0, i as f64 * spacing_deg))
        .collect()
}

/// An itinerary with one step per leg between `points` plus an arrival step.
fn itinerary_through(points: &[Coordinate]) -> Arc<Itinerary> {
    let mut steps: Vec<RouteStep> = points
        .windows(2)
        .enumerate()
        .map(|(i, w)| {
            RouteStep::new(
                format!("Turn left onto Street {i}"),
                w[0].distance_to(&w[1]),
                vec![w[0], w[1]],
            )
        })
        .collect();
    let destination = points[points.len() - 1];
    steps.push(RouteStep::new("Arrive at destination", 0.0, vec![destination]));

    let distance = steps.iter().map(|s| s.distance).sum();
    let route = Route::new(points.to_vec(), steps, distance, distance / 10.0);
    Arc::new(Itinerary::new(vec![points[0], destination], vec![route]).unwrap())
}

fn started(points: &[Coordinate], config: GuidanceConfig) -> GuidanceEngine {
    let itinerary = itinerary_through(points);
    let destination = itinerary.destination();
    let mut engine = GuidanceEngine::new(config);
    engine.start_navigation(itinerary, destination);
    engine
}

#[test]
fn starts_idle() {
    let engine = GuidanceEngine::default();
    assert_eq!(engine.phase(), GuidancePhase::Idle);
    assert_eq!(engine.snapshot(), GuidanceSnapshot::default());
    assert!(engine.step_statuses().is_empty());
}

#[test]
fn start_uses_first_step() {
    let points = equator(4, 0.001);
    let engine = started(&points, GuidanceConfig::default());

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.phase, GuidancePhase::Navigating);
    assert!(snapshot.navigating);
    assert_eq!(snapshot.step_index, Some(0));
    assert_eq!(snapshot.step_count, 4);
    assert_eq!(snapshot.instruction.as_deref(), Some("Turn left onto Street 0"));
    assert_eq!(snapshot.next_instruction.as_deref(), Some("Turn left onto Street 1"));
    assert!(snapshot.distance_to_next_step_m.is_some());
    assert!(snapshot.eta.is_some());
}

#[test]
fn advances_one_step_per_qualifying_update() {
    let points = equator(5, 0.001);
    let mut engine = started(&points, GuidanceConfig::default());
    let step_count = engine.snapshot().step_count;

    // Each maneuver point once, in order; the last update reaches the destination.
    for (i, point) in points.iter().enumerate() {
        let events = engine.update_position(fix(*point));

        if i + 1 < step_count {
            assert_eq!(engine.current_step_index(), Some(i + 1));
            assert!(matches!(
                events.first(),
                Some(GuidanceEvent::StepAdvanced { index, .. }) if *index == i + 1
            ));
        } else {
            assert_eq!(engine.current_step_index(), Some(step_count));
            assert_eq!(events, vec![GuidanceEvent::Arrived]);
        }
    }

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.phase, GuidancePhase::Arrived);
    assert!(!snapshot.navigating);
    assert_eq!(
        snapshot.instruction.as_deref(),
        Some("You have arrived at your destination")
    );
    assert_eq!(snapshot.distance_to_next_step_m, None);
    assert_eq!(snapshot.eta, None);
    assert_eq!(snapshot.next_instruction, None);
}

#[test]
fn never_skips_a_step() {
    // Maneuver points 30 m apart: a fix can be near two of them at once.
    let spacing = 30.0 / meters_per_degree();
    let points = equator(4, spacing);
    let mut engine = started(&points, GuidanceConfig::default());

    engine.update_position(fix(points[1]));
    assert_eq!(engine.current_step_index(), Some(1));

    engine.update_position(fix(points[1]));
    assert_eq!(engine.current_step_index(), Some(2));
}

#[test]
fn far_fix_does_not_advance() {
    let points = equator(3, 0.01);
    let mut engine = started(&points, GuidanceConfig::default());

    let events = engine.update_position(fix(coord(0.0, 0.005)));
    assert!(events.is_empty());
    assert_eq!(engine.current_step_index(), Some(0));

    let snapshot = engine.snapshot();
    let expected = coord(0.0, 0.005).distance_to(&points[0]);
    assert!((snapshot.distance_to_next_step_m.unwrap() - expected).abs() < 1e-6);
}

#[test]
fn distance_refreshed_after_advance() {
    let points = equator(3, 0.001);
    let mut engine = started(&points, GuidanceConfig::default());

    engine.update_position(fix(points[0]));
    let distance = engine.snapshot().distance_to_next_step_m.unwrap();
    assert!((distance - points[0].distance_to(&points[1])).abs() < 1e-6);
}

#[test]
fn eta_uses_straight_line_to_destination() {
    let points = equator(3, 0.01);
    let mut engine = started(&points, GuidanceConfig::default().with_average_speed(36.0));

    let here = coord(0.0, 0.005);
    engine.update_position(fix(here));

    // 36 km/h is 10 m/s.
    let expected_ms = (here.distance_to(&points[2]) * 100.0).round() as i64;
    let eta_ms = engine.snapshot().eta.unwrap().num_milliseconds();
    assert!((eta_ms - expected_ms).abs() <= 1);
}

fn north_of(point: Coordinate, meters: f64) -> Coordinate {
    coord(point.lat() + meters / meters_per_degree(), point.lon())
}

#[test]
fn reroute_threshold_on_polyline() {
    let points = equator(3, 0.001);
    let mut engine = started(&points, GuidanceConfig::default());
    let midway = coord(0.0, 0.0015);

    assert_eq!(engine.check_off_route(north_of(midway, 99.0)), None);

    let off = north_of(midway, 101.0);
    assert_eq!(
        engine.check_off_route(off),
        Some(GuidanceEvent::RerouteRequested {
            from: off,
            to: points[2],
        })
    );
    assert!(engine.snapshot().reroute_pending);
}

#[test]
fn reroute_requested_once_per_itinerary() {
    let points = equator(3, 0.001);
    let mut engine = started(&points, GuidanceConfig::default());
    let off = north_of(coord(0.0, 0.0015), 300.0);

    let first = engine.update_position(fix(off));
    assert!(
        first
            .iter()
            .any(|e| matches!(e, GuidanceEvent::RerouteRequested { .. }))
    );

    let second = engine.update_position(fix(off));
    assert!(
        !second
            .iter()
            .any(|e| matches!(e, GuidanceEvent::RerouteRequested { .. }))
    );
    assert_eq!(engine.check_off_route(off), None);

    // A fresh itinerary rearms the check.
    engine.replace_itinerary(itinerary_through(&points));
    assert!(!engine.snapshot().reroute_pending);
    assert!(engine.check_off_route(off).is_some());
}

#[test]
fn reference_point_measure() {
    let points = equator(3, 0.01);
    let config = GuidanceConfig::default().with_off_route_measure(OffRouteMeasure::ReferencePoint);
    let mut engine = started(&points, config);

    // On the polyline, but far from the current step's maneuver point.
    assert!(engine.check_off_route(coord(0.0, 0.005)).is_some());
}

#[test]
fn polyline_measure_accepts_points_along_the_route() {
    let points = equator(3, 0.01);
    let mut engine = started(&points, GuidanceConfig::default());
    assert_eq!(engine.check_off_route(coord(0.0, 0.005)), None);
}

#[test]
fn off_route_check_can_be_left_to_the_caller() {
    let points = equator(3, 0.001);
    let config = GuidanceConfig::default().with_off_route_every_tick(false);
    let mut engine = started(&points, config);

    let events = engine.update_position(fix(north_of(coord(0.0, 0.0015), 500.0)));
    assert!(events.is_empty());
    assert!(!engine.snapshot().reroute_pending);
}

#[test]
fn announcements_follow_the_bands() {
    let points = equator(3, 0.005);
    let mut engine = started(&points, GuidanceConfig::default());

    engine.update_position(fix(points[0]));
    assert_eq!(engine.current_step_index(), Some(1));

    let target = points[1];
    let mut announced = Vec::new();
    for d in [245.0, 195.0, 175.0, 120.0, 95.0, 85.0, 60.0, 45.0, 35.0, 25.0] {
        let here = coord(0.0, target.lon() - d / meters_per_degree());
        for event in engine.update_position(fix(here)) {
            if let GuidanceEvent::InstructionDue { band, step, .. } = event {
                assert_eq!(step, 1);
                announced.push((band, d));
            }
        }
    }

    assert_eq!(
        announced,
        vec![
            (ProximityBand::Far, 195.0),
            (ProximityBand::Near, 95.0),
            (ProximityBand::Imminent, 45.0)
        ]
    );
}

#[test]
fn approach_in_meter_steps_announces_each_band_once() {
    let points = equator(3, 0.005);
    let mut engine = started(&points, GuidanceConfig::default());
    engine.update_position(fix(points[0]));

    let target = points[1];
    let mut bands = Vec::new();
    let mut advanced_at = None;
    for d in (0..=250).rev() {
        let here = coord(0.0, target.lon() - f64::from(d) / meters_per_degree());
        for event in engine.update_position(fix(here)) {
            match event {
                GuidanceEvent::InstructionDue { band, step: 1, .. } => bands.push(band),
                GuidanceEvent::StepAdvanced { index: 2, .. } if advanced_at.is_none() => {
                    advanced_at = Some(d)
                }
                _ => {}
            }
        }
    }

    assert_eq!(
        bands,
        vec![ProximityBand::Far, ProximityBand::Near, ProximityBand::Imminent]
    );
    // The advance radius is exclusive, so the step changes just inside 50 m.
    assert!(matches!(advanced_at, Some(49 | 50)), "advanced at {advanced_at:?}");
}

#[test]
fn imminent_announcement_precedes_the_advance() {
    let points = equator(3, 0.005);
    let mut engine = started(&points, GuidanceConfig::default());
    engine.update_position(fix(points[0]));

    let here = coord(0.0, points[1].lon() - 40.0 / meters_per_degree());
    let events = engine.update_position(fix(here));

    assert!(matches!(
        events.as_slice(),
        [
            GuidanceEvent::InstructionDue {
                band: ProximityBand::Imminent,
                step: 1,
                ..
            },
            GuidanceEvent::StepAdvanced { index: 2, .. },
        ]
    ));
}

#[test]
fn announcements_rearm_after_advance() {
    let points = equator(3, 0.005);
    let config = GuidanceConfig::default().with_advance_threshold(20.0);
    let mut engine = started(&points, config);
    let per_degree = meters_per_degree();

    engine.update_position(fix(coord(0.0, -45.0 / per_degree)));
    engine.update_position(fix(points[0]));

    let events = engine.update_position(fix(coord(0.0, points[1].lon() - 45.0 / per_degree)));
    assert!(events.iter().any(|e| matches!(
        e,
        GuidanceEvent::InstructionDue {
            band: ProximityBand::Imminent,
            step: 1,
            ..
        }
    )));
}

#[test]
fn zero_step_itinerary_arrives_immediately() {
    let a = coord(0.0, 0.0);
    let b = coord(0.0, 0.001);
    let route = Route::new(vec![a, b], Vec::new(), 111.0, 80.0);
    let itinerary = Arc::new(Itinerary::new(vec![a, b], vec![route]).unwrap());

    let mut engine = GuidanceEngine::default();
    engine.start_navigation(itinerary, b);

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.phase, GuidancePhase::Arrived);
    assert_eq!(snapshot.step_index, Some(0));
    assert_eq!(
        snapshot.instruction.as_deref(),
        Some("You have arrived at your destination")
    );
    assert!(engine.update_position(fix(a)).is_empty());
}

#[test]
fn updates_ignored_unless_navigating() {
    let mut engine = GuidanceEngine::default();
    assert!(engine.update_position(fix(coord(0.0, 0.0))).is_empty());
    assert_eq!(engine.check_off_route(coord(10.0, 10.0)), None);
    assert_eq!(engine.phase(), GuidancePhase::Idle);
}

#[test]
fn complete_navigation_clears_state() {
    let points = equator(3, 0.001);
    let mut engine = started(&points, GuidanceConfig::default());
    engine.update_position(fix(points[0]));

    engine.complete_navigation();

    assert_eq!(engine.phase(), GuidancePhase::Idle);
    assert_eq!(engine.snapshot(), GuidanceSnapshot::default());
    assert!(engine.itinerary().is_none());
    assert!(engine.update_position(fix(points[1])).is_empty());
}

#[test]
fn start_replaces_previous_session() {
    let points = equator(4, 0.001);
    let mut engine = started(&points, GuidanceConfig::default());
    engine.update_position(fix(points[0]));
    engine.update_position(fix(points[1]));
    assert_eq!(engine.current_step_index(), Some(2));

    let other = equator(2, 0.002);
    let itinerary = itinerary_through(&other);
    engine.start_navigation(itinerary.clone(), other[1]);

    assert_eq!(engine.current_step_index(), Some(0));
    assert_eq!(engine.destination(), Some(other[1]));
    assert!(Arc::ptr_eq(engine.itinerary().unwrap(), &itinerary));
}

#[test]
fn replace_itinerary_keeps_destination() {
    let points = equator(3, 0.001);
    let mut engine = started(&points, GuidanceConfig::default());
    engine.update_position(fix(points[0]));

    let detour = vec![coord(0.0005, 0.0005), coord(0.0005, 0.002), points[2]];
    engine.replace_itinerary(itinerary_through(&detour));

    assert_eq!(engine.phase(), GuidancePhase::Navigating);
    assert_eq!(engine.current_step_index(), Some(0));
    assert_eq!(engine.destination(), Some(points[2]));
    assert!(engine.snapshot().last_fix.is_some());
}

#[test]
fn replace_itinerary_ignored_when_idle() {
    let mut engine = GuidanceEngine::default();
    engine.replace_itinerary(itinerary_through(&equator(2, 0.001)));
    assert_eq!(engine.phase(), GuidancePhase::Idle);
    assert!(engine.itinerary().is_none());
}

#[test]
fn step_statuses_track_progress() {
    let points = equator(3, 0.001);
    let mut engine = started(&points, GuidanceConfig::default());
    engine.update_position(fix(points[0]));

    let statuses: Vec<StepStatus> = engine.step_statuses().iter().map(|s| s.status).collect();
    assert_eq!(
        statuses,
        vec![StepStatus::Done, StepStatus::Current, StepStatus::Pending]
    );

    engine.update_position(fix(points[1]));
    engine.update_position(fix(points[2]));
    assert!(
        engine
            .step_statuses()
            .iter()
            .all(|s| s.status == StepStatus::Done)
    );
}

#[test]
fn localized_instructions() {
    let points = equator(3, 0.001);
    let mut engine = started(&points, GuidanceConfig::default().with_locale(Locale::French));

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.instruction.as_deref(), Some("Tournez à gauche sur Street 0"));
    assert_eq!(engine.step_statuses()[2].instruction, "Vous êtes arrivé à destination");

    engine.update_position(fix(points[0]));
    engine.update_position(fix(points[1]));
    engine.update_position(fix(points[2]));
    assert_eq!(
        engine.snapshot().instruction.as_deref(),
        Some("Vous êtes arrivé à destination")
    );
}

#[test]
fn subscribers_see_every_change() {
    let points = equator(3, 0.001);
    let mut engine = GuidanceEngine::default();
    let mut rx = engine.subscribe();
    assert!(!rx.has_changed().unwrap());

    let itinerary = itinerary_through(&points);
    engine.start_navigation(itinerary, points[2]);
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().phase, GuidancePhase::Navigating);

    engine.update_position(fix(points[0]));
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().step_index, Some(1));

    engine.complete_navigation();
    assert_eq!(*rx.borrow_and_update(), GuidanceSnapshot::default());
}

#[test]
fn snapshot_serializes_for_presentation() {
    let points = equator(3, 0.001);
    let mut engine = started(&points, GuidanceConfig::default().with_average_speed(36.0));
    engine.update_position(fix(coord(0.0, 0.0005)));

    let snapshot = engine.snapshot();
    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["phase"], "navigating");
    assert_eq!(json["step_index"], 0);
    assert_eq!(json["navigating"], true);
    assert_eq!(json["instruction"], "Turn left onto Street 0");

    let eta_ms = snapshot.eta.unwrap().num_milliseconds();
    assert_eq!(json["eta_secs"].as_f64().unwrap(), eta_ms as f64 / 1000.0);

    let last_fix = &json["last_fix"];
    assert_eq!(last_fix["coordinate"]["lat"], 0.0);
    assert_eq!(last_fix["coordinate"]["lon"], 0.0005);
    assert_eq!(last_fix["horizontal_accuracy_m"], 5.0);
    let timestamp: chrono::DateTime<Utc> = last_fix["timestamp"].as_str().unwrap().parse().unwrap();
    assert_eq!(timestamp, Utc.timestamp_opt(1_700_000_000, 0).unwrap());

    let idle = serde_json::to_value(GuidanceSnapshot::default()).unwrap();
    assert!(idle["eta_secs"].is_null());
    assert!(idle["last_fix"].is_null());
}

#[test]
fn step_views_serialize_with_status() {
    let points = equator(3, 0.001);
    let mut engine = started(&points, GuidanceConfig::default());
    engine.update_position(fix(points[0]));

    let json = serde_json::to_value(engine.step_statuses()).unwrap();
    assert_eq!(json[0]["status"], "done");
    assert_eq!(json[1]["status"], "current");
    assert_eq!(json[1]["instruction"], "Turn left onto Street 1");
    assert_eq!(json[2]["status"], "pending");
}
