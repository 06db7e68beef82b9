//! Turn-by-turn guidance state machine.
//!
//! The engine owns all guidance state and changes it only through its entry
//! points. Every entry point runs to completion and then publishes a fresh
//! [`GuidanceSnapshot`] on a watch channel, so presentation code can either
//! poll [`GuidanceEngine::snapshot`] or subscribe.
//!
//! Phases: `Idle -> Navigating -> Arrived`, `Navigating -> Idle` on
//! [`complete_navigation`](GuidanceEngine::complete_navigation), and
//! `Navigating -> Navigating` when a reroute result is fed back through
//! [`replace_itinerary`](GuidanceEngine::replace_itinerary). The engine never
//! computes routes itself; it only asks for them.

use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::domain::{Coordinate, Itinerary, PositionFix, geometry};
use crate::instructions::InstructionFormatter;

use super::config::{GuidanceConfig, OffRouteMeasure};
use super::trigger::{InstructionTrigger, ProximityBand};

/// Where the engine is in a navigation session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuidancePhase {
    #[default]
    Idle,
    Navigating,
    Arrived,
}

/// Something the caller should act on, produced by a single update.
#[derive(Debug, Clone, PartialEq)]
pub enum GuidanceEvent {
    /// Guidance moved to step `index`.
    StepAdvanced { index: usize, instruction: String },

    /// The current instruction should be announced.
    InstructionDue {
        step: usize,
        band: ProximityBand,
        distance_m: f64,
        instruction: String,
    },

    /// The traveler left the route. The caller computes a new itinerary
    /// from `from` to `to` and feeds it back with `replace_itinerary`.
    RerouteRequested { from: Coordinate, to: Coordinate },

    /// The destination was reached.
    Arrived,
}

/// Progress of one step in the debug view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Done,
    Current,
    Pending,
}

/// A step of the active itinerary, annotated for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    pub index: usize,
    /// Localized instruction.
    pub instruction: String,
    /// Step length in meters.
    pub distance_m: f64,
    pub status: StepStatus,
}

/// Everything the presentation layer shows, at one point in time.
///
/// `None` stands for "unknown" (no session, no fix yet, or arrived).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GuidanceSnapshot {
    pub phase: GuidancePhase,
    /// Current step; equals `step_count` once arrived.
    pub step_index: Option<usize>,
    pub step_count: usize,
    pub instruction: Option<String>,
    /// The instruction after the current one, or the arrival message on the last step.
    pub next_instruction: Option<String>,
    pub distance_to_next_step_m: Option<f64>,
    #[serde(rename = "eta_secs", serialize_with = "serialize_eta")]
    pub eta: Option<Duration>,
    pub navigating: bool,
    pub reroute_pending: bool,
    pub last_fix: Option<PositionFix>,
}

/// ETA as fractional seconds.
fn serialize_eta<S>(eta: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    eta.map(|d| d.num_milliseconds() as f64 / 1000.0)
        .serialize(serializer)
}

/// State of the active session.
#[derive(Debug, Clone)]
struct Session {
    itinerary: Arc<Itinerary>,
    destination: Coordinate,
    /// Within `[0, step_count]`; `step_count` means arrived.
    step_index: usize,
    instruction: String,
    next_instruction: Option<String>,
    distance_to_next_step: Option<f64>,
    eta: Option<Duration>,
    last_fix: Option<PositionFix>,
    reroute_pending: bool,
}

impl Session {
    fn new(itinerary: Arc<Itinerary>, destination: Coordinate) -> Self {
        Self {
            itinerary,
            destination,
            step_index: 0,
            instruction: String::new(),
            next_instruction: None,
            distance_to_next_step: None,
            eta: None,
            last_fix: None,
            reroute_pending: false,
        }
    }

    fn step_count(&self) -> usize {
        self.itinerary.step_count()
    }

    fn is_last_step(&self) -> bool {
        self.step_index + 1 >= self.step_count()
    }

    /// Move to `index` (which must be a real step) and refresh instruction texts.
    fn enter_step(&mut self, index: usize, formatter: &InstructionFormatter) {
        let steps = self.itinerary.steps();
        self.step_index = index;
        self.instruction = formatter.format(&steps[index].instruction);
        self.next_instruction = Some(match steps.get(index + 1) {
            Some(next) => formatter.format(&next.instruction),
            None => formatter.arrival_text().to_string(),
        });
    }

    /// The current step's maneuver point.
    fn anchor(&self) -> Coordinate {
        self.itinerary
            .steps()
            .get(self.step_index)
            .and_then(|step| step.anchor())
            .copied()
            .unwrap_or(self.destination)
    }

    /// The point whose proximity completes the current step.
    ///
    /// On the last step that is the destination itself.
    fn target(&self) -> Coordinate {
        if self.is_last_step() {
            self.destination
        } else {
            self.anchor()
        }
    }

    /// Distance from `position` to the route, in meters.
    fn deviation(&self, position: &Coordinate, measure: OffRouteMeasure) -> f64 {
        match measure {
            OffRouteMeasure::Polyline => {
                geometry::distance_to_polyline(position, self.itinerary.geometry())
                    .unwrap_or_else(|| position.distance_to(&self.anchor()))
            }
            OffRouteMeasure::ReferencePoint => position.distance_to(&self.anchor()),
        }
    }
}

/// Drives turn-by-turn guidance for one traveler.
///
/// Only one session is active at a time; starting a new one replaces the
/// previous session.
#[derive(Debug)]
pub struct GuidanceEngine {
    config: GuidanceConfig,
    formatter: InstructionFormatter,
    phase: GuidancePhase,
    session: Option<Session>,
    trigger: InstructionTrigger,
    updates: watch::Sender<GuidanceSnapshot>,
}

impl GuidanceEngine {
    pub fn new(config: GuidanceConfig) -> Self {
        let (updates, _) = watch::channel(GuidanceSnapshot::default());
        Self {
            formatter: InstructionFormatter::new(config.locale),
            config,
            phase: GuidancePhase::Idle,
            session: None,
            trigger: InstructionTrigger::new(),
            updates,
        }
    }

    pub fn config(&self) -> &GuidanceConfig {
        &self.config
    }

    pub fn phase(&self) -> GuidancePhase {
        self.phase
    }

    pub fn is_navigating(&self) -> bool {
        self.phase == GuidancePhase::Navigating
    }

    /// The itinerary being followed, if any.
    pub fn itinerary(&self) -> Option<&Arc<Itinerary>> {
        self.session.as_ref().map(|s| &s.itinerary)
    }

    pub fn destination(&self) -> Option<Coordinate> {
        self.session.as_ref().map(|s| s.destination)
    }

    pub fn current_step_index(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.step_index)
    }

    /// Begin guidance along `itinerary`, replacing any active session.
    ///
    /// An itinerary without steps arrives immediately.
    pub fn start_navigation(&mut self, itinerary: Arc<Itinerary>, destination: Coordinate) {
        if self.session.is_some() {
            debug!(phase = ?self.phase, "Replacing active guidance session");
        }

        info!(
            steps = itinerary.step_count(),
            distance_m = itinerary.total_distance(),
            %destination,
            "Navigation started"
        );

        self.begin(Session::new(itinerary, destination));
        self.publish();
    }

    /// Switch to a recomputed itinerary, keeping the destination.
    ///
    /// Guidance restarts at step 0 and a pending reroute request is cleared.
    /// Ignored unless navigating.
    pub fn replace_itinerary(&mut self, itinerary: Arc<Itinerary>) {
        if self.phase != GuidancePhase::Navigating {
            debug!(phase = ?self.phase, "Ignoring itinerary replacement outside navigation");
            return;
        }
        let Some(previous) = self.session.take() else {
            return;
        };

        info!(steps = itinerary.step_count(), "Itinerary replaced");

        let mut session = Session::new(itinerary, previous.destination);
        session.last_fix = previous.last_fix;
        self.begin(session);
        self.publish();
    }

    fn begin(&mut self, mut session: Session) {
        self.trigger.reset();
        self.phase = GuidancePhase::Navigating;

        if session.step_count() > 0 {
            session.enter_step(0, &self.formatter);
            session.distance_to_next_step = session.itinerary.steps().first().map(|s| s.distance);
            session.eta = self.config.eta_for(session.itinerary.total_distance());
            self.session = Some(session);
        } else {
            self.session = Some(session);
            self.arrive();
        }
    }

    /// Process one position fix.
    ///
    /// Announces the current step if the fix entered a new proximity band,
    /// then advances at most one step, refreshes distance and ETA, and
    /// reports what the caller should act on. Does nothing unless navigating.
    pub fn update_position(&mut self, fix: PositionFix) -> Vec<GuidanceEvent> {
        let mut events = Vec::new();
        if self.phase != GuidancePhase::Navigating {
            return events;
        }
        let Some(session) = self.session.as_mut() else {
            return events;
        };

        let position = fix.coordinate;
        session.last_fix = Some(fix);

        // Bands are evaluated against the step being approached, before any advance.
        let mut distance = position.distance_to(&session.target());
        if let Some(band) = self.trigger.evaluate(distance) {
            events.push(GuidanceEvent::InstructionDue {
                step: session.step_index,
                band,
                distance_m: distance,
                instruction: session.instruction.clone(),
            });
        }

        if distance < self.config.advance_threshold_m {
            if session.is_last_step() {
                session.step_index = session.step_count();
            } else {
                let next = session.step_index + 1;
                session.enter_step(next, &self.formatter);
                self.trigger.reset();
                distance = position.distance_to(&session.target());

                debug!(step = next, instruction = %session.instruction, "Advanced to next step");
                events.push(GuidanceEvent::StepAdvanced {
                    index: next,
                    instruction: session.instruction.clone(),
                });
            }
        }

        if session.step_index >= session.step_count() {
            self.arrive();
            events.push(GuidanceEvent::Arrived);
            self.publish();
            return events;
        }

        session.distance_to_next_step = Some(distance);
        session.eta = self
            .config
            .eta_for(position.distance_to(&session.destination));

        if self.config.check_off_route_every_tick
            && let Some(event) = self.off_route_event(&position)
        {
            events.push(event);
        }

        self.publish();
        events
    }

    /// Check whether `position` is off the route.
    ///
    /// Returns `RerouteRequested` when the deviation is strictly greater than
    /// the threshold. Only the first detection per itinerary is reported.
    pub fn check_off_route(&mut self, position: Coordinate) -> Option<GuidanceEvent> {
        if self.phase != GuidancePhase::Navigating {
            return None;
        }
        let event = self.off_route_event(&position);
        if event.is_some() {
            self.publish();
        }
        event
    }

    fn off_route_event(&mut self, position: &Coordinate) -> Option<GuidanceEvent> {
        let session = self.session.as_mut()?;
        if session.reroute_pending {
            return None;
        }

        let deviation = session.deviation(position, self.config.off_route_measure);
        if deviation <= self.config.off_route_threshold_m {
            return None;
        }

        session.reroute_pending = true;
        info!(
            deviation_m = deviation,
            from = %position,
            to = %session.destination,
            "Off route, requesting reroute"
        );
        Some(GuidanceEvent::RerouteRequested {
            from: *position,
            to: session.destination,
        })
    }

    fn arrive(&mut self) {
        self.phase = GuidancePhase::Arrived;
        if let Some(session) = self.session.as_mut() {
            session.step_index = session.step_count();
            session.instruction = self.formatter.arrival_text().to_string();
            session.next_instruction = None;
            session.distance_to_next_step = None;
            session.eta = None;
            info!(destination = %session.destination, "Arrived");
        }
    }

    /// End the session and clear all guidance state.
    pub fn complete_navigation(&mut self) {
        if self.session.is_some() {
            info!(phase = ?self.phase, "Navigation completed");
        }
        self.session = None;
        self.phase = GuidancePhase::Idle;
        self.trigger.reset();
        self.publish();
    }

    /// Every step of the active itinerary with its progress.
    pub fn step_statuses(&self) -> Vec<StepView> {
        let Some(session) = &self.session else {
            return Vec::new();
        };

        session
            .itinerary
            .steps()
            .iter()
            .enumerate()
            .map(|(index, step)| StepView {
                index,
                instruction: self.formatter.format(&step.instruction),
                distance_m: step.distance,
                status: match index.cmp(&session.step_index) {
                    std::cmp::Ordering::Less => StepStatus::Done,
                    std::cmp::Ordering::Equal => StepStatus::Current,
                    std::cmp::Ordering::Greater => StepStatus::Pending,
                },
            })
            .collect()
    }

    /// Current guidance state.
    pub fn snapshot(&self) -> GuidanceSnapshot {
        let Some(session) = &self.session else {
            return GuidanceSnapshot::default();
        };

        GuidanceSnapshot {
            phase: self.phase,
            step_index: Some(session.step_index),
            step_count: session.step_count(),
            instruction: Some(session.instruction.clone()),
            next_instruction: session.next_instruction.clone(),
            distance_to_next_step_m: session.distance_to_next_step,
            eta: session.eta,
            navigating: self.phase == GuidancePhase::Navigating,
            reroute_pending: session.reroute_pending,
            last_fix: session.last_fix,
        }
    }

    /// Receive a snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<GuidanceSnapshot> {
        self.updates.subscribe()
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }
}

impl Default for GuidanceEngine {
    fn default() -> Self {
        Self::new(GuidanceConfig::default())
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
