//! Turn-by-turn guidance.
//!
//! Consumes an itinerary and a stream of position fixes; tracks the current
//! step, announces upcoming maneuvers, estimates arrival and asks for a new
//! route when the traveler drifts away from the current one.

mod config;
mod engine;
mod filter;
mod trigger;

pub use config::{GuidanceConfig, OffRouteMeasure};
pub use engine::{GuidanceEngine, GuidanceEvent, GuidancePhase, GuidanceSnapshot, StepStatus, StepView};
pub use filter::{FixFilter, FixFilterConfig, FixRejection};
pub use trigger::{InstructionTrigger, ProximityBand};
