//! Multi-stop route planning and turn-by-turn guidance.
//!
//! A library that answers two questions: "what is the route through these
//! stops, in this order?" and "where am I on it, and what do I do next?"

pub mod directions;
pub mod domain;
pub mod guidance;
pub mod instructions;
pub mod planner;
