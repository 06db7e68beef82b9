//! Conversion from OSRM DTOs to domain types.
//!
//! OSRM does not return instruction text, only structured maneuvers. This
//! module builds the raw English maneuver text that the instruction
//! formatter later localizes.

use crate::domain::{Coordinate, Route, RouteStep};

use super::types::{GeometryDto, ManeuverDto, RouteDto, RouteResponse, StepDto};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// A position was out of range or not finite
    #[error("invalid position [{lon}, {lat}]")]
    InvalidPosition { lon: f64, lat: f64 },

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Convert every candidate route of a successful response.
pub fn convert_route_response(response: &RouteResponse) -> Result<Vec<Route>, ConversionError> {
    response.routes.iter().map(convert_route).collect()
}

/// Convert one candidate route, flattening the steps of all its legs.
pub fn convert_route(dto: &RouteDto) -> Result<Route, ConversionError> {
    let geometry = dto
        .geometry
        .as_ref()
        .ok_or(ConversionError::MissingField("geometry"))
        .and_then(convert_geometry)?;

    let steps = dto
        .legs
        .iter()
        .flat_map(|leg| leg.steps.iter())
        .map(convert_step)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Route::new(geometry, steps, dto.distance, dto.duration))
}

fn convert_step(dto: &StepDto) -> Result<RouteStep, ConversionError> {
    let maneuver_point = convert_position(dto.maneuver.location)?;

    let mut geometry = match &dto.geometry {
        Some(g) => convert_geometry(g)?,
        None => Vec::new(),
    };

    // The anchor of a step is its maneuver point; make sure it leads the geometry.
    if geometry
        .first()
        .is_none_or(|first| !first.approx_eq(&maneuver_point))
    {
        geometry.insert(0, maneuver_point);
    }

    Ok(RouteStep::new(
        maneuver_text(&dto.maneuver, &dto.name),
        dto.distance,
        geometry,
    ))
}

fn convert_geometry(dto: &GeometryDto) -> Result<Vec<Coordinate>, ConversionError> {
    dto.coordinates.iter().copied().map(convert_position).collect()
}

fn convert_position([lon, lat]: [f64; 2]) -> Result<Coordinate, ConversionError> {
    Coordinate::new(lat, lon).map_err(|_| ConversionError::InvalidPosition { lon, lat })
}

/// Build the raw English instruction for a maneuver.
///
/// The road name is appended as "onto {name}" except on arrival.
pub fn maneuver_text(maneuver: &ManeuverDto, road_name: &str) -> String {
    let modifier = maneuver.modifier.as_deref();

    let base = match maneuver.kind.as_str() {
        "depart" => "Depart".to_string(),
        "arrive" => return "Arrive at destination".to_string(),
        "turn" | "end of road" => turn_text(modifier),
        "continue" => match modifier {
            None | Some("straight") => "Continue straight".to_string(),
            Some(_) => turn_text(modifier),
        },
        "new name" | "notification" => "Continue straight".to_string(),
        "merge" => match modifier {
            Some(m @ ("left" | "right" | "slight left" | "slight right")) => {
                format!("Merge {}", m.trim_start_matches("slight "))
            }
            _ => "Merge".to_string(),
        },
        "on ramp" => "Take the ramp".to_string(),
        "off ramp" => "Take the exit".to_string(),
        "fork" => match modifier {
            Some(m) if m.ends_with("left") => "Keep left".to_string(),
            Some(m) if m.ends_with("right") => "Keep right".to_string(),
            _ => "Continue straight".to_string(),
        },
        "roundabout" | "rotary" | "roundabout turn" => match maneuver.exit {
            Some(exit) => format!("Enter the roundabout and take exit {exit}"),
            None => "Enter the roundabout".to_string(),
        },
        "exit roundabout" | "exit rotary" => "Exit the roundabout".to_string(),
        _ => "Continue straight".to_string(),
    };

    let road_name = road_name.trim();
    if road_name.is_empty() {
        base
    } else {
        format!("{base} onto {road_name}")
    }
}

fn turn_text(modifier: Option<&str>) -> String {
    match modifier {
        Some("uturn") => "Make a U-turn".to_string(),
        Some("straight") | None => "Continue straight".to_string(),
        Some(m) => format!("Turn {m}"),
    }
}
