//! Distance-triggered instruction announcements.
//!
//! While approaching a maneuver, an instruction is announced when the
//! remaining distance enters one of three bands. Each band fires at most
//! once per approach; the bookkeeping is reset when guidance moves to the
//! next step or to a new itinerary.

use serde::Serialize;

/// A proximity band before a maneuver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProximityBand {
    /// (150, 200] meters
    Far,
    /// (80, 100] meters
    Near,
    /// (30, 50] meters
    Imminent,
}

impl ProximityBand {
    /// All bands, farthest first.
    pub const ALL: [ProximityBand; 3] = [
        ProximityBand::Far,
        ProximityBand::Near,
        ProximityBand::Imminent,
    ];

    /// Exclusive lower and inclusive upper bound, in meters.
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            ProximityBand::Far => (150.0, 200.0),
            ProximityBand::Near => (80.0, 100.0),
            ProximityBand::Imminent => (30.0, 50.0),
        }
    }

    /// The band containing `distance_m`, if any.
    pub fn containing(distance_m: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|band| {
            let (low, high) = band.bounds();
            distance_m > low && distance_m <= high
        })
    }

    fn slot(&self) -> usize {
        match self {
            ProximityBand::Far => 0,
            ProximityBand::Near => 1,
            ProximityBand::Imminent => 2,
        }
    }
}

/// Tracks which bands have fired for the current approach.
#[derive(Debug, Clone, Default)]
pub struct InstructionTrigger {
    fired: [bool; 3],
}

impl InstructionTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new distance; returns the band to announce, if one is due.
    pub fn evaluate(&mut self, distance_m: f64) -> Option<ProximityBand> {
        let band = ProximityBand::containing(distance_m)?;
        let fired = &mut self.fired[band.slot()];
        if *fired {
            return None;
        }
        *fired = true;
        Some(band)
    }

    /// Whether `band` has already fired during this approach.
    pub fn has_fired(&self, band: ProximityBand) -> bool {
        self.fired[band.slot()]
    }

    /// Start a new approach.
    pub fn reset(&mut self) {
        self.fired = [false; 3];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges() {
        assert_eq!(ProximityBand::containing(200.0), Some(ProximityBand::Far));
        assert_eq!(ProximityBand::containing(150.0), None);
        assert_eq!(ProximityBand::containing(150.1), Some(ProximityBand::Far));
        assert_eq!(ProximityBand::containing(100.0), Some(ProximityBand::Near));
        assert_eq!(ProximityBand::containing(80.0), None);
        assert_eq!(ProximityBand::containing(50.0), Some(ProximityBand::Imminent));
        assert_eq!(ProximityBand::containing(30.0), None);
        assert_eq!(ProximityBand::containing(120.0), None);
        assert_eq!(ProximityBand::containing(250.0), None);
    }

    #[test]
    fn monotone_approach_fires_three_times() {
        let mut trigger = InstructionTrigger::new();
        let fired: Vec<ProximityBand> = (0..=250)
            .rev()
            .filter_map(|d| trigger.evaluate(d as f64))
            .collect();

        assert_eq!(fired, ProximityBand::ALL.to_vec());
    }

    #[test]
    fn fires_on_entry_distance() {
        let mut trigger = InstructionTrigger::new();
        let mut entries = Vec::new();
        for d in (0..=250).rev().step_by(10) {
            if let Some(band) = trigger.evaluate(d as f64) {
                entries.push((band, d));
            }
        }
        assert_eq!(
            entries,
            vec![
                (ProximityBand::Far, 200),
                (ProximityBand::Near, 100),
                (ProximityBand::Imminent, 50)
            ]
        );
    }

    #[test]
    fn lingering_in_a_band_fires_once() {
        let mut trigger = InstructionTrigger::new();
        assert_eq!(trigger.evaluate(95.0), Some(ProximityBand::Near));
        assert_eq!(trigger.evaluate(92.0), None);
        assert_eq!(trigger.evaluate(110.0), None);
        assert_eq!(trigger.evaluate(90.0), None);
        assert!(trigger.has_fired(ProximityBand::Near));
        assert!(!trigger.has_fired(ProximityBand::Far));
    }

    #[test]
    fn reset_rearms_all_bands() {
        let mut trigger = InstructionTrigger::new();
        trigger.evaluate(40.0);
        trigger.reset();
        assert_eq!(trigger.evaluate(40.0), Some(ProximityBand::Imminent));
    }

    #[test]
    fn skipped_band_is_not_fired_late() {
        let mut trigger = InstructionTrigger::new();
        // Jumping straight past the far band.
        assert_eq!(trigger.evaluate(90.0), Some(ProximityBand::Near));
        assert_eq!(trigger.evaluate(40.0), Some(ProximityBand::Imminent));
        assert!(!trigger.has_fired(ProximityBand::Far));
    }
}
