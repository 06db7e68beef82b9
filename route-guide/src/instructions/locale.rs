//! Supported locales and their substitution tables.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// A literal `(pattern, replacement)` pair applied to raw maneuver text.
pub type SubstitutionRule = (&'static str, &'static str);

/// Language of user-facing instructions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Raw provider text, unchanged.
    #[default]
    English,
    French,
    Spanish,
}

/// Error returned when a locale tag is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown locale: {0}")]
pub struct UnknownLocale(pub String);

// Rules are tried in this order at every position; a longer phrase must come
// before any shorter phrase it starts with.

const FRENCH_RULES: &[SubstitutionRule] = &[
    ("Enter the roundabout and take exit", "Au rond-point, prenez la sortie"),
    ("Enter the roundabout", "Entrez dans le rond-point"),
    ("Exit the roundabout", "Sortez du rond-point"),
    ("Arrive at destination", "Vous êtes arrivé à destination"),
    ("Make a U-turn", "Faites demi-tour"),
    ("Turn sharp left", "Tournez franchement à gauche"),
    ("Turn sharp right", "Tournez franchement à droite"),
    ("Turn slight left", "Tournez légèrement à gauche"),
    ("Turn slight right", "Tournez légèrement à droite"),
    ("Turn left", "Tournez à gauche"),
    ("Turn right", "Tournez à droite"),
    ("Continue straight", "Continuez tout droit"),
    ("Keep left", "Restez à gauche"),
    ("Keep right", "Restez à droite"),
    ("Merge left", "Insérez-vous à gauche"),
    ("Merge right", "Insérez-vous à droite"),
    ("Merge", "Insérez-vous"),
    ("Take the ramp", "Prenez la bretelle"),
    ("Take the exit", "Prenez la sortie"),
    ("Depart", "Partez"),
    (" onto ", " sur "),
];

const SPANISH_RULES: &[SubstitutionRule] = &[
    ("Enter the roundabout and take exit", "En la rotonda, tome la salida"),
    ("Enter the roundabout", "Entre en la rotonda"),
    ("Exit the roundabout", "Salga de la rotonda"),
    ("Arrive at destination", "Ha llegado a su destino"),
    ("Make a U-turn", "Dé media vuelta"),
    ("Turn sharp left", "Gire bruscamente a la izquierda"),
    ("Turn sharp right", "Gire bruscamente a la derecha"),
    ("Turn slight left", "Gire levemente a la izquierda"),
    ("Turn slight right", "Gire levemente a la derecha"),
    ("Turn left", "Gire a la izquierda"),
    ("Turn right", "Gire a la derecha"),
    ("Continue straight", "Siga recto"),
    ("Keep left", "Manténgase a la izquierda"),
    ("Keep right", "Manténgase a la derecha"),
    ("Merge left", "Incorpórese por la izquierda"),
    ("Merge right", "Incorpórese por la derecha"),
    ("Merge", "Incorpórese"),
    ("Take the ramp", "Tome la rampa"),
    ("Take the exit", "Tome la salida"),
    ("Depart", "Salga"),
    (" onto ", " por "),
];

impl Locale {
    /// Every supported locale.
    pub const ALL: [Locale; 3] = [Locale::English, Locale::French, Locale::Spanish];

    /// Two-letter language tag.
    pub fn code(&self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::French => "fr",
            Locale::Spanish => "es",
        }
    }

    /// Ordered substitution table.
    pub fn rules(&self) -> &'static [SubstitutionRule] {
        match self {
            Locale::English => &[],
            Locale::French => FRENCH_RULES,
            Locale::Spanish => SPANISH_RULES,
        }
    }

    /// Fixed message shown once the traveler has arrived.
    pub fn arrival_text(&self) -> &'static str {
        match self {
            Locale::English => "You have arrived at your destination",
            Locale::French => "Vous êtes arrivé à destination",
            Locale::Spanish => "Ha llegado a su destino",
        }
    }

    /// Fallback when a maneuver has no usable text.
    pub fn continue_text(&self) -> &'static str {
        match self {
            Locale::English => "Continue straight",
            Locale::French => "Continuez tout droit",
            Locale::Spanish => "Siga recto",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    /// Accepts a language tag (`fr`, `fr-CA`, `es_MX`) or English name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let language = lowered
            .split(['-', '_', '.'])
            .next()
            .unwrap_or_default();

        match language {
            "en" | "english" => Ok(Locale::English),
            "fr" | "french" => Ok(Locale::French),
            "es" | "spanish" => Ok(Locale::Spanish),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}
