//! Instruction localization.
//!
//! Provider maneuver text is English. Each [`Locale`] carries an ordered
//! table of literal substitutions applied in one pass; there is no general
//! translation machinery.

mod formatter;
mod locale;

pub use formatter::{InstructionFormatter, format_instruction};
pub use locale::{Locale, SubstitutionRule, UnknownLocale};
