//! Raw maneuver text to localized instruction text.

use super::locale::Locale;

/// Localizes provider maneuver text with a locale's substitution table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstructionFormatter {
    locale: Locale,
}

impl InstructionFormatter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Localize one raw instruction.
    pub fn format(&self, raw: &str) -> String {
        format_instruction(raw, self.locale)
    }

    /// The locale's arrival message.
    pub fn arrival_text(&self) -> &'static str {
        self.locale.arrival_text()
    }

    /// The locale's "continue straight" message.
    pub fn continue_text(&self) -> &'static str {
        self.locale.continue_text()
    }
}

/// Localize `raw` in a single left-to-right pass.
///
/// At each position the first rule (in declared order) whose pattern matches
/// there is applied and the scan resumes after the matched text. Replacement
/// text is never scanned again. A blank result becomes the locale's
/// "continue straight" text.
///
/// # Examples
///
/// ```
/// use route_guide::instructions::{Locale, format_instruction};
///
/// assert_eq!(
///     format_instruction("Turn left onto Main Street", Locale::French),
///     "Tournez à gauche sur Main Street"
/// );
/// assert_eq!(format_instruction("   ", Locale::Spanish), "Siga recto");
/// ```
pub fn format_instruction(raw: &str, locale: Locale) -> String {
    let rules = locale.rules();
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while !rest.is_empty() {
        if let Some((pattern, replacement)) = rules.iter().find(|(p, _)| rest.starts_with(p)) {
            out.push_str(replacement);
            rest = &rest[pattern.len()..];
            continue;
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }

    let trimmed = out.trim();
    if trimmed.is_empty() {
        locale.continue_text().to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_passes_through() {
        assert_eq!(
            format_instruction("Turn left onto Main Street", Locale::English),
            "Turn left onto Main Street"
        );
    }

    #[test]
    fn french_turns() {
        let f = InstructionFormatter::new(Locale::French);
        assert_eq!(f.format("Turn right"), "Tournez à droite");
        assert_eq!(f.format("Turn sharp left onto Quai"), "Tournez franchement à gauche sur Quai");
        assert_eq!(f.format("Make a U-turn"), "Faites demi-tour");
        assert_eq!(f.format("Depart onto Rue de Rivoli"), "Partez sur Rue de Rivoli");
    }

    #[test]
    fn spanish_roundabout_keeps_exit_number() {
        assert_eq!(
            format_instruction("Enter the roundabout and take exit 3", Locale::Spanish),
            "En la rotonda, tome la salida 3"
        );
        assert_eq!(
            format_instruction("Enter the roundabout", Locale::Spanish),
            "Entre en la rotonda"
        );
    }

    #[test]
    fn declared_order_wins_at_a_position() {
        // "Merge left" is declared before "Merge".
        assert_eq!(
            format_instruction("Merge left", Locale::French),
            "Insérez-vous à gauche"
        );
        assert_eq!(format_instruction("Merge", Locale::French), "Insérez-vous");
    }

    #[test]
    fn road_names_are_not_translated() {
        assert_eq!(
            format_instruction("Keep left onto Turnpike Road", Locale::Spanish),
            "Manténgase a la izquierda por Turnpike Road"
        );
    }

    #[test]
    fn blank_falls_back_to_continue() {
        assert_eq!(format_instruction("", Locale::English), "Continue straight");
        assert_eq!(format_instruction("  \t", Locale::French), "Continuez tout droit");
    }

    #[test]
    fn non_ascii_input_is_preserved() {
        assert_eq!(
            format_instruction("Turn left onto Straße des 17. Juni", Locale::French),
            "Tournez à gauche sur Straße des 17. Juni"
        );
    }

    #[test]
    fn idempotent_on_localized_text() {
        let raws = [
            "Turn left onto Main Street",
            "Continue straight",
            "Enter the roundabout and take exit 2",
            "Arrive at destination",
            "Take the exit onto A1",
        ];

        for locale in Locale::ALL {
            for raw in raws {
                let once = format_instruction(raw, locale);
                let twice = format_instruction(&once, locale);
                assert_eq!(once, twice, "{locale}: {raw:?}");
            }
        }
    }

    #[test]
    fn arrival_and_continue_texts() {
        let f = InstructionFormatter::default();
        assert_eq!(f.locale(), Locale::English);
        assert_eq!(f.continue_text(), "Continue straight");
        assert_eq!(f.arrival_text(), "You have arrived at your destination");
    }
}
