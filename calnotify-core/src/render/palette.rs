//! Color lookup tables.

use owo_colors::AnsiColors;

/// Named terminal colors accepted in the config.
const PALETTE: &[(&str, AnsiColors)] = &[
    ("default", AnsiColors::Default),
    ("black", AnsiColors::Black),
    ("brightblack", AnsiColors::BrightBlack),
    ("red", AnsiColors::Red),
    ("brightred", AnsiColors::BrightRed),
    ("green", AnsiColors::Green),
    ("brightgreen", AnsiColors::BrightGreen),
    ("yellow", AnsiColors::Yellow),
    ("brightyellow", AnsiColors::BrightYellow),
    ("blue", AnsiColors::Blue),
    ("brightblue", AnsiColors::BrightBlue),
    ("magenta", AnsiColors::Magenta),
    ("brightmagenta", AnsiColors::BrightMagenta),
    ("cyan", AnsiColors::Cyan),
    ("brightcyan", AnsiColors::BrightCyan),
    ("white", AnsiColors::White),
    ("brightwhite", AnsiColors::BrightWhite),
];

/// Google Calendar event color ids and their closest terminal color.
const PROVIDER_COLORS: &[(&str, &str)] = &[
    ("1", "blue"),
    ("2", "brightgreen"),
    ("3", "brightblue"),
    ("4", "red"),
    ("5", "brightyellow"),
    ("6", "yellow"),
    ("7", "brightcyan"),
    ("8", "brightblack"),
    ("9", "cyan"),
    ("10", "green"),
    ("11", "brightred"),
];

pub const NEUTRAL: AnsiColors = AnsiColors::Default;

/// Look up a palette color. Case, `_`, `-` and spaces are ignored, so
/// "Bright_Blue" and "brightblue" are the same color.
pub fn named(name: &str) -> Option<AnsiColors> {
    let key: String = name
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect();

    PALETTE
        .iter()
        .find(|(palette_name, _)| *palette_name == key)
        .map(|(_, color)| *color)
}

pub fn provider_color(color_id: &str) -> Option<AnsiColors> {
    PROVIDER_COLORS
        .iter()
        .find(|(id, _)| *id == color_id)
        .and_then(|(_, name)| named(name))
}

/// Event color, falling back to the calendar color, then to the neutral color.
pub fn event_color(color_id: Option<&str>, calendar_color: Option<&str>) -> AnsiColors {
    color_id
        .and_then(provider_color)
        .or_else(|| calendar_color.and_then(named))
        .unwrap_or(NEUTRAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_ignores_case_and_separators() {
        assert!(matches!(named("Bright_Blue"), Some(AnsiColors::BrightBlue)));
        assert!(matches!(named("red"), Some(AnsiColors::Red)));
        assert!(named("mauve").is_none());
    }

    #[test]
    fn test_event_color_fallback_chain() {
        assert!(matches!(event_color(Some("4"), Some("green")), AnsiColors::Red));
        assert!(matches!(event_color(Some("99"), Some("green")), AnsiColors::Green));
        assert!(matches!(event_color(None, Some("mauve")), AnsiColors::Default));
        assert!(matches!(event_color(None, None), AnsiColors::Default));
    }
}
