//! Keyboard shortcuts: digits and option letters pick an option, Enter confirms.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Option at this display position (0-based).
    Option(usize),
    /// Submit a pending selection, or move on from an answered question.
    Confirm,
    Ignore,
}

impl KeyAction {
    /// Map a `KeyboardEvent.key` value. Letters are matched case-insensitively
    /// against the display labels.
    pub fn from_key(key: &str, display_labels: &[String]) -> Self {
        let key = key.trim();
        if key.eq_ignore_ascii_case("enter") {
            return KeyAction::Confirm;
        }
        if let Some(d) = single_char(key).and_then(|c| c.to_digit(10)) {
            return match d {
                1..=9 => KeyAction::Option(d as usize - 1),
                _ => KeyAction::Ignore,
            };
        }
        display_labels
            .iter()
            .position(|l| l.eq_ignore_ascii_case(key))
            .map(KeyAction::Option)
            .unwrap_or(KeyAction::Ignore)
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}
