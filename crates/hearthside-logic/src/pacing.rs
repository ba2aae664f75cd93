//! Speech-bubble display pacing.

/// Shortest time any utterance stays on screen.
pub const MIN_DISPLAY_MS: u64 = 1_500;

/// Longest time any utterance stays on screen.
pub const MAX_DISPLAY_MS: u64 = 8_000;

/// Reading time budgeted per character of text.
pub const MS_PER_CHAR: u64 = 55;

/// How long a line of dialogue should stay visible.
///
/// Scales with text length so longer lines get more reading time, with a
/// floor for very short lines and a cap for rambling ones.
///
/// ```
/// use hearthside_logic::pacing::display_duration_ms;
///
/// assert!(display_duration_ms("Hi.") < display_duration_ms("Well, that was quite the afternoon we had."));
/// ```
pub fn display_duration_ms(text: &str) -> u64 {
    let chars = text.chars().count() as u64;
    (MIN_DISPLAY_MS + chars * MS_PER_CHAR).min(MAX_DISPLAY_MS)
}
