//! Cleanup of raw backend output into displayable lines.
//!
//! Models answer in screenplay form with name prefixes, stray quotes,
//! and sometimes far more lines than asked for. These helpers normalize
//! that into short, clean utterances.

/// How many lines of a multi-line reply are kept.
pub const MAX_LINES: usize = 6;

/// Longest leading run treated as a speaker-name prefix.
pub const MAX_PREFIX_LEN: usize = 24;

/// Normalize a single raw line: trim, strip a `Name:` prefix and
/// wrapping quotes.
pub fn clean_line(raw: &str) -> String {
    let mut line = raw.trim();

    if let Some(idx) = line.find(':') {
        let head = &line[..idx];
        let looks_like_name = idx > 0
            && idx <= MAX_PREFIX_LEN
            && head
                .chars()
                .all(|c| c.is_alphanumeric() || c.is_whitespace() || c == '\'');
        if looks_like_name {
            line = line[idx + 1..].trim_start();
        }
    }

    if line.len() >= 2 && line.starts_with('"') && line.ends_with('"') {
        line = &line[1..line.len() - 1];
    }

    line.trim().to_string()
}

/// Split a raw reply into cleaned, non-empty lines, capped at [`MAX_LINES`].
pub fn split_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(clean_line)
        .filter(|line| !line.is_empty())
        .take(MAX_LINES)
        .collect()
}
