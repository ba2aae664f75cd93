//! Prompt templates for the text-generation backend.
//!
//! Templates use `{placeholder}` markers filled by the build functions.
//! The trailing `"{speaker}:"` line primes the model to answer in
//! screenplay form, which [`crate::reply`] knows how to strip back out.

const DATE_CHAT_TEMPLATE: &str = "{a} and {b} are colonists on a date at {spot}. \
They are getting along well. Write a short, warm exchange between them, \
one line per speaker, each line prefixed with the speaker's name and a colon.\n{a}:";

const TAUNT_TEMPLATE: &str = "{attacker} just landed a blow on {victim} in a fight. \
Write a single short taunt {attacker} shouts at {victim}. Keep it to one line.\n{attacker}:";

/// Where dates happen, as far as the prompt is concerned.
pub const DATE_SPOT_LABEL: &str = "a quiet spot near the hearth";

/// Prompt for a back-and-forth between two colonists on a date.
pub fn date_chat_prompt(a: &str, b: &str, spot: &str) -> String {
    fill(DATE_CHAT_TEMPLATE, &[("a", a), ("b", b), ("spot", spot)])
}

/// Prompt for a one-line combat taunt.
pub fn taunt_prompt(attacker: &str, victim: &str) -> String {
    fill(TAUNT_TEMPLATE, &[("attacker", attacker), ("victim", victim)])
}

fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{}}}", key), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_prompt_fills_all_placeholders() {
        let prompt = date_chat_prompt("Mara", "Ezra", DATE_SPOT_LABEL);
        assert!(prompt.contains("Mara"));
        assert!(prompt.contains("Ezra"));
        assert!(prompt.contains(DATE_SPOT_LABEL));
        assert!(!prompt.contains('{'));
        assert!(!prompt.contains('}'));
    }

    #[test]
    fn date_prompt_primes_first_speaker() {
        let prompt = date_chat_prompt("Mara", "Ezra", "the orchard");
        assert!(prompt.ends_with("Mara:"));
    }

    #[test]
    fn taunt_prompt_fills_all_placeholders() {
        let prompt = taunt_prompt("Brock", "Finn");
        assert!(prompt.contains("Brock"));
        assert!(prompt.contains("Finn"));
        assert!(!prompt.contains('{'));
        assert!(prompt.ends_with("Brock:"));
    }
}
