//! Opinion thresholds and adjustments.
//!
//! Opinions are directional: what A thinks of B is independent of what
//! B thinks of A. Values are clamped to a fixed range.

/// A proposal is accepted when the target's opinion of the proposer is
/// strictly greater than this.
pub const PROPOSAL_THRESHOLD: i32 = 10;

/// Opinion gained in both directions when a date runs to completion.
pub const DATE_SUCCESS_BONUS: i32 = 15;

/// Opinion the wronged lover loses toward the cheater on catching them.
pub const CHEATING_PENALTY: i32 = 40;

/// Opinion the proposer loses with the target after a rejected proposal.
pub const REBUFF_STING: i32 = 5;

/// A lover within this distance of a cheating date notices it.
pub const CAUGHT_RADIUS: f32 = 8.0;

pub const OPINION_MIN: i32 = -100;
pub const OPINION_MAX: i32 = 200;

/// Whether a colonist with this opinion of a proposer says yes.
pub fn accepts_proposal(opinion_of_proposer: i32) -> bool {
    opinion_of_proposer > PROPOSAL_THRESHOLD
}

/// Whether a lover at `distance` from the cheating pair catches them.
pub fn within_caught_radius(distance: f32) -> bool {
    distance <= CAUGHT_RADIUS
}

/// Apply a delta to an opinion value, clamping to the valid range.
pub fn adjust(opinion: i32, delta: i32) -> i32 {
    (opinion + delta).clamp(OPINION_MIN, OPINION_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proposal_acceptance_is_strict() {
        assert!(accepts_proposal(150));
        assert!(accepts_proposal(11));
        assert!(!accepts_proposal(10));
        assert!(!accepts_proposal(0));
        assert!(!accepts_proposal(-5));
    }

    #[test]
    fn adjust_clamps_to_range() {
        assert_eq!(adjust(0, 15), 15);
        assert_eq!(adjust(195, 15), OPINION_MAX);
        assert_eq!(adjust(-90, -40), OPINION_MIN);
        assert_eq!(adjust(OPINION_MAX, 1), OPINION_MAX);
        assert_eq!(adjust(OPINION_MIN, -1), OPINION_MIN);
    }

    #[test]
    fn caught_radius_threshold() {
        assert!(within_caught_radius(0.0));
        assert!(within_caught_radius(8.0));
        assert!(!within_caught_radius(8.1));
    }
}
