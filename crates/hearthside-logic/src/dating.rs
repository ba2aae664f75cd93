//! Date stages and the rules for moving through them.

use serde::{Deserialize, Serialize};

/// How fast colonists walk toward the date spot, in units per second.
pub const WALK_SPEED: f32 = 1.75;

/// A colonist within this distance of the spot counts as arrived.
pub const ARRIVAL_RADIUS: f32 = 0.5;

/// Joy gained per second while enjoying the date activity.
pub const JOY_GAIN_PER_SEC: f32 = 0.05;

/// Social need gained per second while enjoying the date activity.
pub const SOCIAL_GAIN_PER_SEC: f32 = 0.03;

/// Joy level at which the activity is considered fulfilled.
pub const JOY_SATURATION: f32 = 0.95;

/// How long the lovin stage lasts before the date concludes.
pub const LOVIN_DURATION_MS: u64 = 4_000;

/// How long a fulfilled couple will wait for their chat to wrap up
/// before moving on anyway.
pub const CHAT_WAIT_BUDGET_MS: u64 = 10_000;

/// The phases of a date, in the order they occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateStage {
    /// The proposal was accepted but the couple has not set out yet.
    Proposed,
    /// Both partners are walking to the date spot.
    Travel,
    /// The couple is at the spot, chatting and enjoying themselves.
    Activity,
    /// The date went well.
    Lovin,
    /// Terminal stage. A date that reaches this is over.
    Finished,
}

impl DateStage {
    /// The stage that follows this one, or `None` from [`DateStage::Finished`].
    pub fn next(self) -> Option<DateStage> {
        match self {
            DateStage::Proposed => Some(DateStage::Travel),
            DateStage::Travel => Some(DateStage::Activity),
            DateStage::Activity => Some(DateStage::Lovin),
            DateStage::Lovin => Some(DateStage::Finished),
            DateStage::Finished => None,
        }
    }

    pub fn is_finished(self) -> bool {
        matches!(self, DateStage::Finished)
    }
}

/// Whether a colonist's joy level counts as fulfilled for date purposes.
pub fn joy_saturated(joy: f32) -> bool {
    joy >= JOY_SATURATION
}

/// Whether a colonist at `distance` from the spot counts as arrived.
pub fn arrived(distance: f32) -> bool {
    distance <= ARRIVAL_RADIUS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_advance_in_order() {
        assert_eq!(DateStage::Proposed.next(), Some(DateStage::Travel));
        assert_eq!(DateStage::Travel.next(), Some(DateStage::Activity));
        assert_eq!(DateStage::Activity.next(), Some(DateStage::Lovin));
        assert_eq!(DateStage::Lovin.next(), Some(DateStage::Finished));
    }

    #[test]
    fn finished_is_terminal() {
        assert_eq!(DateStage::Finished.next(), None);
        assert!(DateStage::Finished.is_finished());
        assert!(!DateStage::Lovin.is_finished());
    }

    #[test]
    fn joy_saturation_threshold() {
        assert!(!joy_saturated(0.0));
        assert!(!joy_saturated(0.94));
        assert!(joy_saturated(0.95));
        assert!(joy_saturated(1.0));
    }

    #[test]
    fn arrival_threshold() {
        assert!(arrived(0.0));
        assert!(arrived(0.5));
        assert!(!arrived(0.51));
    }
}
