//! Colonist state components.

use hearthside_logic::dating;
use serde::{Deserialize, Serialize};

/// Marker component identifying an entity as a colonist.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Colonist;

/// Slow-moving needs that drain over time and recover through activities.
/// All values range 0.0 (empty) to 1.0 (full).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Needs {
    pub social: f32,
    pub joy: f32,
    pub rest: f32,
}

impl Default for Needs {
    fn default() -> Self {
        Needs {
            social: 0.5,
            joy: 0.4,
            rest: 0.8,
        }
    }
}

impl Needs {
    /// Drain needs for `seconds` of elapsed time.
    pub fn decay(&mut self, seconds: f32) {
        self.social -= 0.002 * seconds; // empties over ~8 minutes
        self.joy -= 0.0015 * seconds; // empties over ~11 minutes
        self.rest -= 0.001 * seconds; // empties over ~16 minutes
        self.clamp();
    }

    /// Recover joy and social need while on a date.
    pub fn enjoy_date(&mut self, seconds: f32) {
        self.joy += dating::JOY_GAIN_PER_SEC * seconds;
        self.social += dating::SOCIAL_GAIN_PER_SEC * seconds;
        self.clamp();
    }

    pub fn joy_saturated(&self) -> bool {
        dating::joy_saturated(self.joy)
    }

    fn clamp(&mut self) {
        self.social = self.social.clamp(0.0, 1.0);
        self.joy = self.joy.clamp(0.0, 1.0);
        self.rest = self.rest.clamp(0.0, 1.0);
    }
}

/// Flags that gate whether a colonist can take part in social activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Condition {
    pub drafted: bool,
    pub downed: bool,
    pub asleep: bool,
}

impl Condition {
    /// Whether the colonist is free to go on dates and chat.
    pub fn can_socialize(&self) -> bool {
        !self.drafted && !self.downed && !self.asleep
    }

    /// Whether the colonist can notice things happening around them.
    pub fn is_aware(&self) -> bool {
        !self.downed && !self.asleep
    }
}
