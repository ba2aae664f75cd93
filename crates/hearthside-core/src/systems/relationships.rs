//! Pairwise relationships and directional opinions.

use hearthside_logic::opinion;
use serde::{Deserialize, Serialize};

/// How two colonists relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RelationKind {
    #[default]
    Stranger,
    Friend,
    Lover,
    ExLover,
}

/// One pair's relationship. `a` is always the smaller id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub a: u32,
    pub b: u32,
    pub kind: RelationKind,
    /// What `a` thinks of `b`.
    pub opinion_a: i32,
    /// What `b` thinks of `a`.
    pub opinion_b: i32,
}

impl Relationship {
    pub fn new(a: u32, b: u32) -> Self {
        Relationship {
            a,
            b,
            kind: RelationKind::default(),
            opinion_a: 0,
            opinion_b: 0,
        }
    }
}

/// All relationships in the colony.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationshipLedger {
    pub relationships: Vec<Relationship>,
}

impl RelationshipLedger {
    pub fn new() -> Self {
        RelationshipLedger {
            relationships: Vec::new(),
        }
    }

    fn normalize(x: u32, y: u32) -> (u32, u32) {
        if x <= y {
            (x, y)
        } else {
            (y, x)
        }
    }

    /// Get the relationship between two colonists, creating a fresh
    /// stranger entry if none exists.
    pub fn get_or_create(&mut self, x: u32, y: u32) -> &mut Relationship {
        let (a, b) = Self::normalize(x, y);
        if let Some(idx) = self
            .relationships
            .iter()
            .position(|r| r.a == a && r.b == b)
        {
            &mut self.relationships[idx]
        } else {
            self.relationships.push(Relationship::new(a, b));
            self.relationships.last_mut().unwrap()
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&Relationship> {
        let (a, b) = Self::normalize(x, y);
        self.relationships.iter().find(|r| r.a == a && r.b == b)
    }

    /// What `who` thinks of `of`. Strangers default to 0.
    pub fn opinion_of(&self, who: u32, of: u32) -> i32 {
        match self.get(who, of) {
            Some(r) if r.a == who => r.opinion_a,
            Some(r) => r.opinion_b,
            None => 0,
        }
    }

    pub fn set_opinion(&mut self, who: u32, of: u32, value: i32) {
        let clamped = value.clamp(opinion::OPINION_MIN, opinion::OPINION_MAX);
        let rel = self.get_or_create(who, of);
        if rel.a == who {
            rel.opinion_a = clamped;
        } else {
            rel.opinion_b = clamped;
        }
    }

    pub fn adjust_opinion(&mut self, who: u32, of: u32, delta: i32) {
        let rel = self.get_or_create(who, of);
        if rel.a == who {
            rel.opinion_a = opinion::adjust(rel.opinion_a, delta);
        } else {
            rel.opinion_b = opinion::adjust(rel.opinion_b, delta);
        }
    }

    pub fn set_lovers(&mut self, x: u32, y: u32) {
        self.get_or_create(x, y).kind = RelationKind::Lover;
    }

    /// Downgrade lovers to ex-lovers. No effect on other relationship kinds.
    pub fn break_up(&mut self, x: u32, y: u32) {
        let rel = self.get_or_create(x, y);
        if rel.kind == RelationKind::Lover {
            rel.kind = RelationKind::ExLover;
        }
    }

    /// The agent's current lover, if any.
    pub fn lover_of(&self, agent: u32) -> Option<u32> {
        self.relationships
            .iter()
            .filter(|r| r.kind == RelationKind::Lover)
            .find_map(|r| {
                if r.a == agent {
                    Some(r.b)
                } else if r.b == agent {
                    Some(r.a)
                } else {
                    None
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_order_does_not_matter() {
        let mut ledger = RelationshipLedger::new();
        ledger.get_or_create(5, 2);
        ledger.get_or_create(2, 5);
        assert_eq!(ledger.relationships.len(), 1);
        assert_eq!(ledger.relationships[0].a, 2);
        assert_eq!(ledger.relationships[0].b, 5);
    }

    #[test]
    fn opinions_are_directional() {
        let mut ledger = RelationshipLedger::new();
        ledger.set_opinion(1, 2, 50);
        ledger.set_opinion(2, 1, -10);
        assert_eq!(ledger.opinion_of(1, 2), 50);
        assert_eq!(ledger.opinion_of(2, 1), -10);
        assert_eq!(ledger.opinion_of(1, 3), 0);
    }

    #[test]
    fn adjust_clamps() {
        let mut ledger = RelationshipLedger::new();
        ledger.set_opinion(1, 2, 190);
        ledger.adjust_opinion(1, 2, 50);
        assert_eq!(ledger.opinion_of(1, 2), opinion::OPINION_MAX);

        ledger.adjust_opinion(2, 1, -150);
        assert_eq!(ledger.opinion_of(2, 1), opinion::OPINION_MIN);
    }

    #[test]
    fn lover_lookup_and_break_up() {
        let mut ledger = RelationshipLedger::new();
        ledger.set_lovers(3, 7);
        assert_eq!(ledger.lover_of(3), Some(7));
        assert_eq!(ledger.lover_of(7), Some(3));
        assert_eq!(ledger.lover_of(1), None);

        ledger.break_up(7, 3);
        assert_eq!(ledger.lover_of(3), None);
        assert_eq!(ledger.get(3, 7).map(|r| r.kind), Some(RelationKind::ExLover));

        // A second break-up leaves the ex-lover state alone.
        ledger.break_up(3, 7);
        assert_eq!(ledger.get(3, 7).map(|r| r.kind), Some(RelationKind::ExLover));
    }

    #[test]
    fn break_up_does_not_touch_friends() {
        let mut ledger = RelationshipLedger::new();
        ledger.get_or_create(1, 2).kind = RelationKind::Friend;
        ledger.break_up(1, 2);
        assert_eq!(ledger.get(1, 2).map(|r| r.kind), Some(RelationKind::Friend));
    }
}
