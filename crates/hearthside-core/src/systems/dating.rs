//! Registry of in-progress dates.
//!
//! Pairs are unordered: a date between 4 and 2 is stored once, keyed
//! (2, 4), and every query answers the same for either participant.

use hearthside_logic::dating::DateStage;

/// One in-progress date. `a` is always the smaller id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRecord {
    pub a: u32,
    pub b: u32,
    pub stage: DateStage,
}

/// All in-progress dates, at most one per colonist.
#[derive(Debug, Clone, Default)]
pub struct DatingRegistry {
    records: Vec<DateRecord>,
}

impl DatingRegistry {
    pub fn new() -> Self {
        DatingRegistry {
            records: Vec::new(),
        }
    }

    fn index_of(&self, agent: u32) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.a == agent || r.b == agent)
    }

    /// Start a date between two colonists at [`DateStage::Proposed`].
    /// Refuses self-pairs and anyone already on a date.
    pub fn try_start(&mut self, x: u32, y: u32) -> bool {
        if x == y {
            return false;
        }
        if self.is_active(x) || self.is_active(y) {
            return false;
        }
        let (a, b) = if x < y { (x, y) } else { (y, x) };
        self.records.push(DateRecord {
            a,
            b,
            stage: DateStage::Proposed,
        });
        true
    }

    /// Remove the agent's date, if any. Safe to call repeatedly.
    pub fn end(&mut self, agent: u32) {
        if let Some(idx) = self.index_of(agent) {
            self.records.swap_remove(idx);
        }
    }

    pub fn is_active(&self, agent: u32) -> bool {
        self.index_of(agent).is_some()
    }

    pub fn partner_of(&self, agent: u32) -> Option<u32> {
        self.records.iter().find_map(|r| {
            if r.a == agent {
                Some(r.b)
            } else if r.b == agent {
                Some(r.a)
            } else {
                None
            }
        })
    }

    pub fn stage_of(&self, agent: u32) -> Option<DateStage> {
        self.index_of(agent).map(|idx| self.records[idx].stage)
    }

    /// Move the agent's date to the next stage. Reaching
    /// [`DateStage::Finished`] removes the record. Without an active
    /// date this is a no-op.
    pub fn advance(&mut self, agent: u32) {
        let idx = match self.index_of(agent) {
            Some(idx) => idx,
            None => {
                log::debug!("advance for agent {} with no active date", agent);
                return;
            }
        };
        match self.records[idx].stage.next() {
            Some(next) if next.is_finished() => {
                self.records.swap_remove(idx);
            }
            Some(next) => {
                self.records[idx].stage = next;
            }
            None => {}
        }
    }

    pub fn active_count(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[DateRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_queries_for_either_partner() {
        let mut registry = DatingRegistry::new();
        assert!(registry.try_start(4, 2));

        assert!(registry.is_active(2));
        assert!(registry.is_active(4));
        assert_eq!(registry.partner_of(2), Some(4));
        assert_eq!(registry.partner_of(4), Some(2));
        assert_eq!(registry.stage_of(2), Some(DateStage::Proposed));
        assert_eq!(registry.stage_of(4), Some(DateStage::Proposed));
        assert_eq!(registry.records()[0].a, 2);
    }

    #[test]
    fn one_date_per_colonist() {
        let mut registry = DatingRegistry::new();
        assert!(registry.try_start(1, 2));
        assert!(!registry.try_start(1, 3));
        assert!(!registry.try_start(3, 2));
        assert!(!registry.try_start(2, 1));
        assert!(registry.try_start(3, 4));
        assert_eq!(registry.active_count(), 2);
    }

    #[test]
    fn self_pair_is_refused() {
        let mut registry = DatingRegistry::new();
        assert!(!registry.try_start(5, 5));
        assert_eq!(registry.active_count(), 0);
    }

    #[test]
    fn end_is_idempotent() {
        let mut registry = DatingRegistry::new();
        registry.try_start(1, 2);
        registry.end(2);
        assert!(!registry.is_active(1));
        assert!(!registry.is_active(2));

        registry.end(2);
        registry.end(1);
        assert_eq!(registry.active_count(), 0);
    }

    #[test]
    fn advance_walks_stages_and_removes_on_finish() {
        let mut registry = DatingRegistry::new();
        registry.try_start(1, 2);

        let expected = [
            DateStage::Proposed,
            DateStage::Travel,
            DateStage::Activity,
            DateStage::Lovin,
        ];
        for stage in expected {
            assert_eq!(registry.stage_of(1), Some(stage));
            registry.advance(1);
        }
        assert!(!registry.is_active(1));
        assert!(!registry.is_active(2));
    }

    #[test]
    fn advance_without_date_is_harmless() {
        let mut registry = DatingRegistry::new();
        registry.advance(9);
        assert_eq!(registry.active_count(), 0);
    }

    #[test]
    fn advance_works_from_either_partner() {
        let mut registry = DatingRegistry::new();
        registry.try_start(7, 3);
        registry.advance(7);
        assert_eq!(registry.stage_of(3), Some(DateStage::Travel));
        registry.advance(3);
        assert_eq!(registry.stage_of(7), Some(DateStage::Activity));
    }
}
