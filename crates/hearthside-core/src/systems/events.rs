//! Social events and their observers.
//!
//! Systems publish events as they happen; the context drains the queue
//! once per tick and reacts. Observers get a typed view of everything
//! that flows through, which is what the headless harness hooks into.

/// Why a date was cut short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateEndReason {
    /// A partner became drafted, downed, asleep, or despawned.
    PartnerUnavailable,
    /// The date was broken up by a jealous lover.
    Scandal,
}

/// Something social that happened this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialEvent {
    CombatHit {
        attacker: u32,
        victim: u32,
    },
    DateStarted {
        initiator: u32,
        partner: u32,
    },
    DateFinished {
        a: u32,
        b: u32,
    },
    DateEnded {
        a: u32,
        b: u32,
        reason: DateEndReason,
    },
    ProposalRejected {
        initiator: u32,
        target: u32,
    },
    CaughtCheating {
        cheater: u32,
        lover: u32,
        partner: u32,
    },
}

/// Queue of pending events plus registered observers.
#[derive(Default)]
pub struct EventBus {
    queue: Vec<SocialEvent>,
    observers: Vec<Box<dyn FnMut(&SocialEvent)>>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus {
            queue: Vec::new(),
            observers: Vec::new(),
        }
    }

    pub fn publish(&mut self, event: SocialEvent) {
        self.queue.push(event);
    }

    /// Register an observer that sees every drained event.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&SocialEvent) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Take all pending events, notifying observers in publish order.
    pub fn drain(&mut self) -> Vec<SocialEvent> {
        let events = std::mem::take(&mut self.queue);
        for event in &events {
            for observer in &mut self.observers {
                observer(event);
            }
        }
        events
    }

    /// Drop all pending events without notifying observers.
    /// Observers stay registered.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}
