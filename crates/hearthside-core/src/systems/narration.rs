//! Global speech-bubble scheduling.
//!
//! Everything any colonist says passes through one queue. Exactly one
//! utterance is visible at a time, each for its own duration, in strict
//! submission order. Utterances can belong to a conversation so the
//! source of a chat can learn when its last line has been shown.

use std::collections::VecDeque;

use crate::output::RenderSink;

/// One queued line of speech.
#[derive(Debug, Clone)]
pub struct Utterance {
    pub speaker: u32,
    pub text: String,
    pub duration_ms: u64,
    pub conversation: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
struct DisplaySlot {
    expires_at_ms: u64,
}

struct ConversationSession {
    id: u32,
    on_complete: Option<Box<dyn FnOnce()>>,
}

/// FIFO scheduler for colonist speech.
pub struct NarrationScheduler {
    queue: VecDeque<Utterance>,
    showing: Option<DisplaySlot>,
    sessions: Vec<ConversationSession>,
    next_conversation_id: u32,
}

impl Default for NarrationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl NarrationScheduler {
    pub fn new() -> Self {
        NarrationScheduler {
            queue: VecDeque::new(),
            showing: None,
            sessions: Vec::new(),
            next_conversation_id: 1,
        }
    }

    /// Queue a line of speech. Rejects zero durations, which would
    /// otherwise wedge the display slot.
    pub fn enqueue(
        &mut self,
        speaker: u32,
        text: impl Into<String>,
        duration_ms: u64,
        conversation: Option<u32>,
    ) -> bool {
        if duration_ms == 0 {
            log::warn!("rejected zero-duration utterance from agent {}", speaker);
            return false;
        }
        self.queue.push_back(Utterance {
            speaker,
            text: text.into(),
            duration_ms,
            conversation,
        });
        true
    }

    /// Open a conversation with no completion callback.
    pub fn start_conversation(&mut self) -> u32 {
        self.start_conversation_with(|| {})
    }

    /// Open a conversation. `on_complete` fires exactly once, when the
    /// conversation's last queued line has been taken for display, or
    /// earlier if the conversation is closed by hand.
    pub fn start_conversation_with<F>(&mut self, on_complete: F) -> u32
    where
        F: FnOnce() + 'static,
    {
        let id = self.next_conversation_id;
        self.next_conversation_id += 1;
        self.sessions.push(ConversationSession {
            id,
            on_complete: Some(Box::new(on_complete)),
        });
        id
    }

    pub fn is_conversation_active(&self, id: u32) -> bool {
        self.sessions.iter().any(|s| s.id == id)
    }

    /// Close a conversation and fire its completion callback. Safe to
    /// call for unknown or already-closed ids.
    pub fn close_conversation(&mut self, id: u32) {
        if let Some(idx) = self.sessions.iter().position(|s| s.id == id) {
            let mut session = self.sessions.swap_remove(idx);
            if let Some(callback) = session.on_complete.take() {
                callback();
            }
        }
    }

    /// Advance the display. Call once per simulation tick with the
    /// current wall-clock time.
    pub fn on_tick(&mut self, now_ms: u64, render: &mut dyn RenderSink) {
        if let Some(slot) = self.showing {
            if now_ms >= slot.expires_at_ms {
                self.showing = None;
            }
        }
        if self.showing.is_some() {
            return;
        }
        let utterance = match self.queue.pop_front() {
            Some(u) => u,
            None => return,
        };
        render.draw_floating_text(utterance.speaker, &utterance.text, utterance.duration_ms);
        self.showing = Some(DisplaySlot {
            expires_at_ms: now_ms + utterance.duration_ms,
        });
        if let Some(id) = utterance.conversation {
            self.maybe_complete(id);
        }
    }

    /// Close the conversation once no queued line still belongs to it.
    fn maybe_complete(&mut self, id: u32) {
        let has_pending = self.queue.iter().any(|u| u.conversation == Some(id));
        if !has_pending {
            self.close_conversation(id);
        }
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// True when nothing is queued and nothing is on screen.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.showing.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct TestRenderSink {
        shown: Vec<(u32, String, u64)>,
    }

    impl RenderSink for TestRenderSink {
        fn draw_floating_text(&mut self, speaker: u32, text: &str, duration_ms: u64) {
            self.shown.push((speaker, text.to_string(), duration_ms));
        }
    }

    #[test]
    fn one_at_a_time_in_fifo_order() {
        let mut scheduler = NarrationScheduler::new();
        let mut sink = TestRenderSink::default();

        assert!(scheduler.enqueue(1, "First", 500, None));
        assert!(scheduler.enqueue(2, "Second", 300, None));

        scheduler.on_tick(0, &mut sink);
        assert_eq!(sink.shown.len(), 1);
        assert_eq!(sink.shown[0].1, "First");

        // Still inside the first utterance's window.
        scheduler.on_tick(499, &mut sink);
        assert_eq!(sink.shown.len(), 1);

        scheduler.on_tick(500, &mut sink);
        assert_eq!(sink.shown.len(), 2);
        assert_eq!(sink.shown[1].1, "Second");

        scheduler.on_tick(800, &mut sink);
        assert_eq!(sink.shown.len(), 2);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn conversation_completes_exactly_once() {
        let mut scheduler = NarrationScheduler::new();
        let mut sink = TestRenderSink::default();
        let fired = Rc::new(Cell::new(0u32));

        let counter = Rc::clone(&fired);
        let id = scheduler.start_conversation_with(move || {
            counter.set(counter.get() + 1);
        });

        scheduler.enqueue(1, "One", 100, Some(id));
        scheduler.enqueue(2, "Two", 100, Some(id));
        scheduler.enqueue(1, "Three", 100, Some(id));

        scheduler.on_tick(0, &mut sink);
        assert_eq!(fired.get(), 0);
        scheduler.on_tick(100, &mut sink);
        assert_eq!(fired.get(), 0);
        scheduler.on_tick(200, &mut sink);
        assert_eq!(fired.get(), 1);
        assert!(!scheduler.is_conversation_active(id));

        // The last bubble expiring must not fire it again.
        scheduler.on_tick(300, &mut sink);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn interleaved_speech_does_not_complete_early() {
        let mut scheduler = NarrationScheduler::new();
        let mut sink = TestRenderSink::default();
        let fired = Rc::new(Cell::new(0u32));

        let counter = Rc::clone(&fired);
        let id = scheduler.start_conversation_with(move || {
            counter.set(counter.get() + 1);
        });

        scheduler.enqueue(1, "Chat line", 100, Some(id));
        scheduler.enqueue(9, "Unrelated shout", 100, None);
        scheduler.enqueue(2, "Last chat line", 100, Some(id));

        scheduler.on_tick(0, &mut sink);
        assert_eq!(fired.get(), 0);
        scheduler.on_tick(100, &mut sink);
        assert_eq!(fired.get(), 0);
        scheduler.on_tick(200, &mut sink);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut scheduler = NarrationScheduler::new();
        assert!(!scheduler.enqueue(1, "Nothing", 0, None));
        assert_eq!(scheduler.queue_len(), 0);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn manual_close_fires_callback_once() {
        let mut scheduler = NarrationScheduler::new();
        let fired = Rc::new(Cell::new(0u32));

        let counter = Rc::clone(&fired);
        let id = scheduler.start_conversation_with(move || {
            counter.set(counter.get() + 1);
        });

        scheduler.close_conversation(id);
        assert_eq!(fired.get(), 1);
        scheduler.close_conversation(id);
        assert_eq!(fired.get(), 1);
        assert!(!scheduler.is_conversation_active(id));
    }

    #[test]
    fn standalone_lines_ignore_sessions() {
        let mut scheduler = NarrationScheduler::new();
        let mut sink = TestRenderSink::default();
        let id = scheduler.start_conversation();

        scheduler.enqueue(1, "Hmph.", 100, None);
        scheduler.on_tick(0, &mut sink);
        assert!(scheduler.is_conversation_active(id));
    }

    #[test]
    fn tick_with_empty_queue_is_harmless() {
        let mut scheduler = NarrationScheduler::new();
        let mut sink = TestRenderSink::default();
        scheduler.on_tick(0, &mut sink);
        scheduler.on_tick(1_000, &mut sink);
        assert!(sink.shown.is_empty());
        assert!(scheduler.is_idle());
    }
}
