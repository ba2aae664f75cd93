//! Per-agent task runtime.
//!
//! A task is a small state machine driven by the tick loop: entered
//! once, ticked until it reports completion, exited once. Each agent
//! runs at most one task at a time.

use hecs::World;
use rand::rngs::StdRng;

use crate::backend::GenerationBroker;
use crate::directory::AgentDirectory;
use crate::output::NotificationSink;
use crate::systems::dating::DatingRegistry;
use crate::systems::events::EventBus;
use crate::systems::narration::NarrationScheduler;
use crate::systems::relationships::RelationshipLedger;

/// Everything a task may touch while it runs.
pub struct TaskCtx<'a> {
    pub world: &'a mut World,
    pub directory: &'a AgentDirectory,
    pub dates: &'a mut DatingRegistry,
    pub narration: &'a mut NarrationScheduler,
    pub relationships: &'a mut RelationshipLedger,
    pub events: &'a mut EventBus,
    pub broker: &'a mut GenerationBroker,
    pub notifications: &'a mut dyn NotificationSink,
    pub rng: &'a mut StdRng,
    pub now_ms: u64,
    pub delta_ms: u64,
}

/// A unit of agent behavior with explicit lifecycle hooks.
pub trait AgentTask {
    /// Called once, on the first tick the task runs.
    fn on_enter(&mut self, agent: u32, ctx: &mut TaskCtx);

    /// Called every tick until [`AgentTask::is_complete`] returns true.
    fn on_tick(&mut self, agent: u32, ctx: &mut TaskCtx);

    fn is_complete(&self) -> bool;

    /// Called once when the task finishes or is cancelled, for cleanup.
    fn on_exit(&mut self, agent: u32, ctx: &mut TaskCtx);
}

struct TaskSlot {
    agent: u32,
    name: &'static str,
    entered: bool,
    task: Box<dyn AgentTask>,
}

/// Runs at most one task per agent.
#[derive(Default)]
pub struct TaskRunner {
    slots: Vec<TaskSlot>,
}

impl TaskRunner {
    pub fn new() -> Self {
        TaskRunner { slots: Vec::new() }
    }

    /// Start a task for an agent, replacing (and exiting) any current one.
    pub fn start(
        &mut self,
        agent: u32,
        name: &'static str,
        task: Box<dyn AgentTask>,
        ctx: &mut TaskCtx,
    ) {
        self.cancel(agent, ctx);
        self.slots.push(TaskSlot {
            agent,
            name,
            entered: false,
            task,
        });
        log::debug!("agent {} starting task '{}'", agent, name);
    }

    /// Stop the agent's current task, running its exit hook if it ever entered.
    pub fn cancel(&mut self, agent: u32, ctx: &mut TaskCtx) {
        if let Some(idx) = self.slots.iter().position(|s| s.agent == agent) {
            let mut slot = self.slots.swap_remove(idx);
            if slot.entered {
                slot.task.on_exit(slot.agent, ctx);
            }
        }
    }

    pub fn is_running(&self, agent: u32, name: &str) -> bool {
        self.slots.iter().any(|s| s.agent == agent && s.name == name)
    }

    pub fn task_of(&self, agent: u32) -> Option<&'static str> {
        self.slots
            .iter()
            .find(|s| s.agent == agent)
            .map(|s| s.name)
    }

    pub fn running_count(&self) -> usize {
        self.slots.len()
    }

    /// Drive every task one tick. Completed tasks exit and are removed.
    pub fn update(&mut self, ctx: &mut TaskCtx) {
        let mut idx = 0;
        while idx < self.slots.len() {
            let slot = &mut self.slots[idx];
            if !slot.entered {
                slot.entered = true;
                slot.task.on_enter(slot.agent, ctx);
            }
            slot.task.on_tick(slot.agent, ctx);
            if slot.task.is_complete() {
                let mut slot = self.slots.swap_remove(idx);
                slot.task.on_exit(slot.agent, ctx);
            } else {
                idx += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendConfig, DialogueBackend, GenerationBroker};
    use crate::output::LogNotificationSink;
    use hearthside_logic::generation::GenerationRequest;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    struct NullBackend;

    impl DialogueBackend for NullBackend {
        fn generate(
            &self,
            _request: &GenerationRequest,
        ) -> Result<String, crate::backend::BackendError> {
            Ok(String::new())
        }
    }

    struct Harness {
        world: World,
        directory: AgentDirectory,
        dates: DatingRegistry,
        narration: NarrationScheduler,
        relationships: RelationshipLedger,
        events: EventBus,
        broker: GenerationBroker,
        notifications: LogNotificationSink,
        rng: StdRng,
    }

    impl Harness {
        fn new() -> Self {
            Harness {
                world: World::new(),
                directory: AgentDirectory::new(),
                dates: DatingRegistry::new(),
                narration: NarrationScheduler::new(),
                relationships: RelationshipLedger::new(),
                events: EventBus::new(),
                broker: GenerationBroker::new(Arc::new(NullBackend), BackendConfig::default()),
                notifications: LogNotificationSink,
                rng: StdRng::seed_from_u64(1),
            }
        }

        fn ctx(&mut self) -> TaskCtx<'_> {
            TaskCtx {
                world: &mut self.world,
                directory: &self.directory,
                dates: &mut self.dates,
                narration: &mut self.narration,
                relationships: &mut self.relationships,
                events: &mut self.events,
                broker: &mut self.broker,
                notifications: &mut self.notifications,
                rng: &mut self.rng,
                now_ms: 0,
                delta_ms: 100,
            }
        }
    }

    #[derive(Debug, Default, Clone)]
    struct Trace {
        enters: u32,
        ticks: u32,
        exits: u32,
    }

    struct CountingTask {
        trace: Rc<RefCell<Trace>>,
        ticks_to_run: u32,
    }

    impl AgentTask for CountingTask {
        fn on_enter(&mut self, _agent: u32, _ctx: &mut TaskCtx) {
            self.trace.borrow_mut().enters += 1;
        }

        fn on_tick(&mut self, _agent: u32, _ctx: &mut TaskCtx) {
            self.trace.borrow_mut().ticks += 1;
        }

        fn is_complete(&self) -> bool {
            self.trace.borrow().ticks >= self.ticks_to_run
        }

        fn on_exit(&mut self, _agent: u32, _ctx: &mut TaskCtx) {
            self.trace.borrow_mut().exits += 1;
        }
    }

    #[test]
    fn lifecycle_runs_enter_tick_exit() {
        let mut harness = Harness::new();
        let trace = Rc::new(RefCell::new(Trace::default()));

        let task = CountingTask {
            trace: Rc::clone(&trace),
            ticks_to_run: 3,
        };
        let mut runner = TaskRunner::new();
        runner.start(1, "count", Box::new(task), &mut harness.ctx());
        assert!(runner.is_running(1, "count"));
        assert_eq!(runner.task_of(1), Some("count"));

        for _ in 0..5 {
            runner.update(&mut harness.ctx());
        }

        let trace = trace.borrow();
        assert_eq!(trace.enters, 1);
        assert_eq!(trace.ticks, 3);
        assert_eq!(trace.exits, 1);
        assert_eq!(runner.running_count(), 0);
    }

    #[test]
    fn starting_a_new_task_exits_the_old_one() {
        let mut harness = Harness::new();
        let first = Rc::new(RefCell::new(Trace::default()));
        let second = Rc::new(RefCell::new(Trace::default()));

        let mut runner = TaskRunner::new();
        runner.start(
            1,
            "first",
            Box::new(CountingTask {
                trace: Rc::clone(&first),
                ticks_to_run: 100,
            }),
            &mut harness.ctx(),
        );
        runner.update(&mut harness.ctx());

        runner.start(
            1,
            "second",
            Box::new(CountingTask {
                trace: Rc::clone(&second),
                ticks_to_run: 100,
            }),
            &mut harness.ctx(),
        );

        assert_eq!(first.borrow().exits, 1);
        assert!(!runner.is_running(1, "first"));
        assert!(runner.is_running(1, "second"));
        assert_eq!(runner.running_count(), 1);
    }

    #[test]
    fn cancel_before_first_tick_skips_exit() {
        let mut harness = Harness::new();
        let trace = Rc::new(RefCell::new(Trace::default()));

        let mut runner = TaskRunner::new();
        runner.start(
            1,
            "count",
            Box::new(CountingTask {
                trace: Rc::clone(&trace),
                ticks_to_run: 100,
            }),
            &mut harness.ctx(),
        );
        runner.cancel(1, &mut harness.ctx());

        let trace = trace.borrow();
        assert_eq!(trace.enters, 0);
        assert_eq!(trace.exits, 0);
        assert_eq!(runner.running_count(), 0);
    }
}
