//! The simulation context: owns all state and drives the tick loop.

use std::io::{Read, Write};
use std::sync::Arc;

use hecs::World;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use hearthside_logic::{opinion, pacing, prompt, reply};

use crate::backend::{
    BackendConfig, CompletedGeneration, DialogueBackend, GenerationBroker, GenerationPurpose,
};
use crate::components::{Colonist, Condition, Name, Needs, Position, Vec3};
use crate::directory::AgentDirectory;
use crate::output::{LogNotificationSink, LogRenderSink, NotificationSink, RenderSink};
use crate::persistence::{self, SaveError};
use crate::systems::{
    DateEndReason, DateRole, DateTask, DatingRegistry, EventBus, NarrationScheduler,
    RelationKind, RelationshipLedger, SocialEvent, TaskCtx, TaskRunner, DATE_TASK,
};

/// How often active dates are checked against nearby jealous lovers.
const CHEATING_SCAN_INTERVAL_MS: u64 = 1_000;

/// How often idle couples get a chance to start a date on their own.
const COURTSHIP_INTERVAL_MS: u64 = 5_000;

const COURTSHIP_CHANCE: f64 = 0.15;
const TAUNT_CHANCE: f64 = 0.25;

/// Mutual opinion above which a non-lover pair counts as a couple.
const COURTSHIP_OPINION: i32 = 50;

/// Colonists with rest below this skip courtship.
const LOW_REST: f32 = 0.2;

/// Date spots are picked inside this square.
const MAP_SIZE: f32 = 50.0;

/// Owns the world and every manager, and advances them together.
///
/// The embedder owns the clock: call [`SimulationContext::tick`] with
/// the current wall-clock time in milliseconds, as often as it likes.
/// Nothing here blocks; backend work runs on worker threads and is
/// picked up by later ticks.
pub struct SimulationContext {
    pub world: World,
    pub directory: AgentDirectory,
    pub dates: DatingRegistry,
    pub narration: NarrationScheduler,
    pub relationships: RelationshipLedger,
    pub events: EventBus,
    tasks: TaskRunner,
    broker: GenerationBroker,
    render: Box<dyn RenderSink>,
    notifications: Box<dyn NotificationSink>,
    rng: StdRng,
    last_tick_ms: Option<u64>,
    last_cheating_scan_ms: u64,
    last_courtship_ms: u64,
}

impl SimulationContext {
    /// Context with the default logging sinks.
    pub fn new(config: BackendConfig, backend: Arc<dyn DialogueBackend>) -> Self {
        Self::with_sinks(
            config,
            backend,
            Box::new(LogRenderSink),
            Box::new(LogNotificationSink),
        )
    }

    pub fn with_sinks(
        config: BackendConfig,
        backend: Arc<dyn DialogueBackend>,
        render: Box<dyn RenderSink>,
        notifications: Box<dyn NotificationSink>,
    ) -> Self {
        SimulationContext {
            world: World::new(),
            directory: AgentDirectory::new(),
            dates: DatingRegistry::new(),
            narration: NarrationScheduler::new(),
            relationships: RelationshipLedger::new(),
            events: EventBus::new(),
            tasks: TaskRunner::new(),
            broker: GenerationBroker::new(backend, config),
            render,
            notifications,
            rng: StdRng::from_entropy(),
            last_tick_ms: None,
            last_cheating_scan_ms: 0,
            last_courtship_ms: 0,
        }
    }

    /// Fix the random seed, for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn spawn_colonist(&mut self, name: Name, position: Position) -> u32 {
        let entity = self.world.spawn((
            Colonist,
            name,
            position,
            Needs::default(),
            Condition::default(),
        ));
        let agent = self.directory.register(entity);
        log::debug!("spawned colonist {}", agent);
        agent
    }

    /// Remove a colonist, ending their date and cancelling their work.
    /// An active date is reported as cut short while both names still resolve.
    pub fn despawn_colonist(&mut self, agent: u32) {
        if let Some(partner) = self.dates.partner_of(agent) {
            self.dates.end(agent);
            let (a, b) = if agent < partner {
                (agent, partner)
            } else {
                (partner, agent)
            };
            self.events.publish(SocialEvent::DateEnded {
                a,
                b,
                reason: DateEndReason::PartnerUnavailable,
            });
            let agent_name = self.directory.display_name(&self.world, agent);
            let partner_name = self.directory.display_name(&self.world, partner);
            self.notifications.notify(&format!(
                "The date between {} and {} was cut short.",
                agent_name, partner_name
            ));
        }
        self.broker.cancel_for(agent);
        let now_ms = self.last_tick_ms.unwrap_or(0);
        self.with_task_ctx(now_ms, 0, |tasks, ctx| tasks.cancel(agent, ctx));
        if let Some(entity) = self.directory.unregister(agent) {
            let _ = self.world.despawn(entity);
        }
    }

    /// Advance the whole simulation to `now_ms`.
    pub fn tick(&mut self, now_ms: u64) {
        let delta_ms = match self.last_tick_ms {
            Some(last) => now_ms.saturating_sub(last),
            None => 0,
        };
        self.last_tick_ms = Some(now_ms);

        for done in self.broker.poll() {
            self.dispatch_generation(done);
        }

        for event in self.events.drain() {
            self.handle_event(event);
        }

        if now_ms.saturating_sub(self.last_courtship_ms) >= COURTSHIP_INTERVAL_MS {
            self.last_courtship_ms = now_ms;
            self.auto_courtship();
        }

        self.with_task_ctx(now_ms, delta_ms, |tasks, ctx| tasks.update(ctx));

        if now_ms.saturating_sub(self.last_cheating_scan_ms) >= CHEATING_SCAN_INTERVAL_MS {
            self.last_cheating_scan_ms = now_ms;
            self.cheating_scan();
        }

        if delta_ms > 0 {
            let seconds = delta_ms as f32 / 1000.0;
            for (_, needs) in self.world.query_mut::<&mut Needs>() {
                needs.decay(seconds);
            }
        }

        self.narration.on_tick(now_ms, self.render.as_mut());
    }

    /// Ask `target` out on behalf of `initiator`. On acceptance both
    /// get a date task and walk to a shared spot; on rejection the
    /// initiator loses a little standing with the target.
    pub fn try_propose(&mut self, initiator: u32, target: u32) -> bool {
        if initiator == target {
            return false;
        }
        if !self.directory.is_eligible(&self.world, initiator)
            || !self.directory.is_eligible(&self.world, target)
        {
            return false;
        }
        if self.dates.is_active(initiator) || self.dates.is_active(target) {
            return false;
        }

        if !opinion::accepts_proposal(self.relationships.opinion_of(target, initiator)) {
            self.relationships
                .adjust_opinion(target, initiator, -opinion::REBUFF_STING);
            self.events
                .publish(SocialEvent::ProposalRejected { initiator, target });
            let initiator_name = self.directory.display_name(&self.world, initiator);
            let target_name = self.directory.display_name(&self.world, target);
            self.notifications
                .notify(&format!("{} turned down {}.", target_name, initiator_name));
            return false;
        }

        if !self.dates.try_start(initiator, target) {
            return false;
        }
        let spot = Vec3::new(
            self.rng.gen_range(0.0..MAP_SIZE),
            self.rng.gen_range(0.0..MAP_SIZE),
            0.0,
        );
        self.start_date_task(initiator, target, DateRole::Initiator, spot);
        self.start_date_task(target, initiator, DateRole::Guest, spot);
        self.events.publish(SocialEvent::DateStarted {
            initiator,
            partner: target,
        });
        let initiator_name = self.directory.display_name(&self.world, initiator);
        let target_name = self.directory.display_name(&self.world, target);
        self.notifications.notify(&format!(
            "{} and {} are going on a date.",
            initiator_name, target_name
        ));
        true
    }

    /// Report a landed blow. The attacker may shout a generated taunt.
    pub fn report_combat_hit(&mut self, attacker: u32, victim: u32) {
        self.events
            .publish(SocialEvent::CombatHit { attacker, victim });
    }

    pub fn colonist_count(&self) -> usize {
        self.directory.len()
    }

    pub fn is_running_date(&self, agent: u32) -> bool {
        self.tasks.is_running(agent, DATE_TASK)
    }

    pub fn task_of(&self, agent: u32) -> Option<&'static str> {
        self.tasks.task_of(agent)
    }

    pub fn pending_generations(&self) -> usize {
        self.broker.pending_count()
    }

    pub fn set_drafted(&mut self, agent: u32, value: bool) {
        self.set_condition(agent, |c| c.drafted = value);
    }

    pub fn set_downed(&mut self, agent: u32, value: bool) {
        self.set_condition(agent, |c| c.downed = value);
    }

    pub fn set_asleep(&mut self, agent: u32, value: bool) {
        self.set_condition(agent, |c| c.asleep = value);
    }

    /// Write the durable colony state to `writer`.
    pub fn save<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        persistence::save_simulation(writer, &self.world, &self.directory, &self.relationships)
    }

    /// Replace the colony with a saved one. Transient social state
    /// (dates, queued speech, in-flight generations) does not survive;
    /// the loaded colony starts quiet.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<(), SaveError> {
        let loaded = persistence::load_simulation(reader)?;
        self.world = loaded.world;
        self.directory = loaded.directory;
        self.relationships = loaded.relationships;
        self.clear_session();
        Ok(())
    }

    /// Drop all transient social state without touching the colony.
    pub fn clear_session(&mut self) {
        self.dates = DatingRegistry::new();
        self.narration = NarrationScheduler::new();
        self.tasks = TaskRunner::new();
        self.broker.clear();
        self.events.clear();
    }

    fn set_condition(&mut self, agent: u32, apply: impl FnOnce(&mut Condition)) {
        if let Some(entity) = self.directory.entity(agent) {
            if let Ok(mut condition) = self.world.get::<&mut Condition>(entity) {
                apply(&mut condition);
            }
        }
    }

    fn start_date_task(&mut self, agent: u32, partner: u32, role: DateRole, spot: Vec3) {
        let now_ms = self.last_tick_ms.unwrap_or(0);
        self.with_task_ctx(now_ms, 0, |tasks, ctx| {
            tasks.start(
                agent,
                DATE_TASK,
                Box::new(DateTask::new(partner, role, spot)),
                ctx,
            );
        });
    }

    fn with_task_ctx<R>(
        &mut self,
        now_ms: u64,
        delta_ms: u64,
        run: impl FnOnce(&mut TaskRunner, &mut TaskCtx) -> R,
    ) -> R {
        let SimulationContext {
            world,
            directory,
            dates,
            narration,
            relationships,
            events,
            tasks,
            broker,
            notifications,
            rng,
            ..
        } = self;
        let mut ctx = TaskCtx {
            world,
            directory,
            dates,
            narration,
            relationships,
            events,
            broker,
            notifications: notifications.as_mut(),
            rng,
            now_ms,
            delta_ms,
        };
        run(tasks, &mut ctx)
    }

    /// Route one finished generation to whatever asked for it.
    fn dispatch_generation(&mut self, done: CompletedGeneration) {
        if done.canceled {
            log::debug!("discarding canceled generation for agent {}", done.speaker);
            if let GenerationPurpose::DateChat { conversation, .. } = done.purpose {
                self.narration.close_conversation(conversation);
            }
            return;
        }
        match done.purpose {
            GenerationPurpose::DateChat {
                conversation,
                initiator,
                partner,
            } => match done.result {
                Ok(raw) => {
                    // A reply for a date that already fell apart is stale.
                    if self.dates.partner_of(initiator) != Some(partner) {
                        self.narration.close_conversation(conversation);
                        return;
                    }
                    let lines = reply::split_lines(&raw);
                    if lines.is_empty() {
                        log::debug!("date chat reply was empty after cleanup");
                        self.narration.close_conversation(conversation);
                        return;
                    }
                    for (i, line) in lines.iter().enumerate() {
                        let speaker = if i % 2 == 0 { initiator } else { partner };
                        let duration = pacing::display_duration_ms(line);
                        self.narration
                            .enqueue(speaker, line.clone(), duration, Some(conversation));
                    }
                }
                Err(err) => {
                    log::warn!("date chat generation failed: {}", err);
                    self.narration.close_conversation(conversation);
                }
            },
            GenerationPurpose::Taunt => match done.result {
                Ok(raw) => {
                    if !self.directory.is_aware(&self.world, done.speaker) {
                        return;
                    }
                    let line = reply::clean_line(&raw);
                    if line.is_empty() {
                        return;
                    }
                    let duration = pacing::display_duration_ms(&line);
                    self.narration.enqueue(done.speaker, line, duration, None);
                }
                Err(err) => {
                    log::debug!("taunt generation failed: {}", err);
                }
            },
        }
    }

    fn handle_event(&mut self, event: SocialEvent) {
        if let SocialEvent::CombatHit { attacker, victim } = event {
            if !self.directory.is_aware(&self.world, attacker) {
                return;
            }
            if !self.rng.gen_bool(TAUNT_CHANCE) {
                return;
            }
            let attacker_name = self.directory.display_name(&self.world, attacker);
            let victim_name = self.directory.display_name(&self.world, victim);
            self.broker.submit(
                attacker,
                GenerationPurpose::Taunt,
                prompt::taunt_prompt(&attacker_name, &victim_name),
            );
        }
    }

    /// Give idle couples a chance to start a date on their own.
    fn auto_courtship(&mut self) {
        let mut couples: Vec<(u32, u32)> = Vec::new();
        for rel in &self.relationships.relationships {
            let qualified = rel.kind == RelationKind::Lover
                || (rel.opinion_a > COURTSHIP_OPINION && rel.opinion_b > COURTSHIP_OPINION);
            if qualified {
                couples.push((rel.a, rel.b));
            }
        }
        couples.sort_unstable();

        for (a, b) in couples {
            if self.dates.is_active(a) || self.dates.is_active(b) {
                continue;
            }
            if !self.directory.is_eligible(&self.world, a)
                || !self.directory.is_eligible(&self.world, b)
            {
                continue;
            }
            if self.is_tired(a) || self.is_tired(b) {
                continue;
            }
            if !self.rng.gen_bool(COURTSHIP_CHANCE) {
                continue;
            }
            // The keener side does the asking.
            let (initiator, target) =
                if self.relationships.opinion_of(a, b) >= self.relationships.opinion_of(b, a) {
                    (a, b)
                } else {
                    (b, a)
                };
            self.try_propose(initiator, target);
        }
    }

    fn is_tired(&self, agent: u32) -> bool {
        let entity = match self.directory.entity(agent) {
            Some(entity) => entity,
            None => return true,
        };
        self.world
            .get::<&Needs>(entity)
            .map(|needs| needs.rest < LOW_REST)
            .unwrap_or(true)
    }

    /// Look for lovers standing close enough to an active date to catch
    /// their partner cheating. At most one scandal per date per scan.
    fn cheating_scan(&mut self) {
        let records = self.dates.records().to_vec();
        for record in records {
            for (participant, partner) in [(record.a, record.b), (record.b, record.a)] {
                let lover = match self.relationships.lover_of(participant) {
                    Some(lover) => lover,
                    None => continue,
                };
                if lover == partner {
                    continue;
                }
                if !self.directory.is_aware(&self.world, lover) {
                    continue;
                }
                let lover_pos = match self.directory.position(&self.world, lover) {
                    Some(pos) => pos,
                    None => continue,
                };
                let cheater_pos = match self.directory.position(&self.world, participant) {
                    Some(pos) => pos,
                    None => continue,
                };
                if !opinion::within_caught_radius(lover_pos.distance(&cheater_pos)) {
                    continue;
                }

                self.relationships
                    .adjust_opinion(lover, participant, -opinion::CHEATING_PENALTY);
                self.relationships.break_up(lover, participant);
                self.events.publish(SocialEvent::CaughtCheating {
                    cheater: participant,
                    lover,
                    partner,
                });
                self.events.publish(SocialEvent::DateEnded {
                    a: record.a,
                    b: record.b,
                    reason: DateEndReason::Scandal,
                });
                let lover_name = self.directory.display_name(&self.world, lover);
                let cheater_name = self.directory.display_name(&self.world, participant);
                let partner_name = self.directory.display_name(&self.world, partner);
                self.notifications.notify(&format!(
                    "{} caught {} on a date with {}!",
                    lover_name, cheater_name, partner_name
                ));
                self.dates.end(participant);
                break;
            }
        }
    }
}
