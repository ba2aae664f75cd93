//! The date task: walks a couple through the stages of a date.
//!
//! Both partners run a [`DateTask`], but only the initiator's copy
//! advances the shared registry record. The guest follows along and
//! finishes when the record disappears.

use hearthside_logic::dating::{self, DateStage};
use hearthside_logic::opinion;
use hearthside_logic::prompt;

use crate::backend::GenerationPurpose;
use crate::components::{Needs, Position, Vec3};
use crate::systems::events::{DateEndReason, SocialEvent};
use crate::systems::tasks::{AgentTask, TaskCtx};

pub const DATE_TASK: &str = "date";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRole {
    /// Proposed the date. Drives stage advancement and the chat.
    Initiator,
    /// Accepted the date. Follows the initiator's lead.
    Guest,
}

pub struct DateTask {
    partner: u32,
    role: DateRole,
    spot: Vec3,
    lovin_remaining_ms: Option<u64>,
    chat: Option<u32>,
    chat_requested: bool,
    saturated_at_ms: Option<u64>,
    done: bool,
}

impl DateTask {
    pub fn new(partner: u32, role: DateRole, spot: Vec3) -> Self {
        DateTask {
            partner,
            role,
            spot,
            lovin_remaining_ms: None,
            chat: None,
            chat_requested: false,
            saturated_at_ms: None,
            done: false,
        }
    }

    fn is_initiator(&self) -> bool {
        self.role == DateRole::Initiator
    }

    /// Walk toward the date spot, returning the distance still to go.
    fn walk_toward_spot(&self, agent: u32, ctx: &mut TaskCtx) -> f32 {
        let entity = match ctx.directory.entity(agent) {
            Some(entity) => entity,
            None => return f32::MAX,
        };
        let step = dating::WALK_SPEED * ctx.delta_ms as f32 / 1000.0;
        match ctx.world.get::<&mut Position>(entity) {
            Ok(mut position) => position.step_toward(self.spot, step),
            Err(_) => f32::MAX,
        }
    }

    fn enjoy(&self, agent: u32, ctx: &mut TaskCtx) {
        if let Some(entity) = ctx.directory.entity(agent) {
            if let Ok(mut needs) = ctx.world.get::<&mut Needs>(entity) {
                needs.enjoy_date(ctx.delta_ms as f32 / 1000.0);
            }
        }
    }

    fn joy_saturated(&self, agent: u32, ctx: &TaskCtx) -> bool {
        let entity = match ctx.directory.entity(agent) {
            Some(entity) => entity,
            None => return false,
        };
        ctx.world
            .get::<&Needs>(entity)
            .map(|needs| needs.joy_saturated())
            .unwrap_or(false)
    }

    /// Kick off the generated back-and-forth for this date. The reply
    /// arrives later through the broker and is queued under `self.chat`.
    fn request_chat(&mut self, agent: u32, ctx: &mut TaskCtx) {
        self.chat_requested = true;
        let me = ctx.directory.display_name(ctx.world, agent);
        let partner = ctx.directory.display_name(ctx.world, self.partner);
        let conversation = ctx.narration.start_conversation();
        ctx.broker.submit(
            agent,
            GenerationPurpose::DateChat {
                conversation,
                initiator: agent,
                partner: self.partner,
            },
            prompt::date_chat_prompt(&me, &partner, prompt::DATE_SPOT_LABEL),
        );
        self.chat = Some(conversation);
    }

    fn chat_is_active(&self, ctx: &TaskCtx) -> bool {
        self.chat
            .map(|id| ctx.narration.is_conversation_active(id))
            .unwrap_or(false)
    }

    /// Successful wrap-up. Runs once, on the initiator's side only.
    fn conclude(&mut self, agent: u32, ctx: &mut TaskCtx) {
        ctx.relationships
            .adjust_opinion(agent, self.partner, opinion::DATE_SUCCESS_BONUS);
        ctx.relationships
            .adjust_opinion(self.partner, agent, opinion::DATE_SUCCESS_BONUS);
        let (a, b) = ordered(agent, self.partner);
        ctx.events.publish(SocialEvent::DateFinished { a, b });
        let me = ctx.directory.display_name(ctx.world, agent);
        let partner = ctx.directory.display_name(ctx.world, self.partner);
        ctx.notifications
            .notify(&format!("{} and {} had a lovely date.", me, partner));
        self.done = true;
    }

    /// A partner stopped being available mid-date. End the date without
    /// unwinding anything else.
    fn end_defensively(&mut self, agent: u32, ctx: &mut TaskCtx) {
        ctx.dates.end(agent);
        let (a, b) = ordered(agent, self.partner);
        ctx.events.publish(SocialEvent::DateEnded {
            a,
            b,
            reason: DateEndReason::PartnerUnavailable,
        });
        let me = ctx.directory.display_name(ctx.world, agent);
        let partner = ctx.directory.display_name(ctx.world, self.partner);
        ctx.notifications
            .notify(&format!("The date between {} and {} was cut short.", me, partner));
        self.done = true;
    }
}

impl AgentTask for DateTask {
    fn on_enter(&mut self, agent: u32, ctx: &mut TaskCtx) {
        if self.is_initiator() && ctx.dates.stage_of(agent) == Some(DateStage::Proposed) {
            ctx.dates.advance(agent);
        }
    }

    fn on_tick(&mut self, agent: u32, ctx: &mut TaskCtx) {
        if self.done {
            return;
        }

        // The registry record is the source of truth. Gone means over,
        // whether we finished it or the partner's side ended it.
        let stage = match ctx.dates.stage_of(agent) {
            Some(stage) => stage,
            None => {
                self.done = true;
                return;
            }
        };

        if !ctx.directory.is_eligible(ctx.world, agent)
            || !ctx.directory.is_eligible(ctx.world, self.partner)
        {
            self.end_defensively(agent, ctx);
            return;
        }

        match stage {
            DateStage::Proposed => {
                // Waiting on the initiator's first tick.
            }
            DateStage::Travel => {
                let remaining = self.walk_toward_spot(agent, ctx);
                if self.is_initiator()
                    && dating::arrived(remaining)
                    && ctx.dates.stage_of(agent) == Some(DateStage::Travel)
                {
                    ctx.dates.advance(agent);
                }
            }
            DateStage::Activity => {
                // The guest finishes the walk here if they lagged behind.
                self.walk_toward_spot(agent, ctx);
                self.enjoy(agent, ctx);

                if !self.is_initiator() {
                    return;
                }
                if !self.chat_requested {
                    self.request_chat(agent, ctx);
                }
                if self.joy_saturated(agent, ctx) {
                    let since = *self.saturated_at_ms.get_or_insert(ctx.now_ms);
                    let waited = ctx.now_ms.saturating_sub(since);
                    let chat_done =
                        !self.chat_is_active(ctx) || waited >= dating::CHAT_WAIT_BUDGET_MS;
                    if chat_done && ctx.dates.stage_of(agent) == Some(DateStage::Activity) {
                        ctx.dates.advance(agent);
                    }
                }
            }
            DateStage::Lovin => {
                if !self.is_initiator() {
                    return;
                }
                let remaining = self
                    .lovin_remaining_ms
                    .get_or_insert(dating::LOVIN_DURATION_MS);
                *remaining = remaining.saturating_sub(ctx.delta_ms);
                if *remaining == 0 && ctx.dates.stage_of(agent) == Some(DateStage::Lovin) {
                    // Advancing out of the last stage removes the record.
                    ctx.dates.advance(agent);
                    self.conclude(agent, ctx);
                }
            }
            DateStage::Finished => {
                self.done = true;
            }
        }
    }

    fn is_complete(&self) -> bool {
        self.done
    }

    fn on_exit(&mut self, agent: u32, ctx: &mut TaskCtx) {
        ctx.broker.cancel_for(agent);
        if let Some(id) = self.chat.take() {
            ctx.narration.close_conversation(id);
        }
    }
}

fn ordered(x: u32, y: u32) -> (u32, u32) {
    if x < y {
        (x, y)
    } else {
        (y, x)
    }
}
