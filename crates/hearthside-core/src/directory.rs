//! Stable agent ids and lookups over the entity world.
//!
//! Entities come and go and their `Entity` handles are not stable across
//! save and load. The directory hands out small stable ids that the rest
//! of the simulation (dates, opinions, narration) keys on.

use std::collections::HashMap;

use hecs::{Entity, World};

use crate::components::{Condition, Name, Position, Vec3};

/// Maps stable agent ids to live entities.
#[derive(Debug, Default)]
pub struct AgentDirectory {
    by_id: HashMap<u32, Entity>,
    next_id: u32,
}

impl AgentDirectory {
    pub fn new() -> Self {
        AgentDirectory {
            by_id: HashMap::new(),
            next_id: 1,
        }
    }

    /// Assign the next free id to `entity`.
    pub(crate) fn register(&mut self, entity: Entity) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.by_id.insert(id, entity);
        id
    }

    pub(crate) fn unregister(&mut self, agent: u32) -> Option<Entity> {
        self.by_id.remove(&agent)
    }

    /// Re-bind a saved id to a freshly spawned entity.
    pub(crate) fn restore(&mut self, agent: u32, entity: Entity) {
        self.by_id.insert(agent, entity);
        self.next_id = self.next_id.max(agent + 1);
    }

    pub(crate) fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Restore the id counter from a save. Never moves it backward.
    pub(crate) fn set_next_id(&mut self, value: u32) {
        self.next_id = self.next_id.max(value);
    }

    pub fn entity(&self, agent: u32) -> Option<Entity> {
        self.by_id.get(&agent).copied()
    }

    pub fn contains(&self, agent: u32) -> bool {
        self.by_id.contains_key(&agent)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// All registered ids, sorted for deterministic iteration.
    pub fn ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.by_id.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Whether the agent exists and is free for social activities.
    pub fn is_eligible(&self, world: &World, agent: u32) -> bool {
        self.condition(world, agent)
            .map(|c| c.can_socialize())
            .unwrap_or(false)
    }

    /// Whether the agent exists and can notice nearby events.
    pub fn is_aware(&self, world: &World, agent: u32) -> bool {
        self.condition(world, agent)
            .map(|c| c.is_aware())
            .unwrap_or(false)
    }

    pub fn position(&self, world: &World, agent: u32) -> Option<Vec3> {
        let entity = self.entity(agent)?;
        world.get::<&Position>(entity).ok().map(|p| p.0)
    }

    /// Short display name, falling back to the id for unnamed agents.
    pub fn display_name(&self, world: &World, agent: u32) -> String {
        if let Some(entity) = self.entity(agent) {
            if let Ok(name) = world.get::<&Name>(entity) {
                return name.display_name().to_string();
            }
        }
        format!("Colonist {}", agent)
    }

    fn condition(&self, world: &World, agent: u32) -> Option<Condition> {
        let entity = self.entity(agent)?;
        world.get::<&Condition>(entity).ok().map(|c| *c)
    }
}
