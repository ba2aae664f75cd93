//! Saving and loading the colony.
//!
//! Saves capture the durable state: who exists, where they stand, and
//! what they think of each other. Transient social state (dates in
//! progress, queued speech, in-flight generations) is deliberately left
//! out; a loaded colony starts socially quiet.

use std::io::{Read, Write};

use hecs::World;
use serde::{Deserialize, Serialize};

use crate::components::{Colonist, Condition, Name, Needs, Position};
use crate::directory::AgentDirectory;
use crate::systems::RelationshipLedger;

/// Bumped when the save layout changes incompatibly.
pub const SAVE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct SavedColonist {
    id: u32,
    name: Name,
    position: Position,
    needs: Needs,
    condition: Condition,
}

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    /// Preserved so ids freed before the save are not handed out again.
    next_agent_id: u32,
    colonists: Vec<SavedColonist>,
    relationships: RelationshipLedger,
}

/// The pieces a save restores, ready to swap into a context.
pub struct LoadedSimulation {
    pub world: World,
    pub directory: AgentDirectory,
    pub relationships: RelationshipLedger,
}

/// Write the colony to `writer`.
pub fn save_simulation<W: Write>(
    writer: W,
    world: &World,
    directory: &AgentDirectory,
    relationships: &RelationshipLedger,
) -> Result<(), SaveError> {
    let mut colonists = Vec::new();
    for agent in directory.ids() {
        let entity = match directory.entity(agent) {
            Some(entity) => entity,
            None => continue,
        };
        let name = match world.get::<&Name>(entity) {
            Ok(name) => (*name).clone(),
            Err(_) => {
                log::warn!("colonist {} has no name component, skipping in save", agent);
                continue;
            }
        };
        let position = match world.get::<&Position>(entity) {
            Ok(position) => *position,
            Err(_) => {
                log::warn!("colonist {} has no position, skipping in save", agent);
                continue;
            }
        };
        let needs = world
            .get::<&Needs>(entity)
            .map(|n| *n)
            .unwrap_or_default();
        let condition = world
            .get::<&Condition>(entity)
            .map(|c| *c)
            .unwrap_or_default();
        colonists.push(SavedColonist {
            id: agent,
            name,
            position,
            needs,
            condition,
        });
    }

    let data = SaveData {
        version: SAVE_VERSION,
        next_agent_id: directory.next_id(),
        colonists,
        relationships: relationships.clone(),
    };
    bincode::serialize_into(writer, &data)?;
    Ok(())
}

/// Write the colony to a file at `path`.
pub fn save_to_file(
    path: &str,
    world: &World,
    directory: &AgentDirectory,
    relationships: &RelationshipLedger,
) -> Result<(), SaveError> {
    let file = std::fs::File::create(path)?;
    save_simulation(file, world, directory, relationships)
}

/// Read a colony back from a file at `path`.
pub fn load_from_file(path: &str) -> Result<LoadedSimulation, SaveError> {
    let file = std::fs::File::open(path)?;
    load_simulation(std::io::BufReader::new(file))
}

/// Read a colony back from `reader`.
pub fn load_simulation<R: Read>(reader: R) -> Result<LoadedSimulation, SaveError> {
    let data: SaveData = bincode::deserialize_from(reader)?;
    if data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: data.version,
        });
    }

    let mut world = World::new();
    let mut directory = AgentDirectory::new();
    for colonist in data.colonists {
        let entity = world.spawn((
            Colonist,
            colonist.name,
            colonist.position,
            colonist.needs,
            colonist.condition,
        ));
        directory.restore(colonist.id, entity);
    }
    directory.set_next_id(data.next_agent_id);

    Ok(LoadedSimulation {
        world,
        directory,
        relationships: data.relationships,
    })
}

/// Errors that can occur during save/load operations.
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(err: std::io::Error) -> Self {
        SaveError::Io(err)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(err: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(err)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(f, "save version mismatch: expected {}, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for SaveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load_round_trip() {
        let mut world = World::new();
        let mut directory = AgentDirectory::new();
        let mut relationships = RelationshipLedger::new();

        let a = directory.register(world.spawn((
            Colonist,
            Name::new("Asha", "Reed"),
            Position::new(1.0, 2.0),
            Needs::default(),
            Condition::default(),
        )));
        let b = directory.register(world.spawn((
            Colonist,
            Name::new("Bram", "Holt").with_nickname("Bee"),
            Position::new(5.0, 5.0),
            Needs::default(),
            Condition::default(),
        )));
        relationships.set_opinion(a, b, 42);
        relationships.set_lovers(a, b);

        let mut buffer = Vec::new();
        save_simulation(&mut buffer, &world, &directory, &relationships).unwrap();

        let loaded = load_simulation(buffer.as_slice()).unwrap();
        assert_eq!(loaded.directory.len(), 2);
        assert_eq!(loaded.directory.display_name(&loaded.world, a), "Asha");
        assert_eq!(loaded.directory.display_name(&loaded.world, b), "Bee");
        assert_eq!(loaded.relationships.opinion_of(a, b), 42);
        assert_eq!(loaded.relationships.lover_of(a), Some(b));
        assert_eq!(
            loaded.directory.position(&loaded.world, a).map(|p| p.x),
            Some(1.0)
        );
    }

    #[test]
    fn freed_ids_are_not_reused_after_load() {
        let mut world = World::new();
        let mut directory = AgentDirectory::new();
        let relationships = RelationshipLedger::new();

        directory.register(world.spawn((
            Colonist,
            Name::new("Asha", "Reed"),
            Position::new(0.0, 0.0),
            Needs::default(),
            Condition::default(),
        )));
        let b = directory.register(world.spawn((
            Colonist,
            Name::new("Bram", "Holt"),
            Position::new(1.0, 0.0),
            Needs::default(),
            Condition::default(),
        )));
        if let Some(entity) = directory.unregister(b) {
            world.despawn(entity).unwrap();
        }

        let mut buffer = Vec::new();
        save_simulation(&mut buffer, &world, &directory, &relationships).unwrap();
        let mut loaded = load_simulation(buffer.as_slice()).unwrap();

        // Only colonist 1 survives, but id 2 stays burned.
        assert_eq!(loaded.directory.len(), 1);
        let next = loaded.directory.register(loaded.world.spawn((Colonist,)));
        assert_eq!(next, 3);
    }

    #[test]
    fn file_round_trip() {
        let mut world = World::new();
        let mut directory = AgentDirectory::new();
        let relationships = RelationshipLedger::new();
        directory.register(world.spawn((
            Colonist,
            Name::new("Asha", "Reed"),
            Position::new(1.0, 2.0),
            Needs::default(),
            Condition::default(),
        )));

        let path = std::env::temp_dir().join(format!("hearthside-save-{}.bin", std::process::id()));
        let path = path.to_string_lossy().into_owned();
        save_to_file(&path, &world, &directory, &relationships).unwrap();
        let loaded = load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.directory.len(), 1);
        assert_eq!(loaded.directory.display_name(&loaded.world, 1), "Asha");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load_from_file("/nonexistent/hearthside-save.bin");
        assert!(matches!(result, Err(SaveError::Io(_))));
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let data = SaveData {
            version: SAVE_VERSION + 1,
            next_agent_id: 1,
            colonists: Vec::new(),
            relationships: RelationshipLedger::new(),
        };
        let bytes = bincode::serialize(&data).unwrap();
        match load_simulation(bytes.as_slice()) {
            Err(SaveError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, SAVE_VERSION);
                assert_eq!(found, SAVE_VERSION + 1);
            }
            Err(other) => panic!("wrong error kind: {}", other),
            Ok(_) => panic!("future save version was accepted"),
        }
    }

    #[test]
    fn truncated_data_is_a_bincode_error() {
        let result = load_simulation(&[1u8, 2, 3][..]);
        assert!(matches!(result, Err(SaveError::Bincode(_))));
    }
}
