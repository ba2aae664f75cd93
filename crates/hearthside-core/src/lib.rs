//! Hearthside Core - Colony Social Simulation Engine
//!
//! An ECS-based simulation of the social life of a small colony:
//! courtship, dates, jealousy, and dialogue generated by an external
//! text service.
//!
//! # Architecture
//!
//! State lives in a `hecs` world plus a handful of managers, all owned
//! by a single [`SimulationContext`]:
//! - **Components**: Pure data attached to colonists (Name, Position, Needs)
//! - **Systems**: Dating registry, narration scheduler, task runtime, events
//! - **Backend**: HTTP text generation on worker threads, polled per tick
//!
//! The embedder owns the clock and calls `tick` with wall-clock time.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::{Duration, Instant};
//! use hearthside_core::prelude::*;
//!
//! let config = BackendConfig::default();
//! let backend = Arc::new(HttpDialogueBackend::new(&config).expect("backend"));
//! let mut sim = SimulationContext::new(config, backend);
//!
//! let mara = sim.spawn_colonist(Name::new("Mara", "Finch"), Position::new(10.0, 10.0));
//! let ezra = sim.spawn_colonist(Name::new("Ezra", "Bell"), Position::new(12.0, 9.0));
//! sim.relationships.set_opinion(ezra, mara, 40);
//! sim.try_propose(mara, ezra);
//!
//! // Run simulation
//! let started = Instant::now();
//! loop {
//!     sim.tick(started.elapsed().as_millis() as u64);
//!     std::thread::sleep(Duration::from_millis(100));
//! }
//! ```

pub mod components;
pub mod directory;
pub mod systems;
pub mod backend;
pub mod output;
pub mod context;
pub mod persistence;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::backend::{BackendConfig, DialogueBackend, HttpDialogueBackend};
    pub use crate::components::*;
    pub use crate::context::SimulationContext;
    pub use hearthside_logic::dating::DateStage;
}
