//! Simulation systems: courtship, narration, tasks, and events.

mod date_task;
mod dating;
mod events;
mod narration;
mod relationships;
mod tasks;

pub use date_task::*;
pub use dating::*;
pub use events::*;
pub use narration::*;
pub use relationships::*;
pub use tasks::*;
