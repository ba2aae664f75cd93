//! Components attached to colonist entities.

mod colonist;
mod common;

pub use colonist::*;
pub use common::*;
