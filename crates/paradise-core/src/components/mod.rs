//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems.

mod agents;
mod common;
mod player;
mod seats;
mod timer;

pub use agents::*;
pub use common::*;
pub use player::*;
pub use seats::*;
pub use timer::*;
