//! Paradise Core - Campfire Scene Simulation Engine
//!
//! A small real-time world: a first-person player, two playable characters
//! of which exactly one is autonomous at any time, a dog, three seats around
//! a campfire and proximity-triggered dialogue. Rendering, audio and input
//! devices belong to the host; this crate only simulates.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: The three agents (`jb`, `bea`, `choco`)
//! - **Components**: Pure data attached to entities (Position, Behavior, AgentTimers, etc.)
//! - **Systems**: Per-tick logic that reads and updates components through a
//!   shared [`systems::TickContext`]
//!
//! The player, seat board, command queue and switch coordinator are single
//! resources owned by [`engine::ParadiseEngine`].
//!
//! # Example
//!
//! ```rust,no_run
//! use paradise_core::prelude::*;
//!
//! let mut engine = ParadiseEngine::new(SimConfig::default());
//!
//! loop {
//!     let input = FrameInput::default();
//!     engine.tick(1.0 / 60.0, &input); // 60 FPS
//!     for event in engine.drain_events() {
//!         println!("{:?}", event);
//!     }
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod persistence;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::SimConfig;
    pub use crate::engine::{ActionEdges, AgentView, FrameInput, ParadiseEngine};
    pub use crate::error::{ConfigError, SnapshotError, SwitchDenied};
    pub use crate::systems::{Command, InteractionTarget, ProximityReport, SimEvent, Topic};
}
