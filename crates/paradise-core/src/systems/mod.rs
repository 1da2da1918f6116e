//! Systems - logic that operates on components

mod animal;
mod behavior;
mod commands;
mod context;
mod dialogue;
mod events;
mod movement;
mod player;
mod proximity;
mod seating;
mod switch;

pub use animal::*;
pub use behavior::*;
pub use commands::*;
pub use context::*;
pub use dialogue::*;
pub use events::*;
pub use movement::*;
pub use player::*;
pub use proximity::*;
pub use seating::*;
pub use switch::*;
