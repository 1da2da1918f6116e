//! Shared simulation context handed to each system for one tick.

use rand::rngs::StdRng;

use crate::components::{AgentId, PlayableCharacter, SeatLayout, Vec3};
use crate::config::SimConfig;

use super::commands::CommandQueue;
use super::events::EventLog;
use super::seating::SeatBoard;

/// Everything an agent update may read or write besides its own components.
///
/// Built fresh by the engine every tick, so there is no ambient global state:
/// pending commands, seat claims and outgoing events all flow through here.
pub struct TickContext<'a> {
    pub delta: f32,
    /// Seconds since the scene started, for cosmetic bobbing
    pub elapsed: f32,
    pub config: &'a SimConfig,
    pub layout: &'a SeatLayout,
    pub seats: &'a mut SeatBoard,
    pub commands: &'a mut CommandQueue,
    pub events: &'a mut EventLog,
    pub rng: &'a mut StdRng,
    /// Player eye position as of the start of this tick
    pub player_position: Vec3,
    pub player_seated: bool,
    /// The character the player currently controls
    pub active: PlayableCharacter,
    /// Agent currently in conversation with the player
    pub engaged: Option<AgentId>,
}

impl TickContext<'_> {
    /// A standing player within `radius` of `point` on the ground plane
    pub fn player_near(&self, point: &Vec3, radius: f32) -> bool {
        !self.player_seated && self.player_position.planar_distance(point) <= radius
    }

    pub fn is_engaged(&self, agent: AgentId) -> bool {
        self.engaged == Some(agent)
    }
}
