//! Interaction detection
//!
//! Classifies what the player could interact with right now. Read-only with
//! respect to agents; the engine stores the report and acts on it one tick
//! later.

use serde::{Deserialize, Serialize};

use crate::components::{AgentId, PlayableCharacter, Vec3};
use crate::config::ProximityConfig;

/// Something the player can start a conversation with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionTarget {
    Character(PlayableCharacter),
    Animal,
}

impl InteractionTarget {
    pub fn agent_id(&self) -> AgentId {
        match self {
            InteractionTarget::Character(c) => c.agent_id(),
            InteractionTarget::Animal => AgentId::Choco,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProximityReport {
    /// Nearest eligible target within the interaction radius
    pub target: Option<InteractionTarget>,
    pub near_seating: bool,
    pub character_distance: f32,
    pub animal_distance: f32,
    pub seating_distance: f32,
}

/// Distances are measured on the ground plane, so eye height does not shrink
/// the interaction radius.
pub fn detect(
    player: Vec3,
    autonomous: PlayableCharacter,
    character: Vec3,
    animal: Vec3,
    campfire: Vec3,
    config: &ProximityConfig,
) -> ProximityReport {
    let character_distance = player.planar_distance(&character);
    let animal_distance = player.planar_distance(&animal);
    let seating_distance = player.planar_distance(&campfire);

    let target = if character_distance <= config.interaction_radius {
        Some(InteractionTarget::Character(autonomous))
    } else if animal_distance <= config.interaction_radius {
        Some(InteractionTarget::Animal)
    } else {
        None
    };

    ProximityReport {
        target,
        near_seating: seating_distance <= config.seating_radius,
        character_distance,
        animal_distance,
        seating_distance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(player: Vec3, character: Vec3, animal: Vec3) -> ProximityReport {
        detect(
            player,
            PlayableCharacter::Bea,
            character,
            animal,
            Vec3::ground(0.0, -10.0),
            &ProximityConfig::default(),
        )
    }

    #[test]
    fn test_nothing_in_range() {
        let report = run(
            Vec3::new(0.0, 1.6, 0.0),
            Vec3::ground(20.0, 0.0),
            Vec3::ground(-20.0, 0.0),
        );
        assert_eq!(report.target, None);
        assert!(!report.near_seating);
        assert!((report.seating_distance - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_character_beats_animal() {
        // Dog is closer, but both are in range
        let report = run(Vec3::ZERO, Vec3::ground(2.5, 0.0), Vec3::ground(0.5, 0.0));
        assert_eq!(
            report.target,
            Some(InteractionTarget::Character(PlayableCharacter::Bea))
        );
        assert_eq!(report.target.map(|t| t.agent_id()), Some(AgentId::Bea));
    }

    #[test]
    fn test_animal_when_character_out_of_range() {
        let report = run(Vec3::ZERO, Vec3::ground(8.0, 0.0), Vec3::ground(0.0, 2.0));
        assert_eq!(report.target, Some(InteractionTarget::Animal));
    }

    #[test]
    fn test_seating_radius() {
        let report = run(
            Vec3::new(0.0, 1.6, -7.0),
            Vec3::ground(20.0, 0.0),
            Vec3::ground(20.0, 0.0),
        );
        assert!(report.near_seating);
    }
}
