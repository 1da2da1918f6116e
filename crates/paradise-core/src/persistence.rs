//! Save/Load functionality for persisting simulation state
//!
//! Uses bincode for compact binary snapshots of the whole scene. Agent
//! components are pulled out of the ECS world individually and respawned
//! into a fresh world on load.

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::components::*;
use crate::config::SimConfig;
use crate::error::SnapshotError;
use crate::systems::{CommandQueue, ProximityReport, SeatBoard, SwitchCoordinator};

/// Version number for snapshot format (increment when format changes)
pub const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of the simulation state
#[derive(Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    /// Seconds simulated
    pub elapsed: f32,
    pub active: PlayableCharacter,
    pub config: SimConfig,
    pub player: Player,
    pub look: LookDelta,
    pub seats: SeatBoard,
    pub commands: CommandQueue,
    pub switch: SwitchCoordinator,
    pub session: Option<AgentId>,
    /// Kept so the first tick after a load still sees last tick's targets
    pub proximity: ProximityReport,
    pub agents: Vec<SavedAgent>,
}

/// All components of one agent entity
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SavedAgent {
    pub agent: Agent,
    pub position: Position,
    pub behavior: Behavior,
    pub timers: AgentTimers,
    pub home: Home,
}

/// Extract every agent from a world, ordered by id
pub fn capture_agents(world: &World) -> Vec<SavedAgent> {
    let mut agents: Vec<SavedAgent> = world
        .query::<(&Agent, &Position, &Behavior, &AgentTimers, &Home)>()
        .iter()
        .map(|(_, (agent, position, behavior, timers, home))| SavedAgent {
            agent: *agent,
            position: *position,
            behavior: *behavior,
            timers: *timers,
            home: *home,
        })
        .collect();
    agents.sort_by_key(|saved| saved.agent.id);
    agents
}

/// Spawn saved agents into a new world.
///
/// Returns the entities in `AgentId::ALL` order. Every agent must be
/// present exactly once.
pub fn restore_agents(saved: Vec<SavedAgent>) -> Result<(World, [Entity; 3]), SnapshotError> {
    let mut world = World::new();
    let mut slots: [Option<Entity>; 3] = [None; 3];

    for agent in saved {
        let Some(index) = AgentId::ALL.iter().position(|id| *id == agent.agent.id) else {
            continue;
        };
        if slots[index].is_some() {
            continue;
        }
        slots[index] = Some(world.spawn((
            agent.agent,
            agent.position,
            agent.behavior,
            agent.timers,
            agent.home,
        )));
    }

    let entity =
        |index: usize| slots[index].ok_or(SnapshotError::MissingAgent(AgentId::ALL[index]));
    let entities = [entity(0)?, entity(1)?, entity(2)?];
    Ok((world, entities))
}

pub fn write_snapshot<W: Write>(writer: W, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    bincode::serialize_into(writer, snapshot)?;
    Ok(())
}

pub fn read_snapshot<R: Read>(reader: R) -> Result<Snapshot, SnapshotError> {
    let snapshot: Snapshot = bincode::deserialize_from(reader)?;

    if snapshot.version != SAVE_VERSION {
        return Err(SnapshotError::VersionMismatch {
            expected: SAVE_VERSION,
            found: snapshot.version,
        });
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{FrameInput, ParadiseEngine};
    use crate::systems::Command;

    fn engine() -> ParadiseEngine {
        ParadiseEngine::new(SimConfig {
            seed: Some(5),
            ..SimConfig::default()
        })
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut engine = engine();
        engine.sit();
        engine.push_command(Command::Summon);
        for _ in 0..30 {
            engine.tick(1.0 / 60.0, &FrameInput::default());
        }

        let mut save_buffer = Vec::new();
        engine.save(&mut save_buffer).expect("Save failed");

        let mut loaded = ParadiseEngine::default();
        loaded.load(&save_buffer[..]).expect("Load failed");

        assert!((loaded.elapsed() - engine.elapsed()).abs() < 0.0001);
        assert_eq!(loaded.agent_views(), engine.agent_views());
        assert_eq!(loaded.player(), engine.player());
        assert_eq!(loaded.seats(), engine.seats());
        assert_eq!(loaded.active_character(), engine.active_character());
        assert_eq!(loaded.config(), engine.config());
    }

    #[test]
    fn test_version_mismatch() {
        let engine = engine();
        let mut buffer = Vec::new();
        engine.save(&mut buffer).unwrap();
        // Version is the leading little-endian u32
        buffer[0] = 99;

        let mut loaded = ParadiseEngine::default();
        let err = loaded.load(&buffer[..]).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::VersionMismatch {
                expected: SAVE_VERSION,
                found: 99
            }
        ));
    }

    #[test]
    fn test_missing_agent_rejected() {
        let world = ParadiseEngine::default().world;
        let mut agents = capture_agents(&world);
        agents.retain(|saved| saved.agent.id != AgentId::Choco);
        assert!(matches!(
            restore_agents(agents),
            Err(SnapshotError::MissingAgent(AgentId::Choco))
        ));
    }

    #[test]
    fn test_truncated_snapshot() {
        let mut loaded = ParadiseEngine::default();
        assert!(matches!(
            loaded.load(&[1u8, 0, 0][..]),
            Err(SnapshotError::Bincode(_))
        ));
    }
}
