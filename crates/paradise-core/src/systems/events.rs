//! One-shot cues emitted for the host.
//!
//! The core never plays audio or animations itself. State transitions push
//! events here and the host drains them once per frame to start footstep
//! loops, play the jump or wave clip, and so on.

use serde::{Deserialize, Serialize};

use crate::components::{AgentId, Occupant, PlayableCharacter, SeatId};

/// Who an event is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actor {
    Player,
    Agent(AgentId),
}

impl From<Occupant> for Actor {
    fn from(occupant: Occupant) -> Self {
        match occupant {
            Occupant::Player => Actor::Player,
            Occupant::Agent(id) => Actor::Agent(id),
        }
    }
}

/// Transient signal produced by a state transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    FootstepsStarted(Actor),
    FootstepsStopped(Actor),
    Jumped(Actor),
    Waved(AgentId),
    SatDown { actor: Actor, seat: SeatId },
    StoodUp { actor: Actor, seat: SeatId },
    /// Phase one of a switch: the player now controls `active`
    Switched { active: PlayableCharacter },
    /// Phase two: the transition flag cleared and the cooldown began
    SwitchSettled,
    DialogueOpened(AgentId),
    DialogueClosed(AgentId),
}

/// Events raised during the current frame
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_log() {
        let mut log = EventLog::new();
        log.push(SimEvent::Waved(AgentId::Bea));
        log.push(SimEvent::Jumped(Actor::Player));
        assert_eq!(log.len(), 2);
        let drained = log.drain();
        assert_eq!(drained[0], SimEvent::Waved(AgentId::Bea));
        assert!(log.is_empty());
    }
}
