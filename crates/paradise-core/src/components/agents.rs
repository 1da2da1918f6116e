//! Agent components: identity, behavior state, timers.

use serde::{Deserialize, Serialize};

use super::seats::SeatId;
use super::timer::Countdown;

/// Every simulated entity that can be approached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgentId {
    Jb,
    Bea,
    /// The dog; always autonomous
    Choco,
}

impl AgentId {
    pub const ALL: [AgentId; 3] = [AgentId::Jb, AgentId::Bea, AgentId::Choco];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentId::Jb => "jb",
            AgentId::Bea => "bea",
            AgentId::Choco => "choco",
        }
    }

    /// The playable character behind this agent, if it is one
    pub fn playable(&self) -> Option<PlayableCharacter> {
        match self {
            AgentId::Jb => Some(PlayableCharacter::Jb),
            AgentId::Bea => Some(PlayableCharacter::Bea),
            AgentId::Choco => None,
        }
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AgentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jb" => Ok(AgentId::Jb),
            "bea" => Ok(AgentId::Bea),
            "choco" => Ok(AgentId::Choco),
            other => Err(format!("unknown agent '{}'", other)),
        }
    }
}

/// One of the two characters the player can take control of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayableCharacter {
    Jb,
    Bea,
}

impl PlayableCharacter {
    /// The character that is not this one
    pub fn other(&self) -> Self {
        match self {
            PlayableCharacter::Jb => PlayableCharacter::Bea,
            PlayableCharacter::Bea => PlayableCharacter::Jb,
        }
    }

    pub fn agent_id(&self) -> AgentId {
        match self {
            PlayableCharacter::Jb => AgentId::Jb,
            PlayableCharacter::Bea => AgentId::Bea,
        }
    }

    /// The campfire seat permanently assigned to this character
    pub fn seat(&self) -> SeatId {
        match self {
            PlayableCharacter::Jb => SeatId::Jb,
            PlayableCharacter::Bea => SeatId::Bea,
        }
    }
}

impl From<PlayableCharacter> for AgentId {
    fn from(character: PlayableCharacter) -> Self {
        character.agent_id()
    }
}

/// Identity component attached to every agent entity
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    /// False only for the playable character the player currently controls
    pub autonomous: bool,
}

impl Agent {
    pub fn new(id: AgentId, autonomous: bool) -> Self {
        Self { id, autonomous }
    }
}

/// Mutually exclusive behavior states.
///
/// Jumping is not here; it overlays Idle or Wandering through [`Behavior::jump`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BehaviorState {
    Idle {
        /// Turned toward the player because they are close
        facing_player: bool,
    },
    Wandering {
        target: super::Vec3,
    },
    WalkingToSeat {
        seat: SeatId,
    },
    Sitting {
        seat: SeatId,
    },
    RunningToPlayer,
    /// Animal heading to the vacant character seat next to the player
    WalkingToSharedSeat {
        seat: SeatId,
    },
    SittingOnSharedSeat {
        seat: SeatId,
    },
}

impl Default for BehaviorState {
    fn default() -> Self {
        BehaviorState::Idle {
            facing_player: false,
        }
    }
}

impl BehaviorState {
    pub fn kind(&self) -> StateKind {
        match self {
            BehaviorState::Idle { .. } => StateKind::Idle,
            BehaviorState::Wandering { .. } => StateKind::Wandering,
            BehaviorState::WalkingToSeat { .. } => StateKind::WalkingToSeat,
            BehaviorState::Sitting { .. } => StateKind::Sitting,
            BehaviorState::RunningToPlayer => StateKind::RunningToPlayer,
            BehaviorState::WalkingToSharedSeat { .. } => StateKind::WalkingToSharedSeat,
            BehaviorState::SittingOnSharedSeat { .. } => StateKind::SittingOnSharedSeat,
        }
    }

    /// Whether the agent is translating this tick (drives footstep cues)
    pub fn is_moving(&self) -> bool {
        matches!(
            self,
            BehaviorState::Wandering { .. }
                | BehaviorState::WalkingToSeat { .. }
                | BehaviorState::RunningToPlayer
                | BehaviorState::WalkingToSharedSeat { .. }
        )
    }

    pub fn is_seated(&self) -> bool {
        matches!(
            self,
            BehaviorState::Sitting { .. } | BehaviorState::SittingOnSharedSeat { .. }
        )
    }

    /// Seat reserved or occupied by this state, if any
    pub fn seat(&self) -> Option<SeatId> {
        match self {
            BehaviorState::WalkingToSeat { seat }
            | BehaviorState::Sitting { seat }
            | BehaviorState::WalkingToSharedSeat { seat }
            | BehaviorState::SittingOnSharedSeat { seat } => Some(*seat),
            _ => None,
        }
    }

    /// States the random action timer and jump overlay apply to
    pub fn is_roaming(&self) -> bool {
        matches!(
            self,
            BehaviorState::Idle { .. } | BehaviorState::Wandering { .. }
        )
    }
}

/// Field-less mirror of [`BehaviorState`] for animation selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    Idle,
    Wandering,
    WalkingToSeat,
    Sitting,
    RunningToPlayer,
    WalkingToSharedSeat,
    SittingOnSharedSeat,
}

/// Vertical hop in progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Jump {
    pub height: f32,
    pub velocity: f32,
}

impl Jump {
    pub fn launch(velocity: f32) -> Self {
        Self {
            height: 0.0,
            velocity,
        }
    }

    /// Integrate one step; returns false once the hop has landed
    pub fn advance(&mut self, gravity: f32, delta: f32) -> bool {
        self.velocity -= gravity * delta;
        self.height += self.velocity * delta;
        if self.height <= 0.0 {
            self.height = 0.0;
            return false;
        }
        true
    }
}

/// Behavior component: exclusive state plus orthogonal overlays
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Behavior {
    pub state: BehaviorState,
    pub jump: Option<Jump>,
    /// Cosmetic vertical bob while idle or seated
    pub bob: f32,
}

impl Behavior {
    pub fn is_jumping(&self) -> bool {
        self.jump.is_some()
    }
}

/// Per-agent timers, advanced once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentTimers {
    /// Next random action (wander or hop)
    pub action: Countdown,
    /// Next visit to the campfire
    pub campfire: Countdown,
    /// Remaining time seated
    pub dwell: Countdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_character_flips() {
        assert_eq!(PlayableCharacter::Jb.other(), PlayableCharacter::Bea);
        assert_eq!(
            PlayableCharacter::Bea.other().other(),
            PlayableCharacter::Bea
        );
    }

    #[test]
    fn test_agent_id_parse() {
        assert_eq!("JB".parse::<AgentId>(), Ok(AgentId::Jb));
        assert_eq!(" choco ".parse::<AgentId>(), Ok(AgentId::Choco));
        assert!("mochi".parse::<AgentId>().is_err());
    }

    #[test]
    fn test_jump_lands() {
        let mut jump = Jump::launch(4.0);
        let mut steps = 0;
        while jump.advance(12.0, 1.0 / 60.0) {
            steps += 1;
            assert!(steps < 1000);
        }
        assert_eq!(jump.height, 0.0);
        assert!(steps > 10);
    }

    #[test]
    fn test_state_seat() {
        let state = BehaviorState::WalkingToSeat { seat: SeatId::Bea };
        assert_eq!(state.seat(), Some(SeatId::Bea));
        assert!(state.is_moving());
        assert!(!state.is_seated());
        assert_eq!(BehaviorState::default().kind(), StateKind::Idle);
    }
}
