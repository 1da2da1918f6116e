//! Character switch timing.
//!
//! The state reset of a switch is instantaneous and lives in the engine; this
//! coordinator only tracks the presentation phases afterwards. `Settling`
//! suspends the player controller and interaction detection. `CoolingDown`
//! refuses further switches until the cooldown runs out.

use serde::{Deserialize, Serialize};

use crate::components::Countdown;
use crate::config::SwitchConfig;
use crate::error::SwitchDenied;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchPhase {
    Ready,
    Settling,
    CoolingDown,
}

/// What happened to the switch during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchProgress {
    Unchanged,
    /// The transition finished and the cooldown started
    Settled,
    /// The cooldown elapsed
    Ready,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCoordinator {
    phase: SwitchPhase,
    settle: Countdown,
    cooldown: Countdown,
    settle_delay: f32,
    cooldown_secs: f32,
}

impl SwitchCoordinator {
    pub fn new(config: &SwitchConfig) -> Self {
        Self {
            phase: SwitchPhase::Ready,
            settle: Countdown::idle(),
            cooldown: Countdown::idle(),
            settle_delay: config.settle_delay,
            cooldown_secs: config.cooldown,
        }
    }

    pub fn phase(&self) -> SwitchPhase {
        self.phase
    }

    pub fn is_transitioning(&self) -> bool {
        self.phase == SwitchPhase::Settling
    }

    /// Check whether a switch may start now without starting it
    pub fn check(&self, in_dialogue: bool) -> Result<(), SwitchDenied> {
        match self.phase {
            SwitchPhase::Settling => Err(SwitchDenied::InProgress),
            SwitchPhase::CoolingDown => Err(SwitchDenied::CoolingDown {
                remaining: self.cooldown.remaining(),
            }),
            SwitchPhase::Ready if in_dialogue => Err(SwitchDenied::InDialogue),
            SwitchPhase::Ready => Ok(()),
        }
    }

    /// Start the settle phase. The caller performs the state reset once
    /// this returns `Ok`.
    pub fn begin(&mut self, in_dialogue: bool) -> Result<(), SwitchDenied> {
        self.check(in_dialogue)?;
        self.phase = SwitchPhase::Settling;
        self.settle.reset(self.settle_delay);
        Ok(())
    }

    pub fn advance(&mut self, delta_seconds: f32) -> SwitchProgress {
        match self.phase {
            SwitchPhase::Ready => SwitchProgress::Unchanged,
            SwitchPhase::Settling => {
                if self.settle.tick(delta_seconds) {
                    self.phase = SwitchPhase::CoolingDown;
                    self.cooldown.reset(self.cooldown_secs);
                    SwitchProgress::Settled
                } else {
                    SwitchProgress::Unchanged
                }
            }
            SwitchPhase::CoolingDown => {
                if self.cooldown.tick(delta_seconds) {
                    self.phase = SwitchPhase::Ready;
                    SwitchProgress::Ready
                } else {
                    SwitchProgress::Unchanged
                }
            }
        }
    }
}
