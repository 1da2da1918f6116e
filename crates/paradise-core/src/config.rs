//! Tunable simulation parameters.
//!
//! Every duration, speed and radius the scene uses lives here. Defaults give
//! the intended feel; a host may load a partial JSON file to override any
//! section, e.g.
//!
//! ```
//! use paradise_core::config::SimConfig;
//!
//! let config = SimConfig::from_json_str(r#"{ "switch": { "cooldown": 5.0 } }"#).unwrap();
//! assert_eq!(config.switch.cooldown, 5.0);
//! assert_eq!(config.switch.settle_delay, SimConfig::default().switch.settle_delay);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::components::{AgentId, Home, Interval, PlayArea, SeatLayout, Vec3};
use crate::error::ConfigError;

/// Complete configuration for one scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub play_area: PlayArea,
    pub player: PlayerConfig,
    pub agents: AgentConfig,
    pub campfire: CampfireConfig,
    pub homes: HomeConfig,
    pub proximity: ProximityConfig,
    pub switch: SwitchConfig,
    /// Fixed RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

/// First-person controller tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub eye_height: f32,
    pub seated_eye_height: f32,
    pub walk_speed: f32,
    pub gravity: f32,
    pub jump_velocity: f32,
    /// Radians per unit of look delta
    pub look_sensitivity: f32,
    /// Maximum absolute pitch, radians
    pub pitch_limit: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            eye_height: 1.6,
            seated_eye_height: 1.1,
            walk_speed: 5.0,
            gravity: 20.0,
            jump_velocity: 7.0,
            look_sensitivity: 0.002,
            pitch_limit: 1.4,
        }
    }
}

/// Autonomous agent tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Wander targets are picked within this radius of home
    pub wander_radius: f32,
    pub wander_speed: f32,
    pub seat_walk_speed: f32,
    pub run_speed: f32,
    /// Distance at which a walk target counts as reached
    pub arrive_epsilon: f32,
    /// A summoned character stops this far from the player
    pub stop_distance: f32,
    /// Within this distance the player is "nearby" and agents turn to face them
    pub nearby_radius: f32,
    pub action_interval: Interval,
    pub campfire_interval: Interval,
    pub sit_duration: Interval,
    /// Chance that a random action is a hop instead of a wander
    pub jump_chance: f32,
    pub jump_velocity: f32,
    pub jump_gravity: f32,
    pub bob_amplitude: f32,
    /// Bob angular frequency, radians per second
    pub bob_frequency: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            wander_radius: 6.0,
            wander_speed: 1.2,
            seat_walk_speed: 2.2,
            run_speed: 4.5,
            arrive_epsilon: 0.15,
            stop_distance: 1.8,
            nearby_radius: 3.0,
            action_interval: Interval::new(3.0, 8.0),
            campfire_interval: Interval::new(30.0, 60.0),
            sit_duration: Interval::new(15.0, 30.0),
            jump_chance: 0.15,
            jump_velocity: 4.0,
            jump_gravity: 12.0,
            bob_amplitude: 0.03,
            bob_frequency: 2.0,
        }
    }
}

/// Campfire location and seat ring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampfireConfig {
    pub center: Vec3,
    pub seat_radius: f32,
    /// Angle around the fire for player-seat, jb-seat, bea-seat
    pub seat_angles: [f32; 3],
}

impl Default for CampfireConfig {
    fn default() -> Self {
        Self {
            center: Vec3::ground(0.0, -10.0),
            seat_radius: 2.2,
            seat_angles: [0.0, 2.1, -2.1],
        }
    }
}

/// Home configuration of each agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeConfig {
    pub jb: Home,
    pub bea: Home,
    pub choco: Home,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            jb: Home::new(Vec3::ground(3.0, 0.0), std::f32::consts::PI),
            bea: Home::new(Vec3::ground(-3.0, 0.0), std::f32::consts::PI),
            choco: Home::new(Vec3::ground(0.0, 3.0), std::f32::consts::PI),
        }
    }
}

impl HomeConfig {
    pub fn get(&self, agent: AgentId) -> Home {
        match agent {
            AgentId::Jb => self.jb,
            AgentId::Bea => self.bea,
            AgentId::Choco => self.choco,
        }
    }
}

/// Interaction detector radii
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    pub interaction_radius: f32,
    pub seating_radius: f32,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            // Wide enough to reach a neighbouring seat while sitting
            interaction_radius: 4.0,
            seating_radius: 5.0,
        }
    }
}

/// Character switch timing, seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchConfig {
    pub settle_delay: f32,
    pub cooldown: f32,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            settle_delay: 0.6,
            cooldown: 2.0,
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let area = &self.play_area;
        if area.width() <= 0.0 || area.depth() <= 0.0 {
            return Err(ConfigError::invalid("play area must have positive extent"));
        }

        let p = &self.player;
        if p.walk_speed <= 0.0 || p.gravity <= 0.0 || p.eye_height <= 0.0 {
            return Err(ConfigError::invalid(
                "player speed, gravity and eye height must be positive",
            ));
        }
        if p.pitch_limit <= 0.0 || p.pitch_limit >= std::f32::consts::FRAC_PI_2 {
            return Err(ConfigError::invalid("pitch limit must be within (0, pi/2)"));
        }

        let a = &self.agents;
        if a.wander_speed <= 0.0 || a.seat_walk_speed <= 0.0 || a.run_speed <= 0.0 {
            return Err(ConfigError::invalid("agent speeds must be positive"));
        }
        if a.jump_gravity <= 0.0 {
            return Err(ConfigError::invalid("agent jump gravity must be positive"));
        }
        if !(0.0..=1.0).contains(&a.jump_chance) {
            return Err(ConfigError::invalid("jump chance must be within 0..=1"));
        }
        for (name, interval) in [
            ("action_interval", a.action_interval),
            ("campfire_interval", a.campfire_interval),
            ("sit_duration", a.sit_duration),
        ] {
            if !interval.is_valid() {
                let reason = format!("{} has an inverted range", name);
                return Err(ConfigError::invalid(reason));
            }
        }

        if self.switch.settle_delay < 0.0 || self.switch.cooldown < 0.0 {
            return Err(ConfigError::invalid("switch timings cannot be negative"));
        }
        if self.proximity.interaction_radius <= 0.0 || self.proximity.seating_radius <= 0.0 {
            return Err(ConfigError::invalid("proximity radii must be positive"));
        }

        // Seated occupants are pinned, never clamped, so every seat must be reachable
        for seat in SeatLayout::from_config(&self.campfire).seats() {
            if !area.contains(&seat.position) {
                return Err(ConfigError::invalid(format!(
                    "{} lies outside the play area",
                    seat.id
                )));
            }
        }
        for id in AgentId::ALL {
            if !area.contains(&self.homes.get(id).position) {
                return Err(ConfigError::invalid(format!(
                    "{} home lies outside the play area",
                    id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_speed_ordering() {
        let a = AgentConfig::default();
        assert!(a.wander_speed < a.seat_walk_speed);
        assert!(a.seat_walk_speed < a.run_speed);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SimConfig::from_json_str(r#"{ "seed": 9, "player": { "walk_speed": 3.0 } }"#)
            .unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.player.walk_speed, 3.0);
        assert_eq!(config.player.eye_height, PlayerConfig::default().eye_height);
    }

    #[test]
    fn test_inverted_interval_rejected() {
        let err = SimConfig::from_json_str(
            r#"{ "agents": { "sit_duration": { "min": 10.0, "max": 2.0 } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_seat_outside_play_area_rejected() {
        // Default fire sits at z = -10, so its nearest seat is at z = -7.8
        let err = SimConfig::from_json_str(
            r#"{ "play_area": { "min_x": -6, "max_x": 6, "min_z": -6, "max_z": 6 } }"#,
        )
        .unwrap_err();
        match err {
            ConfigError::Invalid { reason } => assert!(reason.contains("seat"), "{}", reason),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_home_outside_play_area_rejected() {
        let mut config = SimConfig::default();
        config.homes.choco = Home::new(Vec3::ground(0.0, 55.0), 0.0);
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { reason } if reason.contains("choco")
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SimConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
