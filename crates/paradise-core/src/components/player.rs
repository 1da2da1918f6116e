//! Player state and per-frame input.

use serde::{Deserialize, Serialize};

use super::common::Vec3;
use super::seats::SeatId;

/// The first-person player. Exactly one exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Eye position
    pub position: Vec3,
    pub vertical_velocity: f32,
    pub grounded: bool,
    pub yaw: f32,
    pub pitch: f32,
    /// Occupied seat while sitting
    pub seat: Option<SeatId>,
    /// Eye height to restore on standing up
    pub stand_height: f32,
    /// Whether walking footsteps are currently playing
    pub walking: bool,
}

impl Player {
    /// Standing at `ground` with eyes `eye_height` above it, looking along `yaw`
    pub fn spawn(ground: Vec3, eye_height: f32, yaw: f32) -> Self {
        Self {
            position: Vec3::new(ground.x, eye_height, ground.z),
            vertical_velocity: 0.0,
            grounded: true,
            yaw,
            pitch: 0.0,
            seat: None,
            stand_height: eye_height,
            walking: false,
        }
    }

    pub fn is_sitting(&self) -> bool {
        self.seat.is_some()
    }
}

/// Discrete movement keys held this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    pub fn forward() -> Self {
        Self {
            forward: true,
            ..Self::default()
        }
    }

    /// Local-space axes: (strafe, advance), each in -1..=1
    pub fn axes(&self) -> (f32, f32) {
        let strafe = (self.right as i8 - self.left as i8) as f32;
        let advance = (self.forward as i8 - self.back as i8) as f32;
        (strafe, advance)
    }

    pub fn is_idle(&self) -> bool {
        self.axes() == (0.0, 0.0)
    }
}

/// Accumulated pointer/touch motion, consumed once applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LookDelta {
    pub dx: f32,
    pub dy: f32,
}

impl LookDelta {
    pub fn accumulate(&mut self, dx: f32, dy: f32) {
        self.dx += dx;
        self.dy += dy;
    }

    /// Take the pending motion, leaving zero behind
    pub fn take(&mut self) -> (f32, f32) {
        let delta = (self.dx, self.dy);
        *self = Self::default();
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposing_keys_cancel() {
        let intent = MoveIntent {
            forward: true,
            back: true,
            left: true,
            right: false,
        };
        assert_eq!(intent.axes(), (-1.0, 0.0));
        assert!(!intent.is_idle());
        assert!(MoveIntent::default().is_idle());
    }

    #[test]
    fn test_look_delta_is_edge_triggered() {
        let mut look = LookDelta::default();
        look.accumulate(3.0, -1.0);
        look.accumulate(1.0, 0.0);
        assert_eq!(look.take(), (4.0, -1.0));
        assert_eq!(look.take(), (0.0, 0.0));
    }
}
