//! Movement integration shared by wandering, seat walks and summon runs

use crate::components::{PlayArea, Position, Vec3};

/// Result of one movement step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moving,
    Arrived,
}

impl Step {
    pub fn arrived(&self) -> bool {
        matches!(self, Step::Arrived)
    }
}

/// Advance `pos` along the ground toward `target` at `speed`.
///
/// Stops once the remaining planar distance is within `stop_within`, never
/// overshooting. Facing follows the remaining direction every step, so turns
/// are continuous rather than snapped. Height (`y`) is left alone for jump
/// integration.
pub fn step_toward(
    pos: &mut Position,
    target: Vec3,
    speed: f32,
    delta_seconds: f32,
    stop_within: f32,
) -> Step {
    let diff = (target - pos.world).flat();
    let distance = diff.length();
    let remaining = distance - stop_within;

    if remaining <= 0.0 {
        return Step::Arrived;
    }

    pos.facing = pos.world.heading_to(&target);
    let step = speed * delta_seconds.max(0.0);
    let direction = diff.normalize();

    if step >= remaining {
        pos.world = pos.world + direction * remaining;
        Step::Arrived
    } else {
        pos.world = pos.world + direction * step;
        Step::Moving
    }
}

/// Place `pos` exactly on `target`'s ground point, keeping height
pub fn snap_to(pos: &mut Position, target: Vec3) {
    pos.world.x = target.x;
    pos.world.z = target.z;
}

/// Silently pull an agent back inside the play area
pub fn confine(pos: &mut Position, area: &PlayArea) {
    pos.world = area.clamp(pos.world);
}
