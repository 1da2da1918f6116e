//! Common components used across agents, the player and the campfire.

use serde::{Deserialize, Serialize};

/// 3D position vector (Y is up, the ground is the XZ plane)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Point on the ground plane
    pub fn ground(x: f32, z: f32) -> Self {
        Self { x, y: 0.0, z }
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Distance ignoring height, so eye height and jump arcs don't skew range checks
    pub fn planar_distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Same vector with the vertical component dropped
    pub fn flat(&self) -> Self {
        Self {
            x: self.x,
            y: 0.0,
            z: self.z,
        }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
                z: self.z / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// Heading angle (rotation about Y) that faces from `self` toward `target`.
    ///
    /// Zero faces +Z; positive angles turn toward +X.
    pub fn heading_to(&self, target: &Self) -> f32 {
        (target.x - self.x).atan2(target.z - self.z)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

/// Axis-aligned rectangle on the ground plane bounding everything that moves
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayArea {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Default for PlayArea {
    fn default() -> Self {
        Self {
            min_x: -40.0,
            max_x: 40.0,
            min_z: -40.0,
            max_z: 40.0,
        }
    }
}

impl PlayArea {
    pub fn new(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> f32 {
        self.max_z - self.min_z
    }

    pub fn contains(&self, point: &Vec3) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.z >= self.min_z
            && point.z <= self.max_z
    }

    /// Clamp X and Z into the area, leaving height untouched.
    ///
    /// An inverted area never panics; the point collapses onto the max edge.
    pub fn clamp(&self, point: Vec3) -> Vec3 {
        Vec3 {
            x: point.x.max(self.min_x).min(self.max_x),
            y: point.y,
            z: point.z.max(self.min_z).min(self.max_z),
        }
    }
}

/// Spatial component - where an agent stands and which way it faces
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    /// World position; `y` carries the jump height above the ground
    pub world: Vec3,
    /// Rotation about the vertical axis, radians
    pub facing: f32,
}

impl Position {
    pub fn new(world: Vec3, facing: f32) -> Self {
        Self { world, facing }
    }

    /// Turn to face a point without moving
    pub fn face(&mut self, target: &Vec3) {
        if self.world.planar_distance(target) > f32::EPSILON {
            self.facing = self.world.heading_to(target);
        }
    }
}

/// Fixed spawn configuration an agent returns to on every reset
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Home {
    pub position: Vec3,
    pub facing: f32,
}

impl Home {
    pub fn new(position: Vec3, facing: f32) -> Self {
        Self { position, facing }
    }

    pub fn to_position(&self) -> Position {
        Position::new(self.position, self.facing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        let sum = a + b;
        assert_eq!(sum.x, 5.0);
        assert_eq!(sum.y, 7.0);
        assert_eq!(sum.z, 9.0);

        let diff = b - a;
        assert_eq!(diff.x, 3.0);

        let scaled = a * 2.0;
        assert_eq!(scaled.x, 2.0);
        assert_eq!(scaled.y, 4.0);
    }

    #[test]
    fn test_planar_distance_ignores_height() {
        let eye = Vec3::new(0.0, 1.6, 0.0);
        let feet = Vec3::new(3.0, 0.0, 4.0);
        assert!((eye.planar_distance(&feet) - 5.0).abs() < 0.001);
        assert!(eye.distance(&feet) > 5.0);
    }

    #[test]
    fn test_heading_to() {
        let origin = Vec3::ZERO;
        assert!(origin.heading_to(&Vec3::ground(0.0, 1.0)).abs() < 0.001);
        let east = origin.heading_to(&Vec3::ground(1.0, 0.0));
        assert!((east - std::f32::consts::FRAC_PI_2).abs() < 0.001);
    }

    #[test]
    fn test_play_area_clamp() {
        let area = PlayArea::new(-10.0, 10.0, -5.0, 5.0);
        let clamped = area.clamp(Vec3::new(15.0, 1.6, -9.0));
        assert_eq!(clamped, Vec3::new(10.0, 1.6, -5.0));
        assert!(area.contains(&clamped));
    }

    #[test]
    fn test_inverted_play_area_clamp_does_not_panic() {
        let area = PlayArea::new(10.0, -10.0, -5.0, 5.0);
        let clamped = area.clamp(Vec3::ground(3.0, 0.0));
        assert_eq!(clamped.x, -10.0);
    }

    #[test]
    fn test_face_same_point_keeps_facing() {
        let mut pos = Position::new(Vec3::ground(1.0, 1.0), 0.7);
        pos.face(&Vec3::new(1.0, 1.6, 1.0));
        assert_eq!(pos.facing, 0.7);
    }
}
