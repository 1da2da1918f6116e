//! Campfire seats and who may sit in them.

use serde::{Deserialize, Serialize};

use super::agents::AgentId;
use super::common::Vec3;
use crate::config::CampfireConfig;

/// The three fixed seat slots around the campfire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatId {
    Player,
    Jb,
    Bea,
}

impl SeatId {
    pub const ALL: [SeatId; 3] = [SeatId::Player, SeatId::Jb, SeatId::Bea];

    pub fn index(&self) -> usize {
        match self {
            SeatId::Player => 0,
            SeatId::Jb => 1,
            SeatId::Bea => 2,
        }
    }

    /// The role permanently assigned to this seat
    pub fn owner(&self) -> Occupant {
        match self {
            SeatId::Player => Occupant::Player,
            SeatId::Jb => Occupant::Agent(AgentId::Jb),
            SeatId::Bea => Occupant::Agent(AgentId::Bea),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeatId::Player => "player-seat",
            SeatId::Jb => "jb-seat",
            SeatId::Bea => "bea-seat",
        }
    }
}

impl std::fmt::Display for SeatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anyone who can hold a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    Player,
    Agent(AgentId),
}

impl std::fmt::Display for Occupant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Occupant::Player => f.write_str("player"),
            Occupant::Agent(id) => write!(f, "{}", id),
        }
    }
}

/// Fixed location and orientation of one seat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    pub id: SeatId,
    /// Ground position of the seat
    pub position: Vec3,
    /// Facing toward the fire
    pub facing: f32,
}

/// Positions of all three seats, derived once from the campfire config
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeatLayout {
    pub center: Vec3,
    seats: [Seat; 3],
}

impl SeatLayout {
    pub fn from_config(config: &CampfireConfig) -> Self {
        let center = config.center.flat();
        let seats = SeatId::ALL.map(|id| {
            let angle = config.seat_angles[id.index()];
            let position = Vec3::ground(
                center.x + angle.sin() * config.seat_radius,
                center.z + angle.cos() * config.seat_radius,
            );
            Seat {
                id,
                position,
                facing: position.heading_to(&center),
            }
        });
        Self { center, seats }
    }

    pub fn seat(&self, id: SeatId) -> &Seat {
        &self.seats[id.index()]
    }

    pub fn seats(&self) -> &[Seat; 3] {
        &self.seats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seats_face_the_fire() {
        let layout = SeatLayout::from_config(&CampfireConfig::default());
        for seat in layout.seats() {
            let toward = seat.position.heading_to(&layout.center);
            assert!((seat.facing - toward).abs() < 0.001);
            let r = seat.position.planar_distance(&layout.center);
            assert!((r - CampfireConfig::default().seat_radius).abs() < 0.001);
        }
    }

    #[test]
    fn test_seat_owners() {
        assert_eq!(SeatId::Player.owner(), Occupant::Player);
        assert_eq!(SeatId::Bea.owner(), Occupant::Agent(AgentId::Bea));
        assert_eq!(SeatId::Jb.to_string(), "jb-seat");
    }
}
