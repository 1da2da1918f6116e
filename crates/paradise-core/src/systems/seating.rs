//! Seat arbitration around the campfire.
//!
//! Requests and releases happen inside a single cooperative tick, and only the
//! requester's own update ever touches its claim, so the board needs no lock.
//! A claim starts as a reservation while the occupant walks over and becomes
//! seated on arrival; both block other requesters.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::components::{AgentId, Occupant, PlayableCharacter, SeatId};

/// A reservation or occupation of one seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub occupant: Occupant,
    pub seated: bool,
}

/// Outcome of a seat request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatGrant {
    Granted,
    Denied(DenyReason),
}

impl SeatGrant {
    pub fn is_granted(&self) -> bool {
        matches!(self, SeatGrant::Granted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Someone else holds the seat
    Occupied,
    /// The seat belongs to another role
    WrongOwner,
    /// The requester already holds a different seat
    AlreadyHolding(SeatId),
    /// The dog may only join once the player and the autonomous character sit
    SharedSeatUnavailable,
}

/// Current claims, one slot per seat
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeatBoard {
    claims: [Option<Claim>; 3],
}

impl SeatBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for `seat` on behalf of `occupant`.
    ///
    /// Granted iff the seat is free and the requester owns it. The dog is the
    /// one exception: it may take the character seat left vacant by the
    /// player-controlled character, and only while both the player and the
    /// autonomous character are seated.
    pub fn request_seat(
        &mut self,
        occupant: Occupant,
        seat: SeatId,
        active: PlayableCharacter,
    ) -> SeatGrant {
        let grant = self.evaluate(occupant, seat, active);
        match grant {
            SeatGrant::Granted => {
                if self.seat_of(occupant) != Some(seat) {
                    self.claims[seat.index()] = Some(Claim {
                        occupant,
                        seated: false,
                    });
                }
                debug!("{} granted {}", occupant, seat);
            }
            SeatGrant::Denied(reason) => {
                debug!("{} denied {}: {:?}", occupant, seat, reason);
            }
        }
        grant
    }

    fn evaluate(&self, occupant: Occupant, seat: SeatId, active: PlayableCharacter) -> SeatGrant {
        if let Some(held) = self.seat_of(occupant) {
            if held == seat {
                return SeatGrant::Granted;
            }
            return SeatGrant::Denied(DenyReason::AlreadyHolding(held));
        }
        if self.is_occupied(seat) {
            return SeatGrant::Denied(DenyReason::Occupied);
        }
        if occupant == Occupant::Agent(AgentId::Choco) {
            return match self.shared_seat(active) {
                Some(shared) if shared == seat => SeatGrant::Granted,
                Some(_) => SeatGrant::Denied(DenyReason::WrongOwner),
                None => SeatGrant::Denied(DenyReason::SharedSeatUnavailable),
            };
        }
        if seat.owner() != occupant {
            return SeatGrant::Denied(DenyReason::WrongOwner);
        }
        SeatGrant::Granted
    }

    /// The seat the dog could take right now, if its precondition holds
    pub fn shared_seat(&self, active: PlayableCharacter) -> Option<SeatId> {
        let autonomous = Occupant::Agent(active.other().agent_id());
        if !self.is_seated(Occupant::Player) || !self.is_seated(autonomous) {
            return None;
        }
        let vacant = active.seat();
        match self.claims[vacant.index()] {
            None => Some(vacant),
            Some(claim) if claim.occupant == Occupant::Agent(AgentId::Choco) => Some(vacant),
            Some(_) => None,
        }
    }

    /// Convert a reservation into occupation
    pub fn mark_seated(&mut self, occupant: Occupant) -> Option<SeatId> {
        let seat = self.seat_of(occupant)?;
        if let Some(claim) = self.claims[seat.index()].as_mut() {
            claim.seated = true;
        }
        Some(seat)
    }

    /// Drop whatever `occupant` holds; returns the seat freed
    pub fn release(&mut self, occupant: Occupant) -> Option<SeatId> {
        let seat = self.seat_of(occupant)?;
        self.claims[seat.index()] = None;
        debug!("{} released {}", occupant, seat);
        Some(seat)
    }

    pub fn is_occupied(&self, seat: SeatId) -> bool {
        self.claims[seat.index()].is_some()
    }

    pub fn occupant(&self, seat: SeatId) -> Option<Occupant> {
        self.claims[seat.index()].map(|c| c.occupant)
    }

    pub fn claim(&self, seat: SeatId) -> Option<Claim> {
        self.claims[seat.index()]
    }

    pub fn seat_of(&self, occupant: Occupant) -> Option<SeatId> {
        SeatId::ALL.into_iter().find(|seat| {
            self.claims[seat.index()].map(|c| c.occupant) == Some(occupant)
        })
    }

    /// Holding a seat and already sitting in it
    pub fn is_seated(&self, occupant: Occupant) -> bool {
        self.claims
            .iter()
            .flatten()
            .any(|c| c.occupant == occupant && c.seated)
    }

    pub fn clear(&mut self) {
        self.claims = [None; 3];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BEA: Occupant = Occupant::Agent(AgentId::Bea);
    const JB: Occupant = Occupant::Agent(AgentId::Jb);
    const CHOCO: Occupant = Occupant::Agent(AgentId::Choco);

    /// Player controls jb, bea is autonomous
    fn seated_board() -> SeatBoard {
        let mut board = SeatBoard::new();
        let active = PlayableCharacter::Jb;
        let grant = board.request_seat(Occupant::Player, SeatId::Player, active);
        assert!(grant.is_granted());
        board.mark_seated(Occupant::Player);
        assert!(board.request_seat(BEA, SeatId::Bea, active).is_granted());
        board.mark_seated(BEA);
        board
    }

    #[test]
    fn test_owner_must_match() {
        let mut board = SeatBoard::new();
        let grant = board.request_seat(BEA, SeatId::Jb, PlayableCharacter::Jb);
        assert_eq!(grant, SeatGrant::Denied(DenyReason::WrongOwner));
        assert!(!board.is_occupied(SeatId::Jb));
    }

    #[test]
    fn test_reservation_blocks_others() {
        let mut board = SeatBoard::new();
        let grant = board.request_seat(JB, SeatId::Jb, PlayableCharacter::Bea);
        assert!(grant.is_granted());
        assert!(board.is_occupied(SeatId::Jb));
        assert!(!board.is_seated(JB));
        // Even the dog cannot take a reserved seat
        let grant = board.request_seat(CHOCO, SeatId::Jb, PlayableCharacter::Bea);
        assert!(!grant.is_granted());
    }

    #[test]
    fn test_request_is_idempotent() {
        let mut board = SeatBoard::new();
        let active = PlayableCharacter::Jb;
        board.request_seat(BEA, SeatId::Bea, active);
        board.mark_seated(BEA);
        assert!(board.request_seat(BEA, SeatId::Bea, active).is_granted());
        assert!(board.is_seated(BEA));
    }

    #[test]
    fn test_cannot_hold_two_seats() {
        let mut board = SeatBoard::new();
        board.request_seat(Occupant::Player, SeatId::Player, PlayableCharacter::Bea);
        let grant = board.request_seat(Occupant::Player, SeatId::Jb, PlayableCharacter::Bea);
        assert_eq!(
            grant,
            SeatGrant::Denied(DenyReason::AlreadyHolding(SeatId::Player))
        );
    }

    #[test]
    fn test_dog_needs_both_seated() {
        let mut board = SeatBoard::new();
        let active = PlayableCharacter::Jb;
        board.request_seat(Occupant::Player, SeatId::Player, active);
        board.mark_seated(Occupant::Player);
        // bea only reserved, not yet seated
        board.request_seat(BEA, SeatId::Bea, active);
        assert_eq!(
            board.request_seat(CHOCO, SeatId::Jb, active),
            SeatGrant::Denied(DenyReason::SharedSeatUnavailable)
        );
        board.mark_seated(BEA);
        assert!(board.request_seat(CHOCO, SeatId::Jb, active).is_granted());
    }

    #[test]
    fn test_dog_takes_only_the_vacant_character_seat() {
        let mut board = seated_board();
        let active = PlayableCharacter::Jb;
        assert_eq!(board.shared_seat(active), Some(SeatId::Jb));
        assert_eq!(
            board.request_seat(CHOCO, SeatId::Bea, active),
            SeatGrant::Denied(DenyReason::Occupied)
        );
        assert_eq!(
            board.request_seat(CHOCO, SeatId::Player, active),
            SeatGrant::Denied(DenyReason::Occupied)
        );
        assert!(board.request_seat(CHOCO, SeatId::Jb, active).is_granted());
        board.mark_seated(CHOCO);
        assert_eq!(board.seat_of(CHOCO), Some(SeatId::Jb));
    }

    #[test]
    fn test_release_frees_seat() {
        let mut board = seated_board();
        assert_eq!(board.release(BEA), Some(SeatId::Bea));
        assert!(!board.is_occupied(SeatId::Bea));
        assert_eq!(board.release(BEA), None);
        assert_eq!(board.shared_seat(PlayableCharacter::Jb), None);
    }

    #[test]
    fn test_no_seat_has_two_occupants() {
        let board = seated_board();
        for seat in SeatId::ALL {
            let holders = [Occupant::Player, JB, BEA, CHOCO]
                .iter()
                .filter(|o| board.seat_of(**o) == Some(seat))
                .count();
            assert!(holders <= 1);
        }
    }
}
