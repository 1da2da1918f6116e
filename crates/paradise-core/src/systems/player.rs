//! First-person player controller.
//!
//! Standing: movement keys are rotated by yaw and scaled to walk speed,
//! gravity pulls the eye back down to its fixed height, and the result is
//! clamped to the play area. Seated: the eye is pinned to the seat and only
//! the view turns. Look motion is consumed whether or not the player moves.

use log::debug;

use crate::components::{
    LookDelta, MoveIntent, Occupant, PlayArea, PlayableCharacter, Player, SeatId, SeatLayout, Vec3,
};
use crate::config::PlayerConfig;

use super::events::{Actor, EventLog, SimEvent};
use super::seating::SeatBoard;

/// Everything the controller reads for one tick
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlInput {
    pub movement: MoveIntent,
    pub jump: bool,
}

/// Integrate one tick of player motion and look.
pub fn update_player(
    player: &mut Player,
    input: ControlInput,
    look: &mut LookDelta,
    layout: &SeatLayout,
    config: &PlayerConfig,
    area: &PlayArea,
    delta_seconds: f32,
    events: &mut EventLog,
) {
    apply_look(player, look, config);

    if let Some(seat) = player.seat {
        let anchor = layout.seat(seat).position;
        player.position = Vec3::new(anchor.x, config.seated_eye_height, anchor.z);
        player.vertical_velocity = 0.0;
        player.grounded = true;
        set_walking(player, false, events);
        return;
    }

    let (strafe, advance) = input.movement.axes();
    let (sin, cos) = player.yaw.sin_cos();
    // Yaw 0 looks down -Z
    let forward = Vec3::new(-sin, 0.0, -cos);
    let right = Vec3::new(cos, 0.0, -sin);
    let velocity = (forward * advance + right * strafe).normalize() * config.walk_speed;
    player.position = player.position + velocity * delta_seconds;

    if input.jump && player.grounded {
        player.vertical_velocity = config.jump_velocity;
        player.grounded = false;
        events.push(SimEvent::Jumped(Actor::Player));
    }
    if !player.grounded {
        player.vertical_velocity -= config.gravity * delta_seconds;
        player.position.y += player.vertical_velocity * delta_seconds;
        if player.position.y <= config.eye_height {
            player.position.y = config.eye_height;
            player.vertical_velocity = 0.0;
            player.grounded = true;
        }
    }

    player.position = area.clamp(player.position);
    set_walking(player, !input.movement.is_idle() && player.grounded, events);
}

fn apply_look(player: &mut Player, look: &mut LookDelta, config: &PlayerConfig) {
    let (dx, dy) = look.take();
    player.yaw -= dx * config.look_sensitivity;
    player.pitch = (player.pitch - dy * config.look_sensitivity)
        .clamp(-config.pitch_limit, config.pitch_limit);
}

fn set_walking(player: &mut Player, walking: bool, events: &mut EventLog) {
    if walking == player.walking {
        return;
    }
    player.walking = walking;
    events.push(if walking {
        SimEvent::FootstepsStarted(Actor::Player)
    } else {
        SimEvent::FootstepsStopped(Actor::Player)
    });
}

/// Sit on the player seat; false if it could not be taken
pub fn sit_down(
    player: &mut Player,
    seats: &mut SeatBoard,
    layout: &SeatLayout,
    config: &PlayerConfig,
    active: PlayableCharacter,
    events: &mut EventLog,
) -> bool {
    if player.is_sitting() {
        return true;
    }
    let seat = SeatId::Player;
    if !seats.request_seat(Occupant::Player, seat, active).is_granted() {
        return false;
    }
    seats.mark_seated(Occupant::Player);
    player.stand_height = if player.grounded {
        player.position.y
    } else {
        config.eye_height
    };
    player.seat = Some(seat);
    let anchor = layout.seat(seat);
    player.position = Vec3::new(
        anchor.position.x,
        config.seated_eye_height,
        anchor.position.z,
    );
    player.yaw = anchor.facing + std::f32::consts::PI;
    player.pitch = 0.0;
    player.vertical_velocity = 0.0;
    player.grounded = true;
    set_walking(player, false, events);
    events.push(SimEvent::SatDown {
        actor: Actor::Player,
        seat,
    });
    debug!("player sat at {}", seat);
    true
}

/// Leave the seat and restore the standing eye height
pub fn stand_up(player: &mut Player, seats: &mut SeatBoard, events: &mut EventLog) -> bool {
    let Some(seat) = player.seat.take() else {
        return false;
    };
    seats.release(Occupant::Player);
    player.position.y = player.stand_height;
    events.push(SimEvent::StoodUp {
        actor: Actor::Player,
        seat,
    });
    debug!("player stood up from {}", seat);
    true
}
