//! Reduced behavior machine for the dog.
//!
//! Idle and wandering like the characters, plus one campfire trick: once the
//! player and the autonomous character are both seated, the dog trots over
//! and takes the seat left empty by the player-controlled character. The
//! moment either of them stands, it gets up again.

use log::debug;

use crate::components::{Agent, AgentTimers, Behavior, BehaviorState, Home, Occupant, Position};

use super::behavior::{finish_tick, wander_target};
use super::context::TickContext;
use super::events::{Actor, SimEvent};
use super::movement::{snap_to, step_toward};

pub fn update_animal(
    agent: &Agent,
    pos: &mut Position,
    behavior: &mut Behavior,
    timers: &mut AgentTimers,
    home: &Home,
    ctx: &mut TickContext<'_>,
) {
    let config = ctx.config;
    let cfg = &config.agents;
    let id = agent.id;
    let occupant = Occupant::Agent(id);
    let was_moving = behavior.state.is_moving();
    let player = ctx.player_position;
    let engaged = ctx.is_engaged(id);
    let near_player = ctx.player_near(&pos.world, cfg.nearby_radius);
    let shared = ctx.seats.shared_seat(ctx.active);
    let dt = ctx.delta;

    match behavior.state {
        BehaviorState::WalkingToSharedSeat { seat } => {
            if shared != Some(seat) {
                ctx.seats.release(occupant);
                behavior.state = BehaviorState::Idle {
                    facing_player: false,
                };
                timers.action.rearm(cfg.action_interval, ctx.rng);
                debug!("{}: campfire broke up before arriving", id);
            } else {
                let target = *ctx.layout.seat(seat);
                let step = step_toward(
                    pos,
                    target.position,
                    cfg.seat_walk_speed,
                    dt,
                    cfg.arrive_epsilon,
                );
                if step.arrived() {
                    snap_to(pos, target.position);
                    pos.facing = target.facing;
                    ctx.seats.mark_seated(occupant);
                    behavior.state = BehaviorState::SittingOnSharedSeat { seat };
                    ctx.events.push(SimEvent::SatDown {
                        actor: Actor::Agent(id),
                        seat,
                    });
                    debug!("{}: curled up on {}", id, seat);
                }
            }
        }
        BehaviorState::SittingOnSharedSeat { seat } => {
            if shared != Some(seat) {
                ctx.seats.release(occupant);
                behavior.state = BehaviorState::Idle {
                    facing_player: false,
                };
                timers.action.rearm(cfg.action_interval, ctx.rng);
                ctx.events.push(SimEvent::StoodUp {
                    actor: Actor::Agent(id),
                    seat,
                });
            } else {
                let target = *ctx.layout.seat(seat);
                snap_to(pos, target.position);
                pos.facing = target.facing;
            }
        }
        BehaviorState::Wandering { target } => {
            if near_player || engaged {
                pos.face(&player);
                behavior.state = BehaviorState::Idle {
                    facing_player: true,
                };
            } else if step_toward(pos, target, cfg.wander_speed, dt, cfg.arrive_epsilon).arrived() {
                behavior.state = BehaviorState::Idle {
                    facing_player: false,
                };
            }
        }
        BehaviorState::Idle { .. } => {
            let facing_player = near_player || engaged;
            if facing_player {
                pos.face(&player);
            }
            behavior.state = BehaviorState::Idle { facing_player };
        }
        BehaviorState::WalkingToSeat { .. }
        | BehaviorState::Sitting { .. }
        | BehaviorState::RunningToPlayer => {
            ctx.seats.release(occupant);
            behavior.state = BehaviorState::default();
        }
    }

    if behavior.state.is_roaming() {
        let joined = match shared {
            Some(seat) => {
                let granted = ctx.seats.request_seat(occupant, seat, ctx.active).is_granted();
                if granted {
                    debug!("{}: joining the campfire at {}", id, seat);
                    behavior.state = BehaviorState::WalkingToSharedSeat { seat };
                }
                granted
            }
            None => false,
        };
        if !joined && !near_player && !engaged && timers.action.tick(dt) {
            timers.action.rearm(cfg.action_interval, ctx.rng);
            if matches!(behavior.state, BehaviorState::Idle { .. }) {
                let target = wander_target(home, cfg.wander_radius, ctx);
                behavior.state = BehaviorState::Wandering { target };
            }
        }
    }

    finish_tick(id, pos, behavior, was_moving, ctx);
}
