//! Behavior state machine for the autonomous playable character.
//!
//! Per tick, in precedence order:
//! 1. A pending summon sends the character running to the player, dropping
//!    any seat it reserved or sat in.
//! 2. The current state advances (movement, arrival, dwell).
//! 3. While idle or wandering and not busy with the player, the campfire
//!    timer may start a seat walk, otherwise the action timer may start a
//!    wander or a hop.
//!
//! Nothing here can fail. Every transition is guarded by the current state,
//! and a momentarily inconsistent agent corrects itself on the next tick.

use log::debug;
use rand::Rng;

use crate::components::{
    Agent, AgentId, AgentTimers, Behavior, BehaviorState, Home, Jump, Occupant, Position, Vec3,
};
use crate::config::AgentConfig;

use super::commands::Command;
use super::context::TickContext;
use super::events::{Actor, SimEvent};
use super::movement::{confine, snap_to, step_toward};

/// Advance the autonomous playable character by one tick.
///
/// The character the player controls is left untouched.
pub fn update_character(
    agent: &Agent,
    pos: &mut Position,
    behavior: &mut Behavior,
    timers: &mut AgentTimers,
    home: &Home,
    ctx: &mut TickContext<'_>,
) {
    let Some(character) = agent.id.playable() else {
        return;
    };
    if !agent.autonomous {
        return;
    }

    let config = ctx.config;
    let cfg = &config.agents;
    let id = agent.id;
    let occupant = Occupant::Agent(id);
    let was_moving = behavior.state.is_moving();
    let player = ctx.player_position;
    let engaged = ctx.is_engaged(id);
    let near_player = ctx.player_near(&pos.world, cfg.nearby_radius);
    let dt = ctx.delta;

    if ctx.commands.take(Command::Summon) {
        leave_seat(id, behavior, ctx);
        debug!("{}: summoned, {:?} -> RunningToPlayer", id, behavior.state.kind());
        behavior.state = BehaviorState::RunningToPlayer;
    }
    if ctx.commands.take(Command::Jump) && behavior.state.is_roaming() {
        start_jump(id, behavior, cfg, ctx);
    }
    advance_jump(behavior, cfg, dt);

    match behavior.state {
        BehaviorState::RunningToPlayer => {
            if step_toward(pos, player, cfg.run_speed, dt, cfg.stop_distance).arrived() {
                pos.face(&player);
                behavior.state = BehaviorState::Idle {
                    facing_player: true,
                };
                timers.action.rearm(cfg.action_interval, ctx.rng);
                ctx.events.push(SimEvent::Waved(id));
                debug!("{}: reached player, waving", id);
            }
        }
        BehaviorState::WalkingToSeat { seat } => {
            if near_player || engaged {
                ctx.seats.release(occupant);
                pos.face(&player);
                behavior.state = BehaviorState::Idle {
                    facing_player: true,
                };
                timers.campfire.rearm(cfg.campfire_interval, ctx.rng);
                debug!("{}: seat walk cancelled by player", id);
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
                    timers.dwell.rearm(cfg.sit_duration, ctx.rng);
                    behavior.state = BehaviorState::Sitting { seat };
                    ctx.events.push(SimEvent::SatDown {
                        actor: Actor::Agent(id),
                        seat,
                    });
                    debug!("{}: sat at {}", id, seat);
                }
            }
        }
        BehaviorState::Sitting { seat } => {
            let target = *ctx.layout.seat(seat);
            snap_to(pos, target.position);
            pos.facing = target.facing;
            if timers.dwell.tick(dt) && !engaged {
                leave_seat(id, behavior, ctx);
                behavior.state = BehaviorState::Idle {
                    facing_player: false,
                };
                timers.campfire.rearm(cfg.campfire_interval, ctx.rng);
                timers.action.rearm(cfg.action_interval, ctx.rng);
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
        BehaviorState::WalkingToSharedSeat { .. } | BehaviorState::SittingOnSharedSeat { .. } => {
            // Only the dog uses the shared seat
            ctx.seats.release(occupant);
            behavior.state = BehaviorState::default();
        }
    }

    if behavior.state.is_roaming() && !near_player && !engaged {
        if timers.campfire.tick(dt) {
            let seat = character.seat();
            if ctx.seats.request_seat(occupant, seat, ctx.active).is_granted() {
                debug!("{}: heading to {}", id, seat);
                behavior.state = BehaviorState::WalkingToSeat { seat };
            } else {
                timers.campfire.rearm(cfg.campfire_interval, ctx.rng);
            }
        } else if timers.action.tick(dt) {
            timers.action.rearm(cfg.action_interval, ctx.rng);
            if behavior.jump.is_none() && ctx.rng.gen::<f32>() < cfg.jump_chance {
                start_jump(id, behavior, cfg, ctx);
            } else if matches!(behavior.state, BehaviorState::Idle { .. }) {
                let target = wander_target(home, cfg.wander_radius, ctx);
                behavior.state = BehaviorState::Wandering { target };
            }
        }
    }

    finish_tick(id, pos, behavior, was_moving, ctx);
}

/// Release whatever seat the agent holds, announcing it if it was sitting
pub(crate) fn leave_seat(id: AgentId, behavior: &Behavior, ctx: &mut TickContext<'_>) {
    let occupant = Occupant::Agent(id);
    let was_seated = ctx.seats.is_seated(occupant);
    if let Some(seat) = ctx.seats.release(occupant) {
        if was_seated || behavior.state.is_seated() {
            ctx.events.push(SimEvent::StoodUp {
                actor: Actor::Agent(id),
                seat,
            });
        }
    }
}

fn start_jump(
    id: AgentId,
    behavior: &mut Behavior,
    cfg: &AgentConfig,
    ctx: &mut TickContext<'_>,
) {
    if behavior.jump.is_some() {
        return;
    }
    behavior.jump = Some(Jump::launch(cfg.jump_velocity));
    ctx.events.push(SimEvent::Jumped(Actor::Agent(id)));
}

fn advance_jump(behavior: &mut Behavior, cfg: &AgentConfig, dt: f32) {
    if let Some(jump) = behavior.jump.as_mut() {
        if !jump.advance(cfg.jump_gravity, dt) {
            behavior.jump = None;
        }
    }
}

/// Random ground point within `radius` of home, kept inside the play area
pub(crate) fn wander_target(home: &Home, radius: f32, ctx: &mut TickContext<'_>) -> Vec3 {
    let angle = ctx.rng.gen_range(0.0..std::f32::consts::TAU);
    // sqrt keeps the points uniform over the disc instead of bunched at the centre
    let r = radius * ctx.rng.gen::<f32>().sqrt();
    let point = Vec3::ground(
        home.position.x + angle.sin() * r,
        home.position.z + angle.cos() * r,
    );
    ctx.config.play_area.clamp(point)
}

/// Height, bob, bounds and footstep cues common to every agent
pub(crate) fn finish_tick(
    id: AgentId,
    pos: &mut Position,
    behavior: &mut Behavior,
    was_moving: bool,
    ctx: &mut TickContext<'_>,
) {
    let cfg = &ctx.config.agents;
    if !behavior.state.is_roaming() {
        behavior.jump = None;
    }
    pos.world.y = behavior.jump.map_or(0.0, |j| j.height);

    behavior.bob = match behavior.state {
        BehaviorState::Idle { .. }
        | BehaviorState::Sitting { .. }
        | BehaviorState::SittingOnSharedSeat { .. } => {
            cfg.bob_amplitude * (ctx.elapsed * cfg.bob_frequency).sin()
        }
        _ => 0.0,
    };

    confine(pos, &ctx.config.play_area);

    let moving = behavior.state.is_moving();
    if moving && !was_moving {
        ctx.events.push(SimEvent::FootstepsStarted(Actor::Agent(id)));
    } else if !moving && was_moving {
        ctx.events.push(SimEvent::FootstepsStopped(Actor::Agent(id)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{AgentId, PlayableCharacter, SeatId, SeatLayout, StateKind};
    use crate::config::SimConfig;
    use crate::systems::{CommandQueue, EventLog, SeatBoard};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixture {
        config: SimConfig,
        layout: SeatLayout,
        seats: SeatBoard,
        commands: CommandQueue,
        events: EventLog,
        rng: StdRng,
        player: Vec3,
        player_seated: bool,
        engaged: Option<AgentId>,
    }

    impl Fixture {
        fn new() -> Self {
            let config = SimConfig::default();
            let layout = SeatLayout::from_config(&config.campfire);
            Self {
                config,
                layout,
                seats: SeatBoard::new(),
                commands: CommandQueue::new(),
                events: EventLog::new(),
                rng: StdRng::seed_from_u64(11),
                // Far from everyone
                player: Vec3::new(30.0, 1.6, 30.0),
                player_seated: false,
                engaged: None,
            }
        }

        fn step(&mut self, bea: &mut (Agent, Position, Behavior, AgentTimers, Home), dt: f32) {
            let mut ctx = TickContext {
                delta: dt,
                elapsed: 0.0,
                config: &self.config,
                layout: &self.layout,
                seats: &mut self.seats,
                commands: &mut self.commands,
                events: &mut self.events,
                rng: &mut self.rng,
                player_position: self.player,
                player_seated: self.player_seated,
                active: PlayableCharacter::Jb,
                engaged: self.engaged,
            };
            let (agent, pos, behavior, timers, home) = bea;
            update_character(agent, pos, behavior, timers, home, &mut ctx);
        }
    }

    fn bea() -> (Agent, Position, Behavior, AgentTimers, Home) {
        let home = SimConfig::default().homes.bea;
        let timers = AgentTimers {
            action: crate::components::Countdown::from_secs(100.0),
            campfire: crate::components::Countdown::from_secs(100.0),
            dwell: crate::components::Countdown::idle(),
        };
        (
            Agent::new(AgentId::Bea, true),
            home.to_position(),
            Behavior::default(),
            timers,
            home,
        )
    }

    #[test]
    fn test_summon_overrides_wandering() {
        let mut fx = Fixture::new();
        let mut agent = bea();
        agent.2.state = BehaviorState::Wandering {
            target: Vec3::ground(-6.0, 2.0),
        };
        fx.commands.push(Command::Summon);
        fx.step(&mut agent, 1.0 / 60.0);
        assert_eq!(agent.2.state, BehaviorState::RunningToPlayer);
        assert!(!fx.commands.is_pending(Command::Summon));
    }

    #[test]
    fn test_summon_releases_seat() {
        let mut fx = Fixture::new();
        let mut agent = bea();
        fx.seats.request_seat(
            Occupant::Agent(AgentId::Bea),
            SeatId::Bea,
            PlayableCharacter::Jb,
        );
        fx.seats.mark_seated(Occupant::Agent(AgentId::Bea));
        agent.2.state = BehaviorState::Sitting { seat: SeatId::Bea };
        agent.3.dwell.reset(50.0);
        fx.commands.push(Command::Summon);
        fx.step(&mut agent, 1.0 / 60.0);
        assert!(!fx.seats.is_occupied(SeatId::Bea));
        assert!(fx
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::StoodUp { seat: SeatId::Bea, .. })));
    }

    #[test]
    fn test_summon_cancels_seat_walk() {
        let mut fx = Fixture::new();
        let mut agent = bea();
        fx.seats.request_seat(
            Occupant::Agent(AgentId::Bea),
            SeatId::Bea,
            PlayableCharacter::Jb,
        );
        agent.2.state = BehaviorState::WalkingToSeat { seat: SeatId::Bea };
        fx.commands.push(Command::Summon);
        fx.step(&mut agent, 1.0 / 60.0);

        assert_eq!(agent.2.state, BehaviorState::RunningToPlayer);
        assert!(!fx.seats.is_occupied(SeatId::Bea));
        // Only a reservation was dropped, nobody stood up
        assert!(!fx
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::StoodUp { .. })));
    }

    #[test]
    fn test_run_to_player_ends_in_wave() {
        let mut fx = Fixture::new();
        fx.player = Vec3::new(-3.0, 1.6, 8.0);
        let mut agent = bea();
        fx.commands.push(Command::Summon);
        for _ in 0..600 {
            fx.step(&mut agent, 1.0 / 60.0);
        }
        assert_eq!(agent.2.state, BehaviorState::Idle { facing_player: true });
        let waves = fx.events.iter().filter(|e| matches!(e, SimEvent::Waved(AgentId::Bea))).count();
        assert_eq!(waves, 1);
        let gap = agent.1.world.planar_distance(&fx.player);
        assert!((gap - fx.config.agents.stop_distance).abs() < 0.05);
    }

    #[test]
    fn test_campfire_timer_walks_to_own_seat_and_sits() {
        let mut fx = Fixture::new();
        let mut agent = bea();
        agent.3.campfire = crate::components::Countdown::idle();
        fx.step(&mut agent, 1.0 / 60.0);
        assert_eq!(
            agent.2.state,
            BehaviorState::WalkingToSeat { seat: SeatId::Bea }
        );
        assert_eq!(
            fx.seats.occupant(SeatId::Bea),
            Some(Occupant::Agent(AgentId::Bea))
        );

        for _ in 0..3000 {
            fx.step(&mut agent, 1.0 / 60.0);
            if agent.2.state.is_seated() {
                break;
            }
        }
        assert_eq!(agent.2.state, BehaviorState::Sitting { seat: SeatId::Bea });
        let seat = fx.layout.seat(SeatId::Bea);
        assert_eq!(agent.1.facing, seat.facing);
        assert!(fx.seats.is_seated(Occupant::Agent(AgentId::Bea)));
    }

    #[test]
    fn test_dwell_does_not_end_while_engaged() {
        let mut fx = Fixture::new();
        let mut agent = bea();
        fx.seats.request_seat(
            Occupant::Agent(AgentId::Bea),
            SeatId::Bea,
            PlayableCharacter::Jb,
        );
        fx.seats.mark_seated(Occupant::Agent(AgentId::Bea));
        agent.2.state = BehaviorState::Sitting { seat: SeatId::Bea };
        agent.3.dwell.reset(0.1);
        fx.engaged = Some(AgentId::Bea);
        for _ in 0..30 {
            fx.step(&mut agent, 1.0 / 60.0);
        }
        assert_eq!(agent.2.state.kind(), StateKind::Sitting);

        fx.engaged = None;
        fx.step(&mut agent, 1.0 / 60.0);
        assert_eq!(agent.2.state.kind(), StateKind::Idle);
        assert!(!fx.seats.is_occupied(SeatId::Bea));
    }

    #[test]
    fn test_player_nearby_cancels_wander() {
        let mut fx = Fixture::new();
        let mut agent = bea();
        agent.2.state = BehaviorState::Wandering {
            target: Vec3::ground(-8.0, 0.0),
        };
        fx.player = Vec3::new(-2.0, 1.6, 1.0);
        fx.step(&mut agent, 1.0 / 60.0);
        assert_eq!(agent.2.state, BehaviorState::Idle { facing_player: true });
        let expected = agent.1.world.heading_to(&fx.player);
        assert!((agent.1.facing - expected).abs() < 0.001);
    }

    #[test]
    fn test_controlled_character_is_not_simulated() {
        let mut fx = Fixture::new();
        let mut agent = bea();
        agent.0.autonomous = false;
        agent.3.campfire = crate::components::Countdown::idle();
        fx.commands.push(Command::Summon);
        fx.step(&mut agent, 1.0);
        assert_eq!(agent.2.state, BehaviorState::default());
        assert!(fx.commands.is_pending(Command::Summon));
    }

    #[test]
    fn test_jump_command_hops_and_lands() {
        let mut fx = Fixture::new();
        let mut agent = bea();
        fx.commands.push(Command::Jump);
        fx.step(&mut agent, 1.0 / 60.0);
        assert!(agent.2.is_jumping());
        assert!(agent.1.world.y > 0.0);
        for _ in 0..120 {
            fx.step(&mut agent, 1.0 / 60.0);
        }
        assert!(!agent.2.is_jumping());
        assert_eq!(agent.1.world.y, 0.0);
    }

    #[test]
    fn test_wander_stays_near_home() {
        let mut fx = Fixture::new();
        let mut agent = bea();
        let home = agent.4;
        agent.3.action = crate::components::Countdown::idle();
        fx.config.agents.jump_chance = 0.0;
        fx.step(&mut agent, 1.0 / 60.0);
        match agent.2.state {
            BehaviorState::Wandering { target } => {
                let reach = fx.config.agents.wander_radius + 0.001;
                assert!(target.planar_distance(&home.position) <= reach);
            }
            other => panic!("expected wandering, got {:?}", other),
        }
        assert!(fx
            .events
            .iter()
            .any(|e| *e == SimEvent::FootstepsStarted(Actor::Agent(AgentId::Bea))));
    }
}
