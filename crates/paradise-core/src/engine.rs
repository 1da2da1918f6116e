//! Simulation engine - main entry point for running the scene
//!
//! One [`ParadiseEngine::tick`] runs, in order:
//! 1. the switch coordinator's timers,
//! 2. action edges, judged against the previous tick's proximity report,
//! 3. the two playable characters, then the dog,
//! 4. the player controller and the interaction detector, both skipped while
//!    a switch is settling.

use hecs::{Entity, World};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::components::*;
use crate::config::{AgentConfig, SimConfig};
use crate::error::{ConfigError, SnapshotError, SwitchDenied};
use crate::persistence::{self, Snapshot};
use crate::systems::*;

/// Everything the host hands over for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub movement: MoveIntent,
    pub jump: bool,
    /// Pointer or touch motion since the last frame
    pub look_delta: (f32, f32),
    pub actions: ActionEdges,
}

/// Buttons pressed this frame. Edges, not levels: set for one frame only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionEdges {
    pub summon: bool,
    pub jump_command: bool,
    pub sit_toggle: bool,
    pub interact: bool,
    pub switch_character: bool,
}

/// What the host needs to draw and animate one agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentView {
    pub id: AgentId,
    /// Ground position, lifted by any hop in progress
    pub position: Vec3,
    pub facing: f32,
    /// Cosmetic vertical offset
    pub bob: f32,
    pub state: StateKind,
    pub jumping: bool,
    /// False for the character the player controls, which is not drawn
    pub autonomous: bool,
}

/// Main simulation engine
pub struct ParadiseEngine {
    /// ECS world holding the three agents
    pub world: World,
    agents: [Entity; 3],
    player: Player,
    look: LookDelta,
    seats: SeatBoard,
    layout: SeatLayout,
    commands: CommandQueue,
    events: EventLog,
    switch: SwitchCoordinator,
    dialogue: DialogueBook,
    /// Agent the player is talking to
    session: Option<AgentId>,
    proximity: ProximityReport,
    active: PlayableCharacter,
    elapsed: f32,
    rng: StdRng,
    config: SimConfig,
}

fn slot(id: AgentId) -> usize {
    match id {
        AgentId::Jb => 0,
        AgentId::Bea => 1,
        AgentId::Choco => 2,
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn fresh_timers(config: &AgentConfig, rng: &mut StdRng) -> AgentTimers {
    AgentTimers {
        action: Countdown::random(config.action_interval, rng),
        campfire: Countdown::random(config.campfire_interval, rng),
        dwell: Countdown::idle(),
    }
}

/// The player stands where the controlled character lives
fn spawn_player(config: &SimConfig, active: PlayableCharacter) -> Player {
    let home = config.homes.get(active.agent_id());
    // Player yaw 0 looks down -Z, agent heading 0 faces +Z
    Player::spawn(
        home.position,
        config.player.eye_height,
        home.facing + std::f32::consts::PI,
    )
}

impl ParadiseEngine {
    /// Scene with the built-in dialogue and `jb` under player control.
    ///
    /// `config` is taken as is. Configs from [`SimConfig::load`] and
    /// [`SimConfig::from_json_str`] are already validated; use
    /// [`ParadiseEngine::try_new`] for one assembled by hand.
    pub fn new(config: SimConfig) -> Self {
        Self::with_dialogue(config, DialogueBook::default())
    }

    /// Like [`ParadiseEngine::new`], rejecting a config that fails
    /// [`SimConfig::validate`]
    pub fn try_new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn with_dialogue(config: SimConfig, dialogue: DialogueBook) -> Self {
        let mut rng = seeded_rng(config.seed);
        let mut world = World::new();
        let active = PlayableCharacter::Jb;

        let agents = AgentId::ALL.map(|id| {
            let home = config.homes.get(id);
            world.spawn((
                Agent::new(id, id != active.agent_id()),
                home.to_position(),
                Behavior::default(),
                fresh_timers(&config.agents, &mut rng),
                home,
            ))
        });

        info!(
            "scene ready: {} controlled, seed {:?}",
            active.agent_id(),
            config.seed
        );

        Self {
            world,
            agents,
            player: spawn_player(&config, active),
            look: LookDelta::default(),
            seats: SeatBoard::new(),
            layout: SeatLayout::from_config(&config.campfire),
            commands: CommandQueue::new(),
            events: EventLog::new(),
            switch: SwitchCoordinator::new(&config.switch),
            dialogue,
            session: None,
            proximity: ProximityReport::default(),
            active,
            elapsed: 0.0,
            rng,
            config,
        }
    }

    /// Advance the scene by `delta_seconds`
    pub fn tick(&mut self, delta_seconds: f32, input: &FrameInput) {
        let dt = delta_seconds.max(0.0);
        self.elapsed += dt;

        match self.switch.advance(dt) {
            SwitchProgress::Settled => {
                self.events.push(SimEvent::SwitchSettled);
                debug!("switch settled, cooldown started");
            }
            SwitchProgress::Ready => debug!("switch cooldown elapsed"),
            SwitchProgress::Unchanged => {}
        }

        self.handle_actions(&input.actions);
        self.update_agents(dt);

        if self.switch.is_transitioning() {
            self.look = LookDelta::default();
            self.proximity = ProximityReport::default();
            return;
        }

        self.look.accumulate(input.look_delta.0, input.look_delta.1);
        let control = ControlInput {
            movement: input.movement,
            jump: input.jump,
        };
        update_player(
            &mut self.player,
            control,
            &mut self.look,
            &self.layout,
            &self.config.player,
            &self.config.play_area,
            dt,
            &mut self.events,
        );
        self.proximity = self.scan_proximity();
    }

    fn handle_actions(&mut self, actions: &ActionEdges) {
        if actions.summon {
            self.commands.push(Command::Summon);
        }
        if actions.jump_command {
            self.commands.push(Command::Jump);
        }
        if actions.interact {
            if self.session.is_some() {
                self.end_dialogue();
            } else {
                self.begin_dialogue();
            }
        }
        if actions.sit_toggle {
            if self.player.is_sitting() {
                self.stand();
            } else if self.proximity.near_seating {
                self.sit();
            }
        }
        if actions.switch_character {
            if let Err(denied) = self.switch_active_character() {
                debug!("switch refused: {}", denied);
            }
        }
    }

    fn update_agents(&mut self, dt: f32) {
        let mut ctx = TickContext {
            delta: dt,
            elapsed: self.elapsed,
            config: &self.config,
            layout: &self.layout,
            seats: &mut self.seats,
            commands: &mut self.commands,
            events: &mut self.events,
            rng: &mut self.rng,
            player_position: self.player.position,
            player_seated: self.player.is_sitting(),
            active: self.active,
            engaged: self.session,
        };

        // Characters first so the dog sees this tick's seating
        for id in AgentId::ALL {
            let Ok((agent, pos, behavior, timers, home)) = self.world.query_one_mut::<(
                &Agent,
                &mut Position,
                &mut Behavior,
                &mut AgentTimers,
                &Home,
            )>(self.agents[slot(id)]) else {
                continue;
            };
            match id {
                AgentId::Choco => update_animal(agent, pos, behavior, timers, home, &mut ctx),
                AgentId::Jb | AgentId::Bea => {
                    update_character(agent, pos, behavior, timers, home, &mut ctx)
                }
            }
        }
    }

    fn scan_proximity(&self) -> ProximityReport {
        let autonomous = self.active.other();
        detect(
            self.player.position,
            autonomous,
            self.agent_position(autonomous.agent_id()),
            self.agent_position(AgentId::Choco),
            self.layout.center,
            &self.config.proximity,
        )
    }

    fn agent_position(&self, id: AgentId) -> Vec3 {
        self.world
            .get::<&Position>(self.agents[slot(id)])
            .map(|pos| pos.world)
            .unwrap_or_default()
    }

    /// Queue a one-shot ability for the autonomous character
    pub fn push_command(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Sit on the player seat. Distance to the fire is the caller's concern;
    /// the sit action edge only calls this when the seating area is in range.
    pub fn sit(&mut self) -> bool {
        if self.switch.is_transitioning() {
            return false;
        }
        sit_down(
            &mut self.player,
            &mut self.seats,
            &self.layout,
            &self.config.player,
            self.active,
            &mut self.events,
        )
    }

    pub fn stand(&mut self) -> bool {
        stand_up(&mut self.player, &mut self.seats, &mut self.events)
    }

    /// Hand control to the other playable character.
    ///
    /// Every seat is released, pending commands are dropped, both characters
    /// return home with fresh timers and the player respawns at the new
    /// character's home. All of that happens before this returns; the settle
    /// delay and cooldown then run on subsequent ticks.
    pub fn switch_active_character(&mut self) -> Result<PlayableCharacter, SwitchDenied> {
        self.switch.begin(self.session.is_some())?;

        for seat in SeatId::ALL {
            if let Some(claim) = self.seats.claim(seat) {
                if claim.seated {
                    self.events.push(SimEvent::StoodUp {
                        actor: claim.occupant.into(),
                        seat,
                    });
                }
            }
        }
        self.seats.clear();
        self.commands.clear();
        self.active = self.active.other();

        for id in AgentId::ALL {
            let timers = fresh_timers(&self.config.agents, &mut self.rng);
            let home = self.config.homes.get(id);
            let Ok((agent, pos, behavior, agent_timers)) = self.world.query_one_mut::<(
                &mut Agent,
                &mut Position,
                &mut Behavior,
                &mut AgentTimers,
            )>(self.agents[slot(id)]) else {
                continue;
            };

            let playable = id.playable();
            // The dog keeps its place and only loses a seat it held
            if playable.is_none() && behavior.state.seat().is_none() {
                continue;
            }
            if behavior.state.is_moving() {
                self.events.push(SimEvent::FootstepsStopped(Actor::Agent(id)));
            }
            *behavior = Behavior::default();
            if let Some(character) = playable {
                agent.autonomous = character != self.active;
                *pos = home.to_position();
                *agent_timers = timers;
            }
        }

        if self.player.walking {
            self.events.push(SimEvent::FootstepsStopped(Actor::Player));
        }
        self.player = spawn_player(&self.config, self.active);
        self.look = LookDelta::default();
        self.proximity = ProximityReport::default();

        self.events.push(SimEvent::Switched {
            active: self.active,
        });
        info!("switched control to {}", self.active.agent_id());
        Ok(self.active)
    }

    /// Open a conversation with whoever the last tick found in range
    pub fn begin_dialogue(&mut self) -> Option<AgentId> {
        if self.session.is_some() || self.switch.is_transitioning() {
            return None;
        }
        let agent = self.proximity.target?.agent_id();
        self.session = Some(agent);
        self.events.push(SimEvent::DialogueOpened(agent));
        info!("dialogue opened with {}", agent);
        Some(agent)
    }

    /// A line from the agent in the open conversation
    pub fn say(&mut self, category: &str) -> Option<String> {
        let agent = self.session?;
        let seated = self.seated_context(agent);
        Some(self.respond(agent, category, seated))
    }

    pub fn respond(&mut self, agent: AgentId, category: &str, seated: bool) -> String {
        self.dialogue
            .respond(agent, category, seated, &mut self.rng)
            .to_string()
    }

    pub fn end_dialogue(&mut self) -> Option<AgentId> {
        let agent = self.session.take()?;
        self.events.push(SimEvent::DialogueClosed(agent));
        info!("dialogue with {} closed", agent);
        Some(agent)
    }

    /// Both the player and `agent` are sitting at the fire
    pub fn seated_context(&self, agent: AgentId) -> bool {
        self.player.is_sitting() && self.seats.is_seated(Occupant::Agent(agent))
    }

    pub fn in_dialogue(&self) -> Option<AgentId> {
        self.session
    }

    pub fn agent_views(&self) -> Vec<AgentView> {
        let mut views: Vec<AgentView> = self
            .world
            .query::<(&Agent, &Position, &Behavior)>()
            .iter()
            .map(|(_, (agent, pos, behavior))| AgentView {
                id: agent.id,
                position: pos.world,
                facing: pos.facing,
                bob: behavior.bob,
                state: behavior.state.kind(),
                jumping: behavior.is_jumping(),
                autonomous: agent.autonomous,
            })
            .collect();
        views.sort_by_key(|view| view.id);
        views
    }

    pub fn agent_view(&self, id: AgentId) -> Option<AgentView> {
        self.agent_views().into_iter().find(|view| view.id == id)
    }

    pub fn agent_state(&self, id: AgentId) -> Option<BehaviorState> {
        self.world
            .get::<&Behavior>(self.agents[slot(id)])
            .ok()
            .map(|behavior| behavior.state)
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Report from the most recent tick
    pub fn proximity(&self) -> &ProximityReport {
        &self.proximity
    }

    pub fn active_character(&self) -> PlayableCharacter {
        self.active
    }

    pub fn autonomous_character(&self) -> PlayableCharacter {
        self.active.other()
    }

    pub fn is_transitioning(&self) -> bool {
        self.switch.is_transitioning()
    }

    pub fn switch_phase(&self) -> SwitchPhase {
        self.switch.phase()
    }

    pub fn seats(&self) -> &SeatBoard {
        &self.seats
    }

    pub fn layout(&self) -> &SeatLayout {
        &self.layout
    }

    pub fn commands(&self) -> &CommandQueue {
        &self.commands
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn dialogue(&self) -> &DialogueBook {
        &self.dialogue
    }

    /// Seconds simulated so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// One-shot cues raised since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    /// Save simulation state to a writer
    pub fn save<W: std::io::Write>(&self, writer: W) -> Result<(), SnapshotError> {
        let snapshot = Snapshot {
            version: persistence::SAVE_VERSION,
            elapsed: self.elapsed,
            active: self.active,
            config: self.config.clone(),
            player: self.player,
            look: self.look,
            seats: self.seats.clone(),
            commands: self.commands.clone(),
            switch: self.switch.clone(),
            session: self.session,
            proximity: self.proximity,
            agents: persistence::capture_agents(&self.world),
        };
        persistence::write_snapshot(writer, &snapshot)
    }

    /// Load simulation state from a reader.
    ///
    /// The dialogue book is kept. The RNG is reseeded from the loaded
    /// config, so random choices after a load do not replay the original run.
    pub fn load<R: std::io::Read>(&mut self, reader: R) -> Result<(), SnapshotError> {
        let snapshot = persistence::read_snapshot(reader)?;
        let (world, agents) = persistence::restore_agents(snapshot.agents)?;

        self.world = world;
        self.agents = agents;
        self.layout = SeatLayout::from_config(&snapshot.config.campfire);
        self.rng = seeded_rng(snapshot.config.seed);
        self.config = snapshot.config;
        self.elapsed = snapshot.elapsed;
        self.active = snapshot.active;
        self.player = snapshot.player;
        self.look = snapshot.look;
        self.seats = snapshot.seats;
        self.commands = snapshot.commands;
        self.switch = snapshot.switch;
        self.session = snapshot.session;
        self.proximity = snapshot.proximity;
        self.events = EventLog::new();

        info!("loaded snapshot at {:.1}s", self.elapsed);
        Ok(())
    }
}

impl Default for ParadiseEngine {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}
