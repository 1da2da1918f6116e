//! Paradise Headless Simulation Harness
//!
//! Drives the campfire scene without a renderer: scripted scenarios first,
//! then a long randomized session with every invariant checked each tick.
//!
//! Usage:
//!   cargo run -p paradise-simtest
//!   cargo run -p paradise-simtest -- --verbose --ticks 100000 --seed 7
//!   cargo run -p paradise-simtest -- --config scene.json

mod logging;

use std::path::PathBuf;

use clap::Parser;
use log::{error, info};
use paradise_core::prelude::*;
use paradise_core::systems::DialogueBook;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DT: f32 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Print every check, not just failures, and enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Ticks to run in the randomized session
    #[arg(long, default_value_t = 60 * 60 * 10)]
    ticks: usize,

    /// Seed for the scene and the random input
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// JSON config file; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);
    println!("=== Paradise Simulation Harness ===\n");

    let base = match &args.config {
        Some(path) => match SimConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!("could not load {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => SimConfig::default(),
    };
    let config = SimConfig {
        seed: Some(args.seed),
        ..base
    };
    info!("seed {}, {} random ticks", args.seed, args.ticks);

    let mut results = Vec::new();

    // 1. Configuration and dialogue data
    results.extend(validate_data(&config));

    // 2. Scripted scenarios
    results.extend(validate_scenarios(&config));

    // 3. Randomized session
    results.extend(validate_random_session(&config, args.seed, args.ticks));

    // 4. Snapshot round trip
    results.extend(validate_snapshot(&config));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn idle(engine: &mut ParadiseEngine, ticks: usize) {
    for _ in 0..ticks {
        engine.tick(DT, &FrameInput::default());
    }
}

fn run_until(
    engine: &mut ParadiseEngine,
    max_ticks: usize,
    mut done: impl FnMut(&ParadiseEngine) -> bool,
) -> bool {
    for _ in 0..max_ticks {
        if done(engine) {
            return true;
        }
        engine.tick(DT, &FrameInput::default());
    }
    done(engine)
}

fn ticks_for(seconds: f32) -> usize {
    (seconds / DT).ceil() as usize
}

// ── 1. Data ─────────────────────────────────────────────────────────────

fn validate_data(config: &SimConfig) -> Vec<TestResult> {
    println!("--- Configuration & Dialogue ---");
    let mut results = Vec::new();

    results.push(match config.validate() {
        Ok(()) => TestResult::new("config_valid", true, "config passes validation"),
        Err(e) => TestResult::new("config_valid", false, e.to_string()),
    });

    let a = &config.agents;
    results.push(TestResult::new(
        "speed_ordering",
        a.wander_speed < a.seat_walk_speed && a.seat_walk_speed < a.run_speed,
        format!(
            "wander {:.1} < seat walk {:.1} < run {:.1}",
            a.wander_speed, a.seat_walk_speed, a.run_speed
        ),
    ));

    // The built-in book must survive its own loader
    let book = DialogueBook::default();
    let reparsed = serde_json::to_string(&book)
        .map_err(|e| e.to_string())
        .and_then(|json| DialogueBook::from_json_str(&json).map_err(|e| e.to_string()));
    results.push(match reparsed {
        Ok(parsed) => TestResult::new(
            "dialogue_book_loads",
            parsed == book,
            "built-in lines round-trip through JSON",
        ),
        Err(e) => TestResult::new("dialogue_book_loads", false, e),
    });

    let mut rng = StdRng::seed_from_u64(0);
    let mut empty = Vec::new();
    for agent in AgentId::ALL {
        for topic in Topic::ALL {
            if book.respond(agent, topic.as_str(), false, &mut rng).is_empty() {
                empty.push(format!("{}/{}", agent, topic.as_str()));
            }
        }
    }
    results.push(TestResult::new(
        "dialogue_never_empty",
        empty.is_empty(),
        if empty.is_empty() {
            "every agent answers every topic".to_string()
        } else {
            format!("empty answers: {}", empty.join(", "))
        },
    ));

    results
}

// ── 2. Scenarios ────────────────────────────────────────────────────────

fn validate_scenarios(config: &SimConfig) -> Vec<TestResult> {
    println!("--- Scenarios ---");
    let mut results = Vec::new();

    // Summon overrides wandering
    let mut restless = config.clone();
    restless.agents.action_interval = Interval::new(0.05, 0.1);
    restless.agents.jump_chance = 0.0;
    let mut engine = ParadiseEngine::new(restless);
    let wandered = run_until(&mut engine, ticks_for(30.0), |e| {
        matches!(
            e.agent_state(AgentId::Bea),
            Some(BehaviorState::Wandering { .. })
        )
    });
    engine.push_command(Command::Summon);
    engine.tick(DT, &FrameInput::default());
    let state = engine.agent_state(AgentId::Bea);
    results.push(TestResult::new(
        "summon_overrides_wander",
        wandered && state == Some(BehaviorState::RunningToPlayer),
        format!("wandering seen: {}, state after summon: {:?}", wandered, state),
    ));

    // Switch cooldown
    let mut engine = ParadiseEngine::new(config.clone());
    let first = engine.switch_active_character();
    engine.tick(DT, &FrameInput::default());
    let immediate = engine.switch_active_character();
    idle(
        &mut engine,
        ticks_for(config.switch.settle_delay + config.switch.cooldown) + 2,
    );
    let later = engine.switch_active_character();
    results.push(TestResult::new(
        "switch_cooldown",
        first.is_ok() && immediate.is_err() && later.is_ok(),
        format!("first {:?}, next tick {:?}, after cooldown {:?}", first, immediate, later),
    ));

    // Seat release on switch
    let mut seated = config.clone();
    seated.agents.campfire_interval = Interval::new(0.1, 0.2);
    seated.agents.sit_duration = Interval::new(300.0, 400.0);
    seated.agents.action_interval = Interval::new(300.0, 400.0);
    let mut engine = ParadiseEngine::new(seated.clone());
    let sat = run_until(&mut engine, ticks_for(60.0), |e| {
        e.seats().is_seated(Occupant::Agent(AgentId::Bea))
    });
    let switched = engine.switch_active_character().is_ok();
    let homes_ok = [AgentId::Jb, AgentId::Bea].into_iter().all(|id| {
        engine
            .agent_view(id)
            .is_some_and(|v| v.position == seated.homes.get(id).position)
    });
    let freed = !engine.seats().is_occupied(SeatId::Bea);
    results.push(TestResult::new(
        "seat_release_on_switch",
        sat && switched && homes_ok && freed,
        format!("sat {}, switched {}, homes {}, seat freed {}", sat, switched, homes_ok, freed),
    ));

    // Campfire dialogue override
    let mut engine = ParadiseEngine::new(seated);
    let player_sat = engine.sit();
    let both = run_until(&mut engine, ticks_for(60.0), |e| {
        e.seats().is_seated(Occupant::Agent(AgentId::Bea))
    });
    idle(&mut engine, 1);
    let opened = engine.begin_dialogue();
    let campfire = engine.dialogue().lines(AgentId::Bea).campfire.clone();
    let leaked: Vec<Topic> = Topic::ALL
        .into_iter()
        .filter(|topic| {
            engine
                .say(topic.as_str())
                .map_or(true, |line| !campfire.contains(&line))
        })
        .collect();
    results.push(TestResult::new(
        "campfire_dialogue_override",
        player_sat && both && opened == Some(AgentId::Bea) && leaked.is_empty(),
        format!("dialogue with {:?}, non-campfire topics: {:?}", opened, leaked),
    ));

    results
}

// ── 3. Randomized session ───────────────────────────────────────────────

#[derive(Default)]
struct Violations {
    out_of_bounds: usize,
    autonomy: usize,
    double_seat: usize,
    stale_claim: usize,
    dog_seat: usize,
}

impl Violations {
    fn check(&mut self, engine: &ParadiseEngine) {
        let seats = engine.seats();
        let area = &engine.config().play_area;
        let views = engine.agent_views();

        if !area.contains(&engine.player().position)
            || views.iter().any(|v| !area.contains(&v.position))
        {
            self.out_of_bounds += 1;
        }

        let autonomous: Vec<AgentId> = views
            .iter()
            .filter(|v| v.id != AgentId::Choco && v.autonomous)
            .map(|v| v.id)
            .collect();
        if autonomous != [engine.autonomous_character().agent_id()] {
            self.autonomy += 1;
        }

        let occupants = [
            Occupant::Player,
            Occupant::Agent(AgentId::Jb),
            Occupant::Agent(AgentId::Bea),
            Occupant::Agent(AgentId::Choco),
        ];
        if occupants.iter().any(|o| {
            SeatId::ALL
                .iter()
                .filter(|s| seats.occupant(**s) == Some(*o))
                .count()
                > 1
        }) {
            self.double_seat += 1;
        }

        let stale = AgentId::ALL.into_iter().any(|id| {
            engine
                .agent_state(id)
                .and_then(|s| s.seat())
                .is_some_and(|seat| seats.occupant(seat) != Some(Occupant::Agent(id)))
        });
        if stale {
            self.stale_claim += 1;
        }

        if let Some(seat) = seats.seat_of(Occupant::Agent(AgentId::Choco)) {
            let autonomous = Occupant::Agent(engine.autonomous_character().agent_id());
            if seat != engine.active_character().seat()
                || !seats.is_seated(Occupant::Player)
                || !seats.is_seated(autonomous)
            {
                self.dog_seat += 1;
            }
        }
    }
}

fn random_input(rng: &mut StdRng) -> FrameInput {
    FrameInput {
        movement: MoveIntent {
            forward: rng.gen_bool(0.6),
            back: rng.gen_bool(0.1),
            left: rng.gen_bool(0.2),
            right: rng.gen_bool(0.2),
        },
        jump: rng.gen_bool(0.02),
        look_delta: (rng.gen_range(-40.0..40.0), rng.gen_range(-10.0..10.0)),
        actions: ActionEdges {
            summon: rng.gen_bool(0.002),
            jump_command: rng.gen_bool(0.005),
            sit_toggle: rng.gen_bool(0.01),
            interact: rng.gen_bool(0.01),
            switch_character: rng.gen_bool(0.002),
        },
    }
}

fn validate_random_session(config: &SimConfig, seed: u64, ticks: usize) -> Vec<TestResult> {
    println!("--- Randomized Session ({} ticks) ---", ticks);
    let mut results = Vec::new();

    let mut engine = ParadiseEngine::new(config.clone());
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let mut violations = Violations::default();
    let mut switches = 0usize;
    let mut seatings = 0usize;
    let mut dialogue_lines = 0usize;

    for _ in 0..ticks {
        let input = random_input(&mut rng);
        engine.tick(DT, &input);
        if engine.in_dialogue().is_some() && rng.gen_bool(0.05) {
            let topic = Topic::ALL[rng.gen_range(0..Topic::ALL.len())];
            if engine.say(topic.as_str()).is_some_and(|line| !line.is_empty()) {
                dialogue_lines += 1;
            }
        }
        for event in engine.drain_events() {
            match event {
                SimEvent::Switched { .. } => switches += 1,
                SimEvent::SatDown { .. } => seatings += 1,
                _ => {}
            }
        }
        violations.check(&engine);
    }

    info!(
        "{} switches, {} seatings, {} dialogue lines, final phase {:?}",
        switches,
        seatings,
        dialogue_lines,
        engine.switch_phase()
    );

    for (name, count, what) in [
        ("bounded_movement", violations.out_of_bounds, "ticks with an entity out of bounds"),
        ("one_autonomous", violations.autonomy, "ticks without exactly one autonomous character"),
        ("seat_exclusivity", violations.double_seat, "ticks with an occupant on two seats"),
        ("seat_claims_consistent", violations.stale_claim, "ticks with a state/board mismatch"),
        ("dog_shared_seat_rule", violations.dog_seat, "ticks with the dog seated out of turn"),
    ] {
        results.push(TestResult::new(
            name,
            count == 0,
            format!("{} {}", count, what),
        ));
    }

    results.push(TestResult::new(
        "session_exercised",
        switches > 0 || ticks < 60 * 60,
        format!("{} switches, {} seatings", switches, seatings),
    ));

    results
}

// ── 4. Snapshot ─────────────────────────────────────────────────────────

fn validate_snapshot(config: &SimConfig) -> Vec<TestResult> {
    println!("--- Snapshot ---");
    let mut results = Vec::new();

    let mut engine = ParadiseEngine::new(config.clone());
    engine.sit();
    idle(&mut engine, ticks_for(5.0));

    let mut buffer = Vec::new();
    if let Err(e) = engine.save(&mut buffer) {
        results.push(TestResult::new("snapshot_save", false, e.to_string()));
        return results;
    }
    results.push(TestResult::new(
        "snapshot_save",
        !buffer.is_empty(),
        format!("{} bytes", buffer.len()),
    ));

    let mut loaded = ParadiseEngine::default();
    match loaded.load(&buffer[..]) {
        Ok(()) => {
            let same = loaded.agent_views() == engine.agent_views()
                && loaded.player() == engine.player()
                && loaded.seats() == engine.seats();
            results.push(TestResult::new(
                "snapshot_restores_state",
                same,
                format!("restored at {:.2}s", loaded.elapsed()),
            ));
        }
        Err(e) => results.push(TestResult::new(
            "snapshot_restores_state",
            false,
            e.to_string(),
        )),
    }

    results
}
