//! Headless run loop.

use anyhow::{Context, Result};
use std::path::Path;
use tilechase_gameplay::{populate, AgentRole, GameState, ScriptedInput, Session, World};
use tilechase_kernel::{Camera, Grid, GridMapData};
use tracing::info;

use crate::config::EngineConfig;
use crate::timing::TickClock;

/// Ticks per leg of the scripted player patrol.
const PATROL_LEG: u32 = 48;

/// Final state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Seed the world was built with
    pub seed: u64,
    /// Ticks actually simulated
    pub ticks: u64,
    /// Session state at exit
    pub state: GameState,
    /// Prey still alive
    pub prey_left: usize,
    /// Predators still alive
    pub predators_left: usize,
}

/// Builds the grid from the configured map file, or the walled arena.
pub fn load_grid(config: &EngineConfig) -> Result<Grid> {
    let map = match &config.map_path {
        Some(path) => read_map(path)?,
        None => {
            let (width, height) = config.arena_tiles;
            info!(width, height, "Using built-in arena");
            GridMapData::walled(width, height, config.tile_size)
        },
    };
    Grid::new(map).context("Invalid grid map")
}

fn read_map(path: &Path) -> Result<GridMapData> {
    GridMapData::load(path).with_context(|| format!("Failed to load map file {}", path.display()))
}

/// Builds a populated session in the running state.
pub fn build_session(config: &EngineConfig, seed: u64) -> Result<Session> {
    let grid = load_grid(config)?;
    let camera = Camera::for_grid(&grid, config.viewport_tiles);

    let mut world = World::new(grid, seed);
    let report = populate(&mut world, &config.spawn).context("Failed to populate world")?;
    info!(
        prey = report.prey,
        predators = report.predators,
        skipped = report.skipped,
        "Agents spawned"
    );

    let mut session = Session::new(world, camera);
    session.start();
    Ok(session)
}

/// Runs the configured number of ticks, or until the session ends.
pub fn run_session(config: &EngineConfig, session: &mut Session) -> u64 {
    let mut input = ScriptedInput::patrol(PATROL_LEG);
    let mut clock = TickClock::new(config.target_tps);
    let log_every = config.log_every.max(1);
    let mut ran = 0;

    while ran < config.ticks {
        let state = session.tick(&mut input);
        let removed = session.world_mut().remove_dead();
        ran += 1;

        if ran % log_every == 0 || removed > 0 {
            log_progress(session, ran, clock.current_tps());
        }
        if state.is_finished() {
            break;
        }

        if config.throttle {
            clock.wait();
        } else {
            clock.lap();
        }
    }
    ran
}

fn log_progress(session: &Session, tick: u64, tps: f32) {
    let world = session.world();
    let player = world.player().map(|p| p.position);
    info!(
        tick,
        state = ?session.state(),
        prey = world.count_alive(AgentRole::Prey),
        predators = world.count_alive(AgentRole::Predator),
        ?player,
        camera = ?session.camera().position(),
        tps,
        "Progress"
    );
}

/// Runs the application with `config`.
pub fn run(config: &EngineConfig) -> Result<RunSummary> {
    let mut config = config.clone();
    config.validate();
    let config = &config;
    let seed = config.resolve_seed();
    info!("Configuration loaded:");
    info!("  Seed: {seed}");
    info!("  Ticks: {} at {} tps (throttle: {})", config.ticks, config.target_tps, config.throttle);
    info!("  Viewport: {}x{} tiles", config.viewport_tiles.0, config.viewport_tiles.1);

    let mut session = build_session(config, seed)?;
    let ticks = run_session(config, &mut session);

    let world = session.world();
    let summary = RunSummary {
        seed,
        ticks,
        state: session.state(),
        prey_left: world.count_alive(AgentRole::Prey),
        predators_left: world.count_alive(AgentRole::Predator),
    };
    info!(
        ticks = summary.ticks,
        state = ?summary.state,
        prey_left = summary.prey_left,
        "Run finished"
    );
    Ok(summary)
}
