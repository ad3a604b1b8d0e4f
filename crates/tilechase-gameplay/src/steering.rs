//! Per-role steering behaviours.
//!
//! Every behaviour follows the same movement discipline: decide the
//! direction, move along X, resolve X, move along Y, resolve Y.
//!
//! - Player: direction read from input every tick.
//! - Predator: re-aims at the player every [`DIRECTION_INTERVAL`] ticks and
//!   snaps onto the player's coordinate instead of stepping past it.
//! - Prey: every [`DIRECTION_INTERVAL`] ticks flees the player when within
//!   range, otherwise wanders.
//!
//! Predators and prey without a live player wander: each axis independently
//! picks -1, 0 or 1 from the agent's own seeded generator.

use glam::Vec2;
use tilechase_common::{Axis, Direction};
use tracing::debug;

use crate::agent::{Agent, Target, TickContext};

/// Ticks between direction re-evaluations for AI agents.
pub const DIRECTION_INTERVAL: u32 = 16;

/// Re-evaluation timer and random source owned by one AI agent.
#[derive(Debug, Clone)]
pub struct SteeringState {
    ticks: u32,
    rng: fastrand::Rng,
}

impl SteeringState {
    /// Creates a state drawing wander directions from `rng`.
    #[must_use]
    pub fn new(rng: fastrand::Rng) -> Self {
        Self { ticks: 0, rng }
    }

    /// Creates a state with a generator seeded from `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::new(fastrand::Rng::with_seed(seed))
    }

    /// Ticks counted since the last re-evaluation.
    #[must_use]
    pub const fn ticks_since_evaluation(&self) -> u32 {
        self.ticks
    }

    /// Counts one tick; returns true when the direction is due for
    /// re-evaluation, resetting the counter.
    pub fn advance(&mut self) -> bool {
        self.ticks += 1;
        if self.ticks >= DIRECTION_INTERVAL {
            self.ticks = 0;
            true
        } else {
            false
        }
    }

    /// Uniformly random direction, each axis drawn independently.
    pub fn wander(&mut self) -> Direction {
        Direction::new(self.rng.i8(-1..=1), self.rng.i8(-1..=1))
    }
}

/// A behaviour attached to an agent.
#[derive(Debug, Clone)]
pub enum Behaviour {
    /// Input-driven movement
    PlayerControl,
    /// Pursue the player with the overshoot guard
    Chase(SteeringState),
    /// Flee the player within `range_tiles`, wander otherwise
    Flee {
        /// Timer and random source
        state: SteeringState,
        /// Flee radius in tiles
        range_tiles: f32,
    },
}

impl Behaviour {
    /// Runs one tick of this behaviour on `agent`.
    pub fn run(&mut self, agent: &mut Agent, ctx: &mut TickContext<'_>) {
        match self {
            Self::PlayerControl => player_control(agent, ctx),
            Self::Chase(state) => chase(agent, state, ctx),
            Self::Flee { state, range_tiles } => {
                let range_px = *range_tiles * ctx.grid.tile_size() as f32;
                flee(agent, state, range_px, ctx);
            },
        }
    }

    /// The AI state, for behaviours that have one.
    #[must_use]
    pub fn steering_state(&self) -> Option<&SteeringState> {
        match self {
            Self::PlayerControl => None,
            Self::Chase(state) | Self::Flee { state, .. } => Some(state),
        }
    }
}

/// Player tick: sample input, then move and resolve each axis.
///
/// A dead player ignores input and stops.
pub fn player_control(agent: &mut Agent, ctx: &mut TickContext<'_>) {
    if !agent.is_alive() {
        agent.direction = Direction::ZERO;
        return;
    }

    agent.direction = ctx.input.direction();
    let step = agent.direction.as_vec2() * agent.speed();
    for axis in Axis::ALL {
        agent.step_axis(axis, axis.of(step), ctx.grid);
    }
}

/// Predator tick.
pub fn chase(agent: &mut Agent, state: &mut SteeringState, ctx: &mut TickContext<'_>) {
    if !agent.is_alive() {
        return;
    }

    let target = ctx.live_target();
    if state.advance() {
        agent.direction = match target {
            Some(t) => Direction::from_signs(t.center() - agent.center()),
            None => state.wander(),
        };
        debug!(
            id = %agent.id(),
            direction = ?agent.direction,
            chasing = target.is_some(),
            "predator re-aimed"
        );
    }

    let step = agent.direction.as_vec2() * agent.speed();
    for axis in Axis::ALL {
        let delta = axis.of(step);
        match target {
            Some(t) if overshoots(agent, &t, axis, delta) => {
                *axis.of_mut(&mut agent.position) = axis.of(t.position);
                agent.direction.set(axis, 0);
                agent.resolve_axis(axis, ctx.grid);
            },
            _ => {
                agent.step_axis(axis, delta, ctx.grid);
            },
        }
    }
}

/// Prey tick.
pub fn flee(
    agent: &mut Agent,
    state: &mut SteeringState,
    range_px: f32,
    ctx: &mut TickContext<'_>,
) {
    if !agent.is_alive() {
        return;
    }

    if state.advance() {
        let away = ctx
            .live_target()
            .map(|t| agent.center() - t.center())
            .filter(|away| in_flee_range(*away, range_px));
        agent.direction = match away {
            Some(away) => Direction::from_signs(away),
            None => state.wander(),
        };
        debug!(
            id = %agent.id(),
            direction = ?agent.direction,
            fleeing = away.is_some(),
            "prey re-aimed"
        );
    }

    let step = agent.direction.as_vec2() * agent.speed();
    for axis in Axis::ALL {
        agent.step_axis(axis, axis.of(step), ctx.grid);
    }
}

fn in_flee_range(offset: Vec2, range_px: f32) -> bool {
    let distance = offset.length();
    distance > 0.0 && distance <= range_px
}

/// Returns true if stepping `delta` along `axis` would carry the agent's
/// center onto or past the target's center.
#[must_use]
pub fn overshoots(agent: &Agent, target: &Target, axis: Axis, delta: f32) -> bool {
    let from = axis.of(agent.center());
    let goal = axis.of(target.center());
    match agent.direction.get(axis) {
        1 => from < goal && from + delta >= goal,
        -1 => from > goal && from + delta <= goal,
        _ => false,
    }
}
