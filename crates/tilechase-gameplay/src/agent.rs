//! Kinematic agents moving in pixel space over the tile grid.
//!
//! An agent owns its position, direction, speed, hitbox and life state, plus
//! the ordered list of behaviours that drive it each tick. Behaviours receive
//! the agent itself and may mutate any of its public fields.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tilechase_common::{AgentError, AgentId, Axis, Direction};
use tilechase_kernel::{resolve_axis, Aabb, AxisResolution, Grid, Hitbox};
use tracing::debug;

use crate::input::InputSource;
use crate::steering::Behaviour;

/// Role of an agent, selecting its steering behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentRole {
    /// Input-driven agent
    Player,
    /// Chases the player
    Predator,
    /// Flees the player when close, wanders otherwise
    Prey,
    /// Static pickup; no behaviour
    Item,
}

/// Life state of an agent. `Dead` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LifeState {
    /// Active in the simulation
    #[default]
    Alive,
    /// Removed from play; awaiting removal by the loop
    Dead,
}

/// Whether tile collision applies to an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionMode {
    /// Resolve each axis against solid tiles after it moves
    #[default]
    Enabled,
    /// Move freely through tiles
    Disabled,
}

/// Construction input for an agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSpec {
    /// Role of the new agent
    pub role: AgentRole,
    /// Top-left position in pixels
    pub position: Vec2,
    /// Pixels per tick, must be non-negative
    pub speed: f32,
    /// Collision rectangle relative to the position
    pub hitbox: Hitbox,
    /// Whether tile collision applies
    pub collision: CollisionMode,
    /// Flee radius in tiles, used by prey
    pub flee_range_tiles: f32,
}

/// Default prey flee radius in tiles.
pub const DEFAULT_FLEE_RANGE_TILES: f32 = 8.0;

impl AgentSpec {
    /// Creates a spec with collision enabled and the default flee range.
    #[must_use]
    pub fn new(role: AgentRole, position: Vec2, speed: f32, hitbox: Hitbox) -> Self {
        Self {
            role,
            position,
            speed,
            hitbox,
            collision: CollisionMode::Enabled,
            flee_range_tiles: DEFAULT_FLEE_RANGE_TILES,
        }
    }

    /// Sets the collision mode.
    #[must_use]
    pub const fn with_collision(mut self, collision: CollisionMode) -> Self {
        self.collision = collision;
        self
    }

    /// Sets the flee radius in tiles.
    #[must_use]
    pub const fn with_flee_range(mut self, tiles: f32) -> Self {
        self.flee_range_tiles = tiles;
        self
    }
}

/// Read-only snapshot of another agent, used as a steering target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    /// Id of the observed agent
    pub id: AgentId,
    /// Its top-left position
    pub position: Vec2,
    /// Its hitbox
    pub hitbox: Hitbox,
    /// Whether it is alive
    pub alive: bool,
}

impl Target {
    /// Center of the target's hitbox.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Aabb::from_hitbox(self.position, &self.hitbox).center()
    }
}

/// Everything a behaviour may read during one agent's update.
pub struct TickContext<'a> {
    /// Shared read-only grid
    pub grid: &'a Grid,
    /// Player input
    pub input: &'a mut dyn InputSource,
    /// Snapshot of the player at the time this agent updates
    pub target: Option<Target>,
}

impl TickContext<'_> {
    /// The target, if it exists and is alive.
    #[must_use]
    pub fn live_target(&self) -> Option<Target> {
        self.target.filter(|t| t.alive)
    }
}

/// A simulated agent.
#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    role: AgentRole,
    /// Top-left position in pixels
    pub position: Vec2,
    /// Current heading, each component in `{-1, 0, 1}`
    pub direction: Direction,
    speed: f32,
    hitbox: Hitbox,
    state: LifeState,
    collision: CollisionMode,
    behaviours: Vec<Behaviour>,
}

impl Agent {
    /// Creates an agent, rejecting negative or non-finite speeds.
    pub fn new(
        id: AgentId,
        spec: AgentSpec,
        behaviours: Vec<Behaviour>,
    ) -> Result<Self, AgentError> {
        validate_speed(spec.speed)?;
        Ok(Self {
            id,
            role: spec.role,
            position: spec.position,
            direction: Direction::ZERO,
            speed: spec.speed,
            hitbox: spec.hitbox,
            state: LifeState::Alive,
            collision: spec.collision,
            behaviours,
        })
    }

    /// Returns the agent's id.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Returns the agent's role.
    #[must_use]
    pub const fn role(&self) -> AgentRole {
        self.role
    }

    /// Pixels moved per tick on each active axis.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Changes the speed.
    pub fn set_speed(&mut self, speed: f32) -> Result<(), AgentError> {
        validate_speed(speed)?;
        self.speed = speed;
        Ok(())
    }

    /// Returns the hitbox.
    #[must_use]
    pub const fn hitbox(&self) -> &Hitbox {
        &self.hitbox
    }

    /// Returns the collision mode.
    #[must_use]
    pub const fn collision(&self) -> CollisionMode {
        self.collision
    }

    /// Returns the life state.
    #[must_use]
    pub const fn state(&self) -> LifeState {
        self.state
    }

    /// Returns true while the agent is alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state == LifeState::Alive
    }

    /// Marks the agent dead. Has no effect on an already dead agent.
    pub fn kill(&mut self) {
        if self.state == LifeState::Alive {
            debug!(id = %self.id, role = ?self.role, "agent killed");
            self.state = LifeState::Dead;
        }
    }

    /// World-space bounding box.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_hitbox(self.position, &self.hitbox)
    }

    /// Center of the hitbox in world space.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.aabb().center()
    }

    /// Snapshot of this agent for others to steer against.
    #[must_use]
    pub fn as_target(&self) -> Target {
        Target {
            id: self.id,
            position: self.position,
            hitbox: self.hitbox,
            alive: self.is_alive(),
        }
    }

    /// The attached behaviours, in execution order.
    #[must_use]
    pub fn behaviours(&self) -> &[Behaviour] {
        &self.behaviours
    }

    /// Runs every attached behaviour in order.
    pub fn update(&mut self, ctx: &mut TickContext<'_>) {
        let mut behaviours = std::mem::take(&mut self.behaviours);
        for behaviour in &mut behaviours {
            behaviour.run(self, ctx);
        }
        self.behaviours = behaviours;
    }

    /// Adds `delta` to the position on `axis`, then resolves that axis.
    pub fn step_axis(&mut self, axis: Axis, delta: f32, grid: &Grid) -> AxisResolution {
        *axis.of_mut(&mut self.position) += delta;
        self.resolve_axis(axis, grid)
    }

    /// Resolves tile collision on one axis, if collision is enabled.
    pub fn resolve_axis(&mut self, axis: Axis, grid: &Grid) -> AxisResolution {
        match self.collision {
            CollisionMode::Enabled => {
                resolve_axis(&mut self.position, &self.hitbox, self.direction, axis, grid)
            },
            CollisionMode::Disabled => AxisResolution::Unchanged,
        }
    }
}

fn validate_speed(speed: f32) -> Result<(), AgentError> {
    if speed.is_finite() && speed >= 0.0 {
        Ok(())
    } else {
        Err(AgentError::InvalidSpeed(speed))
    }
}
