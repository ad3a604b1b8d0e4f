//! The simulation world: grid, agents and the per-tick update.
//!
//! One tick updates every agent strictly in order. Each agent sees a snapshot
//! of the player taken right before its own update, so agents after the
//! player observe the player's new position. Dead agents stay in the list
//! until the loop calls [`World::remove_dead`].

use glam::Vec2;
use tilechase_common::{AgentError, AgentId};
use tilechase_kernel::Grid;
use tracing::{debug, info};

use crate::agent::{Agent, AgentRole, AgentSpec, Target, TickContext};
use crate::input::InputSource;
use crate::steering::{Behaviour, SteeringState};

/// Grid plus the agents living on it.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    agents: Vec<Agent>,
    rng: fastrand::Rng,
    next_id: AgentId,
    tick: u64,
}

impl World {
    /// Creates an empty world. `seed` drives every random choice made by
    /// agents spawned into it.
    #[must_use]
    pub fn new(grid: Grid, seed: u64) -> Self {
        info!(
            width = grid.width(),
            height = grid.height(),
            seed,
            "World created"
        );
        Self {
            grid,
            agents: Vec::new(),
            rng: fastrand::Rng::with_seed(seed),
            next_id: AgentId::from_raw(0),
            tick: 0,
        }
    }

    /// Spawns an agent with the default behaviour for its role.
    pub fn spawn(&mut self, spec: AgentSpec) -> Result<AgentId, AgentError> {
        let behaviours = match spec.role {
            AgentRole::Player => vec![Behaviour::PlayerControl],
            AgentRole::Predator => vec![Behaviour::Chase(SteeringState::new(self.rng.fork()))],
            AgentRole::Prey => vec![Behaviour::Flee {
                state: SteeringState::new(self.rng.fork()),
                range_tiles: spec.flee_range_tiles,
            }],
            AgentRole::Item => Vec::new(),
        };
        self.spawn_with(spec, behaviours)
    }

    /// Spawns an agent running exactly `behaviours`.
    pub fn spawn_with(
        &mut self,
        spec: AgentSpec,
        behaviours: Vec<Behaviour>,
    ) -> Result<AgentId, AgentError> {
        let id = self.next_id;
        let agent = Agent::new(id, spec, behaviours)?;
        debug!(%id, role = ?spec.role, x = spec.position.x, y = spec.position.y, "agent spawned");
        self.agents.push(agent);
        self.next_id = id.next();
        Ok(id)
    }

    /// The grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// All agents, in update order.
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Looks up an agent by id.
    #[must_use]
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id() == id)
    }

    /// Looks up an agent by id for mutation.
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id() == id)
    }

    /// The first player agent, alive or dead.
    #[must_use]
    pub fn player(&self) -> Option<&Agent> {
        self.agents.iter().find(|a| a.role() == AgentRole::Player)
    }

    /// Snapshot of the player for steering.
    #[must_use]
    pub fn player_target(&self) -> Option<Target> {
        self.player().map(Agent::as_target)
    }

    /// Number of live agents with `role`.
    #[must_use]
    pub fn count_alive(&self, role: AgentRole) -> usize {
        self.agents
            .iter()
            .filter(|a| a.role() == role && a.is_alive())
            .count()
    }

    /// The world random source, for placement decisions.
    pub fn rng_mut(&mut self) -> &mut fastrand::Rng {
        &mut self.rng
    }

    /// Ticks run so far.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Runs one tick over every agent.
    pub fn tick(&mut self, input: &mut dyn InputSource) {
        for index in 0..self.agents.len() {
            let target = self.player_target();
            let mut ctx = TickContext {
                grid: &self.grid,
                input: &mut *input,
                target,
            };
            self.agents[index].update(&mut ctx);
        }
        self.tick += 1;
    }

    /// Applies agent contacts: a predator touching the player kills it, and
    /// the player touching prey kills the prey. Returns the ids killed.
    pub fn resolve_contacts(&mut self) -> Vec<AgentId> {
        let Some(player) = self.player().filter(|p| p.is_alive()) else {
            return Vec::new();
        };
        let player_id = player.id();
        let player_box = player.aabb();

        let mut killed = Vec::new();
        let mut caught = false;
        for agent in self.agents.iter_mut().filter(|a| a.is_alive()) {
            if !agent.aabb().overlaps(&player_box) {
                continue;
            }
            match agent.role() {
                AgentRole::Predator => caught = true,
                AgentRole::Prey => {
                    agent.kill();
                    killed.push(agent.id());
                },
                AgentRole::Player | AgentRole::Item => {},
            }
        }

        if caught {
            if let Some(player) = self.agent_mut(player_id) {
                player.kill();
            }
            info!(id = %player_id, tick = self.tick, "Player caught");
            killed.push(player_id);
        }
        killed
    }

    /// Drops dead agents. Returns how many were removed.
    pub fn remove_dead(&mut self) -> usize {
        let before = self.agents.len();
        self.agents.retain(Agent::is_alive);
        before - self.agents.len()
    }

    /// Pixel position of the tile-aligned world center, for the player spawn.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        let tile = self.grid.tile_size() as f32;
        let tiles = Vec2::new(
            (self.grid.width() / 2) as f32,
            (self.grid.height() / 2) as f32,
        );
        tiles * tile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::NoInput;
    use tilechase_common::Direction;
    use tilechase_kernel::{GridMapData, Hitbox};

    fn open_world() -> World {
        let grid = Grid::new(GridMapData {
            width: 10,
            height: 10,
            tile_size: 128,
            data: vec![0; 100],
        })
        .expect("valid grid");
        World::new(grid, 42)
    }

    fn hitbox() -> Hitbox {
        Hitbox::new(32.0, 32.0, 64.0, 64.0).expect("valid hitbox")
    }

    fn spec(role: AgentRole, x: f32, y: f32, speed: f32) -> AgentSpec {
        AgentSpec::new(role, Vec2::new(x, y), speed, hitbox())
    }

    #[test]
    fn test_spawn_assigns_sequential_ids_and_behaviours() {
        let mut world = open_world();
        let player = world.spawn(spec(AgentRole::Player, 0.0, 0.0, 8.0)).expect("spawn");
        let prey = world.spawn(spec(AgentRole::Prey, 512.0, 0.0, 5.0)).expect("spawn");
        let item = world.spawn(spec(AgentRole::Item, 256.0, 0.0, 0.0)).expect("spawn");

        assert_eq!(player.raw(), 0);
        assert_eq!(prey.raw(), 1);
        assert_eq!(item.raw(), 2);
        assert!(matches!(
            world.agent(prey).expect("prey").behaviours(),
            [Behaviour::Flee { range_tiles, .. }] if *range_tiles == 8.0
        ));
        assert!(world.agent(item).expect("item").behaviours().is_empty());
        assert_eq!(world.player().map(Agent::id), Some(player));
    }

    #[test]
    fn test_spawn_rejects_invalid_spec() {
        let mut world = open_world();
        assert!(world.spawn(spec(AgentRole::Prey, 0.0, 0.0, -3.0)).is_err());
        assert!(world.agents().is_empty());
    }

    #[test]
    fn test_tick_moves_player_and_counts() {
        let mut world = open_world();
        let id = world.spawn(spec(AgentRole::Player, 300.0, 300.0, 8.0)).expect("spawn");
        let mut input = || Direction::new(1, 1);
        world.tick(&mut input);
        world.tick(&mut input);
        assert_eq!(world.agent(id).expect("player").position, Vec2::new(316.0, 316.0));
        assert_eq!(world.tick_count(), 2);
    }

    #[test]
    fn test_later_agents_see_updated_player() {
        let mut world = open_world();
        world.spawn(spec(AgentRole::Player, 400.0, 400.0, 8.0)).expect("spawn");
        // Predator centered 5 px left of the player's starting center.
        let predator = world
            .spawn_with(
                spec(AgentRole::Predator, 395.0, 400.0, 8.0),
                vec![Behaviour::Chase(SteeringState::with_seed(1))],
            )
            .expect("spawn");
        world.agent_mut(predator).expect("predator").direction = Direction::new(1, 0);

        // The player moves right first, so the predator's step no longer
        // reaches it and is applied in full.
        let mut input = || Direction::new(1, 0);
        world.tick(&mut input);
        assert_eq!(world.agent(predator).expect("predator").position.x, 403.0);
    }

    #[test]
    fn test_predator_contact_kills_player() {
        let mut world = open_world();
        let player = world.spawn(spec(AgentRole::Player, 400.0, 400.0, 8.0)).expect("spawn");
        world.spawn(spec(AgentRole::Predator, 450.0, 400.0, 4.0)).expect("spawn");

        let killed = world.resolve_contacts();
        assert_eq!(killed, vec![player]);
        assert!(!world.player().expect("player").is_alive());

        // Dead player: nothing further happens.
        assert!(world.resolve_contacts().is_empty());
    }

    #[test]
    fn test_player_eats_touching_prey_only() {
        let mut world = open_world();
        world.spawn(spec(AgentRole::Player, 400.0, 400.0, 8.0)).expect("spawn");
        let near = world.spawn(spec(AgentRole::Prey, 460.0, 400.0, 5.0)).expect("spawn");
        // Touching edges only.
        world.spawn(spec(AgentRole::Prey, 464.0, 400.0, 5.0)).expect("spawn");

        assert_eq!(world.resolve_contacts(), vec![near]);
        assert_eq!(world.count_alive(AgentRole::Prey), 1);
        assert!(world.player().expect("player").is_alive());
    }

    #[test]
    fn test_remove_dead_is_deferred() {
        let mut world = open_world();
        world.spawn(spec(AgentRole::Player, 400.0, 400.0, 8.0)).expect("spawn");
        let prey = world.spawn(spec(AgentRole::Prey, 420.0, 400.0, 5.0)).expect("spawn");

        world.resolve_contacts();
        assert!(world.agent(prey).is_some());
        assert_eq!(world.remove_dead(), 1);
        assert!(world.agent(prey).is_none());
        assert_eq!(world.remove_dead(), 0);
    }

    #[test]
    fn test_ai_without_player_wanders_deterministically() {
        let run = || {
            let mut world = open_world();
            for i in 0..4 {
                world
                    .spawn(spec(AgentRole::Predator, 200.0 * i as f32, 300.0, 4.0))
                    .expect("spawn");
            }
            for _ in 0..64 {
                world.tick(&mut NoInput);
            }
            world.agents().iter().map(|a| a.position).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_center_is_tile_aligned() {
        let world = open_world();
        assert_eq!(world.center(), Vec2::new(640.0, 640.0));
    }
}
