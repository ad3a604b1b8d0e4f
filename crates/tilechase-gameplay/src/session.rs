//! Top-level game state dispatch.

use serde::{Deserialize, Serialize};
use tilechase_kernel::Camera;
use tracing::info;

use crate::agent::AgentRole;
use crate::input::InputSource;
use crate::world::World;

/// Phase of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameState {
    /// Waiting to start
    #[default]
    Title,
    /// Simulation advancing
    Running,
    /// The player was caught
    Lost,
    /// Every prey was eaten
    Won,
}

impl GameState {
    /// Check if the session has ended.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Lost | Self::Won)
    }
}

/// A world, its camera and the state machine driving them.
#[derive(Debug)]
pub struct Session {
    world: World,
    camera: Camera,
    state: GameState,
    started_with_prey: bool,
}

impl Session {
    /// Creates a session in [`GameState::Title`].
    #[must_use]
    pub fn new(world: World, camera: Camera) -> Self {
        let started_with_prey = world.count_alive(AgentRole::Prey) > 0;
        let mut session = Self {
            world,
            camera,
            state: GameState::Title,
            started_with_prey,
        };
        session.follow_player();
        session
    }

    /// Moves from the title to the running state.
    pub fn start(&mut self) {
        if self.state == GameState::Title {
            self.transition(GameState::Running);
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// The world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// The world, for mutation between ticks.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The camera.
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Advances one tick. Only the running state moves the world.
    pub fn tick(&mut self, input: &mut dyn InputSource) -> GameState {
        if self.state != GameState::Running {
            return self.state;
        }

        self.world.tick(input);
        self.world.resolve_contacts();
        self.follow_player();

        let player_alive = self.world.player().is_some_and(|p| p.is_alive());
        if !player_alive {
            self.transition(GameState::Lost);
        } else if self.started_with_prey && self.world.count_alive(AgentRole::Prey) == 0 {
            self.transition(GameState::Won);
        }
        self.state
    }

    fn follow_player(&mut self) {
        if let Some(player) = self.world.player() {
            self.camera.follow(player.position);
        }
    }

    fn transition(&mut self, next: GameState) {
        info!(from = ?self.state, to = ?next, tick = self.world.tick_count(), "Game state changed");
        self.state = next;
    }
}
