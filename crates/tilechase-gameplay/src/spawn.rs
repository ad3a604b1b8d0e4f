//! Initial agent placement.
//!
//! The player starts at the tile-aligned world center. Prey and predators
//! go on shuffled passable tiles that no agent already touches and that are
//! far enough from the player.

use ahash::AHashSet;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tilechase_common::{AgentError, AgentId, TileCoord};
use tilechase_kernel::{Grid, Hitbox};
use tracing::{info, warn};

use crate::agent::{Agent, AgentRole, AgentSpec, DEFAULT_FLEE_RANGE_TILES};
use crate::world::World;

/// Fast and slow speed variants, pixels per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedPair {
    /// Fast variant
    pub fast: f32,
    /// Slow variant
    pub slow: f32,
}

/// Fast and slow head counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountPair {
    /// Fast variant
    pub fast: u32,
    /// Slow variant
    pub slow: u32,
}

/// Population settings for a new world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// Player speed
    pub player_speed: f32,
    /// Prey flee radius in tiles
    pub flee_range_tiles: f32,
    /// Minimum distance in tiles between the player and any spawn
    pub exclusion_tiles: f32,
    /// Player hitbox as `[x, y, width, height]`
    pub player_hitbox: [f32; 4],
    /// Prey and predator hitbox as `[x, y, width, height]`
    pub npc_hitbox: [f32; 4],
    /// Prey speeds
    pub prey_speed: SpeedPair,
    /// Predator speeds
    pub predator_speed: SpeedPair,
    /// Prey to place
    pub prey_count: CountPair,
    /// Predators to place
    pub predator_count: CountPair,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            player_speed: 8.0,
            flee_range_tiles: DEFAULT_FLEE_RANGE_TILES,
            exclusion_tiles: 8.0,
            player_hitbox: [32.0, 32.0, 63.0, 63.0],
            npc_hitbox: [32.0, 32.0, 64.0, 64.0],
            prey_speed: SpeedPair { fast: 7.0, slow: 5.0 },
            predator_speed: SpeedPair { fast: 6.0, slow: 4.0 },
            prey_count: CountPair { fast: 6, slow: 6 },
            predator_count: CountPair { fast: 1, slow: 1 },
        }
    }
}

/// What [`populate`] managed to place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulationReport {
    /// The player, if one was spawned
    pub player: Option<AgentId>,
    /// Prey placed
    pub prey: usize,
    /// Predators placed
    pub predators: usize,
    /// Agents that found no free tile
    pub skipped: usize,
}

/// Every tile touched by the hitbox of any agent in `agents`.
#[must_use]
pub fn occupied_tiles(agents: &[Agent], tile_px: f32) -> AHashSet<TileCoord> {
    let mut occupied = AHashSet::new();
    for agent in agents {
        let (first, last) = agent.aabb().tile_span(tile_px);
        for gy in first.y..=last.y {
            for gx in first.x..=last.x {
                occupied.insert(TileCoord::new(gx, gy));
            }
        }
    }
    occupied
}

/// Passable, unoccupied tiles whose center is at least `min_distance` pixels
/// from `player_center`, in shuffled order.
pub fn valid_spawn_tiles(
    grid: &Grid,
    occupied: &AHashSet<TileCoord>,
    player_center: Option<Vec2>,
    min_distance: f32,
    rng: &mut fastrand::Rng,
) -> Vec<TileCoord> {
    let tile = grid.tile_size() as f32;
    let mut tiles: Vec<TileCoord> = grid
        .passable_tiles()
        .filter(|t| !occupied.contains(t))
        .filter(|t| {
            player_center.map_or(true, |center| t.center(tile).distance(center) >= min_distance)
        })
        .collect();
    rng.shuffle(&mut tiles);
    tiles
}

/// Spawns the player at the world center, then the prey and predators.
///
/// Stops placing once valid tiles run out; the shortfall is reported in
/// [`PopulationReport::skipped`].
pub fn populate(
    world: &mut World,
    settings: &SpawnSettings,
) -> Result<PopulationReport, AgentError> {
    let player_hitbox = Hitbox::try_from(settings.player_hitbox)?;
    let npc_hitbox = Hitbox::try_from(settings.npc_hitbox)?;

    let mut report = PopulationReport::default();
    let player_spec = AgentSpec::new(
        AgentRole::Player,
        world.center(),
        settings.player_speed,
        player_hitbox,
    );
    report.player = Some(world.spawn(player_spec)?);

    let tile = world.grid().tile_size() as f32;
    let occupied = occupied_tiles(world.agents(), tile);
    let player_center = world.player().map(Agent::center);
    let min_distance = settings.exclusion_tiles * tile;
    let mut rng = world.rng_mut().fork();
    let mut free =
        valid_spawn_tiles(world.grid(), &occupied, player_center, min_distance, &mut rng)
            .into_iter();

    let queue = [
        (AgentRole::Prey, settings.prey_speed.fast, settings.prey_count.fast),
        (AgentRole::Prey, settings.prey_speed.slow, settings.prey_count.slow),
        (AgentRole::Predator, settings.predator_speed.fast, settings.predator_count.fast),
        (AgentRole::Predator, settings.predator_speed.slow, settings.predator_count.slow),
    ];
    for (role, speed, count) in queue {
        for _ in 0..count {
            let Some(tile_coord) = free.next() else {
                report.skipped += 1;
                continue;
            };
            let spec = AgentSpec::new(role, tile_coord.to_pixel(tile), speed, npc_hitbox)
                .with_flee_range(settings.flee_range_tiles);
            world.spawn(spec)?;
            match role {
                AgentRole::Predator => report.predators += 1,
                _ => report.prey += 1,
            }
        }
    }

    if report.skipped > 0 {
        warn!(skipped = report.skipped, "Ran out of spawn tiles");
    }
    info!(
        prey = report.prey,
        predators = report.predators,
        "World populated"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilechase_kernel::GridMapData;

    fn open_grid(width: u32, height: u32) -> Grid {
        Grid::new(GridMapData {
            width,
            height,
            tile_size: 128,
            data: vec![0; (width * height) as usize],
        })
        .expect("valid grid")
    }

    #[test]
    fn test_default_settings() {
        let s = SpawnSettings::default();
        assert_eq!(s.player_speed, 8.0);
        assert_eq!(s.prey_speed, SpeedPair { fast: 7.0, slow: 5.0 });
        assert_eq!(s.predator_count, CountPair { fast: 1, slow: 1 });
        assert_eq!(s.player_hitbox, [32.0, 32.0, 63.0, 63.0]);
        assert!(Hitbox::try_from(s.npc_hitbox).is_ok());
    }

    #[test]
    fn test_occupied_tiles_covers_straddling_hitbox() {
        let mut world = World::new(open_grid(5, 5), 1);
        let hitbox = Hitbox::new(32.0, 32.0, 64.0, 64.0).expect("valid hitbox");
        world
            .spawn(AgentSpec::new(AgentRole::Prey, Vec2::new(64.0, 0.0), 1.0, hitbox))
            .expect("spawn");
        // Box spans x 96..160, y 32..96.
        let occupied = occupied_tiles(world.agents(), 128.0);
        assert_eq!(occupied.len(), 2);
        assert!(occupied.contains(&TileCoord::new(0, 0)));
        assert!(occupied.contains(&TileCoord::new(1, 0)));
    }

    #[test]
    fn test_valid_tiles_respect_walls_occupancy_and_distance() {
        let grid = Grid::new(GridMapData::walled(6, 6, 128)).expect("valid grid");
        let mut occupied = AHashSet::new();
        occupied.insert(TileCoord::new(4, 4));
        let center = Vec2::new(192.0, 192.0); // center of tile (1, 1)
        let mut rng = fastrand::Rng::with_seed(3);

        let tiles = valid_spawn_tiles(&grid, &occupied, Some(center), 256.0, &mut rng);
        for t in &tiles {
            assert!(grid.is_walkable(t.x, t.y));
            assert_ne!(*t, TileCoord::new(4, 4));
            assert!(t.center(128.0).distance(center) >= 256.0);
        }
        // Inner 4x4 minus the occupied tile minus tiles closer than 2 tiles.
        assert!(tiles.contains(&TileCoord::new(3, 1)));
        assert!(!tiles.contains(&TileCoord::new(2, 2)));
        assert_eq!(tiles.len(), 11);
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let grid = open_grid(8, 8);
        let occupied = AHashSet::new();
        let a = valid_spawn_tiles(&grid, &occupied, None, 0.0, &mut fastrand::Rng::with_seed(9));
        let b = valid_spawn_tiles(&grid, &occupied, None, 0.0, &mut fastrand::Rng::with_seed(9));
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_populate_places_everyone_on_free_tiles() {
        let mut world = World::new(open_grid(40, 30), 11);
        let report = populate(&mut world, &SpawnSettings::default()).expect("populate");

        assert_eq!(report.prey, 12);
        assert_eq!(report.predators, 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(world.agents().len(), 15);

        let player = world.player().expect("player");
        assert_eq!(player.position, Vec2::new(2560.0, 1920.0));
        for agent in world.agents().iter().filter(|a| a.role() != AgentRole::Player) {
            assert!(agent.center().distance(player.center()) >= 8.0 * 128.0 - 1.0);
        }
        let occupied = occupied_tiles(world.agents(), 128.0);
        // Every agent sits inside its own tile.
        assert_eq!(occupied.len(), 15);
    }

    #[test]
    fn test_populate_stops_quietly_when_out_of_tiles() {
        let mut world = World::new(open_grid(3, 3), 5);
        let settings = SpawnSettings {
            exclusion_tiles: 0.0,
            ..SpawnSettings::default()
        };
        let report = populate(&mut world, &settings).expect("populate");
        // The player holds the middle tile, leaving 8 of the 14 requested.
        assert_eq!(report.prey, 8);
        assert_eq!(report.predators, 0);
        assert_eq!(report.skipped, 6);
        assert_eq!(world.agents().len(), 9);
    }

    #[test]
    fn test_populate_rejects_degenerate_hitbox() {
        let mut world = World::new(open_grid(4, 4), 5);
        let settings = SpawnSettings {
            npc_hitbox: [0.0, 0.0, 0.0, 64.0],
            ..SpawnSettings::default()
        };
        assert!(matches!(
            populate(&mut world, &settings),
            Err(AgentError::DegenerateHitbox { .. })
        ));
        assert!(world.agents().is_empty());
    }
}
