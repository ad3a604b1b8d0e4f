//! Engine configuration.
//!
//! Run length, tick rate, map source and world population settings.
//! Configuration can be loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tilechase_gameplay::SpawnSettings;
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "tilechase.toml";

/// Largest arena edge in tiles.
pub const MAX_ARENA_TILES: u32 = 4096;

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Run Settings ===
    /// Seed for every random choice (None = random)
    pub seed: Option<u64>,
    /// Ticks to simulate before exiting
    pub ticks: u64,
    /// Target ticks per second when throttled
    pub target_tps: u32,
    /// Sleep between ticks to hold `target_tps`
    pub throttle: bool,
    /// Emit a progress summary every this many ticks
    pub log_every: u64,

    // === World Settings ===
    /// Grid map JSON file (None = built-in walled arena)
    pub map_path: Option<PathBuf>,
    /// Arena size in tiles when no map file is given
    pub arena_tiles: (u32, u32),
    /// Tile edge in pixels for the arena
    pub tile_size: u32,
    /// Camera viewport in tiles
    pub viewport_tiles: (u32, u32),

    // === Population ===
    /// Initial agents
    pub spawn: SpawnSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Run
            seed: None,
            ticks: 3600,
            target_tps: 60,
            throttle: false,
            log_every: 600,

            // World
            map_path: None,
            arena_tiles: (40, 30),
            tile_size: 128,
            viewport_tiles: (10, 6),

            // Population
            spawn: SpawnSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str::<Self>(&contents) {
                    Ok(mut config) => {
                        info!("Loaded config from {}", path.display());
                        config.validate();
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Default configuration file path, relative to the working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE)
    }

    /// Clamp values to usable ranges.
    pub fn validate(&mut self) {
        self.ticks = self.ticks.max(1);
        self.target_tps = self.target_tps.clamp(1, 1000);
        self.log_every = self.log_every.max(1);

        self.arena_tiles.0 = self.arena_tiles.0.clamp(3, MAX_ARENA_TILES);
        self.arena_tiles.1 = self.arena_tiles.1.clamp(3, MAX_ARENA_TILES);
        self.tile_size = self.tile_size.clamp(8, 1024);
        self.viewport_tiles.0 = self.viewport_tiles.0.max(1);
        self.viewport_tiles.1 = self.viewport_tiles.1.max(1);

        if self.spawn.player_speed < 0.0 {
            warn!(speed = self.spawn.player_speed, "Negative player speed, using 0");
            self.spawn.player_speed = 0.0;
        }
    }

    /// The configured seed, or a fresh random one.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| fastrand::u64(..))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.target_tps, 60);
        assert_eq!(config.viewport_tiles, (10, 6));
        assert_eq!(config.tile_size, 128);
        assert!(config.map_path.is_none());
        assert_eq!(config.spawn.prey_count.fast, 6);
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig {
            ticks: 0,
            target_tps: 0,
            log_every: 0,
            arena_tiles: (1, 0),
            viewport_tiles: (0, 2),
            ..EngineConfig::default()
        };
        config.spawn.player_speed = -4.0;

        config.validate();

        assert_eq!(config.ticks, 1);
        assert_eq!(config.target_tps, 1);
        assert_eq!(config.log_every, 1);
        assert_eq!(config.arena_tiles, (3, 3));
        assert_eq!(config.viewport_tiles, (1, 2));
        assert_eq!(config.spawn.player_speed, 0.0);
    }

    #[test]
    fn test_huge_arena_is_capped() {
        let mut config = EngineConfig {
            arena_tiles: (u32::MAX, 70_000),
            tile_size: u32::MAX,
            ..EngineConfig::default()
        };
        config.validate();

        assert_eq!(config.arena_tiles, (MAX_ARENA_TILES, MAX_ARENA_TILES));
        assert_eq!(config.tile_size, 1024);
        let extent = u64::from(config.arena_tiles.0) * u64::from(config.tile_size);
        assert!(extent <= i32::MAX as u64);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("tilechase.toml");

        let mut config = EngineConfig::default();
        config.seed = Some(12345);
        config.ticks = 90;
        config.map_path = Some(PathBuf::from("maps/arena.json"));
        config.spawn.predator_count.fast = 3;

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("tilechase.toml");
        fs::write(&config_path, "ticks = 10\n[spawn]\nplayer_speed = 3.0\n").expect("write");

        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded.ticks, 10);
        assert_eq!(loaded.spawn.player_speed, 3.0);
        assert_eq!(loaded.spawn.prey_count.slow, 6);
        assert_eq!(loaded.target_tps, 60);
    }

    #[test]
    fn test_config_load_missing_or_invalid_file() {
        let config = EngineConfig::load_from("/nonexistent/path/tilechase.toml");
        assert_eq!(config, EngineConfig::default());

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "ticks = \"many\"").expect("write");
        assert_eq!(EngineConfig::load_from(&config_path), EngineConfig::default());
    }

    #[test]
    fn test_seed_resolution() {
        let mut config = EngineConfig::default();
        config.seed = Some(7);
        assert_eq!(config.resolve_seed(), 7);
    }
}
