//! Error types for Tilechase.

use thiserror::Error;

/// Top-level error type for Tilechase operations.
#[derive(Debug, Error)]
pub enum SimError {
    /// Grid construction errors
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    /// Agent construction errors
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building a grid from map data.
#[derive(Debug, Error)]
pub enum GridError {
    /// Width or height is zero
    #[error("Grid dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions {
        /// Width in tiles
        width: u32,
        /// Height in tiles
        height: u32,
    },

    /// Tile size is zero
    #[error("Tile size must be non-zero")]
    ZeroTileSize,

    /// World extent in pixels does not fit the coordinate range
    #[error("Grid too large: {width}x{height} tiles of {tile_size}px")]
    TooLarge {
        /// Width in tiles
        width: u32,
        /// Height in tiles
        height: u32,
        /// Pixels per tile edge
        tile_size: u32,
    },

    /// Tile data does not cover the grid exactly
    #[error("Tile data length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// width * height
        expected: usize,
        /// Length of the supplied data
        actual: usize,
    },

    /// A tile value outside the known tile kinds
    #[error("Invalid tile value {value} at index {index}")]
    InvalidTile {
        /// Row-major index of the tile
        index: usize,
        /// Offending value
        value: u8,
    },

    /// Map asset could not be parsed
    #[error("Failed to parse map data: {0}")]
    Parse(String),
}

/// Errors raised while constructing an agent.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Hitbox width or height is not a positive finite number
    #[error("Degenerate hitbox: {width}x{height}")]
    DegenerateHitbox {
        /// Hitbox width
        width: f32,
        /// Hitbox height
        height: f32,
    },

    /// Speed is negative or not finite
    #[error("Invalid speed: {0}")]
    InvalidSpeed(f32),
}

/// Result type alias for Tilechase operations.
pub type SimResult<T> = Result<T, SimError>;
