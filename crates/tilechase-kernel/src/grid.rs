//! Read-only tile grid for the world.
//!
//! Tiles are stored row-major (`y * width + x`) and classified as passable or
//! solid. A grid is built once from map data and never mutated afterwards, so
//! every agent and the collision resolver can share it by reference.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tilechase_common::{GridError, SimResult, TileCoord};
use tracing::info;

use crate::collision::Aabb;

/// Kind of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileKind {
    /// Agents can walk through this tile
    Passable = 0,
    /// Blocks movement
    Solid = 1,
}

impl TryFrom<u8> for TileKind {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Passable),
            1 => Ok(Self::Solid),
            other => Err(other),
        }
    }
}

/// Loaded map asset: dimensions in tiles, tile edge in pixels and the flat
/// row-major tile data (`0` = passable, `1` = solid).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridMapData {
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    /// Pixels per tile edge
    pub tile_size: u32,
    /// Row-major tile values, `width * height` long
    pub data: Vec<u8>,
}

impl GridMapData {
    /// Parses a JSON map asset.
    pub fn from_json(json: &str) -> Result<Self, GridError> {
        serde_json::from_str(json).map_err(|e| GridError::Parse(e.to_string()))
    }

    /// Reads and parses a JSON map asset from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let json = fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }

    /// A map of the given size whose border tiles are solid and interior is open.
    #[must_use]
    pub fn walled(width: u32, height: u32, tile_size: u32) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let border = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
                data.push(u8::from(border));
            }
        }
        Self {
            width,
            height,
            tile_size,
            data,
        }
    }
}

/// Pixel length of `tiles` tiles, if it stays within the signed coordinate range.
fn pixel_extent(tiles: u32, tile_size: u32) -> Option<u32> {
    tiles
        .checked_mul(tile_size)
        .filter(|&px| i32::try_from(px).is_ok())
}

/// Read-only access to tile solidity, as needed by the collision resolver.
pub trait TileQuery {
    /// Edge length of a tile in pixels.
    fn tile_px(&self) -> f32;

    /// Grid size in tiles (width, height).
    fn dimensions(&self) -> (u32, u32);

    /// Returns true if the tile exists and is solid.
    ///
    /// Coordinates outside the grid are never solid.
    fn is_solid(&self, gx: i32, gy: i32) -> bool;
}

/// Immutable tile grid.
#[derive(Debug, Clone)]
pub struct Grid {
    width: u32,
    height: u32,
    tile_size: u32,
    tiles: Vec<TileKind>,
}

impl Grid {
    /// Builds a grid from map data, rejecting malformed input.
    pub fn new(map: GridMapData) -> Result<Self, GridError> {
        if map.width == 0 || map.height == 0 {
            return Err(GridError::EmptyDimensions {
                width: map.width,
                height: map.height,
            });
        }
        if map.tile_size == 0 {
            return Err(GridError::ZeroTileSize);
        }

        let expected = pixel_extent(map.width, map.tile_size)
            .and(pixel_extent(map.height, map.tile_size))
            .and_then(|_| (map.width as usize).checked_mul(map.height as usize))
            .ok_or(GridError::TooLarge {
                width: map.width,
                height: map.height,
                tile_size: map.tile_size,
            })?;
        if map.data.len() != expected {
            return Err(GridError::LengthMismatch {
                expected,
                actual: map.data.len(),
            });
        }

        let tiles = map
            .data
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                TileKind::try_from(value).map_err(|value| GridError::InvalidTile { index, value })
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Built {}x{} grid, tile size {}px",
            map.width, map.height, map.tile_size
        );

        Ok(Self {
            width: map.width,
            height: map.height,
            tile_size: map.tile_size,
            tiles,
        })
    }

    /// Width in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Pixels per tile edge.
    #[must_use]
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// World size in pixels.
    #[must_use]
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            (self.width * self.tile_size) as f32,
            (self.height * self.tile_size) as f32,
        )
    }

    /// Converts grid coordinates to a linear index, or `None` if out of bounds.
    #[must_use]
    pub fn index(&self, gx: i32, gy: i32) -> Option<usize> {
        let in_bounds = gx >= 0 && gy >= 0 && (gx as u32) < self.width && (gy as u32) < self.height;
        in_bounds.then(|| gy as usize * self.width as usize + gx as usize)
    }

    /// Tile at grid coordinates; `None` when out of bounds.
    #[must_use]
    pub fn tile_at(&self, gx: i32, gy: i32) -> Option<TileKind> {
        self.index(gx, gy).map(|i| self.tiles[i])
    }

    /// Returns true if the tile exists and is passable.
    #[must_use]
    pub fn is_walkable(&self, gx: i32, gy: i32) -> bool {
        self.tile_at(gx, gy) == Some(TileKind::Passable)
    }

    /// Pixel rectangle covered by a tile.
    #[must_use]
    pub fn tile_rect(&self, tile: TileCoord) -> Aabb {
        let size = self.tile_size as f32;
        let min = tile.to_pixel(size);
        Aabb::new(min, min + Vec2::splat(size))
    }

    /// Tile containing a pixel position.
    #[must_use]
    pub fn tile_coord_of(&self, point: Vec2) -> TileCoord {
        TileCoord::from_pixel(point, self.tile_size as f32)
    }

    /// All passable tiles in row-major order.
    pub fn passable_tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        let width = self.width as usize;
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind == TileKind::Passable)
            .map(move |(i, _)| TileCoord::new((i % width) as i32, (i / width) as i32))
    }
}

impl TileQuery for Grid {
    fn tile_px(&self) -> f32 {
        self.tile_size as f32
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn is_solid(&self, gx: i32, gy: i32) -> bool {
        self.tile_at(gx, gy) == Some(TileKind::Solid)
    }
}
