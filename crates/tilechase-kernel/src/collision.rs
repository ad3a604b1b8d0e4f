//! Axis-separated collision between agent hitboxes and solid tiles.
//!
//! Movement is applied one axis at a time and each axis is resolved right
//! after it moves. Resolving both axes from a single snapshot lets a body
//! slip diagonally between two tiles that only touch at a corner, so callers
//! must always move X, resolve X, move Y, resolve Y.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tilechase_common::{AgentError, Axis, Direction, TileCoord};
use tracing::trace;

use crate::grid::TileQuery;

/// Axis-aligned rectangle relative to an agent's top-left position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f32; 4]", into = "[f32; 4]")]
pub struct Hitbox {
    offset: Vec2,
    size: Vec2,
}

impl Hitbox {
    /// Creates a hitbox with offset `(x, y)` and size `(width, height)`.
    ///
    /// Width and height must be positive and finite.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Result<Self, AgentError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) || !x.is_finite() || !y.is_finite() {
            return Err(AgentError::DegenerateHitbox { width, height });
        }
        Ok(Self {
            offset: Vec2::new(x, y),
            size: Vec2::new(width, height),
        })
    }

    /// Offset from the owner's position.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Width and height.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }
}

impl TryFrom<[f32; 4]> for Hitbox {
    type Error = AgentError;

    fn try_from([x, y, width, height]: [f32; 4]) -> Result<Self, Self::Error> {
        Self::new(x, y, width, height)
    }
}

impl From<Hitbox> for [f32; 4] {
    fn from(h: Hitbox) -> Self {
        [h.offset.x, h.offset.y, h.size.x, h.size.y]
    }
}

/// Axis-aligned bounding box, half-open: `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner (exclusive)
    pub max: Vec2,
}

impl Aabb {
    /// Creates a new AABB.
    #[must_use]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Bounding box of a hitbox placed at `position`.
    #[must_use]
    pub fn from_hitbox(position: Vec2, hitbox: &Hitbox) -> Self {
        let min = position + hitbox.offset;
        Self {
            min,
            max: min + hitbox.size,
        }
    }

    /// Returns the center of the AABB.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Returns the size of the AABB.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Checks if this AABB overlaps with another. Touching edges do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Inclusive range of tile coordinates this box reaches into, unclamped.
    ///
    /// An edge lying exactly on a tile boundary does not reach the next tile.
    #[must_use]
    pub fn tile_span(&self, tile_px: f32) -> (TileCoord, TileCoord) {
        let first = TileCoord::new(
            (self.min.x / tile_px).floor() as i32,
            (self.min.y / tile_px).floor() as i32,
        );
        let last = TileCoord::new(
            (self.max.x / tile_px).ceil() as i32 - 1,
            (self.max.y / tile_px).ceil() as i32 - 1,
        );
        (first, last)
    }
}

/// Solid tiles overlapped by `aabb`, restricted to the grid.
///
/// The scanned range is clamped to `[0, width-1] x [0, height-1]` before any
/// lookup, and a box edge lying exactly on a tile boundary does not reach
/// into the next tile.
pub fn overlapping_solid_tiles<'g, G: TileQuery + ?Sized>(
    aabb: &Aabb,
    grid: &'g G,
) -> impl Iterator<Item = TileCoord> + 'g {
    let (width, height) = grid.dimensions();
    let (first, last) = aabb.tile_span(grid.tile_px());

    let min_gx = first.x.max(0);
    let max_gx = last.x.min(width as i32 - 1);
    let min_gy = first.y.max(0);
    let max_gy = last.y.min(height as i32 - 1);

    (min_gy..=max_gy)
        .flat_map(move |gy| (min_gx..=max_gx).map(move |gx| TileCoord::new(gx, gy)))
        .filter(move |t| grid.is_solid(t.x, t.y))
}

/// Outcome of resolving one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisResolution {
    /// Position left untouched
    Unchanged,
    /// Position moved out of a solid tile
    Corrected {
        /// Coordinate before correction
        from: f32,
        /// Coordinate after correction
        to: f32,
        /// Tile that imposed the correction
        tile: TileCoord,
    },
}

impl AxisResolution {
    /// Returns true if the position was changed.
    #[must_use]
    pub const fn is_corrected(&self) -> bool {
        matches!(self, Self::Corrected { .. })
    }
}

/// Pushes a body that has just moved along `axis` out of the solid tiles it
/// moved into.
///
/// Only tiles lying ahead of the body's center in the direction of travel are
/// considered; the body's leading edge is aligned with the near edge of such a
/// tile, and among several candidates the most restrictive alignment wins.
/// A zero direction component on `axis` is a no-op, even for a body that
/// already overlaps a solid tile.
pub fn resolve_axis<G: TileQuery + ?Sized>(
    position: &mut Vec2,
    hitbox: &Hitbox,
    direction: Direction,
    axis: Axis,
    grid: &G,
) -> AxisResolution {
    let heading = direction.get(axis);
    if heading == 0 {
        return AxisResolution::Unchanged;
    }

    let tile_px = grid.tile_px();
    let aabb = Aabb::from_hitbox(*position, hitbox);
    let center = axis.of(aabb.center());
    let offset = axis.of(hitbox.offset());
    let extent = axis.of(hitbox.size());

    let mut best: Option<(f32, TileCoord)> = None;
    for tile in overlapping_solid_tiles(&aabb, grid) {
        let index = match axis {
            Axis::X => tile.x,
            Axis::Y => tile.y,
        };
        let tile_min = index as f32 * tile_px;
        let tile_max = tile_min + tile_px;
        let tile_center = tile_min + tile_px / 2.0;

        let candidate = if heading < 0 && tile_center < center {
            tile_max - offset
        } else if heading > 0 && tile_center > center {
            tile_min - offset - extent
        } else {
            continue;
        };

        let tighter = match best {
            None => true,
            Some((current, _)) if heading < 0 => candidate > current,
            Some((current, _)) => candidate < current,
        };
        if tighter {
            best = Some((candidate, tile));
        }
    }

    match best {
        Some((to, tile)) => {
            let coord = axis.of_mut(position);
            let from = *coord;
            *coord = to;
            trace!(?axis, from, to, gx = tile.x, gy = tile.y, "collision correction");
            AxisResolution::Corrected { from, to, tile }
        },
        None => AxisResolution::Unchanged,
    }
}
