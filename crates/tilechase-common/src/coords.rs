//! Coordinate types for tile and pixel space, plus movement axes and directions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Tile coordinate (identifies a cell in the world grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    /// Column index
    pub x: i32,
    /// Row index
    pub y: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the tile containing a pixel position.
    ///
    /// Positions left of or above the origin map to negative indices.
    #[must_use]
    pub fn from_pixel(point: Vec2, tile_size: f32) -> Self {
        Self {
            x: (point.x / tile_size).floor() as i32,
            y: (point.y / tile_size).floor() as i32,
        }
    }

    /// Top-left corner of the tile in pixels.
    #[must_use]
    pub fn to_pixel(self, tile_size: f32) -> Vec2 {
        Vec2::new(self.x as f32 * tile_size, self.y as f32 * tile_size)
    }

    /// Center of the tile in pixels.
    #[must_use]
    pub fn center(self, tile_size: f32) -> Vec2 {
        Vec2::new(
            (self.x as f32 + 0.5) * tile_size,
            (self.y as f32 + 0.5) * tile_size,
        )
    }
}

/// One of the two movement axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal, positive to the right
    X,
    /// Vertical, positive downward
    Y,
}

impl Axis {
    /// Both axes in resolution order.
    pub const ALL: [Self; 2] = [Self::X, Self::Y];

    /// Selects this axis' component of a vector.
    #[must_use]
    pub fn of(self, v: Vec2) -> f32 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
        }
    }

    /// Returns a mutable reference to this axis' component of a vector.
    pub fn of_mut(self, v: &mut Vec2) -> &mut f32 {
        match self {
            Self::X => &mut v.x,
            Self::Y => &mut v.y,
        }
    }
}

/// Sign of a value as a direction component: -1, 0 or 1.
///
/// Zero and NaN both map to 0.
#[must_use]
pub fn sign(value: f32) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// A movement direction whose components are each -1, 0 or 1.
///
/// Components are clamped to their sign on construction, so no value outside
/// `{-1, 0, 1}` can be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[i8; 2]", into = "[i8; 2]")]
pub struct Direction {
    x: i8,
    y: i8,
}

impl Direction {
    /// No movement.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Creates a direction, reducing each component to its sign.
    #[must_use]
    pub const fn new(x: i8, y: i8) -> Self {
        Self {
            x: x.signum(),
            y: y.signum(),
        }
    }

    /// Direction whose components are the signs of a vector's components.
    #[must_use]
    pub fn from_signs(v: Vec2) -> Self {
        Self {
            x: sign(v.x),
            y: sign(v.y),
        }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(self) -> i8 {
        self.x
    }

    /// Vertical component.
    #[must_use]
    pub const fn y(self) -> i8 {
        self.y
    }

    /// Component along an axis.
    #[must_use]
    pub const fn get(self, axis: Axis) -> i8 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Sets the component along an axis, reduced to its sign.
    pub fn set(&mut self, axis: Axis, value: i8) {
        match axis {
            Axis::X => self.x = value.signum(),
            Axis::Y => self.y = value.signum(),
        }
    }

    /// Returns true if neither component moves.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }

    /// Direction as a float vector.
    #[must_use]
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(f32::from(self.x), f32::from(self.y))
    }
}

impl From<[i8; 2]> for Direction {
    fn from([x, y]: [i8; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Direction> for [i8; 2] {
    fn from(d: Direction) -> Self {
        [d.x, d.y]
    }
}
