//! # Tilechase Kernel
//!
//! Spatial core of the simulation:
//! - Read-only tile grid built from map data
//! - Hitbox and AABB geometry
//! - Axis-separated collision resolution against solid tiles
//! - Follow camera clamped to the world bounds

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod camera;
pub mod collision;
pub mod grid;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::camera::*;
    pub use crate::collision::*;
    pub use crate::grid::*;
}

pub use prelude::*;
