//! # Tilechase Common
//!
//! Common types shared by every Tilechase crate:
//! - Coordinate types (tile coordinates, axes, directions)
//! - Agent identifiers
//! - Error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_id_sequence() {
        let first = AgentId::from_raw(0);
        let second = first.next();
        assert_ne!(first, second);
        assert_eq!(second.raw(), 1);
        assert_eq!(second.to_string(), "agent#1");
    }

    #[test]
    fn test_error_conversion() {
        let err: SimError = GridError::ZeroTileSize.into();
        assert!(matches!(err, SimError::Grid(GridError::ZeroTileSize)));
        assert_eq!(err.to_string(), "Grid error: Tile size must be non-zero");
    }
}
