//! # Tilechase Gameplay
//!
//! Agents and the rules that move them:
//! - Agents with per-role steering (player input, predator chase, prey flee)
//! - Input sources (keyboard state, scripted input)
//! - World tick with contact resolution and deferred removal
//! - Game session state machine
//! - Initial spawn placement

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod agent;
pub mod input;
pub mod session;
pub mod spawn;
pub mod steering;
pub mod world;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::agent::*;
    pub use crate::input::*;
    pub use crate::session::*;
    pub use crate::spawn::*;
    pub use crate::steering::*;
    pub use crate::world::*;
}

pub use prelude::*;
