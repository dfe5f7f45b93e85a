//! Deterministic simulation module
//!
//! All table physics lives here. This module must be pure and deterministic:
//! - Caller-chosen timestep only
//! - Seeded RNG only (rack shuffling)
//! - Stable iteration order (by ball ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rack;
pub mod state;
pub mod tick;

pub use collision::{collision_rotation, intersects, resolve};
pub use rack::rack;
pub use state::{Ball, BallKind, MeshProvider, Simulation, Table};
pub use tick::{apply_drag, step};
