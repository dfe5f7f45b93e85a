//! Pool3D - a 3D billiards physics core
//!
//! Core modules:
//! - `math`: Vector/matrix helpers over glam's f64 types
//! - `mesh`: Geodesic sphere meshes shared by every ball
//! - `sim`: Deterministic simulation (balls, collisions, walls, drag)
//! - `settings`: Table and simulation configuration
//! - `error`: Error type shared by all of the above

pub mod error;
pub mod math;
pub mod mesh;
pub mod settings;
pub mod sim;

pub use error::{PhysicsError, Result};
pub use mesh::{BaseShape, Mesh, MeshCache, MeshVertex, Triangle};
pub use settings::Settings;
pub use sim::{Ball, BallKind, MeshProvider, Simulation, Table};

/// Simulation configuration constants
pub mod consts {
    use glam::DVec3;

    /// Tolerance for every geometric equality/degeneracy check
    pub const EPSILON: f64 = 1e-9;

    /// Fixed simulation timestep (one tick)
    pub const SIM_DT: f64 = 1.0;

    /// Ball geometry, identical for every ball
    pub const BALL_RADIUS: f64 = 1.0;
    pub const BALL_DIAMETER: f64 = BALL_RADIUS * 2.0;

    /// Full table box size; walls sit at ±size/2
    pub const TABLE_SIZE: DVec3 = DVec3::new(40.0, 20.0, 20.0);
    /// Speed lost per tick on each velocity component
    pub const DRAG: f64 = 0.002;
    /// Velocity components below this are snapped to zero
    pub const MOVEMENT_EPSILON: f64 = 0.001;
    /// Speed given to a ball by a shot
    pub const SHOT_SPEED: f64 = 1.0;

    /// Default mesh subdivision depth
    pub const DEFAULT_SMOOTHNESS: u32 = 3;
    /// Deepest subdivision accepted (20 * 4^8 triangles on an icosahedron)
    pub const MAX_SMOOTHNESS: u32 = 8;

    /// Rack layout
    pub const BALL_COUNT: usize = 16;
    pub const CUE_BALL_ID: u8 = 0;
    pub const EIGHT_BALL_ID: u8 = 8;
    pub const CUE_BALL_START: DVec3 = DVec3::new(10.0, 0.0, 0.0);
    pub const EIGHT_BALL_START: DVec3 = DVec3::ZERO;
}
