//! Error type for the physics core

/// Errors raised by geometry, simulation and settings code
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    /// A vector too short to normalize (e.g. two coincident ball centers)
    #[error("cannot normalize degenerate vector ({x}, {y}, {z})")]
    DegenerateVector { x: f64, y: f64, z: f64 },

    /// Settings or construction parameters out of range
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No ball with this id is on the table
    #[error("no ball with id {0}")]
    UnknownBall(u8),

    #[error("settings i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings json is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

impl PhysicsError {
    pub(crate) fn degenerate(v: glam::DVec3) -> Self {
        Self::DegenerateVector {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, PhysicsError>;
