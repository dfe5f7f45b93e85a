//! Simulation settings
//!
//! Compiled-in defaults come from [`crate::consts`]; a JSON file can override
//! any of them for a run.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{PhysicsError, Result};
use crate::mesh::BaseShape;
use crate::sim::Table;

/// Everything a [`crate::Simulation`] is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Table box, drag and rest threshold
    pub table: Table,
    /// Speed given to a ball by a shot
    pub shot_speed: f64,
    /// Mesh subdivision depth for the balls
    pub smoothness: u32,
    /// Polyhedron the ball mesh is refined from
    pub base_shape: BaseShape,
    /// Rack shuffle seed
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            table: Table::default(),
            shot_speed: SHOT_SPEED,
            smoothness: DEFAULT_SMOOTHNESS,
            base_shape: BaseShape::default(),
            seed: 0,
        }
    }
}

impl Settings {
    /// Default settings with a different rack seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        self.table.validate()?;

        if !(self.shot_speed.is_finite() && self.shot_speed > 0.0) {
            return Err(PhysicsError::config(format!(
                "shot speed must be positive, got {}",
                self.shot_speed
            )));
        }
        if self.smoothness > MAX_SMOOTHNESS {
            return Err(PhysicsError::config(format!(
                "smoothness {} exceeds maximum {MAX_SMOOTHNESS}",
                self.smoothness
            )));
        }

        Ok(())
    }

    /// Parse and validate settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
