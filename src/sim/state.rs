//! Table, ball and simulation state
//!
//! The [`Simulation`] owns everything a tick reads or writes, so independent
//! simulations never share mutable state.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::{rack, tick};
use crate::consts::*;
use crate::error::{PhysicsError, Result};
use crate::math;
use crate::mesh::{Mesh, MeshCache};
use crate::settings::Settings;

/// Ball category; drives rendering only, never physics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallKind {
    Cue,
    Solid,
    Stripe,
    Eight,
}

impl BallKind {
    /// Standard eight-ball numbering: 1-7 solids, 9-15 stripes
    pub fn for_id(id: u8) -> Self {
        match id {
            CUE_BALL_ID => BallKind::Cue,
            EIGHT_BALL_ID => BallKind::Eight,
            1..=7 => BallKind::Solid,
            _ => BallKind::Stripe,
        }
    }
}

/// Something a renderer can draw: a shared unit mesh placed at a position
pub trait MeshProvider {
    fn position(&self) -> DVec3;
    fn mesh(&self) -> &Arc<Mesh>;
}

/// A ball on the table
///
/// Balls are identified by `id` alone: equality and hashing ignore motion.
/// Cloning copies position and velocity but shares the mesh.
#[derive(Debug, Clone, Serialize)]
pub struct Ball {
    pub id: u8,
    pub kind: BallKind,
    pub position: DVec3,
    pub velocity: DVec3,
    #[serde(skip)]
    mesh: Arc<Mesh>,
}

impl Ball {
    /// A ball at rest
    pub fn new(id: u8, position: DVec3, mesh: Arc<Mesh>) -> Self {
        Self {
            id,
            kind: BallKind::for_id(id),
            position,
            velocity: DVec3::ZERO,
            mesh,
        }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        BALL_RADIUS
    }

    /// True if every velocity component is within `movement_epsilon` of zero
    ///
    /// A ball with zero velocity is always at rest, even for a zero epsilon.
    pub fn is_at_rest(&self, movement_epsilon: f64) -> bool {
        self.velocity.abs().max_element() <= movement_epsilon
    }
}

impl MeshProvider for Ball {
    fn position(&self) -> DVec3 {
        self.position
    }

    fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }
}

impl PartialEq for Ball {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Ball {}

impl Hash for Ball {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Ball {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.position;
        match self.kind {
            BallKind::Cue => write!(f, "Ball: Cue; ({}, {}, {})", p.x, p.y, p.z),
            _ => write!(f, "Ball: {}; ({}, {}, {})", self.id, p.x, p.y, p.z),
        }
    }
}

/// Axis-aligned table box centered on the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Full box size; walls sit at ±size/2
    pub size: DVec3,
    /// Speed lost per tick on each velocity component
    pub drag: f64,
    /// Velocity components below this snap the ball to rest
    pub movement_epsilon: f64,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            size: TABLE_SIZE,
            drag: DRAG,
            movement_epsilon: MOVEMENT_EPSILON,
        }
    }
}

impl Table {
    pub fn new(size: DVec3, drag: f64, movement_epsilon: f64) -> Result<Self> {
        let table = Self {
            size,
            drag,
            movement_epsilon,
        };
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.size.is_finite() || self.size.min_element() <= 0.0 {
            return Err(PhysicsError::config(format!(
                "table size must be positive on every axis, got {}",
                self.size
            )));
        }
        if !(self.drag.is_finite() && self.drag >= 0.0) {
            return Err(PhysicsError::config(format!(
                "drag must be non-negative, got {}",
                self.drag
            )));
        }
        if !(self.movement_epsilon.is_finite() && self.movement_epsilon >= 0.0) {
            return Err(PhysicsError::config(format!(
                "movement epsilon must be non-negative, got {}",
                self.movement_epsilon
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn half_extents(&self) -> DVec3 {
        self.size * 0.5
    }
}

/// A running billiards simulation
#[derive(Debug)]
pub struct Simulation {
    pub(crate) settings: Settings,
    /// Sorted by id for deterministic iteration
    pub(crate) balls: Vec<Ball>,
    pub(crate) moving: bool,
    pub(crate) time_ticks: u64,
    meshes: MeshCache,
}

impl Simulation {
    /// Validate `settings`, build the ball mesh and rack the balls
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;

        let mut meshes = MeshCache::new();
        let mesh = meshes.get(settings.base_shape, settings.smoothness)?;
        let balls = rack::rack(settings.seed, &mesh);
        log::info!(
            "Racked {} balls (seed {}, {} triangles per ball)",
            balls.len(),
            settings.seed,
            mesh.len()
        );

        Ok(Self {
            settings,
            balls,
            moving: false,
            time_ticks: 0,
            meshes,
        })
    }

    /// Build a simulation from explicit `(id, position, velocity)` triples
    ///
    /// Ids must be unique, below [`BALL_COUNT`] and include the cue ball.
    pub fn with_balls(
        settings: Settings,
        layout: impl IntoIterator<Item = (u8, DVec3, DVec3)>,
    ) -> Result<Self> {
        settings.validate()?;

        let mut meshes = MeshCache::new();
        let mesh = meshes.get(settings.base_shape, settings.smoothness)?;

        let mut seen = HashSet::new();
        let mut balls = Vec::new();
        for (id, position, velocity) in layout {
            if id as usize >= BALL_COUNT {
                return Err(PhysicsError::config(format!(
                    "ball id {id} out of range 0..{BALL_COUNT}"
                )));
            }
            if !seen.insert(id) {
                return Err(PhysicsError::config(format!("duplicate ball id {id}")));
            }
            let mut ball = Ball::new(id, position, Arc::clone(&mesh));
            ball.velocity = velocity;
            balls.push(ball);
        }
        if !seen.contains(&CUE_BALL_ID) {
            return Err(PhysicsError::config("layout has no cue ball"));
        }
        balls.sort_by_key(|b| b.id);

        let moving = balls
            .iter()
            .any(|b| !b.is_at_rest(settings.table.movement_epsilon));

        Ok(Self {
            settings,
            balls,
            moving,
            time_ticks: 0,
            meshes,
        })
    }

    /// Put every ball back in the rack with a new shuffle
    pub fn rerack(&mut self, seed: u64) -> Result<()> {
        let mesh = self
            .meshes
            .get(self.settings.base_shape, self.settings.smoothness)?;
        self.balls = rack::rack(seed, &mesh);
        self.settings.seed = seed;
        self.moving = false;
        self.time_ticks = 0;
        log::info!("Re-racked with seed {seed}");
        Ok(())
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn ball(&self, id: u8) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn table(&self) -> &Table {
        &self.settings.table
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Shared sphere mesh at the given subdivision depth
    pub fn mesh(&mut self, smoothness: u32) -> Result<Arc<Mesh>> {
        self.meshes.get(self.settings.base_shape, smoothness)
    }

    pub fn is_any_ball_moving(&self) -> bool {
        self.moving
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Advance one tick; returns whether any ball moved
    pub fn step(&mut self, dt: f64) -> bool {
        tick::step(self, dt)
    }

    /// Strike ball `id` along `direction` at the configured shot speed
    ///
    /// Returns `Ok(false)` without touching anything while balls are still
    /// moving.
    pub fn shoot(&mut self, id: u8, direction: DVec3) -> Result<bool> {
        if self.moving {
            log::warn!("Shot on ball {id} ignored: balls are still moving");
            return Ok(false);
        }

        let speed = self.settings.shot_speed;
        let ball = self
            .balls
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(PhysicsError::UnknownBall(id))?;
        ball.velocity = math::normalize(direction)? * speed;
        self.moving = true;

        log::debug!("Ball {id} shot with velocity {}", ball.velocity);
        Ok(true)
    }
}
