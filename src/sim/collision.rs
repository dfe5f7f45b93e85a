//! Ball-ball collision response
//!
//! Both velocities are rotated into a frame where the line between the two
//! centers is the X axis. In that frame an elastic collision between equal
//! masses simply swaps the X components, after which the velocities are
//! rotated back.

use glam::{DMat3, DVec3};

use super::state::Ball;
use crate::consts::BALL_DIAMETER;
use crate::error::Result;
use crate::math::{self, X_AXIS, Y_AXIS};

/// True if two balls overlap
#[inline]
pub fn intersects(a: &Ball, b: &Ball) -> bool {
    math::distance_squared(a.position, b.position) < BALL_DIAMETER * BALL_DIAMETER
}

/// Rotation taking the direction from `from` to `to` onto +X
///
/// Uses the axis-angle form about `separation × X`. When the separation is
/// already (anti-)parallel to X that axis vanishes, and any axis
/// perpendicular to X gives the required half or zero turn, so Y is used.
///
/// Fails if the two points coincide.
pub fn collision_rotation(from: DVec3, to: DVec3) -> Result<DMat3> {
    let separation = math::normalize(to - from)?;

    let axis = separation.cross(X_AXIS);
    let sin = axis.length();
    let cos = separation.dot(X_AXIS);

    let axis = if math::is_near_zero(sin) {
        Y_AXIS
    } else {
        axis / sin
    };

    Ok(math::axis_angle(axis, cos, sin))
}

/// Exchange the along-axis velocity components of two colliding balls
///
/// Only balls that are still closing on each other are touched; returns
/// whether an exchange happened. Pairs that are already separating keep
/// their velocities bit for bit, so resolving a pair twice is harmless.
pub fn resolve(a: &mut Ball, b: &mut Ball) -> Result<bool> {
    let rotation = collision_rotation(a.position, b.position)?;

    let mut va = math::apply_matrix(a.velocity, &rotation);
    let mut vb = math::apply_matrix(b.velocity, &rotation);

    // Not closing
    if va.x <= vb.x {
        return Ok(false);
    }

    std::mem::swap(&mut va.x, &mut vb.x);

    let inverse = math::transpose(&rotation);
    a.velocity = math::apply_matrix(va, &inverse);
    b.velocity = math::apply_matrix(vb, &inverse);

    log::debug!("Collision {} <-> {}: {} / {}", a.id, b.id, a.velocity, b.velocity);
    Ok(true)
}
