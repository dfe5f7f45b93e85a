//! Simulation tick
//!
//! One call advances every ball: integrate and apply drag, resolve touching
//! pairs, then bounce off the table walls.
//!
//! Pairs are resolved one at a time in index order, so a pair handled early
//! in a tick can change the velocities a later pair sharing a ball sees. A
//! row of touching balls therefore passes a hit down the line within a single
//! tick.

use glam::DVec3;

use super::collision::{intersects, resolve};
use super::state::{Ball, Simulation};

/// Advance the simulation by `dt` ticks; returns whether any ball moved
///
/// A negative or non-finite `dt` leaves the table untouched.
pub fn step(sim: &mut Simulation, dt: f64) -> bool {
    if !(dt.is_finite() && dt >= 0.0) {
        log::warn!("Ignoring step with invalid timestep {dt}");
        return sim.moving;
    }

    let table = sim.settings.table;
    let mut moving = false;

    for ball in &mut sim.balls {
        if ball.is_at_rest(table.movement_epsilon) {
            ball.velocity = DVec3::ZERO;
            continue;
        }

        moving = true;
        ball.position += ball.velocity * dt;
        ball.velocity = apply_drag(ball.velocity, table.drag * dt);
    }

    let collisions = resolve_collisions(&mut sim.balls);
    reflect_off_walls(&mut sim.balls, table.half_extents());

    sim.moving = moving;
    sim.time_ticks += 1;

    log::trace!("Tick {}: moving={}, collisions={}", sim.time_ticks, moving, collisions);
    moving
}

/// Reduce each component's magnitude by `amount`, stopping at zero
///
/// A negative `amount` is treated as no drag.
pub fn apply_drag(velocity: DVec3, amount: f64) -> DVec3 {
    let amount = amount.max(0.0);
    let slow = |v: f64| v.signum() * (v.abs() - amount).max(0.0);
    DVec3::new(slow(velocity.x), slow(velocity.y), slow(velocity.z))
}

/// Resolve every overlapping pair `i < j` in order; returns how many exchanged
fn resolve_collisions(balls: &mut [Ball]) -> usize {
    let mut count = 0;

    for i in 0..balls.len() {
        let (head, tail) = balls.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if !intersects(a, b) {
                continue;
            }
            match resolve(a, b) {
                Ok(true) => count += 1,
                Ok(false) => {}
                Err(e) => log::warn!("Skipping pair {} / {}: {}", a.id, b.id, e),
            }
        }
    }

    count
}

/// Mirror any velocity component carrying a ball further out past a wall
fn reflect_off_walls(balls: &mut [Ball], half_extents: DVec3) {
    for ball in balls {
        let radius = ball.radius();
        for axis in 0..3 {
            let p = ball.position[axis];
            let v = ball.velocity[axis];
            if p.abs() + radius > half_extents[axis] && p * v > 0.0 {
                ball.velocity[axis] = -v;
            }
        }
    }
}
