//! Initial ball placement
//!
//! The fourteen numbered balls other than the eight fill a fixed set of slots
//! forming a tight 3D diamond around the eight ball, in an order shuffled by
//! a seeded RNG. The cue and eight balls always take their own slots.

use std::sync::Arc;

use glam::DVec3;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use super::state::Ball;
use crate::consts::*;
use crate::mesh::Mesh;

/// Slots around the eight ball, each about one diameter from its nearest neighbours
const RACK_SLOTS: [[f64; 3]; 14] = [
    [1.633, -1.0, -0.5774],
    [1.633, 1.0, -0.5774],
    [1.633, 0.0, 1.1547],
    [0.0, -2.0, 0.0],
    [0.0, 2.0, 0.0],
    [0.0, 1.0, 1.7321],
    [0.0, -1.0, 1.7321],
    [0.0, 1.0, -1.7321],
    [0.0, -1.0, -1.7321],
    [-1.633, -1.0, 0.5774],
    [-1.633, 1.0, 0.5774],
    [-1.633, 0.0, -1.1547],
    [-3.267, 0.0, 0.0],
    [3.267, 0.0, 0.0],
];

/// All sixteen balls at rest, ordered by id
pub fn rack(seed: u64, mesh: &Arc<Mesh>) -> Vec<Ball> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut slots = RACK_SLOTS.map(DVec3::from_array);
    slots.shuffle(&mut rng);
    let mut slots = slots.into_iter();

    (0..BALL_COUNT as u8)
        .filter_map(|id| {
            let position = match id {
                CUE_BALL_ID => Some(CUE_BALL_START),
                EIGHT_BALL_ID => Some(EIGHT_BALL_START),
                _ => slots.next(),
            };
            position.map(|p| Ball::new(id, p, Arc::clone(mesh)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::intersects;

    fn mesh() -> Arc<Mesh> {
        Arc::new(Mesh::default())
    }

    #[test]
    fn test_rack_layout() {
        let balls = rack(12345, &mesh());
        assert_eq!(balls.len(), BALL_COUNT);

        for (i, ball) in balls.iter().enumerate() {
            assert_eq!(ball.id as usize, i);
            assert_eq!(ball.velocity, DVec3::ZERO);
        }

        assert_eq!(balls[EIGHT_BALL_ID as usize].position, EIGHT_BALL_START);
        assert_eq!(balls[CUE_BALL_ID as usize].position, CUE_BALL_START);
    }

    #[test]
    fn test_rack_has_no_overlaps() {
        for seed in 0..8 {
            let balls = rack(seed, &mesh());
            for i in 0..balls.len() {
                for j in i + 1..balls.len() {
                    assert!(
                        !intersects(&balls[i], &balls[j]),
                        "{} overlaps {}",
                        balls[i],
                        balls[j]
                    );
                }
            }
        }
    }

    #[test]
    fn test_rack_is_seeded() {
        let positions =
            |seed| -> Vec<DVec3> { rack(seed, &mesh()).iter().map(|b| b.position).collect() };
        assert_eq!(positions(99), positions(99));
        // Some seed in a handful shuffles differently
        assert!((1..10).any(|seed| positions(seed) != positions(0)));
    }

    #[test]
    fn test_rack_uses_every_slot_once() {
        let balls = rack(7, &mesh());
        let mut used: Vec<DVec3> = balls
            .iter()
            .filter(|b| b.id != CUE_BALL_ID && b.id != EIGHT_BALL_ID)
            .map(|b| b.position)
            .collect();
        let mut expected: Vec<DVec3> = RACK_SLOTS.iter().map(|&s| DVec3::from_array(s)).collect();
        let key = |v: &DVec3| (v.x, v.y, v.z);
        used.sort_by(|a, b| key(a).partial_cmp(&key(b)).unwrap());
        expected.sort_by(|a, b| key(a).partial_cmp(&key(b)).unwrap());
        assert_eq!(used, expected);
    }
}
