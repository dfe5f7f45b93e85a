//! Pool3D entry point
//!
//! Headless break shot: racks the balls, fires the cue ball at the eight
//! ball, runs until everything is at rest and prints the final table as JSON.
//!
//! Usage: `pool3d [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
use pool3d::consts::*;
#[cfg(not(target_arch = "wasm32"))]
use pool3d::{PhysicsError, Settings, Simulation};

/// Give up on a break that is still rolling after this many ticks
#[cfg(not(target_arch = "wasm32"))]
const MAX_TICKS: u64 = 1_000_000;

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), PhysicsError> {
    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path)?,
        None => {
            log::info!("No settings file given, using defaults");
            Settings::default()
        }
    };

    let mut sim = Simulation::new(settings)?;

    let cue = sim.ball(CUE_BALL_ID).ok_or(PhysicsError::UnknownBall(CUE_BALL_ID))?;
    let eight = sim
        .ball(EIGHT_BALL_ID)
        .ok_or(PhysicsError::UnknownBall(EIGHT_BALL_ID))?;
    let aim = eight.position - cue.position;

    sim.shoot(CUE_BALL_ID, aim)?;
    log::info!("Break shot fired along {aim}");

    while sim.step(SIM_DT) {
        if sim.time_ticks() % 500 == 0 {
            log::debug!("Tick {}: balls still rolling", sim.time_ticks());
        }
        if sim.time_ticks() >= MAX_TICKS {
            log::warn!("Stopping after {MAX_TICKS} ticks with balls still moving");
            break;
        }
    }
    log::info!("Table settled after {} ticks", sim.time_ticks());

    for ball in sim.balls() {
        log::info!("{ball}");
    }
    println!("{}", serde_json::to_string_pretty(sim.balls())?);

    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pool3D (native) starting...");

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on the web; nothing to run here
}
