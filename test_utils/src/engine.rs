//! Engine shortcuts shared by the integration tests.

use frostwalk::config::LocomotionConfig;
use frostwalk::locomotion::{LocomotionEngine, MovementInput, TickReport};
use frostwalk::terrain::GroundQuery;
use glam::Vec3;

/// Default-tuned engine spawned airborne at `(x, y, z)`.
#[must_use]
pub fn engine_at(x: f32, y: f32, z: f32) -> LocomotionEngine {
    LocomotionEngine::new(LocomotionConfig::default(), Vec3::new(x, y, z))
}

/// Steps `engine` `ticks` times with the same input and returns every report.
pub fn run_ticks<Q: GroundQuery + ?Sized>(
    engine: &mut LocomotionEngine,
    ground: &Q,
    input: &MovementInput,
    dt: f32,
    ticks: usize,
) -> Vec<TickReport> {
    (0..ticks).map(|_| engine.step(ground, input, dt)).collect()
}

/// Idles until the engine is grounded.
///
/// # Panics
/// Panics if the player has not landed within `max_ticks`.
pub fn settle<Q: GroundQuery + ?Sized>(
    engine: &mut LocomotionEngine,
    ground: &Q,
    dt: f32,
    max_ticks: usize,
) {
    for _ in 0..max_ticks {
        if engine.state().grounded {
            return;
        }
        engine.step(ground, &MovementInput::IDLE, dt);
    }
    assert!(
        engine.state().grounded,
        "player did not land within {max_ticks} ticks"
    );
}
