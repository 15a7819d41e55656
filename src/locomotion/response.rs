//! Velocity responses for each [`TerrainClass`].
//!
//! Multipliers are applied once per tick regardless of `dt`.

use glam::Vec2;

use super::slope::{SlopeSample, TerrainClass};
use crate::config::LocomotionConfig;
use crate::vector_math::cap_length;

/// Applies the grounded response for `class` to `velocity`.
///
/// Slides add acceleration first, then drag, then the speed cap, so the
/// returned speed never exceeds `slide_max_speed`.
#[must_use]
pub fn respond(
    class: TerrainClass,
    velocity: Vec2,
    sample: &SlopeSample,
    config: &LocomotionConfig,
) -> Vec2 {
    match class {
        TerrainClass::BlockedClimb => velocity * config.blocked_climb_retain,
        TerrainClass::Slide => {
            let accelerated = velocity + sample.downhill() * config.slide_acceleration;
            cap_length(accelerated * config.slide_drag, config.slide_max_speed)
        }
        TerrainClass::GentleClimb => velocity * config.climb_friction,
        TerrainClass::GentleDescent => {
            velocity * config.descent_friction + sample.downhill() * config.descent_acceleration
        }
        TerrainClass::Flat => velocity * config.friction,
    }
}
