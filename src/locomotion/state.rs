//! Mutable locomotion state and the read-only snapshot handed to observers.

use bevy::prelude::Component;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::vector_math::lift;

/// Everything the engine carries between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionState {
    /// Eye position in world space.
    pub position: Vec3,
    /// Vertical speed, positive when falling.
    pub vertical_velocity: f32,
    /// Horizontal `(x, z)` velocity in units per second.
    pub horizontal_velocity: Vec2,
    /// Whether the player stands on the surface.
    pub grounded: bool,
    /// Signed slope in degrees along the last sample axis, in `[-90, 90]`.
    pub slope_angle: f32,
    /// Unit vector `(0, rise, run)` in the sample frame.
    pub slope_direction: Vec3,
}

impl LocomotionState {
    /// An airborne state at rest at `position`.
    #[must_use]
    pub const fn airborne_at(position: Vec3) -> Self {
        Self {
            position,
            vertical_velocity: 0.0,
            horizontal_velocity: Vec2::ZERO,
            grounded: false,
            slope_angle: 0.0,
            slope_direction: Vec3::Z,
        }
    }

    /// Velocity as a world-space vector; `y` is negative while falling.
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        lift(self.horizontal_velocity, -self.vertical_velocity)
    }

    /// Observer copy of the externally visible fields.
    #[must_use]
    pub const fn snapshot(&self) -> LocomotionSnapshot {
        LocomotionSnapshot {
            position: self.position,
            grounded: self.grounded,
            slope_angle: self.slope_angle,
            velocity: self.velocity(),
        }
    }
}

/// What the HUD, minimap and debug overlays are allowed to see.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocomotionSnapshot {
    /// Eye position in world space.
    pub position: Vec3,
    /// Whether the player stands on the surface.
    pub grounded: bool,
    /// Signed slope in degrees.
    pub slope_angle: f32,
    /// World-space velocity.
    pub velocity: Vec3,
}
