//! Slope sampling and terrain classification.
//!
//! Sampled height rising along the movement axis means the player is
//! climbing. Classification thresholds compare the angle magnitude, so the
//! signed angle only decides between the climbing and descending rules.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::LocomotionConfig;
use crate::terrain::GroundQuery;

/// Result of probing the surface ahead of the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeSample {
    /// Signed angle in degrees, in `[-90, 90]`. Positive when climbing.
    pub angle: f32,
    /// Unit vector `(0, h2 - h1, sample_distance)` normalised, expressed in
    /// the sample frame (`+z` is the sample axis).
    pub direction: Vec3,
    /// World-space `(x, z)` unit axis the sample was taken along.
    pub axis: Vec2,
}

impl SlopeSample {
    /// A level sample along `axis`.
    #[must_use]
    pub const fn level(axis: Vec2) -> Self {
        Self {
            angle: 0.0,
            direction: Vec3::Z,
            axis,
        }
    }

    /// Builds a sample from the rise between two heights `run` apart.
    #[must_use]
    pub fn from_rise(rise: f32, run: f32, axis: Vec2) -> Self {
        if !rise.is_finite() || !run.is_finite() || run <= 0.0 {
            return Self::level(axis);
        }
        let angle = (rise / run).atan().to_degrees().clamp(-90.0, 90.0);
        let direction = Vec3::new(0.0, rise, run).normalize_or(Vec3::Z);
        Self {
            angle,
            direction,
            axis,
        }
    }

    /// Whether the sampled height rises along the axis.
    #[must_use]
    pub const fn is_climbing(&self) -> bool {
        self.angle > 0.0
    }

    /// World-space horizontal axis pointing downhill.
    #[must_use]
    pub fn downhill(&self) -> Vec2 {
        if self.is_climbing() {
            -self.axis
        } else {
            self.axis
        }
    }
}

/// Probes `ground` at `origin` and `sample_distance` ahead along `axis`.
///
/// Returns `None` when there is no surface under `origin`. A missing
/// forward sample yields a level reading.
#[must_use]
pub fn sample_slope<Q: GroundQuery + ?Sized>(
    ground: &Q,
    origin: Vec2,
    axis: Vec2,
    sample_distance: f32,
) -> Option<(f32, SlopeSample)> {
    let h1 = ground.height_at(origin.x, origin.y)?;
    let ahead = origin + axis * sample_distance;
    let sample = ground
        .height_at(ahead.x, ahead.y)
        .map_or_else(
            || SlopeSample::level(axis),
            |h2| SlopeSample::from_rise(h2 - h1, sample_distance, axis),
        );
    Some((h1, sample))
}

/// The five ways grounded motion responds to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainClass {
    /// Ascent steeper than the walkable limit.
    BlockedClimb,
    /// Descent steep enough to slide.
    Slide,
    /// Walkable ascent that costs extra friction.
    GentleClimb,
    /// Walkable descent that pulls the player along.
    GentleDescent,
    /// Anything shallower than the gentle thresholds.
    Flat,
}

/// Picks the [`TerrainClass`] for a signed slope angle.
///
/// # Examples
/// ```
/// use frostwalk::config::LocomotionConfig;
/// use frostwalk::locomotion::{classify, TerrainClass};
/// let config = LocomotionConfig::default();
/// assert_eq!(classify(45.0, &config), TerrainClass::BlockedClimb);
/// assert_eq!(classify(-45.0, &config), TerrainClass::Slide);
/// assert_eq!(classify(1.0, &config), TerrainClass::Flat);
/// ```
#[must_use]
pub const fn classify(angle: f32, config: &LocomotionConfig) -> TerrainClass {
    let magnitude = angle.abs();
    if angle > 0.0 {
        if magnitude > config.max_climb_angle {
            TerrainClass::BlockedClimb
        } else if magnitude > config.gentle_climb_angle {
            TerrainClass::GentleClimb
        } else {
            TerrainClass::Flat
        }
    } else if magnitude > config.slide_threshold {
        TerrainClass::Slide
    } else if magnitude > config.gentle_descent_angle {
        TerrainClass::GentleDescent
    } else {
        TerrainClass::Flat
    }
}
