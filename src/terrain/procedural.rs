//! Procedural terrain used by the headless runner and by tests when no
//! heightmap is supplied.

use super::{HeightField, HeightFieldError};
use crate::constants::TERRAIN_SCALE;

/// Samples per side for generated fields.
pub const DEFAULT_RESOLUTION: usize = 129;

/// Gentle rolling hills: `sin(x / 20) * 3 + cos(z / 20) * 3 + 2`.
#[must_use]
pub fn rolling_hills_height(x: f32, z: f32) -> f32 {
    (x / 20.0).sin() * 3.0 + (z / 20.0).cos() * 3.0 + 2.0
}

/// Height field of [`rolling_hills_height`] over the default terrain square.
///
/// # Errors
/// Propagates [`HeightFieldError`] from construction.
pub fn rolling_hills() -> Result<HeightField, HeightFieldError> {
    HeightField::from_fn(
        DEFAULT_RESOLUTION,
        DEFAULT_RESOLUTION,
        TERRAIN_SCALE,
        rolling_hills_height,
    )
}

/// A plane rising towards +z at `angle_degrees`, passing through `y = 0` at
/// the origin.
///
/// # Errors
/// Propagates [`HeightFieldError`] from construction.
pub fn ramp(angle_degrees: f32) -> Result<HeightField, HeightFieldError> {
    let gradient = angle_degrees.to_radians().tan();
    HeightField::new(
        2,
        2,
        TERRAIN_SCALE,
        ramp_corners(gradient, TERRAIN_SCALE * 0.5),
    )
}

fn ramp_corners(gradient: f32, half: f32) -> Vec<f32> {
    let near = -half * gradient;
    let far = half * gradient;
    vec![near, near, far, far]
}

/// Level ground at `height`.
///
/// # Errors
/// Propagates [`HeightFieldError`] when `height` is not finite.
pub fn flat(height: f32) -> Result<HeightField, HeightFieldError> {
    HeightField::new(2, 2, TERRAIN_SCALE, vec![height; 4])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::GroundQuery;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    fn hills_match_the_analytic_surface_on_lattice_points() {
        let field = rolling_hills().expect("valid field");
        // Lattice spacing is 100 / 128, so x = 25 is not a lattice point but
        // x = 0 and z = 0 are.
        assert_relative_eq!(
            field.height_at(0.0, 0.0).expect("inside"),
            rolling_hills_height(0.0, 0.0),
            epsilon = 1e-4
        );
    }

    #[rstest]
    #[case(10.0)]
    #[case(30.0)]
    fn ramp_rises_at_the_requested_angle(#[case] angle: f32) {
        let field = ramp(angle).expect("valid field");
        let rise = field.height_at(0.0, 10.0).expect("inside")
            - field.height_at(0.0, 0.0).expect("inside");
        assert_relative_eq!(rise.atan2(10.0).to_degrees(), angle, epsilon = 1e-3);
    }

    #[rstest]
    fn flat_rejects_non_finite_height() {
        assert!(flat(f32::NAN).is_err());
        assert_eq!(flat(3.0).expect("valid").height_at(10.0, -20.0), Some(3.0));
    }
}
