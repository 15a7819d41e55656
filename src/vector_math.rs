//! Planar vector helpers.
//! Locomotion works in the horizontal `(x, z)` plane, stored as [`Vec2`]
//! with `x → x` and `y → z`.
use glam::{Vec2, Vec3};

/// Returns the horizontal `(x, z)` part of a world-space vector.
///
/// # Examples
/// ```
/// use frostwalk::vector_math::planar;
/// use glam::{Vec2, Vec3};
/// assert_eq!(planar(Vec3::new(1.0, 5.0, -2.0)), Vec2::new(1.0, -2.0));
/// ```
#[must_use]
pub const fn planar(vector: Vec3) -> Vec2 {
    Vec2::new(vector.x, vector.z)
}

/// Lifts a planar `(x, z)` vector back into world space with the given `y`.
#[must_use]
pub const fn lift(planar: Vec2, y: f32) -> Vec3 {
    Vec3::new(planar.x, y, planar.y)
}

/// Returns the unit vector of `direction`, or `fallback` when `direction`
/// is non-finite or shorter than `min_length`.
///
/// # Examples
///
/// ```
/// use frostwalk::vector_math::planar_direction_or;
/// use glam::Vec2;
/// let dir = planar_direction_or(Vec2::new(3.0, 4.0), Vec2::Y, 0.001);
/// assert!((dir - Vec2::new(0.6, 0.8)).length() < 1e-6);
///
/// let fallback = planar_direction_or(Vec2::ZERO, Vec2::Y, 0.001);
/// assert_eq!(fallback, Vec2::Y);
/// ```
#[must_use]
pub fn planar_direction_or(direction: Vec2, fallback: Vec2, min_length: f32) -> Vec2 {
    if !direction.is_finite() || direction.length() <= min_length {
        return fallback;
    }
    direction.normalize_or(fallback)
}

/// Scales `velocity` down so its length does not exceed `max_length`.
#[must_use]
pub fn cap_length(velocity: Vec2, max_length: f32) -> Vec2 {
    velocity.clamp_length_max(max_length.max(0.0))
}

/// Rotates a camera-local planar input by `yaw` radians about +Y.
///
/// Local axes follow the camera convention: `-y` (i.e. `-z`) is forward and
/// `+x` is right. A zero yaw leaves the vector unchanged.
#[must_use]
pub fn rotate_by_yaw(local: Vec2, yaw: f32) -> Vec2 {
    let (sin, cos) = yaw.sin_cos();
    Vec2::new(
        local.x * cos + local.y * sin,
        -local.x * sin + local.y * cos,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn nan_direction_uses_fallback() {
        let dir = planar_direction_or(Vec2::new(f32::NAN, 1.0), Vec2::Y, 0.001);
        assert_eq!(dir, Vec2::Y);
    }

    #[test]
    fn cap_length_preserves_direction() {
        let capped = cap_length(Vec2::new(30.0, 40.0), 10.0);
        assert_relative_eq!(capped.length(), 10.0, epsilon = 1e-5);
        assert_relative_eq!(capped.x / capped.y, 0.75, epsilon = 1e-5);
    }

    #[test]
    fn quarter_turn_maps_forward_to_left() {
        // Facing -z, a quarter turn to the left (positive yaw) faces -x.
        let rotated = rotate_by_yaw(Vec2::new(0.0, -1.0), FRAC_PI_2);
        assert_relative_eq!(rotated.x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(rotated.y, 0.0, epsilon = 1e-6);
    }
}
