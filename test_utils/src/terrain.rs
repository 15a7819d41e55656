//! Terrain fixtures.

use std::sync::Arc;

use frostwalk::terrain::{procedural, GroundFn, GroundQuery, HeightField, SharedSurface};

/// Level field at `height` over the default terrain square.
///
/// # Panics
/// Panics if `height` is not finite.
#[must_use]
pub fn flat_field(height: f32) -> HeightField {
    procedural::flat(height).expect("flat terrain should build")
}

/// Plane rising towards +z at `angle_degrees`, `y = 0` at the origin.
///
/// # Examples
/// ```
/// use frostwalk::terrain::GroundQuery;
/// use test_utils::ramp_field;
/// let ramp = ramp_field(45.0);
/// assert!((ramp.height_at(0.0, 1.0).unwrap() - 1.0).abs() < 1e-4);
/// ```
///
/// # Panics
/// Panics if the angle produces non-finite corner heights.
#[must_use]
pub fn ramp_field(angle_degrees: f32) -> HeightField {
    procedural::ramp(angle_degrees).expect("ramp terrain should build")
}

/// Flat ground at `height` with nothing beyond `radius` of the origin.
#[must_use]
pub fn holey_ground(
    height: f32,
    radius: f32,
) -> GroundFn<impl Fn(f32, f32) -> Option<f32> + Copy> {
    GroundFn(move |x: f32, z: f32| (x.hypot(z) <= radius).then_some(height))
}

/// Shares any surface for publishing through a terrain channel.
pub fn shared<Q>(surface: Q) -> SharedSurface
where
    Q: GroundQuery + Send + Sync + 'static,
{
    Arc::new(surface)
}
