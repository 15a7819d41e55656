//! Ground query service.
//!
//! The locomotion engine only ever asks one question of the terrain: how high
//! is the surface at `(x, z)`? [`GroundQuery`] is that question. Concrete
//! surfaces are a grid-backed [`HeightField`] and a ray-cast [`TriangleMesh`];
//! [`FrameHeightCache`] memoizes either for the duration of a frame and
//! [`TerrainHandle`] carries a shared, versioned surface between the loader
//! and its consumers.

use std::sync::Arc;

mod cache;
pub mod handle;
mod height_field;
mod mesh;
pub mod procedural;

pub use cache::{CacheStats, FrameHeightCache};
pub use handle::{
    terrain_channel, SharedSurface, TerrainError, TerrainHandle, TerrainPublisher, TerrainVersion,
    TerrainWatch,
};
pub use height_field::{HeightField, HeightFieldError};
pub use mesh::{MeshError, Ray, RayHit, TriangleMesh};

/// Answers "ground height at `(x, z)`" for a terrain surface.
///
/// Implementations must be pure: no side effects observable by callers, and
/// `None` rather than a panic whenever no surface lies beneath the point
/// (outside the bounds, off the mesh, non-finite input).
#[cfg_attr(test, mockall::automock)]
pub trait GroundQuery {
    /// Returns the surface elevation under `(x, z)`, if any.
    fn height_at(&self, x: f32, z: f32) -> Option<f32>;
}

impl<T: GroundQuery + ?Sized> GroundQuery for &T {
    fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        (**self).height_at(x, z)
    }
}

impl<T: GroundQuery + ?Sized> GroundQuery for Box<T> {
    fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        (**self).height_at(x, z)
    }
}

impl<T: GroundQuery + ?Sized> GroundQuery for Arc<T> {
    fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        (**self).height_at(x, z)
    }
}

/// Square horizontal extent `[-half, half] × [-half, half]` centred on the
/// origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainBounds {
    half_extent: f32,
}

impl TerrainBounds {
    /// Bounds for a terrain whose side length is `scale`.
    #[must_use]
    pub const fn from_scale(scale: f32) -> Self {
        Self {
            half_extent: scale.abs() * 0.5,
        }
    }

    /// Half of the side length.
    #[must_use]
    pub const fn half_extent(&self) -> f32 {
        self.half_extent
    }

    /// Whether `(x, z)` lies inside the bounds, edges included.
    ///
    /// # Examples
    /// ```
    /// use frostwalk::terrain::TerrainBounds;
    /// let bounds = TerrainBounds::from_scale(100.0);
    /// assert!(bounds.contains(50.0, -50.0));
    /// assert!(!bounds.contains(50.1, 0.0));
    /// assert!(!bounds.contains(f32::NAN, 0.0));
    /// ```
    #[must_use]
    pub const fn contains(&self, x: f32, z: f32) -> bool {
        x.abs() <= self.half_extent && z.abs() <= self.half_extent
    }
}

/// Adapts a closure into a [`GroundQuery`].
///
/// Handy for analytic surfaces and for tests that need a surface with holes.
#[derive(Clone, Copy)]
pub struct GroundFn<F>(pub F);

impl<F> GroundQuery for GroundFn<F>
where
    F: Fn(f32, f32) -> Option<f32>,
{
    fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        (self.0)(x, z)
    }
}

impl<F> std::fmt::Debug for GroundFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroundFn").finish_non_exhaustive()
    }
}
