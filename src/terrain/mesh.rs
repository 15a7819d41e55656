//! Triangle-mesh terrain queried by downward ray casts.

use glam::Vec3;
use thiserror::Error;

use super::GroundQuery;

/// Barycentric and parallelism tolerance for the ray/triangle test.
const RAY_EPSILON: f32 = 1e-5;

/// Height above the highest vertex that downward probes start from.
const PROBE_CLEARANCE: f32 = 1.0;

/// Reasons a [`TriangleMesh`] cannot be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// A triangle refers to a vertex that does not exist.
    #[error("triangle {triangle} references vertex {index} but only {vertex_count} exist")]
    IndexOutOfRange {
        /// Offending triangle.
        triangle: usize,
        /// Offending vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
    /// A vertex position was NaN or infinite.
    #[error("vertex {0} is not finite")]
    NonFiniteVertex(usize),
}

/// A half-line from `origin` along `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Travel direction; need not be normalised.
    pub direction: Vec3,
}

/// Closest intersection reported by [`TriangleMesh::cast`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space point of contact.
    pub point: Vec3,
    /// Ray parameter at the hit, in units of `direction`.
    pub distance: f32,
    /// Index of the triangle that was hit.
    pub triangle: usize,
}

/// Indexed triangle soup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriangleMesh {
    vertices: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    top: f32,
}

impl TriangleMesh {
    /// Builds a mesh, rejecting dangling indices and non-finite vertices.
    ///
    /// # Errors
    /// See [`MeshError`].
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        if let Some(index) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(MeshError::NonFiniteVertex(index));
        }
        for (triangle, corners) in triangles.iter().enumerate() {
            if let Some(&index) = corners
                .iter()
                .find(|&&i| !usize::try_from(i).is_ok_and(|slot| slot < vertices.len()))
            {
                return Err(MeshError::IndexOutOfRange {
                    triangle,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }
        Ok(Self::from_parts_unchecked(vertices, triangles))
    }

    /// Assembles a mesh whose indices are already known to be valid.
    pub(crate) fn from_parts_unchecked(vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        let top = vertices
            .iter()
            .map(|v| v.y)
            .fold(f32::NEG_INFINITY, f32::max);
        Self {
            vertices,
            triangles,
            top,
        }
    }

    /// Vertex positions.
    #[must_use]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Triangle vertex indices.
    #[must_use]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    fn corners(&self, [a, b, c]: [u32; 3]) -> Option<[Vec3; 3]> {
        let fetch = |index: u32| {
            usize::try_from(index)
                .ok()
                .and_then(|slot| self.vertices.get(slot))
                .copied()
        };
        Some([fetch(a)?, fetch(b)?, fetch(c)?])
    }

    /// Returns the nearest intersection in front of the ray origin.
    ///
    /// Triangles are treated as double-sided and degenerate ones are skipped.
    #[must_use]
    pub fn cast(&self, ray: Ray) -> Option<RayHit> {
        self.triangles
            .iter()
            .enumerate()
            .filter_map(|(index, &triangle)| {
                let corners = self.corners(triangle)?;
                intersect(ray, corners).map(|distance| RayHit {
                    point: ray.origin + ray.direction * distance,
                    distance,
                    triangle: index,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Casts straight down through `(x, z)` from just above the highest vertex.
    #[must_use]
    pub fn raycast_down(&self, x: f32, z: f32) -> Option<RayHit> {
        if !x.is_finite() || !z.is_finite() || !self.top.is_finite() {
            return None;
        }
        self.cast(Ray {
            origin: Vec3::new(x, self.top + PROBE_CLEARANCE, z),
            direction: Vec3::NEG_Y,
        })
    }
}

/// Möller–Trumbore ray/triangle test returning the ray parameter.
fn intersect(ray: Ray, [a, b, c]: [Vec3; 3]) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = ray.direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < RAY_EPSILON {
        return None;
    }
    let inv_det = det.recip();
    let s = ray.origin - a;
    let u = s.dot(p) * inv_det;
    if !(-RAY_EPSILON..=1.0 + RAY_EPSILON).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < -RAY_EPSILON || u + v > 1.0 + RAY_EPSILON {
        return None;
    }
    let t = edge2.dot(q) * inv_det;
    (t >= 0.0).then_some(t)
}

impl GroundQuery for TriangleMesh {
    fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        self.raycast_down(x, z).map(|hit| hit.point.y)
    }
}
