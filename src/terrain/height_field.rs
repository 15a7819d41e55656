//! Grid-backed terrain surface.
//!
//! Samples sit on a regular `columns × rows` lattice spanning
//! `[-S/2, S/2]` on both axes. Each cell is split along the diagonal from its
//! `(col, row)` corner to its `(col + 1, row + 1)` corner and each half is a
//! flat triangle, so [`HeightField::height_at`] returns exactly what a
//! downward ray against [`HeightField::to_mesh`] would hit.

use glam::Vec3;
use thiserror::Error;

use super::{GroundQuery, TerrainBounds, TriangleMesh};
use crate::numeric::{count_to_f32, floor_to_cell};

/// Reasons a [`HeightField`] cannot be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HeightFieldError {
    /// Fewer than two samples along an axis leaves no cell to triangulate.
    #[error("height field needs at least 2x2 samples, got {columns}x{rows}")]
    TooSmall {
        /// Samples along x.
        columns: usize,
        /// Samples along z.
        rows: usize,
    },
    /// The sample buffer does not match the declared dimensions.
    #[error("expected {expected} samples for the grid, got {actual}")]
    SampleCount {
        /// `columns * rows`, saturated at `usize::MAX` on overflow.
        expected: usize,
        /// Length of the provided buffer.
        actual: usize,
    },
    /// A sample was NaN or infinite.
    #[error("sample {index} is not finite")]
    NonFiniteSample {
        /// Row-major index of the offending sample.
        index: usize,
    },
    /// The terrain scale must be a positive finite length.
    #[error("terrain scale {0} must be finite and positive")]
    InvalidScale(f32),
}

/// Immutable triangulated height field.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    columns: usize,
    rows: usize,
    scale: f32,
    cell_x: f32,
    cell_z: f32,
    heights: Vec<f32>,
}

impl HeightField {
    /// Builds a height field from row-major elevations (`index = row * columns + col`,
    /// rows run along +z).
    ///
    /// # Errors
    /// See [`HeightFieldError`].
    pub fn new(
        columns: usize,
        rows: usize,
        scale: f32,
        heights: Vec<f32>,
    ) -> Result<Self, HeightFieldError> {
        if columns < 2 || rows < 2 {
            return Err(HeightFieldError::TooSmall { columns, rows });
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(HeightFieldError::InvalidScale(scale));
        }
        let Some(expected) = columns.checked_mul(rows) else {
            return Err(HeightFieldError::SampleCount {
                expected: usize::MAX,
                actual: heights.len(),
            });
        };
        if heights.len() != expected {
            return Err(HeightFieldError::SampleCount {
                expected,
                actual: heights.len(),
            });
        }
        if let Some(index) = heights.iter().position(|h| !h.is_finite()) {
            return Err(HeightFieldError::NonFiniteSample { index });
        }

        Ok(Self {
            columns,
            rows,
            scale,
            cell_x: scale / count_to_f32(columns - 1),
            cell_z: scale / count_to_f32(rows - 1),
            heights,
        })
    }

    /// Builds a height field from decoded 8-bit heightmap intensities.
    ///
    /// Each sample maps to `base + intensity / 255 * max_elevation`.
    ///
    /// # Examples
    /// ```
    /// use frostwalk::terrain::{GroundQuery, HeightField};
    /// let field =
    ///     HeightField::from_intensities(2, 2, 10.0, &[0, 0, 255, 255], 20.0, -5.0).unwrap();
    /// assert_eq!(field.height_at(0.0, -5.0), Some(-5.0));
    /// assert_eq!(field.height_at(0.0, 5.0), Some(15.0));
    /// ```
    ///
    /// # Errors
    /// See [`HeightFieldError`].
    pub fn from_intensities(
        columns: usize,
        rows: usize,
        scale: f32,
        intensities: &[u8],
        max_elevation: f32,
        base: f32,
    ) -> Result<Self, HeightFieldError> {
        let heights = intensities
            .iter()
            .map(|&i| base + f32::from(i) / 255.0 * max_elevation)
            .collect();
        Self::new(columns, rows, scale, heights)
    }

    /// Samples `elevation(x, z)` at every lattice point in world coordinates.
    ///
    /// # Errors
    /// See [`HeightFieldError`]; non-finite closure output is rejected.
    pub fn from_fn(
        columns: usize,
        rows: usize,
        scale: f32,
        elevation: impl Fn(f32, f32) -> f32,
    ) -> Result<Self, HeightFieldError> {
        if columns < 2 || rows < 2 {
            return Err(HeightFieldError::TooSmall { columns, rows });
        }
        let half = scale * 0.5;
        let step_x = scale / count_to_f32(columns - 1);
        let step_z = scale / count_to_f32(rows - 1);
        let heights = (0..rows)
            .flat_map(|row| (0..columns).map(move |col| (col, row)))
            .map(|(col, row)| {
                elevation(
                    count_to_f32(col) * step_x - half,
                    count_to_f32(row) * step_z - half,
                )
            })
            .collect();
        Self::new(columns, rows, scale, heights)
    }

    /// Samples along x.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Samples along z.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Side length of the covered square.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Horizontal extent of the surface.
    #[must_use]
    pub const fn bounds(&self) -> TerrainBounds {
        TerrainBounds::from_scale(self.scale)
    }

    /// Raw elevation at a lattice point.
    #[must_use]
    pub fn sample(&self, col: usize, row: usize) -> Option<f32> {
        if col >= self.columns || row >= self.rows {
            return None;
        }
        self.heights.get(row * self.columns + col).copied()
    }

    fn vertex(&self, col: usize, row: usize) -> Vec3 {
        let half = self.scale * 0.5;
        Vec3::new(
            count_to_f32(col) * self.cell_x - half,
            self.sample(col, row).unwrap_or_default(),
            count_to_f32(row) * self.cell_z - half,
        )
    }

    /// Triangulates the field with the same diagonal split used by
    /// [`GroundQuery::height_at`].
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Vertex counts are bounded by the sample buffer, which fits u32 in practice."
    )]
    #[must_use]
    pub fn to_mesh(&self) -> TriangleMesh {
        let vertices: Vec<Vec3> = (0..self.rows)
            .flat_map(|row| (0..self.columns).map(move |col| (col, row)))
            .map(|(col, row)| self.vertex(col, row))
            .collect();

        let columns = self.columns;
        let index = move |col: usize, row: usize| (row * columns + col) as u32;
        let triangles = (0..self.rows - 1)
            .flat_map(|row| (0..self.columns - 1).map(move |col| (col, row)))
            .flat_map(|(col, row)| {
                let v00 = index(col, row);
                let v10 = index(col + 1, row);
                let v01 = index(col, row + 1);
                let v11 = index(col + 1, row + 1);
                [[v00, v10, v11], [v00, v11, v01]]
            })
            .collect();

        TriangleMesh::from_parts_unchecked(vertices, triangles)
    }
}

impl GroundQuery for HeightField {
    fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        if !self.bounds().contains(x, z) {
            return None;
        }
        let half = self.scale * 0.5;
        let u = ((x + half) / self.cell_x).clamp(0.0, count_to_f32(self.columns - 1));
        let v = ((z + half) / self.cell_z).clamp(0.0, count_to_f32(self.rows - 1));
        let col = floor_to_cell(u, self.columns - 2)?;
        let row = floor_to_cell(v, self.rows - 2)?;
        let fx = (u - count_to_f32(col)).clamp(0.0, 1.0);
        let fz = (v - count_to_f32(row)).clamp(0.0, 1.0);

        let h00 = self.sample(col, row)?;
        let h10 = self.sample(col + 1, row)?;
        let h01 = self.sample(col, row + 1)?;
        let h11 = self.sample(col + 1, row + 1)?;

        let height = if fx >= fz {
            h00 + (h10 - h00) * fx + (h11 - h10) * fz
        } else {
            h00 + (h11 - h01) * fx + (h01 - h00) * fz
        };
        Some(height)
    }
}
