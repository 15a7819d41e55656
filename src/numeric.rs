//! Numeric helpers shared by the terrain and locomotion code.
//!
//! These guard the float-to-index conversions used for grid lookups and keep
//! frame timing sane when the host hands us hitches or garbage.

/// Sanitises a frame delta: non-finite or negative values become `0.0` and
/// the result never exceeds `ceiling`.
///
/// # Examples
///
/// ```
/// use frostwalk::numeric::clamp_frame_dt;
/// assert_eq!(clamp_frame_dt(0.016, 0.05), 0.016);
/// assert_eq!(clamp_frame_dt(2.0, 0.05), 0.05);
/// assert_eq!(clamp_frame_dt(f32::NAN, 0.05), 0.0);
/// assert_eq!(clamp_frame_dt(-1.0, 0.05), 0.0);
/// ```
#[must_use]
pub const fn clamp_frame_dt(dt: f32, ceiling: f32) -> f32 {
    if !dt.is_finite() || dt <= 0.0 {
        return 0.0;
    }
    dt.min(ceiling)
}

/// Floors `value` into a cell index in `0..=max_index`.
///
/// Returns `None` for non-finite or negative input and for values beyond
/// `max_index + 1`. A value exactly on the far edge maps to `max_index` so the
/// closing boundary of a grid still resolves to its last cell.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "The floored value is validated against the index domain first."
)]
#[must_use]
pub const fn floor_to_cell(value: f32, max_index: usize) -> Option<usize> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let limit = max_index.saturating_add(1) as f32;
    if value > limit {
        return None;
    }
    // Truncation floors a non-negative value.
    let floored = value as usize;
    if floored > max_index {
        Some(max_index)
    } else {
        Some(floored)
    }
}

/// Converts a grid count to `f32` for spacing calculations.
#[expect(
    clippy::cast_precision_loss,
    reason = "Grid dimensions stay far below 2^24."
)]
#[must_use]
pub const fn count_to_f32(count: usize) -> f32 {
    count as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 3, Some(0))]
    #[case(2.7, 3, Some(2))]
    #[case(4.0, 3, Some(3))]
    #[case(3.99, 3, Some(3))]
    #[case(4.01, 3, None)]
    #[case(-0.01, 3, None)]
    #[case(f32::INFINITY, 3, None)]
    fn floor_to_cell_cases(
        #[case] value: f32,
        #[case] max_index: usize,
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(floor_to_cell(value, max_index), expected);
    }
}
