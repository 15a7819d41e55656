//! Player movement intent for a single tick.

use glam::Vec2;

use crate::vector_math::rotate_by_yaw;

/// Horizontal displacement requested this tick plus the jump flag.
///
/// `displacement` is already rotated into world `(x, z)` and expressed as a
/// per-tick distance; the engine divides it by `dt` to obtain a velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementInput {
    /// World-space `(x, z)` displacement.
    pub displacement: Vec2,
    /// Jump requested this tick.
    pub jump: bool,
}

impl MovementInput {
    /// No movement and no jump.
    pub const IDLE: Self = Self {
        displacement: Vec2::ZERO,
        jump: false,
    };

    /// Displacement without a jump.
    #[must_use]
    pub const fn walk(displacement: Vec2) -> Self {
        Self {
            displacement,
            jump: false,
        }
    }

    /// Jump without horizontal input.
    #[must_use]
    pub const fn jump() -> Self {
        Self {
            displacement: Vec2::ZERO,
            jump: true,
        }
    }

    /// Maps keyboard-style axes to a world displacement.
    ///
    /// `forward` and `strafe` are in `[-1, 1]` (W/S and D/A). The combined
    /// axis vector is normalised so diagonals are not faster, scaled by
    /// `speed` (times `run_multiplier` when `running`) and rotated by the
    /// camera `yaw`.
    ///
    /// # Examples
    /// ```
    /// use frostwalk::locomotion::MovementInput;
    /// let input = MovementInput::from_local_axes(1.0, 0.0, 0.0, 0.25, false, 2.5);
    /// assert!((input.displacement.y + 0.25).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn from_local_axes(
        forward: f32,
        strafe: f32,
        yaw: f32,
        speed: f32,
        running: bool,
        run_multiplier: f32,
    ) -> Self {
        // Camera-local: forward is -z, strafe right is +x.
        let local = Vec2::new(strafe, -forward).normalize_or_zero();
        let scale = if running { speed * run_multiplier } else { speed };
        Self::walk(rotate_by_yaw(local * scale, yaw))
    }

    /// Returns a copy with the jump flag set.
    #[must_use]
    pub const fn with_jump(mut self, jump: bool) -> Self {
        self.jump = jump;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MOVE_SPEED, RUN_MULTIPLIER};
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    fn diagonals_are_not_faster() {
        let input =
            MovementInput::from_local_axes(1.0, 1.0, 0.3, MOVE_SPEED, false, RUN_MULTIPLIER);
        assert_relative_eq!(input.displacement.length(), MOVE_SPEED, epsilon = 1e-6);
    }

    #[rstest]
    fn running_scales_speed() {
        let input =
            MovementInput::from_local_axes(0.0, -1.0, 0.0, MOVE_SPEED, true, RUN_MULTIPLIER);
        assert_relative_eq!(
            input.displacement.x,
            -MOVE_SPEED * RUN_MULTIPLIER,
            epsilon = 1e-6
        );
    }

    #[rstest]
    fn no_axes_means_idle() {
        let input =
            MovementInput::from_local_axes(0.0, 0.0, 1.0, MOVE_SPEED, true, RUN_MULTIPLIER);
        assert_eq!(input, MovementInput::IDLE);
    }

    #[rstest]
    fn with_jump_keeps_the_displacement() {
        let input = MovementInput::walk(Vec2::new(0.25, 0.0)).with_jump(true);
        assert!(input.jump);
        assert_eq!(input.displacement, Vec2::new(0.25, 0.0));
        assert_eq!(MovementInput::jump(), MovementInput::IDLE.with_jump(true));
    }
}
