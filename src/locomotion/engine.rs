//! The grounded/airborne state machine.

use glam::{Vec2, Vec3};
use log::debug;
use serde::{Deserialize, Serialize};

use super::intent::MovementInput;
use super::response::respond;
use super::slope::{classify, sample_slope, SlopeSample, TerrainClass};
use super::state::{LocomotionSnapshot, LocomotionState};
use crate::config::LocomotionConfig;
use crate::constants::MIN_SAMPLE_DIRECTION;
use crate::numeric::clamp_frame_dt;
use crate::terrain::GroundQuery;
use crate::vector_math::{lift, planar, planar_direction_or};

/// A change of locomotion state during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    /// A jump launched the player off the ground.
    Jumped,
    /// The surface dropped away or vanished beneath the player.
    LeftGround,
    /// A falling player reached the surface.
    Landed,
}

/// Outcome of one [`LocomotionEngine::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// State after the tick.
    pub snapshot: LocomotionSnapshot,
    /// Classification used by a grounded tick; `None` for airborne and
    /// zero-length ticks.
    pub terrain: Option<TerrainClass>,
    /// State change that happened during the tick, if any.
    pub transition: Option<Transition>,
}

/// Per-tick horizontal intent handed to the grounded branch.
#[derive(Debug, Clone, Copy)]
struct GroundedMotion {
    /// Velocity the sample axis was taken along.
    steering: Vec2,
    /// Input displacement expressed as a rate.
    walk: Vec2,
    dt: f32,
}

/// Owns the locomotion state for one player and is its only writer.
///
/// # Examples
/// ```
/// use frostwalk::config::LocomotionConfig;
/// use frostwalk::locomotion::{LocomotionEngine, MovementInput};
/// use frostwalk::terrain::GroundFn;
/// use glam::Vec3;
///
/// let ground = GroundFn(|_, _| Some(0.0));
/// let mut engine = LocomotionEngine::new(LocomotionConfig::default(), Vec3::new(0.0, 5.0, 0.0));
/// for _ in 0..200 {
///     engine.step(&ground, &MovementInput::IDLE, 0.016);
/// }
/// assert!(engine.state().grounded);
/// assert_eq!(engine.state().position.y, 1.6);
/// ```
#[derive(Debug, Clone)]
pub struct LocomotionEngine {
    config: LocomotionConfig,
    state: LocomotionState,
}

impl LocomotionEngine {
    /// Creates an engine with the player airborne and at rest at `spawn`.
    #[must_use]
    pub const fn new(config: LocomotionConfig, spawn: Vec3) -> Self {
        Self {
            config,
            state: LocomotionState::airborne_at(spawn),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &LocomotionState {
        &self.state
    }

    /// Observer copy of the current state.
    #[must_use]
    pub const fn snapshot(&self) -> LocomotionSnapshot {
        self.state.snapshot()
    }

    /// Tuning in effect.
    #[must_use]
    pub const fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Replaces the tuning; the state is left untouched.
    pub const fn set_config(&mut self, config: LocomotionConfig) {
        self.config = config;
    }

    /// Puts the player back at `position`, airborne and at rest.
    pub fn respawn(&mut self, position: Vec3) {
        debug!("respawning at {position}");
        self.state = LocomotionState::airborne_at(position);
    }

    /// Advances the simulation by `elapsed` seconds.
    ///
    /// `elapsed` is clamped to `max_frame_dt`; non-finite or non-positive
    /// values leave the state unchanged. Missing terrain never fails a tick:
    /// a missing forward sample reads as level ground and a missing sample
    /// under the player makes them airborne.
    ///
    /// Held input sets the grounded velocity for the tick; carried velocity
    /// only persists while idle or sliding.
    pub fn step<Q: GroundQuery + ?Sized>(
        &mut self,
        ground: &Q,
        input: &MovementInput,
        elapsed: f32,
    ) -> TickReport {
        let dt = clamp_frame_dt(elapsed, self.config.max_frame_dt);
        if dt <= 0.0 {
            return self.report(None, None);
        }

        let mut transition = None;
        if self.state.grounded && input.jump {
            self.state.grounded = false;
            self.state.vertical_velocity = -self.config.jump_impulse;
            transition = Some(Transition::Jumped);
        }

        if self.state.grounded {
            let walk = input.displacement / dt;
            let steering = self.steering(walk);
            let axis = planar_direction_or(steering, Vec2::Y, MIN_SAMPLE_DIRECTION);
            let here = planar(self.state.position);
            match sample_slope(ground, here, axis, self.config.sample_distance) {
                Some((h1, sample)) if self.within_standing_envelope(h1) => {
                    let motion = GroundedMotion {
                        steering,
                        walk,
                        dt,
                    };
                    let (class, left) = self.grounded_tick(ground, motion, &sample);
                    return self.finish(Some(class), left.then_some(Transition::LeftGround));
                }
                Some(_) => {}
                None => {
                    self.state.slope_angle = 0.0;
                    self.state.slope_direction = Vec3::Z;
                }
            }
            self.state.grounded = false;
            transition = Some(Transition::LeftGround);
        }

        if self.airborne_tick(ground, input, dt) {
            transition = Some(Transition::Landed);
        }
        self.finish(None, transition)
    }

    /// The input rate while input is held, otherwise the carried velocity.
    fn steering(&self, walk: Vec2) -> Vec2 {
        if walk == Vec2::ZERO {
            self.state.horizontal_velocity
        } else {
            walk
        }
    }

    const fn within_standing_envelope(&self, ground_height: f32) -> bool {
        self.state.position.y
            <= ground_height + self.config.eye_height + self.config.airborne_epsilon
    }

    /// Returns the class applied and whether the player left the ground.
    fn grounded_tick<Q: GroundQuery + ?Sized>(
        &mut self,
        ground: &Q,
        motion: GroundedMotion,
        sample: &SlopeSample,
    ) -> (TerrainClass, bool) {
        let class = classify(sample.angle, &self.config);
        let base = if class == TerrainClass::Slide {
            self.state.horizontal_velocity + motion.walk
        } else {
            motion.steering
        };
        let velocity = respond(class, base, sample, &self.config);
        let moved = planar(self.state.position) + velocity * motion.dt;

        self.state.horizontal_velocity = velocity;
        self.state.vertical_velocity = 0.0;
        self.state.slope_angle = sample.angle;
        self.state.slope_direction = sample.direction;

        let standing = ground
            .height_at(moved.x, moved.y)
            .map(|h| h + self.config.eye_height)
            .filter(|&y| self.state.position.y - y <= self.config.airborne_epsilon);
        let left = standing.is_none();
        self.state.position = lift(moved, standing.unwrap_or(self.state.position.y));
        if left {
            self.state.grounded = false;
        }
        (class, left)
    }

    /// Integrates one airborne tick and returns `true` on landing.
    fn airborne_tick<Q: GroundQuery + ?Sized>(
        &mut self,
        ground: &Q,
        input: &MovementInput,
        dt: f32,
    ) -> bool {
        let state = &mut self.state;
        state.vertical_velocity =
            (state.vertical_velocity + self.config.gravity * dt).min(self.config.max_fall_speed);
        state.horizontal_velocity *= self.config.air_drag;
        let y = state.position.y - state.vertical_velocity * dt;
        let moved = planar(state.position)
            + state.horizontal_velocity * dt
            + input.displacement * self.config.air_control;

        let landing = ground
            .height_at(moved.x, moved.y)
            .map(|h| h + self.config.eye_height)
            .filter(|&standing| state.vertical_velocity >= 0.0 && y <= standing);
        state.position = lift(moved, landing.unwrap_or(y));
        if landing.is_some() {
            state.vertical_velocity = 0.0;
            state.grounded = true;
        }
        landing.is_some()
    }

    fn finish(
        &self,
        terrain: Option<TerrainClass>,
        transition: Option<Transition>,
    ) -> TickReport {
        if let Some(change) = transition {
            let position = self.state.position;
            debug!("locomotion transition {change:?} at {position}");
        }
        self.report(terrain, transition)
    }

    const fn report(
        &self,
        terrain: Option<TerrainClass>,
        transition: Option<Transition>,
    ) -> TickReport {
        TickReport {
            snapshot: self.snapshot(),
            terrain,
            transition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::MockGroundQuery;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    fn flat_ground(height: f32) -> MockGroundQuery {
        let mut ground = MockGroundQuery::new();
        ground.expect_height_at().returning(move |_, _| Some(height));
        ground
    }

    #[fixture]
    fn standing() -> LocomotionEngine {
        let mut engine =
            LocomotionEngine::new(LocomotionConfig::default(), Vec3::new(0.0, 1.6, 0.0));
        let report = engine.step(&flat_ground(0.0), &MovementInput::IDLE, 0.016);
        assert_eq!(report.transition, Some(Transition::Landed));
        engine
    }

    #[rstest]
    #[case::zero(0.0)]
    #[case::negative(-0.5)]
    #[case::nan(f32::NAN)]
    fn degenerate_dt_is_a_no_op(#[case] dt: f32) {
        let mut ground = MockGroundQuery::new();
        ground.expect_height_at().never();
        let mut engine =
            LocomotionEngine::new(LocomotionConfig::default(), Vec3::new(0.0, 20.0, 0.0));
        let before = *engine.state();
        let report = engine.step(&ground, &MovementInput::IDLE, dt);
        assert_eq!(*engine.state(), before);
        assert_eq!(report.transition, None);
    }

    #[rstest]
    fn hitches_are_clamped() {
        let mut engine =
            LocomotionEngine::new(LocomotionConfig::default(), Vec3::new(0.0, 100.0, 0.0));
        engine.step(&flat_ground(0.0), &MovementInput::IDLE, 10.0);
        // One 0.05 s step: v = 35 * 0.05, y = 100 - v * 0.05.
        assert_relative_eq!(engine.state().vertical_velocity, 1.75, epsilon = 1e-5);
        assert_relative_eq!(engine.state().position.y, 100.0 - 0.0875, epsilon = 1e-4);
    }

    #[rstest]
    fn fall_speed_is_capped() {
        let mut engine =
            LocomotionEngine::new(LocomotionConfig::default(), Vec3::new(0.0, 1.0e6, 0.0));
        let ground = flat_ground(0.0);
        for _ in 0..200 {
            engine.step(&ground, &MovementInput::IDLE, 0.05);
        }
        assert_relative_eq!(engine.state().vertical_velocity, 50.0);
    }

    #[rstest]
    fn jump_leaves_and_returns_to_ground(mut standing: LocomotionEngine) {
        let ground = flat_ground(0.0);
        let report = standing.step(&ground, &MovementInput::jump(), 0.016);
        assert_eq!(report.transition, Some(Transition::Jumped));
        assert!(!standing.state().grounded);
        assert!(standing.state().position.y > 1.6);

        let landed = (0..200)
            .map(|_| standing.step(&ground, &MovementInput::IDLE, 0.016))
            .find(|r| r.transition == Some(Transition::Landed));
        assert!(landed.is_some());
        assert_relative_eq!(standing.state().position.y, 1.6);
    }

    #[rstest]
    fn jump_is_ignored_while_airborne() {
        let mut engine =
            LocomotionEngine::new(LocomotionConfig::default(), Vec3::new(0.0, 30.0, 0.0));
        let report = engine.step(&flat_ground(0.0), &MovementInput::jump(), 0.016);
        assert_eq!(report.transition, None);
        assert!(engine.state().vertical_velocity > 0.0);
    }

    #[rstest]
    fn vanishing_ground_makes_player_airborne(mut standing: LocomotionEngine) {
        let mut ground = MockGroundQuery::new();
        ground.expect_height_at().returning(|_, _| None);
        let report = standing.step(&ground, &MovementInput::IDLE, 0.016);
        assert_eq!(report.transition, Some(Transition::LeftGround));
        assert!(!standing.state().grounded);
        assert_eq!(standing.state().slope_angle, 0.0);
    }

    #[rstest]
    fn missing_forward_sample_reads_flat(mut standing: LocomotionEngine) {
        let mut ground = MockGroundQuery::new();
        ground
            .expect_height_at()
            .returning(|_, z| (z.abs() < 1.0).then_some(0.0));
        let report = standing.step(&ground, &MovementInput::IDLE, 0.016);
        assert_eq!(report.terrain, Some(TerrainClass::Flat));
        assert_eq!(standing.state().slope_angle, 0.0);
        assert!(standing.state().grounded);
    }

    #[rstest]
    fn cliff_edge_starts_a_fall(mut standing: LocomotionEngine) {
        let mut ground = MockGroundQuery::new();
        ground
            .expect_height_at()
            .returning(|x, _| Some(if x < 0.1 { 0.0 } else { -20.0 }));
        let input = MovementInput::walk(Vec2::new(0.25, 0.0));
        let report = standing.step(&ground, &input, 0.016);
        assert_eq!(report.transition, Some(Transition::LeftGround));
        assert_relative_eq!(standing.state().position.y, 1.6);
    }

    #[rstest]
    fn carried_speed_bleeds_off_in_the_air(mut standing: LocomotionEngine) {
        let mut ground = MockGroundQuery::new();
        ground
            .expect_height_at()
            .returning(|x, _| Some(if x < 0.1 { 0.0 } else { -1_000.0 }));
        let input = MovementInput::walk(Vec2::new(0.25, 0.0));
        let report = standing.step(&ground, &input, 0.016);
        assert_eq!(report.transition, Some(Transition::LeftGround));

        let mut previous = standing.state().horizontal_velocity.length();
        assert!(previous > 0.0);
        for _ in 0..60 {
            standing.step(&ground, &MovementInput::IDLE, 0.016);
            assert!(!standing.state().grounded);
            let speed = standing.state().horizontal_velocity.length();
            assert!(speed < previous, "{speed} did not drop below {previous}");
            previous = speed;
        }
    }

    #[rstest]
    fn held_input_sets_grounded_velocity(mut standing: LocomotionEngine) {
        let ground = flat_ground(0.0);
        let input = MovementInput::walk(Vec2::new(0.0, 0.25));
        let expected = 0.25 / 0.016 * standing.config().friction;
        for _ in 0..120 {
            let report = standing.step(&ground, &input, 0.016);
            assert_relative_eq!(report.snapshot.velocity.length(), expected, epsilon = 1e-3);
        }
    }

    #[rstest]
    fn respawn_resets_motion(mut standing: LocomotionEngine) {
        standing.respawn(Vec3::new(3.0, 40.0, -2.0));
        let state = standing.state();
        assert!(!state.grounded);
        assert_eq!(state.vertical_velocity, 0.0);
        assert_eq!(state.horizontal_velocity, Vec2::ZERO);
        assert_eq!(state.position, Vec3::new(3.0, 40.0, -2.0));
    }
}
