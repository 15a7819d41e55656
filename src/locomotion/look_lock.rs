//! Camera override for the opening drop.
//!
//! While the player plummets from spawn the camera is pinned to look
//! straight down. Yaw stays under player control; only pitch is forced.

use bevy::prelude::Component;
use log::debug;

use super::state::LocomotionSnapshot;
use crate::config::LocomotionConfig;
use crate::constants::{LOOK_LOCK_MIN_ALTITUDE, LOOK_LOCK_RELEASE_DISTANCE};

/// Pitch applied while the lock is engaged, in radians.
pub const LOCKED_PITCH: f32 = -std::f32::consts::FRAC_PI_2;

/// Engage/release edge reported by [`FallLookLock::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookLockChange {
    /// The camera is now pinned downward.
    Engaged,
    /// Free look is restored.
    Released,
}

/// Read-only observer of locomotion snapshots that pins camera pitch during
/// a high fall.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct FallLookLock {
    engaged: bool,
    min_altitude: f32,
    release_distance: f32,
}

impl Default for FallLookLock {
    fn default() -> Self {
        Self::new(LOOK_LOCK_MIN_ALTITUDE, LOOK_LOCK_RELEASE_DISTANCE)
    }
}

impl FallLookLock {
    /// Engages above `min_altitude` with more than `release_distance` to the
    /// standing height; releases at or below `release_distance`.
    #[must_use]
    pub const fn new(min_altitude: f32, release_distance: f32) -> Self {
        Self {
            engaged: false,
            min_altitude,
            release_distance,
        }
    }

    /// Whether pitch is currently forced.
    #[must_use]
    pub const fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Updates the lock from the latest snapshot and the ground height under
    /// the player, returning the edge if one occurred.
    ///
    /// An unknown ground height never engages the lock; landing always
    /// releases it.
    pub fn observe(
        &mut self,
        snapshot: &LocomotionSnapshot,
        ground_height: Option<f32>,
        config: &LocomotionConfig,
    ) -> Option<LookLockChange> {
        let distance = ground_height.map(|h| snapshot.position.y - (h + config.eye_height));

        if self.engaged {
            let close = distance.is_some_and(|d| d <= self.release_distance);
            if close || snapshot.grounded {
                self.engaged = false;
                debug!("fall look lock released");
                return Some(LookLockChange::Released);
            }
            return None;
        }

        let far = distance.is_some_and(|d| d > self.release_distance);
        if !snapshot.grounded && snapshot.position.y > self.min_altitude && far {
            self.engaged = true;
            debug!("fall look lock engaged");
            return Some(LookLockChange::Engaged);
        }
        None
    }

    /// Returns `(yaw, pitch)` with pitch overridden while engaged.
    #[must_use]
    pub const fn apply(&self, yaw: f32, pitch: f32) -> (f32, f32) {
        if self.engaged {
            (yaw, LOCKED_PITCH)
        } else {
            (yaw, pitch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rstest::rstest;

    fn falling_at(y: f32) -> LocomotionSnapshot {
        LocomotionSnapshot {
            position: Vec3::new(0.0, y, 0.0),
            grounded: false,
            slope_angle: 0.0,
            velocity: Vec3::new(0.0, -10.0, 0.0),
        }
    }

    #[rstest]
    fn engages_high_and_releases_near_ground() {
        let config = LocomotionConfig::default();
        let mut lock = FallLookLock::default();

        assert_eq!(
            lock.observe(&falling_at(100.0), Some(0.0), &config),
            Some(LookLockChange::Engaged)
        );
        assert_eq!(lock.apply(0.7, 0.1), (0.7, LOCKED_PITCH));
        assert_eq!(lock.observe(&falling_at(40.0), Some(0.0), &config), None);
        assert_eq!(
            lock.observe(&falling_at(11.0), Some(0.0), &config),
            Some(LookLockChange::Released)
        );
        assert_eq!(lock.apply(0.7, 0.1), (0.7, 0.1));
    }

    #[rstest]
    #[case::too_low(45.0, Some(0.0))]
    #[case::high_ground(60.0, Some(50.0))]
    #[case::no_ground(100.0, None)]
    fn stays_disengaged(#[case] y: f32, #[case] ground: Option<f32>) {
        let mut lock = FallLookLock::default();
        assert_eq!(
            lock.observe(&falling_at(y), ground, &LocomotionConfig::default()),
            None
        );
        assert!(!lock.is_engaged());
    }

    #[rstest]
    fn landing_releases() {
        let config = LocomotionConfig::default();
        let mut lock = FallLookLock::default();
        lock.observe(&falling_at(100.0), Some(0.0), &config);
        let mut landed = falling_at(100.0);
        landed.grounded = true;
        assert_eq!(
            lock.observe(&landed, None, &config),
            Some(LookLockChange::Released)
        );
    }
}
