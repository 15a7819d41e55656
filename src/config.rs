//! Locomotion configuration.
//!
//! Every tuning knob the engine reads lives in [`LocomotionConfig`]. Values
//! default to [`crate::constants`] and may be overridden from JSON; partial
//! documents are accepted and missing fields keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::Resource;
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    AIRBORNE_EPSILON, AIR_CONTROL, AIR_DRAG, BLOCKED_CLIMB_RETAIN, CLIMB_FRICTION,
    DESCENT_ACCELERATION, DESCENT_FRICTION, EYE_HEIGHT, GENTLE_CLIMB_ANGLE, GENTLE_DESCENT_ANGLE,
    GRAVITY, GROUND_FRICTION, JUMP_IMPULSE, MAX_CLIMB_ANGLE, MAX_FALL_SPEED, MAX_FRAME_DT,
    SAMPLE_DISTANCE, SLIDE_ACCELERATION, SLIDE_DRAG, SLIDE_MAX_SPEED, SLIDE_THRESHOLD,
};

/// Errors raised while loading or validating a [`LocomotionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The document was not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field held a value the engine cannot work with.
    #[error("config field `{field}` = {value} is out of range (expected {expected})")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Value found in the document.
        value: f32,
        /// Human readable description of the accepted range.
        expected: &'static str,
    },
}

/// Tuning values consumed by [`crate::locomotion::LocomotionEngine`].
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocomotionConfig {
    /// Downward acceleration while airborne (units/s²).
    pub gravity: f32,
    /// Velocity kept per tick on flat ground.
    pub friction: f32,
    /// Steepest walkable ascent in degrees.
    pub max_climb_angle: f32,
    /// Descent angle in degrees beyond which sliding starts.
    pub slide_threshold: f32,
    /// Speed gained along the downhill axis per sliding tick.
    pub slide_acceleration: f32,
    /// Horizontal speed cap while sliding.
    pub slide_max_speed: f32,
    /// Velocity kept per sliding tick.
    pub slide_drag: f32,
    /// Forward distance used for slope sampling.
    pub sample_distance: f32,
    /// Camera offset above the surface.
    pub eye_height: f32,
    /// Upper bound for a single tick's `dt` in seconds.
    pub max_frame_dt: f32,
    /// Terminal fall speed.
    pub max_fall_speed: f32,
    /// Height above the standing position tolerated before going airborne.
    pub airborne_epsilon: f32,
    /// Horizontal authority kept while airborne.
    pub air_control: f32,
    /// Carried horizontal velocity kept per airborne tick.
    pub air_drag: f32,
    /// Velocity kept per tick against a blocked climb.
    pub blocked_climb_retain: f32,
    /// Velocity kept per tick on a walkable ascent.
    pub climb_friction: f32,
    /// Ascent angle in degrees where climb friction starts.
    pub gentle_climb_angle: f32,
    /// Velocity kept per tick on a walkable descent.
    pub descent_friction: f32,
    /// Speed gained along the downhill axis per descending tick.
    pub descent_acceleration: f32,
    /// Descent angle in degrees where descent handling starts.
    pub gentle_descent_angle: f32,
    /// Upward speed applied by a jump.
    pub jump_impulse: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            friction: GROUND_FRICTION,
            max_climb_angle: MAX_CLIMB_ANGLE,
            slide_threshold: SLIDE_THRESHOLD,
            slide_acceleration: SLIDE_ACCELERATION,
            slide_max_speed: SLIDE_MAX_SPEED,
            slide_drag: SLIDE_DRAG,
            sample_distance: SAMPLE_DISTANCE,
            eye_height: EYE_HEIGHT,
            max_frame_dt: MAX_FRAME_DT,
            max_fall_speed: MAX_FALL_SPEED,
            airborne_epsilon: AIRBORNE_EPSILON,
            air_control: AIR_CONTROL,
            air_drag: AIR_DRAG,
            blocked_climb_retain: BLOCKED_CLIMB_RETAIN,
            climb_friction: CLIMB_FRICTION,
            gentle_climb_angle: GENTLE_CLIMB_ANGLE,
            descent_friction: DESCENT_FRICTION,
            descent_acceleration: DESCENT_ACCELERATION,
            gentle_descent_angle: GENTLE_DESCENT_ANGLE,
            jump_impulse: JUMP_IMPULSE,
        }
    }
}

impl LocomotionConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Examples
    ///
    /// ```
    /// use frostwalk::config::LocomotionConfig;
    /// let config = LocomotionConfig::from_json_str(r#"{ "gravity": 20.0 }"#).unwrap();
    /// assert_eq!(config.gravity, 20.0);
    /// assert_eq!(config.eye_height, LocomotionConfig::default().eye_height);
    /// ```
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields and
    /// [`ConfigError::OutOfRange`] when validation fails.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`Self::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = path.as_ref();
        let text = fs::read_to_string(file).map_err(|source| ConfigError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
            .inspect_err(|err| warn!("rejected config {}: {err}", file.display()))
    }

    /// Checks that every field lies in a range the engine can integrate.
    ///
    /// # Errors
    /// Returns the first [`ConfigError::OutOfRange`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("gravity", self.gravity)?;
        positive("sample_distance", self.sample_distance)?;
        positive("max_frame_dt", self.max_frame_dt)?;
        positive("max_fall_speed", self.max_fall_speed)?;
        positive("slide_max_speed", self.slide_max_speed)?;
        non_negative("eye_height", self.eye_height)?;
        non_negative("airborne_epsilon", self.airborne_epsilon)?;
        non_negative("slide_acceleration", self.slide_acceleration)?;
        non_negative("descent_acceleration", self.descent_acceleration)?;
        non_negative("jump_impulse", self.jump_impulse)?;
        decay("friction", self.friction)?;
        decay("air_drag", self.air_drag)?;
        unit_interval("slide_drag", self.slide_drag)?;
        unit_interval("air_control", self.air_control)?;
        unit_interval("blocked_climb_retain", self.blocked_climb_retain)?;
        unit_interval("climb_friction", self.climb_friction)?;
        unit_interval("descent_friction", self.descent_friction)?;
        angle("max_climb_angle", self.max_climb_angle)?;
        angle("slide_threshold", self.slide_threshold)?;
        angle("gentle_climb_angle", self.gentle_climb_angle)?;
        angle("gentle_descent_angle", self.gentle_descent_angle)?;
        Ok(())
    }
}

const fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    check(field, value, value.is_finite() && value > 0.0, "a finite value > 0")
}

const fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    check(field, value, value.is_finite() && value >= 0.0, "a finite value >= 0")
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    check(field, value, (0.0..=1.0).contains(&value), "a value in [0, 1]")
}

fn decay(field: &'static str, value: f32) -> Result<(), ConfigError> {
    check(field, value, (0.0..1.0).contains(&value), "a value in [0, 1)")
}

fn angle(field: &'static str, value: f32) -> Result<(), ConfigError> {
    check(field, value, (0.0..=90.0).contains(&value), "degrees in [0, 90]")
}

const fn check(
    field: &'static str,
    value: f32,
    accepted: bool,
    expected: &'static str,
) -> Result<(), ConfigError> {
    if accepted {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_are_valid() {
        assert!(LocomotionConfig::default().validate().is_ok());
    }

    #[rstest]
    #[case::zero_gravity(r#"{ "gravity": 0.0 }"#, "gravity")]
    #[case::friction_above_one(r#"{ "friction": 1.5 }"#, "friction")]
    #[case::friction_without_decay(r#"{ "friction": 1.0 }"#, "friction")]
    #[case::air_drag_without_decay(r#"{ "air_drag": 1.0 }"#, "air_drag")]
    #[case::negative_eye(r#"{ "eye_height": -1.0 }"#, "eye_height")]
    #[case::steep_threshold(r#"{ "slide_threshold": 120.0 }"#, "slide_threshold")]
    fn out_of_range_fields_are_named(#[case] json: &str, #[case] expected_field: &str) {
        match LocomotionConfig::from_json_str(json) {
            Err(ConfigError::OutOfRange { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected OutOfRange for {expected_field}, got {other:?}"),
        }
    }

    #[rstest]
    fn unknown_fields_are_rejected() {
        let result = LocomotionConfig::from_json_str(r#"{ "gravityy": 9.0 }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[rstest]
    fn missing_file_reports_path() {
        let err = LocomotionConfig::load("/definitely/not/here.json")
            .expect_err("missing file should fail");
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
