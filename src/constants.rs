//! Default locomotion tuning values.
//!
//! [`crate::config::LocomotionConfig::default`] is built from these. Distances
//! are world units, time is seconds, angles are degrees. Multipliers marked
//! "per tick" are applied once per physics update regardless of `dt`.

/// Downward acceleration while airborne (units/s²).
pub const GRAVITY: f32 = 35.0;
/// Fraction of horizontal velocity kept per tick on flat ground.
pub const GROUND_FRICTION: f32 = 0.85;
/// Steepest ascent the player can walk up.
pub const MAX_CLIMB_ANGLE: f32 = 30.0;
/// Descent angle beyond which the player slides.
pub const SLIDE_THRESHOLD: f32 = 25.0;
/// Speed added along the downhill axis each sliding tick.
pub const SLIDE_ACCELERATION: f32 = 0.8;
/// Horizontal speed cap while sliding (units/s).
pub const SLIDE_MAX_SPEED: f32 = 20.0;
/// Drag applied per tick while sliding.
pub const SLIDE_DRAG: f32 = 0.95;
/// Horizontal distance ahead of the player used to estimate slope.
pub const SAMPLE_DISTANCE: f32 = 2.5;
/// Camera height above the terrain surface.
pub const EYE_HEIGHT: f32 = 1.6;
/// Ceiling applied to frame delta time (50 ms).
pub const MAX_FRAME_DT: f32 = 0.05;
/// Terminal fall speed (units/s).
pub const MAX_FALL_SPEED: f32 = 50.0;
/// Height above the standing position at which the player counts as airborne.
pub const AIRBORNE_EPSILON: f32 = 0.5;
/// Horizontal authority kept while airborne.
pub const AIR_CONTROL: f32 = 0.5;
/// Fraction of carried horizontal velocity kept per airborne tick.
pub const AIR_DRAG: f32 = 0.9;
/// Fraction of velocity kept per tick when a climb is too steep.
pub const BLOCKED_CLIMB_RETAIN: f32 = 0.05;
/// Fraction of velocity kept per tick on a walkable ascent.
pub const CLIMB_FRICTION: f32 = 0.3;
/// Ascent angle above which climb friction applies.
pub const GENTLE_CLIMB_ANGLE: f32 = 5.0;
/// Fraction of velocity kept per tick on a walkable descent.
pub const DESCENT_FRICTION: f32 = 0.88;
/// Speed added along the downhill axis each descending tick.
pub const DESCENT_ACCELERATION: f32 = SLIDE_ACCELERATION * 0.3;
/// Descent angle above which descent handling applies.
pub const GENTLE_DESCENT_ANGLE: f32 = 3.0;
/// Upward speed given by a jump (units/s).
pub const JUMP_IMPULSE: f32 = 15.0;

/// Side length of the default square terrain.
pub const TERRAIN_SCALE: f32 = 100.0;
/// Movement per frame produced by a held direction key.
pub const MOVE_SPEED: f32 = 0.25;
/// Speed multiplier while running.
pub const RUN_MULTIPLIER: f32 = 2.5;

/// Movement vectors shorter than this use the default sample axis.
pub const MIN_SAMPLE_DIRECTION: f32 = 0.001;

/// World altitude the camera must exceed for the fall look lock to engage.
pub const LOOK_LOCK_MIN_ALTITUDE: f32 = 50.0;
/// Ground distance at which the fall look lock releases.
pub const LOOK_LOCK_RELEASE_DISTANCE: f32 = 10.0;
