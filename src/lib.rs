//! Terrain-relative locomotion for a first-person heightmap explorer.
//!
//! The crate answers "how high is the ground here?" through the
//! [`terrain::GroundQuery`] service and drives a player over that ground with
//! the [`locomotion::LocomotionEngine`] state machine. [`plugin`] wires both
//! into a Bevy schedule.
pub mod config;
pub mod constants;
pub mod locomotion;
pub mod logging;
pub mod numeric;
pub mod plugin;
pub mod terrain;
pub mod vector_math;

pub use config::{ConfigError, LocomotionConfig};
pub use locomotion::{
    LocomotionDriver, LocomotionEngine, LocomotionSnapshot, MovementInput, TerrainClass,
    TickReport, Transition,
};
pub use logging::init as init_logging;
pub use plugin::{ActiveTerrain, LocomotionPlugin, MovementIntent, PlayerLocomotion, TerrainFeed};
pub use terrain::{GroundQuery, HeightField, TerrainHandle, TriangleMesh};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use frostwalk::prelude::*;
    //! ```

    pub use crate::config::LocomotionConfig;
    pub use crate::locomotion::{LocomotionEngine, MovementInput, TerrainClass, Transition};
    pub use crate::plugin::{ActiveTerrain, LocomotionPlugin, MovementIntent, PlayerLocomotion};
    pub use crate::terrain::{terrain_channel, GroundFn, GroundQuery, HeightField, TriangleMesh};
    pub use glam::{Vec2, Vec3};
}
