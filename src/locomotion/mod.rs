//! Terrain-relative locomotion.
//!
//! [`LocomotionEngine`] advances one player per tick through the
//! grounded/airborne state machine: gravity and landing while airborne,
//! slope sampling, classification and friction or sliding while grounded.
//! Everything else in this module either feeds it ([`MovementInput`],
//! [`LocomotionDriver`]) or watches it ([`FallLookLock`]).

mod driver;
mod engine;
mod intent;
mod look_lock;
mod response;
mod slope;
mod state;

pub use driver::{FrameOutcome, LocomotionDriver};
pub use engine::{LocomotionEngine, TickReport, Transition};
pub use intent::MovementInput;
pub use look_lock::{FallLookLock, LookLockChange, LOCKED_PITCH};
pub use response::respond;
pub use slope::{classify, sample_slope, SlopeSample, TerrainClass};
pub use state::{LocomotionSnapshot, LocomotionState};
