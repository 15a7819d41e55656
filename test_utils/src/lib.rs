//! Utility helpers for tests.
//!
//! Terrain fixtures live in [`terrain`], engine shortcuts in [`engine`] and a
//! headless Bevy harness in [`app`].

pub mod app;
pub mod engine;
pub mod terrain;

pub use app::{headless_app, spawn_player};
pub use engine::{engine_at, run_ticks, settle};
pub use terrain::{flat_field, holey_ground, ramp_field, shared};
