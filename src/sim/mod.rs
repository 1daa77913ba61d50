//! Deterministic simulation core
//!
//! Everything gameplay builds on this module. It must stay pure and deterministic:
//! - Tick-counted time only (no wall clock)
//! - Seeded RNG only
//! - Stable iteration order (insertion order; entity ids are monotonic)
//! - No rendering or platform dependencies

pub mod input;
pub mod particle;
pub mod session;
pub mod spawner;

pub use input::{Action, KeyTracker};
pub use particle::{Burst, Particle, spawn_burst, step_particles};
pub use session::{Phase, Session};
pub use spawner::Spawner;
