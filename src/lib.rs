//! Stagedive - a collection of stage-themed browser arcade mini-games
//!
//! Core modules:
//! - `sim`: Deterministic session core (state machine, spawners, particles, actions)
//! - `games`: The five mini-games built on the sim core
//! - `render`: Canvas 2D presenter (wasm only)
//! - `fx`: Decorative animated background fields
//! - `platform`: Browser shell / headless harness

pub mod fx;
pub mod games;
pub mod highscores;
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions in logical pixels
    pub const PLAYFIELD_W: f32 = 800.0;
    pub const PLAYFIELD_H: f32 = 600.0;

    /// Nominal display refresh rate the per-tick constants assume
    pub const TICK_HZ: u32 = 60;

    /// Particles shed this much life per tick
    pub const PARTICLE_LIFE_DECAY: f32 = 0.02;
}

/// Convert a wall-clock period in milliseconds to whole ticks at the nominal rate
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    (ms * consts::TICK_HZ / 1000).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks_spawn_cadences() {
        assert_eq!(ms_to_ticks(800), 48);
        assert_eq!(ms_to_ticks(700), 42);
        assert_eq!(ms_to_ticks(1000), 60);
        assert_eq!(ms_to_ticks(1500), 90);
        assert_eq!(ms_to_ticks(2000), 120);
        // Degenerate periods still fire
        assert_eq!(ms_to_ticks(0), 1);
    }
}
