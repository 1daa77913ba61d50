//! Session state and the menu/playing/gameover machine
//!
//! One `Session` backs one mini-game run. Per-game entity collections live
//! in the game structs; everything shared across games lives here.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Coarse session phase gating which subsystems are active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Menu,
    Playing,
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Menu => "menu",
            Phase::Playing => "playing",
            Phase::GameOver => "gameover",
        }
    }
}

/// Shared per-session state every mini-game builds on
#[derive(Debug, Clone)]
pub struct Session {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: Phase,
    pub score: u64,
    /// Best score this page session; latched on every gameover transition
    pub high_score: u64,
    /// Hit streak; resets to 0 on a miss
    pub combo: u32,
    /// Score multiplier; baseline 1.0
    pub multiplier: f32,
    /// Ticks elapsed since entering Playing
    pub ticks: u64,
    /// RNG for spawn rolls; seeded so runs are replayable
    pub rng: Pcg32,
    /// Next entity ID, reset on each start
    next_id: u32,
}

impl Session {
    /// Create a fresh session sitting on the menu
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            phase: Phase::Menu,
            score: 0,
            high_score: 0,
            combo: 0,
            multiplier: 1.0,
            ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 0,
        }
    }

    /// Reset all counters and enter Playing. The high score survives restarts.
    pub fn start(&mut self) {
        self.phase = Phase::Playing;
        self.score = 0;
        self.combo = 0;
        self.multiplier = 1.0;
        self.ticks = 0;
        self.next_id = 0;
    }

    /// Allocate an entity ID, unique within this run
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Transition to GameOver and latch the high score.
    ///
    /// Idempotent: several misses in one tick still transition exactly once.
    pub fn game_over(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        self.phase = Phase::GameOver;
        self.high_score = self.high_score.max(self.score);
    }

    pub fn award(&mut self, points: u64) {
        self.score += points;
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_resets_counters() {
        let mut session = Session::new(7);
        session.start();
        session.award(500);
        session.combo = 4;
        session.multiplier = 3.5;
        let _ = session.next_entity_id();

        session.start();
        assert_eq!(session.phase, Phase::Playing);
        assert_eq!(session.score, 0);
        assert_eq!(session.combo, 0);
        assert_eq!(session.multiplier, 1.0);
        assert_eq!(session.next_entity_id(), 0);
    }

    #[test]
    fn test_game_over_latches_high_score() {
        let mut session = Session::new(7);
        session.start();
        session.award(900);
        session.game_over();
        assert_eq!(session.phase, Phase::GameOver);
        assert_eq!(session.high_score, 900);

        // A worse run must not lower it
        session.start();
        session.award(250);
        session.game_over();
        assert_eq!(session.high_score, 900);
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let mut session = Session::new(7);
        session.start();
        session.award(100);
        session.game_over();
        session.award(50); // stray award after the transition
        session.game_over();
        // Second call must not re-latch
        assert_eq!(session.high_score, 100);
    }

    #[test]
    fn test_entity_ids_monotonic() {
        let mut session = Session::new(7);
        session.start();
        let a = session.next_entity_id();
        let b = session.next_entity_id();
        let c = session.next_entity_id();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_same_seed_same_rolls() {
        use rand::Rng;
        let mut s1 = Session::new(42);
        let mut s2 = Session::new(42);
        for _ in 0..32 {
            let a: u32 = s1.rng.random_range(0..4);
            let b: u32 = s2.rng.random_range(0..4);
            assert_eq!(a, b);
        }
    }
}
