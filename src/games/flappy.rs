//! Flap-to-survive
//!
//! Constant gravity, a fixed flap impulse, and pipe pairs scrolling left.
//! A flap outside Playing starts (or restarts) the session, so the whole
//! game runs off a single input.

use rand::Rng;

use crate::consts::PLAYFIELD_W;
use crate::sim::{Action, Phase, Session};

pub const GRAVITY: f32 = 0.6;
pub const FLAP_IMPULSE: f32 = -10.0;
const PIPE_SPEED: f32 = 3.0;
pub const PIPE_GAP: f32 = 200.0;
pub const PIPE_WIDTH: f32 = 80.0;
pub const PLAYER_SIZE: f32 = 60.0;
pub const PLAYER_X: f32 = 150.0;
const START_Y: f32 = 250.0;
const GROUND_Y: f32 = 550.0;
/// A new pipe enters once the newest one crosses this line
const RESPAWN_X: f32 = 500.0;

/// A pipe pair with a gap centred on `gap_y`
#[derive(Debug, Clone)]
pub struct Pipe {
    pub id: u32,
    pub x: f32,
    pub gap_y: f32,
    pub scored: bool,
}

#[derive(Debug, Clone)]
pub struct FlappyGame {
    pub session: Session,
    /// Top of the player square
    pub player_y: f32,
    pub velocity: f32,
    pub pipes: Vec<Pipe>,
}

impl FlappyGame {
    pub fn new(seed: u64) -> Self {
        Self {
            session: Session::new(seed),
            player_y: START_Y,
            velocity: 0.0,
            pipes: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        self.session.start();
        self.player_y = START_Y;
        self.velocity = 0.0;
        self.pipes.clear();
        let id = self.session.next_entity_id();
        self.pipes.push(Pipe {
            id,
            x: PLAYFIELD_W,
            gap_y: 250.0,
            scored: false,
        });
    }

    /// Flap if playing; start or restart otherwise
    pub fn flap(&mut self) {
        match self.session.phase {
            // The impulse replaces any prior velocity outright
            Phase::Playing => self.velocity = FLAP_IMPULSE,
            Phase::Menu | Phase::GameOver => self.start(),
        }
    }

    pub fn step(&mut self) {
        if !self.session.is_playing() {
            return;
        }
        self.session.ticks += 1;

        // Gravity feeds velocity, velocity feeds position
        self.velocity += GRAVITY;
        self.player_y += self.velocity;
        if self.player_y > GROUND_Y || self.player_y < 0.0 {
            self.session.game_over();
        }

        // Pipes scroll; overlap outside the gap ends the run, and a pipe
        // scores exactly once as its trailing edge passes the player
        for pipe in &mut self.pipes {
            pipe.x -= PIPE_SPEED;
        }
        let mut crashed = false;
        let mut passed = 0u64;
        for pipe in &mut self.pipes {
            let overlap_x = PLAYER_X + PLAYER_SIZE > pipe.x && PLAYER_X < pipe.x + PIPE_WIDTH;
            let outside_gap = self.player_y < pipe.gap_y - PIPE_GAP / 2.0
                || self.player_y + PLAYER_SIZE > pipe.gap_y + PIPE_GAP / 2.0;
            if overlap_x && outside_gap {
                crashed = true;
            }
            if pipe.x + PIPE_WIDTH < PLAYER_X && !pipe.scored {
                pipe.scored = true;
                passed += 1;
            }
        }
        self.session.award(passed);
        if crashed {
            self.session.game_over();
        }

        self.pipes.retain(|p| p.x > -PIPE_WIDTH);

        // Keep the corridor fed
        let need_pipe = self.pipes.last().is_none_or(|p| p.x < RESPAWN_X);
        if need_pipe && self.session.is_playing() {
            let id = self.session.next_entity_id();
            let gap_y = 150.0 + self.session.rng.random::<f32>() * 300.0;
            self.pipes.push(Pipe {
                id,
                x: PLAYFIELD_W,
                gap_y,
                scored: false,
            });
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            // Tap and flap are the same gesture here, including the
            // start/restart meaning outside Playing
            Action::Flap | Action::Tap { .. } => self.flap(),
            Action::Start if !self.session.is_playing() => self.start(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_integration() {
        // From rest at y=250, one tick gives v=0.6 and y=250.6
        let mut game = FlappyGame::new(1);
        game.start();
        assert_eq!(game.player_y, 250.0);
        assert_eq!(game.velocity, 0.0);
        game.step();
        assert_eq!(game.velocity, GRAVITY);
        assert_eq!(game.player_y, 250.6);
    }

    #[test]
    fn test_flap_replaces_velocity() {
        let mut game = FlappyGame::new(1);
        game.start();
        for _ in 0..20 {
            game.step();
        }
        assert!(game.velocity > 0.0);
        game.flap();
        assert_eq!(game.velocity, FLAP_IMPULSE);
    }

    #[test]
    fn test_flap_starts_from_menu_and_gameover() {
        let mut game = FlappyGame::new(1);
        assert_eq!(game.session.phase, Phase::Menu);
        game.apply(Action::Flap);
        assert_eq!(game.session.phase, Phase::Playing);

        // Fall to the ground without flapping
        while game.session.is_playing() {
            game.step();
        }
        assert_eq!(game.session.phase, Phase::GameOver);
        game.apply(Action::Tap { x: 10.0, y: 10.0 });
        assert_eq!(game.session.phase, Phase::Playing);
        assert_eq!(game.session.score, 0);
        assert_eq!(game.player_y, 250.0);
    }

    #[test]
    fn test_pipe_scores_once() {
        let mut game = FlappyGame::new(1);
        game.start();
        game.pipes.clear();
        let id = game.session.next_entity_id();
        // Trailing edge just right of the player, gap centred on them
        game.pipes.push(Pipe {
            id,
            x: PLAYER_X - PIPE_WIDTH + 2.0,
            gap_y: game.player_y + PLAYER_SIZE / 2.0,
            scored: false,
        });
        game.flap(); // keep clear of the ground during the pass
        game.step();
        assert_eq!(game.session.score, 1);
        game.step();
        assert_eq!(game.session.score, 1, "a passed pipe scores exactly once");
    }

    #[test]
    fn test_pipe_collision_ends_run() {
        let mut game = FlappyGame::new(1);
        game.start();
        game.session.award(3);
        game.pipes.clear();
        let id = game.session.next_entity_id();
        // Player overlaps the pipe column and the gap is far away
        game.pipes.push(Pipe {
            id,
            x: PLAYER_X,
            gap_y: 500.0,
            scored: false,
        });
        game.step();
        assert_eq!(game.session.phase, Phase::GameOver);
        assert_eq!(game.session.high_score, 3);
    }

    #[test]
    fn test_ground_and_ceiling_end_run() {
        let mut game = FlappyGame::new(1);
        game.start();
        while game.session.is_playing() {
            game.step();
        }
        assert!(game.player_y > GROUND_Y);

        game.start();
        // Flap every tick to climb off the top
        while game.session.is_playing() {
            game.flap();
            game.step();
        }
        assert!(game.player_y < 0.0);
    }

    #[test]
    fn test_corridor_stays_fed() {
        let mut game = FlappyGame::new(1);
        game.start();
        // Hold roughly level so the run lasts; the corridor must always
        // have a pipe ahead of the respawn line
        for tick in 0..400 {
            if tick % 16 == 0 {
                game.flap();
            }
            game.step();
            if !game.session.is_playing() {
                break;
            }
            assert!(!game.pipes.is_empty());
            assert!(game.pipes.last().unwrap().x >= RESPAWN_X - PIPE_SPEED);
        }
    }
}
