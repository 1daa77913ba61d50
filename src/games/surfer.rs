//! Crowd-surfing runner
//!
//! Steer left and right above the crowd; catch rising fans to build a
//! score multiplier, and avoid the bottles and phones they throw. One
//! hostile contact ends the run.

use glam::Vec2;
use rand::Rng;

use crate::consts::PLAYFIELD_W;
use crate::sim::{Action, Burst, Particle, Session, Spawner, spawn_burst, step_particles};

/// The surfer floats at this height
pub const PLAYER_Y: f32 = 200.0;
pub const PLAYER_SPEED: f32 = 6.0;
const MIN_X: f32 = 50.0;
const MAX_X: f32 = 750.0;

const FAN_SPEED: f32 = 3.0;
const OBSTACLE_SPEED: f32 = 4.0;
const FAN_SPAWN_MS: u32 = 1500;
const OBSTACLE_SPAWN_MS: u32 = 2000;

/// Contact radius for both fans and obstacles
pub const CATCH_RADIUS: f32 = 40.0;

/// Catching a fan keeps the multiplier alive this long
const COMBO_WINDOW_SECS: f32 = 2.0;
const COMBO_DECAY_PER_TICK: f32 = 0.016;
const MULTIPLIER_STEP: f32 = 0.5;
const MULTIPLIER_CAP: f32 = 5.0;

const CRASH_BURST: Burst = Burst {
    count: 10,
    color: "#FF0000",
    spread: 8.0,
    kick: 3.0,
    size_min: 2.0,
    size_max: 6.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanKind {
    Normal,
    Gold,
}

impl FanKind {
    pub fn points(self) -> u64 {
        match self {
            FanKind::Normal => 50,
            FanKind::Gold => 100,
        }
    }

    pub fn burst_color(self) -> &'static str {
        match self {
            FanKind::Normal => "#00FF00",
            FanKind::Gold => "#FFD700",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Fan {
    pub id: u32,
    pub pos: Vec2,
    pub kind: FanKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Beer,
    Phone,
}

#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub kind: ObstacleKind,
}

#[derive(Debug, Clone)]
pub struct SurferGame {
    pub session: Session,
    pub player_x: f32,
    /// Lean angle in degrees; eases toward the lean implied by position
    pub tilt: f32,
    pub fans: Vec<Fan>,
    pub obstacles: Vec<Obstacle>,
    pub particles: Vec<Particle>,
    /// Seconds left in the combo window keeping the multiplier alive
    pub combo_timer: f32,
    steer_left: bool,
    steer_right: bool,
    fan_spawner: Spawner,
    obstacle_spawner: Spawner,
}

impl SurferGame {
    pub fn new(seed: u64) -> Self {
        Self {
            session: Session::new(seed),
            player_x: PLAYFIELD_W / 2.0,
            tilt: 0.0,
            fans: Vec::new(),
            obstacles: Vec::new(),
            particles: Vec::new(),
            combo_timer: 0.0,
            steer_left: false,
            steer_right: false,
            fan_spawner: Spawner::from_millis(FAN_SPAWN_MS),
            obstacle_spawner: Spawner::from_millis(OBSTACLE_SPAWN_MS),
        }
    }

    pub fn start(&mut self) {
        self.session.start();
        self.player_x = PLAYFIELD_W / 2.0;
        self.tilt = 0.0;
        self.fans.clear();
        self.obstacles.clear();
        self.particles.clear();
        self.combo_timer = 0.0;
        self.fan_spawner.reset();
        self.obstacle_spawner.reset();
    }

    pub fn step(&mut self) {
        if !self.session.is_playing() {
            return;
        }
        self.session.ticks += 1;

        // Spawns happen first so a gameover later this tick can't emit
        // anything retroactively
        if self.fan_spawner.fire() {
            self.spawn_fan();
        }
        if self.obstacle_spawner.fire() {
            self.spawn_obstacle();
        }

        // Steering and lean
        if self.steer_left {
            self.player_x -= PLAYER_SPEED;
        }
        if self.steer_right {
            self.player_x += PLAYER_SPEED;
        }
        self.player_x = self.player_x.clamp(MIN_X, MAX_X);
        let target_tilt = (self.player_x - PLAYFIELD_W / 2.0) * 0.15;
        self.tilt += (target_tilt - self.tilt) * 0.1;

        let player = Vec2::new(self.player_x, PLAYER_Y);

        // Fans rise toward the surfer; close ones are caught
        for fan in &mut self.fans {
            fan.pos.y -= FAN_SPEED;
        }
        let mut i = 0;
        while i < self.fans.len() {
            let fan = &self.fans[i];
            if fan.pos.y > 0.0 && fan.pos.distance(player) < CATCH_RADIUS {
                let fan = self.fans.remove(i);
                let points = (fan.kind.points() as f32 * self.session.multiplier) as u64;
                self.session.award(points);
                self.combo_timer = COMBO_WINDOW_SECS;
                self.session.multiplier =
                    (self.session.multiplier + MULTIPLIER_STEP).min(MULTIPLIER_CAP);
                spawn_burst(
                    &mut self.particles,
                    &mut self.session.rng,
                    fan.pos,
                    Burst {
                        count: 10,
                        color: fan.kind.burst_color(),
                        spread: 8.0,
                        kick: 3.0,
                        size_min: 2.0,
                        size_max: 6.0,
                    },
                );
            } else {
                i += 1;
            }
        }
        self.fans.retain(|f| f.pos.y > -50.0);

        // Obstacles rise too; one contact ends the run
        for obs in &mut self.obstacles {
            obs.pos.y -= OBSTACLE_SPEED;
        }
        let hit = self
            .obstacles
            .iter()
            .find(|o| o.pos.y > 0.0 && o.pos.distance(player) < CATCH_RADIUS)
            .map(|o| o.pos);
        if let Some(pos) = hit {
            spawn_burst(&mut self.particles, &mut self.session.rng, pos, CRASH_BURST);
            self.session.game_over();
        }
        self.obstacles.retain(|o| o.pos.y > -50.0);

        // Combo window rundown; an empty window drops the multiplier back
        // to baseline without touching awarded score
        if self.combo_timer > 0.0 {
            self.combo_timer = (self.combo_timer - COMBO_DECAY_PER_TICK).max(0.0);
            if self.combo_timer == 0.0 {
                self.session.multiplier = 1.0;
            }
        }

        step_particles(&mut self.particles, 0.3);
    }

    fn spawn_fan(&mut self) {
        let id = self.session.next_entity_id();
        let x = self.session.rng.random::<f32>() * 700.0 + 50.0;
        let kind = if self.session.rng.random::<f32>() > 0.7 {
            FanKind::Gold
        } else {
            FanKind::Normal
        };
        self.fans.push(Fan {
            id,
            pos: Vec2::new(x, 650.0),
            kind,
        });
    }

    fn spawn_obstacle(&mut self) {
        let id = self.session.next_entity_id();
        let x = self.session.rng.random::<f32>() * 700.0 + 50.0;
        let kind = if self.session.rng.random::<f32>() > 0.5 {
            ObstacleKind::Beer
        } else {
            ObstacleKind::Phone
        };
        self.obstacles.push(Obstacle {
            id,
            pos: Vec2::new(x, 650.0),
            kind,
        });
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Start if !self.session.is_playing() => self.start(),
            // Held-state snapshots; key-up routing clears them in any phase
            Action::Steer { left, right } => {
                self.steer_left = left;
                self.steer_right = right;
            }
            Action::Drag { x } if self.session.is_playing() => {
                self.player_x = x.clamp(MIN_X, MAX_X);
            }
            _ => {}
        }
    }
}
