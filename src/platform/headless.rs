//! Headless session harness
//!
//! Drives a seeded session with a small autopilot, standing in for the
//! browser shell's real input. The native binary runs it as a smoke
//! check; tests use it to exercise whole sessions end to end.

use crate::games::backstage::{self, MicroGame};
use crate::games::flappy::{PIPE_GAP, PIPE_WIDTH, PLAYER_SIZE, PLAYER_X};
use crate::games::surfer::PLAYER_SPEED;
use crate::games::{Game, GameKind};
use crate::sim::Action;

/// Outcome of one autopilot run
#[derive(Debug, Clone)]
pub struct DemoSummary {
    pub kind: GameKind,
    pub ticks: u64,
    pub score: u64,
    pub high_score: u64,
    /// Whether the session ended on its own before the tick budget
    pub completed: bool,
}

/// Run one seeded session under autopilot for at most `max_ticks`
pub fn run_demo(kind: GameKind, seed: u64, max_ticks: u64) -> DemoSummary {
    let mut game = Game::new(kind, seed);
    game.apply(Action::Start);

    let mut ticks = 0u64;
    while game.session().is_playing() && ticks < max_ticks {
        autopilot(&mut game);
        game.step();
        ticks += 1;
    }

    DemoSummary {
        kind,
        ticks,
        score: game.session().score,
        high_score: game.session().high_score,
        completed: !game.session().is_playing(),
    }
}

/// One decision per tick, playing the way an attentive human would
fn autopilot(game: &mut Game) {
    match game {
        Game::Rhythm(g) | Game::Shred(g) => {
            // Press every lane that has a note sitting in its window
            let cfg = g.cfg;
            let due: Vec<usize> = g
                .notes
                .iter()
                .filter(|n| (n.y - cfg.hit_zone_y).abs() < cfg.tolerance)
                .map(|n| n.lane)
                .collect();
            for lane in due {
                g.activate_lane(lane);
            }
        }
        Game::Surfer(g) => {
            // Drift toward the nearest fan
            let target = g
                .fans
                .iter()
                .min_by(|a, b| {
                    let da = (a.pos.x - g.player_x).abs();
                    let db = (b.pos.x - g.player_x).abs();
                    da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|fan| fan.pos.x - g.player_x);
            if let Some(dx) = target {
                g.apply(Action::Steer {
                    left: dx < -PLAYER_SPEED,
                    right: dx > PLAYER_SPEED,
                });
            }
        }
        Game::Backstage(g) => {
            let action = match &g.micro {
                MicroGame::Notes { notes } => notes
                    .iter()
                    .find(|n| (n.y - backstage::HIT_ZONE_Y).abs() < backstage::HIT_TOLERANCE)
                    .map(|n| Action::Lane(n.lane)),
                MicroGame::Crowd { fans } => fans.first().map(|f| Action::Tap {
                    x: f.pos.x,
                    y: f.pos.y,
                }),
                MicroGame::Heckler { hecklers } => hecklers.first().map(|h| Action::Tap {
                    x: h.pos.x,
                    y: h.pos.y,
                }),
                MicroGame::Photo { cameras, player } => cameras.first().map(|c| Action::Nudge {
                    dx: (c.pos.x - player.x).clamp(-backstage::NUDGE_STEP, backstage::NUDGE_STEP),
                    dy: (c.pos.y - player.y).clamp(-backstage::NUDGE_STEP, backstage::NUDGE_STEP),
                }),
            };
            if let Some(action) = action {
                g.apply(action);
            }
        }
        Game::Flappy(g) => {
            // Hold just under the next gap's lower lip; flap only while
            // sinking so the hover stays inside the gap
            let gap_y = g
                .pipes
                .iter()
                .filter(|p| p.x + PIPE_WIDTH >= PLAYER_X)
                .min_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
                .map(|p| p.gap_y)
                .unwrap_or(300.0);
            let bottom = g.player_y + PLAYER_SIZE;
            if bottom > gap_y + PIPE_GAP / 2.0 - 20.0 && g.velocity > 0.0 {
                g.apply(Action::Flap);
            }
        }
    }
}
