//! Canvas 2D presenter
//!
//! A pure read of game state into draw calls: nothing here mutates the
//! session, and every reachable state (menu, zero entities, baseline
//! multiplier) renders without error. The platform layer skips the call
//! entirely when the canvas or context is missing.

mod scene;

use glam::Vec2;
use web_sys::CanvasRenderingContext2d;

use crate::consts::{PLAYFIELD_H, PLAYFIELD_W};
use crate::fx;
use crate::games::backstage::{self, BackstageGame, MicroGame};
use crate::games::flappy::{self, FlappyGame};
use crate::games::lanes::{LANES, LaneGame, lane_center_x};
use crate::games::surfer::{FanKind, ObstacleKind, PLAYER_Y, SurferGame};
use crate::games::{Game, Note};
use crate::settings::Settings;
use crate::sim::{KeyTracker, Phase};

use scene::{centered_text, draw_particles, fill_circle, starfield, vertical_gradient};

const W: f64 = PLAYFIELD_W as f64;
const H: f64 = PLAYFIELD_H as f64;

/// Redraw the whole scene from current state. `time` is seconds since
/// load and only feeds ambient animation, never gameplay.
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    game: &Game,
    keys: &KeyTracker,
    time: f64,
    settings: &Settings,
) {
    match game {
        Game::Rhythm(g) => draw_rhythm(ctx, g, keys, time, settings),
        Game::Shred(g) => draw_shred(ctx, g, keys, time, settings),
        Game::Surfer(g) => draw_surfer(ctx, g, time, settings),
        Game::Backstage(g) => draw_backstage(ctx, g, keys, time),
        Game::Flappy(g) => draw_flappy(ctx, g, time, settings),
    }
}

// --- Lane variants -------------------------------------------------------

fn draw_rhythm(
    ctx: &CanvasRenderingContext2d,
    game: &LaneGame,
    keys: &KeyTracker,
    time: f64,
    settings: &Settings,
) {
    vertical_gradient(
        ctx,
        &[(0.0, "#001a33"), (0.5, "#002244"), (1.0, "#001a33")],
    );
    starfield(ctx, time, 50, (73, 127), 20.0, (255, 255, 255), 0.3);

    let lane_w = W / LANES as f64;
    for i in 0..LANES {
        let pressed = keys.is_down(game.cfg.keys[i]);
        ctx.set_stroke_style_str(if pressed { "#FFD700" } else { "#2a4d69" });
        ctx.set_line_width(2.0);
        ctx.stroke_rect(i as f64 * lane_w, 0.0, lane_w, H);
    }

    // Hit zone band
    let zone_y = f64::from(game.cfg.hit_zone_y);
    let tolerance = f64::from(game.cfg.tolerance);
    ctx.set_fill_style_str("rgba(255, 215, 0, 0.2)");
    ctx.fill_rect(0.0, zone_y - tolerance, W, tolerance * 2.0);

    for note in &game.notes {
        draw_phrase_note(ctx, note, 30.0, "bold 10px Arial");
    }

    // Key prompts
    for i in 0..LANES {
        let pressed = keys.is_down(game.cfg.keys[i]);
        ctx.set_fill_style_str(if pressed { "#FFD700" } else { "#FFFFFF" });
        centered_text(
            ctx,
            &game.cfg.keys[i].to_uppercase(),
            f64::from(lane_center_x(i)),
            zone_y,
            "bold 40px Arial",
        );
    }

    if settings.effective_particles() {
        draw_particles(ctx, &game.particles);
    }
}

fn draw_shred(
    ctx: &CanvasRenderingContext2d,
    game: &LaneGame,
    keys: &KeyTracker,
    time: f64,
    settings: &Settings,
) {
    // Stage backdrop brightens with the light boost
    let dim = 1.0 - f64::from(game.stage_intensity) * 0.3;
    let top = format!("rgba(26, 0, 26, {dim:.3})");
    let mid = format!("rgba(51, 0, 51, {dim:.3})");
    let bottom = format!("rgba(13, 0, 13, {dim:.3})");
    vertical_gradient(
        ctx,
        &[(0.0, top.as_str()), (0.5, mid.as_str()), (1.0, bottom.as_str())],
    );

    // Five sweeping stage lights
    for i in 0..5 {
        let x = f64::from(i) * 200.0 + 100.0;
        let glow = 0.3 + (time * 2.0 + f64::from(i)).sin() * 0.2
            + f64::from(game.stage_intensity) * 0.5;
        if let Ok(gradient) = ctx.create_radial_gradient(x, 0.0, 0.0, x, 300.0, 400.0) {
            let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 100, 200, {glow:.3})"));
            let _ = gradient.add_color_stop(1.0, "rgba(255, 100, 200, 0)");
            ctx.set_fill_style_canvas_gradient(&gradient);
            ctx.fill_rect(0.0, 0.0, W, H);
        }
    }

    // Lanes as guitar strings
    let lane_w = W / LANES as f64;
    for i in 0..LANES {
        let pressed = keys.is_down(game.cfg.keys[i]);
        ctx.set_stroke_style_str(if pressed { "#FFD700" } else { "#444" });
        ctx.set_line_width(if pressed { 4.0 } else { 2.0 });
        ctx.stroke_rect(i as f64 * lane_w, 0.0, lane_w, H);
    }

    // Hit zone platform
    let zone_y = f64::from(game.cfg.hit_zone_y);
    let tolerance = f64::from(game.cfg.tolerance);
    let zone = ctx.create_linear_gradient(0.0, zone_y - tolerance, 0.0, zone_y + tolerance);
    let _ = zone.add_color_stop(0.0, "rgba(255, 68, 68, 0.1)");
    let _ = zone.add_color_stop(0.5, "rgba(255, 68, 68, 0.3)");
    let _ = zone.add_color_stop(1.0, "rgba(255, 68, 68, 0.1)");
    ctx.set_fill_style_canvas_gradient(&zone);
    ctx.fill_rect(0.0, zone_y - tolerance, W, tolerance * 2.0);

    // Chord notes
    for note in &game.notes {
        let x = f64::from(lane_center_x(note.lane));
        let y = f64::from(note.y);
        ctx.set_fill_style_str("#FF4444");
        ctx.set_stroke_style_str("#FFD700");
        ctx.set_line_width(3.0);
        ctx.begin_path();
        let _ = ctx.arc(x, y, 35.0, 0.0, std::f64::consts::TAU);
        ctx.fill();
        ctx.stroke();
        ctx.set_fill_style_str("#FFFFFF");
        centered_text(ctx, note.label, x, y, "bold 24px Arial");
    }

    // Key buttons with chord labels
    for i in 0..LANES {
        let x = f64::from(lane_center_x(i));
        let pressed = keys.is_down(game.cfg.keys[i]);
        ctx.set_fill_style_str(if pressed { "#FFD700" } else { "rgba(0, 0, 0, 0.7)" });
        fill_circle(ctx, x, zone_y, 40.0);
        ctx.set_fill_style_str(if pressed { "#000" } else { "#FFD700" });
        centered_text(ctx, &game.cfg.keys[i].to_uppercase(), x, zone_y, "bold 36px Arial");
        if let Some(labels) = game.cfg.labels {
            ctx.set_fill_style_str("#FFF");
            centered_text(ctx, labels[i], x, zone_y + 60.0, "bold 14px Arial");
        }
    }

    if settings.effective_particles() {
        draw_particles(ctx, &game.particles);
    }
}

/// Rhythm note: red disc with the phrase stacked word by word
fn draw_phrase_note(ctx: &CanvasRenderingContext2d, note: &Note, radius: f64, font: &str) {
    let x = f64::from(lane_center_x(note.lane));
    let y = f64::from(note.y);
    ctx.set_fill_style_str("#FF4444");
    fill_circle(ctx, x, y, radius);

    ctx.set_fill_style_str("#FFFFFF");
    ctx.set_font(font);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    let words: Vec<&str> = note.label.split(' ').collect();
    for (i, word) in words.iter().enumerate() {
        let dy = (i as f64 - words.len() as f64 / 2.0 + 0.5) * 12.0;
        let _ = ctx.fill_text(word, x, y + dy);
    }
}

// --- Runner --------------------------------------------------------------

fn draw_surfer(
    ctx: &CanvasRenderingContext2d,
    game: &SurferGame,
    time: f64,
    settings: &Settings,
) {
    vertical_gradient(ctx, &[(0.0, "#000033"), (1.0, "#330066")]);
    starfield(ctx, time, 50, (73, 127), 10.0, (255, 255, 255), 0.3);

    // Stage floor and swaying crowd silhouettes
    ctx.set_fill_style_str("#1a1a1a");
    ctx.fill_rect(0.0, 550.0, W, 50.0);
    for i in 0..20 {
        let x = f64::from(i) * 40.0 + 20.0;
        let height = 30.0 + (time + f64::from(i)).sin() * 10.0;
        ctx.set_fill_style_str("#000");
        fill_circle(ctx, x, 580.0 - height / 2.0, 15.0);
        ctx.fill_rect(x - 10.0, 580.0 - height, 20.0, height);
    }

    for fan in &game.fans {
        let (color, glyph) = match fan.kind {
            FanKind::Gold => ("#FFD700", "\u{2B50}"),
            FanKind::Normal => ("#00FF00", "\u{1F464}"),
        };
        ctx.set_fill_style_str(color);
        fill_circle(ctx, f64::from(fan.pos.x), f64::from(fan.pos.y), 20.0);
        ctx.set_fill_style_str("#000");
        centered_text(
            ctx,
            glyph,
            f64::from(fan.pos.x),
            f64::from(fan.pos.y),
            "bold 20px Arial",
        );
    }

    for obs in &game.obstacles {
        let glyph = match obs.kind {
            ObstacleKind::Beer => "\u{1F37A}",
            ObstacleKind::Phone => "\u{1F4F1}",
        };
        ctx.set_fill_style_str("#FF0000");
        fill_circle(ctx, f64::from(obs.pos.x), f64::from(obs.pos.y), 20.0);
        ctx.set_fill_style_str("#FFF");
        centered_text(
            ctx,
            glyph,
            f64::from(obs.pos.x),
            f64::from(obs.pos.y),
            "bold 20px Arial",
        );
    }

    if settings.effective_particles() {
        draw_particles(ctx, &game.particles);
    }

    // The surfer, leaning with momentum
    ctx.save();
    let _ = ctx.translate(f64::from(game.player_x), f64::from(PLAYER_Y));
    let _ = ctx.rotate(f64::from(game.tilt).to_radians());
    ctx.set_fill_style_str("#FFD700");
    ctx.fill_rect(-30.0, -15.0, 60.0, 30.0);
    ctx.set_fill_style_str("#FFA500");
    fill_circle(ctx, 0.0, -30.0, 20.0);
    ctx.set_stroke_style_str("#FFD700");
    ctx.set_line_width(8.0);
    ctx.begin_path();
    ctx.move_to(-30.0, 0.0);
    ctx.line_to(-50.0, -10.0);
    ctx.stroke();
    ctx.begin_path();
    ctx.move_to(30.0, 0.0);
    ctx.line_to(50.0, -10.0);
    ctx.stroke();
    ctx.set_fill_style_str("#000");
    centered_text(ctx, "\u{1F60E}", 0.0, -25.0, "bold 30px Arial");
    ctx.restore();

    // Multiplier banner while the window is open
    if game.session.multiplier > 1.0 {
        let alpha = f64::from(game.combo_timer) / 2.0;
        ctx.set_fill_style_str(&format!("rgba(255, 215, 0, {alpha:.3})"));
        centered_text(
            ctx,
            &format!("x{:.1} MULTIPLIER!", game.session.multiplier),
            W / 2.0,
            50.0,
            "bold 24px Arial",
        );
    }
}

// --- Medley --------------------------------------------------------------

fn draw_backstage(
    ctx: &CanvasRenderingContext2d,
    game: &BackstageGame,
    keys: &KeyTracker,
    time: f64,
) {
    vertical_gradient(
        ctx,
        &[(0.0, "#1a0000"), (0.5, "#330000"), (1.0, "#1a0000")],
    );
    starfield(ctx, time, 30, (83, 137), 15.0, (255, 215, 0), 0.2);

    match &game.micro {
        MicroGame::Notes { notes } => {
            let lane_w = W / LANES as f64;
            let lane_keys = ["d", "f", "j", "k"];
            for i in 0..LANES {
                let pressed = keys.is_down(lane_keys[i]);
                ctx.set_stroke_style_str(if pressed { "#FFD700" } else { "#444" });
                ctx.set_line_width(2.0);
                ctx.stroke_rect(i as f64 * lane_w, 0.0, lane_w, H);
            }

            let zone_y = f64::from(backstage::HIT_ZONE_Y);
            let tolerance = f64::from(backstage::HIT_TOLERANCE);
            ctx.set_fill_style_str("rgba(255, 68, 68, 0.2)");
            ctx.fill_rect(0.0, zone_y - tolerance, W, tolerance * 2.0);

            for note in notes {
                let x = f64::from(lane_center_x(note.lane));
                let y = f64::from(note.y);
                ctx.set_fill_style_str("#FF4444");
                fill_circle(ctx, x, y, 25.0);
                ctx.set_fill_style_str("#FFF");
                centered_text(ctx, note.label, x, y, "bold 8px Arial");
            }

            for (i, key) in lane_keys.iter().enumerate() {
                let pressed = keys.is_down(key);
                ctx.set_fill_style_str(if pressed { "#FFD700" } else { "#FFF" });
                centered_text(
                    ctx,
                    &key.to_uppercase(),
                    f64::from(lane_center_x(i)),
                    zone_y,
                    "bold 36px Arial",
                );
            }
        }
        MicroGame::Crowd { fans } => {
            for fan in fans {
                ctx.set_fill_style_str("#FFD700");
                fill_circle(ctx, f64::from(fan.pos.x), f64::from(fan.pos.y), 20.0);
                ctx.set_fill_style_str("#000");
                centered_text(
                    ctx,
                    "\u{1F464}",
                    f64::from(fan.pos.x),
                    f64::from(fan.pos.y) + 5.0,
                    "bold 16px Arial",
                );
            }
        }
        MicroGame::Heckler { hecklers } => {
            for h in hecklers {
                let size = f64::from(h.size);
                ctx.set_fill_style_str("#FF0000");
                ctx.fill_rect(
                    f64::from(h.pos.x) - size / 2.0,
                    f64::from(h.pos.y) - size / 2.0,
                    size,
                    size,
                );
                ctx.set_fill_style_str("#FFF");
                centered_text(
                    ctx,
                    "\u{1F620}",
                    f64::from(h.pos.x),
                    f64::from(h.pos.y) + 5.0,
                    "bold 20px Arial",
                );
            }
        }
        MicroGame::Photo { cameras, player } => {
            ctx.set_fill_style_str("#FFD700");
            fill_circle(ctx, f64::from(player.x), f64::from(player.y), 30.0);
            ctx.set_fill_style_str("#000");
            centered_text(
                ctx,
                "\u{1F935}",
                f64::from(player.x),
                f64::from(player.y) + 8.0,
                "bold 24px Arial",
            );

            for cam in cameras {
                ctx.set_fill_style_str("#00FF00");
                fill_circle(ctx, f64::from(cam.pos.x), f64::from(cam.pos.y), 15.0);
                ctx.set_fill_style_str("#FFF");
                centered_text(
                    ctx,
                    "\u{1F4F8}",
                    f64::from(cam.pos.x),
                    f64::from(cam.pos.y) + 4.0,
                    "bold 16px Arial",
                );
            }
        }
    }
}

// --- Flap game -----------------------------------------------------------

fn draw_flappy(
    ctx: &CanvasRenderingContext2d,
    game: &FlappyGame,
    time: f64,
    settings: &Settings,
) {
    if settings.effective_background_fx() {
        cloud_field(ctx, time);
    } else {
        vertical_gradient(
            ctx,
            &[(0.0, "#FFE5EC"), (0.5, "#FFC5D9"), (1.0, "#FFB5CC")],
        );
    }

    // Drifting cartoon clouds on top of the field
    ctx.set_fill_style_str("rgba(255, 255, 255, 0.6)");
    for i in 0..5 {
        let x = (f64::from(i) * 200.0 + time * 20.0) % 900.0 - 100.0;
        let y = 80.0 + f64::from(i) * 40.0;
        ctx.begin_path();
        let _ = ctx.arc(x, y, 40.0, 0.0, std::f64::consts::TAU);
        let _ = ctx.arc(x + 30.0, y, 50.0, 0.0, std::f64::consts::TAU);
        let _ = ctx.arc(x + 60.0, y, 40.0, 0.0, std::f64::consts::TAU);
        ctx.fill();
    }

    if settings.effective_background_fx() {
        fur_fringe(ctx, time);
    }

    if game.session.phase != Phase::Playing {
        return;
    }

    let gap = f64::from(flappy::PIPE_GAP);
    let width = f64::from(flappy::PIPE_WIDTH);
    for pipe in &game.pipes {
        let x = f64::from(pipe.x);
        let top = f64::from(pipe.gap_y) - gap / 2.0;
        let bottom = f64::from(pipe.gap_y) + gap / 2.0;
        ctx.set_fill_style_str("#FF69B4");
        ctx.set_stroke_style_str("#FF1493");
        ctx.set_line_width(4.0);
        ctx.fill_rect(x, 0.0, width, top);
        ctx.stroke_rect(x, 0.0, width, top);
        ctx.fill_rect(x, bottom, width, H - bottom);
        ctx.stroke_rect(x, bottom, width, H - bottom);
    }

    // The player: a round face with eyes and a smile
    let size = f64::from(flappy::PLAYER_SIZE);
    let px = f64::from(flappy::PLAYER_X);
    let py = f64::from(game.player_y);
    ctx.set_fill_style_str("#FFD700");
    ctx.set_stroke_style_str("#FFA500");
    ctx.set_line_width(3.0);
    ctx.begin_path();
    let _ = ctx.arc(px + size / 2.0, py + size / 2.0, size / 2.0, 0.0, std::f64::consts::TAU);
    ctx.fill();
    ctx.stroke();

    ctx.set_fill_style_str("#333");
    ctx.begin_path();
    let _ = ctx.arc(px + 20.0, py + 20.0, 4.0, 0.0, std::f64::consts::TAU);
    let _ = ctx.arc(px + 40.0, py + 20.0, 4.0, 0.0, std::f64::consts::TAU);
    ctx.fill();
    ctx.begin_path();
    let _ = ctx.arc(px + 30.0, py + 25.0, 15.0, 0.0, std::f64::consts::PI);
    ctx.stroke();

    // In-canvas score
    ctx.set_fill_style_str("#FF1493");
    ctx.set_font("bold 40px Arial");
    ctx.set_text_align("left");
    ctx.set_text_baseline("alphabetic");
    let _ = ctx.fill_text(&game.session.score.to_string(), 30.0, 50.0);
}

/// Coarse sample of the cloud field as the flappy backdrop
fn cloud_field(ctx: &CanvasRenderingContext2d, time: f64) {
    const TILE: f64 = 40.0;
    let pointer = Vec2::new(0.5, 0.5);
    let cols = (W / TILE) as u32;
    let rows = (H / TILE) as u32;
    for cy in 0..rows {
        for cx in 0..cols {
            let uv = Vec2::new(
                (cx as f32 + 0.5) / cols as f32,
                (cy as f32 + 0.5) / rows as f32,
            );
            let color = fx::tan_clouds(uv, time as f32, pointer, 1.0);
            ctx.set_fill_style_str(&color.to_css());
            ctx.fill_rect(cx as f64 * TILE, cy as f64 * TILE, TILE, TILE);
        }
    }
}

/// Narrow fur band along the bottom edge
fn fur_fringe(ctx: &CanvasRenderingContext2d, time: f64) {
    const TILE: f64 = 10.0;
    const BAND: f64 = 40.0;
    let pointer = Vec2::new(0.5, 0.5);
    let cols = (W / TILE) as u32;
    let rows = (BAND / TILE) as u32;
    for cy in 0..rows {
        for cx in 0..cols {
            let uv = Vec2::new(
                (cx as f32 + 0.5) / cols as f32,
                (cy as f32 + 0.5) / rows as f32,
            );
            let color = fx::fur_strands(uv, time as f32, pointer, 1.0);
            ctx.set_fill_style_str(&color.to_css());
            ctx.fill_rect(cx as f64 * TILE, H - BAND + cy as f64 * TILE, TILE, TILE);
        }
    }
}
