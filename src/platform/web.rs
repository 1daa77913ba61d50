//! Browser glue: canvas bootstrap, persistent input listeners, rAF loop
//!
//! One set of listeners is installed per page lifetime and reads current
//! state through a shared `Rc<RefCell<App>>`; nothing re-subscribes on
//! state changes. The UI shell (menus, overlays, mobile buttons) talks to
//! the core only through the exported functions at the bottom.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

use crate::consts::{PLAYFIELD_H, PLAYFIELD_W};
use crate::games::backstage::{self, MicroGame};
use crate::games::{Game, GameKind};
use crate::highscores::HighScores;
use crate::render;
use crate::settings::Settings;
use crate::sim::{Action, KeyTracker, Phase};

const BACKSTAGE_LANE_KEYS: [&str; 4] = ["d", "f", "j", "k"];

/// Everything the shell needs behind one handle
struct App {
    game: Game,
    keys: KeyTracker,
    settings: Settings,
    scores: HighScores,
    canvas: HtmlCanvasElement,
    ctx: Option<CanvasRenderingContext2d>,
    last_phase: Phase,
    // FPS tracking
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

thread_local! {
    static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|slot| {
        let app = slot.borrow().clone()?;
        let mut app = app.borrow_mut();
        Some(f(&mut app))
    })
}

impl App {
    /// One display frame: step, bookkeeping, render, HUD
    fn frame(&mut self, time: f64) {
        self.game.step();
        self.sync_phase();
        self.track_fps(time);
        self.render(time);
        self.update_hud();
    }

    /// Record finished runs on the in-memory leaderboard
    fn sync_phase(&mut self) {
        let phase = self.game.session().phase;
        if phase == self.last_phase {
            return;
        }
        if phase == Phase::GameOver {
            let score = self.game.session().score;
            let ticks = self.game.session().ticks;
            match self.scores.submit(score, self.game.kind(), ticks) {
                Some(rank) => log::info!("run ended: score {score}, leaderboard rank {rank}"),
                None => log::info!("run ended: score {score}"),
            }
        }
        self.last_phase = phase;
    }

    fn track_fps(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % 60;
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time - oldest;
            if elapsed > 0.0 {
                self.fps = (60_000.0 / elapsed).round() as u32;
            }
        }
    }

    /// Render pass; skipped silently when the surface is missing
    fn render(&self, time: f64) {
        let Some(ctx) = &self.ctx else { return };
        render::draw(ctx, &self.game, &self.keys, time / 1000.0, &self.settings);
    }

    /// Mirror session state into the DOM HUD and overlays
    fn update_hud(&self) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let snapshot = self.game.snapshot();

        if let Some(el) = document.get_element_by_id("hud-score") {
            el.set_text_content(Some(&snapshot.score.to_string()));
        }
        if let Some(el) = document.get_element_by_id("hud-best") {
            el.set_text_content(Some(&snapshot.high_score.to_string()));
        }
        if let Some(el) = document.get_element_by_id("hud-combo") {
            let text = if snapshot.combo > 0 {
                format!("COMBO x{}!", snapshot.combo)
            } else if snapshot.multiplier > 1.0 {
                format!("x{:.1} COMBO!", snapshot.multiplier)
            } else {
                String::new()
            };
            el.set_text_content(Some(&text));
        }
        if let Some(el) = document.get_element_by_id("hud-timer") {
            let text = snapshot
                .time_left
                .map(|secs| format!("{secs}s"))
                .unwrap_or_default();
            el.set_text_content(Some(&text));
        }
        if let Some(el) = document.get_element_by_id("hud-pose") {
            let pose = match &self.game {
                Game::Shred(g) => g.pose,
                _ => "",
            };
            el.set_text_content(Some(pose));
        }
        if let Some(el) = document.get_element_by_id("hud-fps") {
            let text = if self.settings.show_fps {
                self.fps.to_string()
            } else {
                String::new()
            };
            el.set_text_content(Some(&text));
        }

        // Overlay visibility follows the phase
        let phase = self.game.session().phase;
        if let Some(el) = document.get_element_by_id("menu-overlay") {
            let _ = el.set_attribute(
                "class",
                if phase == Phase::Menu { "overlay" } else { "overlay hidden" },
            );
        }
        if let Some(el) = document.get_element_by_id("gameover-overlay") {
            let _ = el.set_attribute(
                "class",
                if phase == Phase::GameOver { "overlay" } else { "overlay hidden" },
            );
        }
    }
}

/// Map a keydown to at most one game action. Returns the action and
/// whether the browser default (scrolling, etc.) must be suppressed.
fn action_for_key(game: &Game, keys: &KeyTracker, key: &str, fresh: bool) -> (Option<Action>, bool) {
    match game {
        Game::Rhythm(g) | Game::Shred(g) => {
            let lane = g.cfg.keys.iter().position(|k| *k == key);
            (lane.filter(|_| fresh).map(Action::Lane), false)
        }
        Game::Surfer(_) => {
            if matches!(key, "arrowleft" | "arrowright" | "a" | "d") {
                (Some(steer_snapshot(keys)), key.starts_with("arrow"))
            } else {
                (None, false)
            }
        }
        Game::Backstage(g) => match &g.micro {
            MicroGame::Notes { .. } => {
                let lane = BACKSTAGE_LANE_KEYS.iter().position(|k| *k == key);
                (lane.filter(|_| fresh).map(Action::Lane), false)
            }
            MicroGame::Photo { .. } => {
                let step = backstage::NUDGE_STEP;
                let nudge = match key {
                    "arrowleft" | "a" => Some((-step, 0.0)),
                    "arrowright" | "d" => Some((step, 0.0)),
                    "arrowup" | "w" => Some((0.0, -step)),
                    "arrowdown" | "s" => Some((0.0, step)),
                    _ => None,
                };
                let prevent = nudge.is_some() && key.starts_with("arrow");
                (
                    nudge
                        .filter(|_| fresh)
                        .map(|(dx, dy)| Action::Nudge { dx, dy }),
                    prevent,
                )
            }
            _ => (None, false),
        },
        Game::Flappy(_) => {
            if key == " " || key == "arrowup" {
                (if fresh { Some(Action::Flap) } else { None }, true)
            } else {
                (None, false)
            }
        }
    }
}

/// Current held-steering state for the runner
fn steer_snapshot(keys: &KeyTracker) -> Action {
    Action::Steer {
        left: keys.is_down("arrowleft") || keys.is_down("a"),
        right: keys.is_down("arrowright") || keys.is_down("d"),
    }
}

/// Map a pointer tap to the active game's action
fn action_for_pointer(game: &Game, x: f32, y: f32) -> Option<Action> {
    match game {
        Game::Flappy(_) => Some(Action::Flap),
        Game::Surfer(_) => Some(Action::Drag { x }),
        Game::Backstage(_) => Some(Action::Tap { x, y }),
        // Lane games take keyboard or the shell's lane buttons
        _ => None,
    }
}

/// Client coordinates to 800x600 playfield coordinates
fn playfield_coords(canvas: &HtmlCanvasElement, client_x: f64, client_y: f64) -> (f32, f32) {
    let rect = canvas.get_bounding_client_rect();
    let x = (client_x - rect.left()) / rect.width().max(1.0) * PLAYFIELD_W as f64;
    let y = (client_y - rect.top()) / rect.height().max(1.0) * PLAYFIELD_H as f64;
    (x as f32, y as f32)
}

fn install_listeners(app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let canvas = app.borrow().canvas.clone();

    // Keyboard
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut a = app.borrow_mut();
            let key = event.key().to_lowercase();
            let fresh = a.keys.press(&key);
            let (action, prevent) = action_for_key(&a.game, &a.keys, &key, fresh);
            if prevent {
                event.prevent_default();
            }
            if let Some(action) = action {
                a.game.apply(action);
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut a = app.borrow_mut();
            let key = event.key().to_lowercase();
            // Releases clear in every phase
            a.keys.release(&key);
            if matches!(a.game, Game::Surfer(_)) {
                let snapshot = steer_snapshot(&a.keys);
                a.game.apply(snapshot);
            }
        });
        window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Pointer
    {
        let app = app.clone();
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let mut a = app.borrow_mut();
            let (x, y) = playfield_coords(
                &canvas_clone,
                f64::from(event.client_x()),
                f64::from(event.client_y()),
            );
            if let Some(action) = action_for_pointer(&a.game, x, y) {
                a.game.apply(action);
            }
        });
        canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Touch
    {
        let app = app.clone();
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            event.prevent_default();
            if let Some(touch) = event.touches().get(0) {
                let mut a = app.borrow_mut();
                let (x, y) = playfield_coords(
                    &canvas_clone,
                    f64::from(touch.client_x()),
                    f64::from(touch.client_y()),
                );
                if let Some(action) = action_for_pointer(&a.game, x, y) {
                    a.game.apply(action);
                }
            }
        });
        canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let app = app.clone();
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            event.prevent_default();
            if let Some(touch) = event.touches().get(0) {
                let mut a = app.borrow_mut();
                // Drag only steers the runner
                if matches!(a.game, Game::Surfer(_)) {
                    let (x, _) = playfield_coords(
                        &canvas_clone,
                        f64::from(touch.client_x()),
                        f64::from(touch.client_y()),
                    );
                    a.game.apply(Action::Drag { x });
                }
            }
        });
        canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

fn request_frame(app: Rc<RefCell<App>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| {
        {
            let mut a = app.borrow_mut();
            a.frame(time);
        }
        request_frame(app);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Boot the shell against the `#playfield` canvas and start the frame loop
#[wasm_bindgen]
pub fn boot(game_id: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id("playfield")
        .ok_or_else(|| JsValue::from_str("no #playfield canvas"))?
        .dyn_into()?;
    canvas.set_width(PLAYFIELD_W as u32);
    canvas.set_height(PLAYFIELD_H as u32);

    // A missing 2D context only disables the presenter
    let ctx = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|obj| obj.dyn_into::<CanvasRenderingContext2d>().ok());
    if ctx.is_none() {
        log::warn!("2d context unavailable; running without a presenter");
    }

    let kind = GameKind::from_id(game_id).unwrap_or_else(|| {
        log::warn!("unknown game id {game_id:?}, defaulting to rhythm");
        GameKind::Rhythm
    });
    let seed = js_sys::Date::now() as u64;
    log::info!("stagedive booting {} with seed {seed}", kind.id());

    let app = Rc::new(RefCell::new(App {
        game: Game::new(kind, seed),
        keys: KeyTracker::new(),
        settings: Settings::default(),
        scores: HighScores::new(),
        canvas,
        ctx,
        last_phase: Phase::Menu,
        frame_times: [0.0; 60],
        frame_index: 0,
        fps: 0,
    }));

    install_listeners(&app)?;
    APP.with(|slot| slot.replace(Some(app.clone())));
    request_frame(app);

    log::info!("stagedive running");
    Ok(())
}

// --- UI shell entry points ------------------------------------------------

/// Start a session from the menu
#[wasm_bindgen]
pub fn start_game() {
    let _ = with_app(|a| a.game.apply(Action::Start));
}

/// Restart after a gameover; counters reset, high score survives
#[wasm_bindgen]
pub fn restart_game() {
    let _ = with_app(|a| a.game.apply(Action::Start));
}

/// Switch to another mini-game (back on its menu, fresh seed)
#[wasm_bindgen]
pub fn select_game(game_id: &str) -> bool {
    let Some(kind) = GameKind::from_id(game_id) else {
        log::warn!("select_game: unknown id {game_id:?}");
        return false;
    };
    with_app(|a| {
        let seed = js_sys::Date::now() as u64;
        a.game = Game::new(kind, seed);
        a.last_phase = Phase::Menu;
        log::info!("selected {} with seed {seed}", kind.id());
    })
    .is_some()
}

/// JSON snapshot of the running session for overlays
#[wasm_bindgen]
pub fn session_snapshot() -> String {
    with_app(|a| serde_json::to_string(&a.game.snapshot()).unwrap_or_else(|_| "{}".into()))
        .unwrap_or_else(|| "{}".into())
}

/// JSON leaderboard for the high score panel
#[wasm_bindgen]
pub fn scores_json() -> String {
    with_app(|a| a.scores.to_json()).unwrap_or_else(|| "[]".into())
}

/// JSON settings for the options panel
#[wasm_bindgen]
pub fn settings_json() -> String {
    with_app(|a| a.settings.to_json()).unwrap_or_else(|| "{}".into())
}

/// Replace settings from the options panel; false on bad input
#[wasm_bindgen]
pub fn update_settings(json: &str) -> bool {
    with_app(|a| a.settings.merge_json(json)).unwrap_or(false)
}

/// Mobile lane button pressed; mirrors a key press for the same lane
#[wasm_bindgen]
pub fn lane_down(lane: usize) {
    let _ = with_app(|a| {
        let key = match &a.game {
            Game::Rhythm(g) | Game::Shred(g) => g.cfg.keys.get(lane).copied(),
            Game::Backstage(_) => BACKSTAGE_LANE_KEYS.get(lane).copied(),
            _ => None,
        };
        let Some(key) = key else { return };
        if a.keys.press(key) {
            a.game.apply(Action::Lane(lane));
        }
    });
}

/// Mobile lane button released
#[wasm_bindgen]
pub fn lane_up(lane: usize) {
    let _ = with_app(|a| {
        let key = match &a.game {
            Game::Rhythm(g) | Game::Shred(g) => g.cfg.keys.get(lane).copied(),
            Game::Backstage(_) => BACKSTAGE_LANE_KEYS.get(lane).copied(),
            _ => None,
        };
        if let Some(key) = key {
            a.keys.release(key);
        }
    });
}

/// Mobile movement button for the photo op
#[wasm_bindgen]
pub fn nudge(dx: f32, dy: f32) {
    let _ = with_app(|a| a.game.apply(Action::Nudge { dx, dy }));
}
