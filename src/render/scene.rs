//! Shared canvas drawing helpers
//!
//! Small building blocks the per-game painters compose. Everything takes
//! the 2D context by reference and draws in 800x600 playfield space.

use web_sys::CanvasRenderingContext2d;

use crate::consts::{PLAYFIELD_H, PLAYFIELD_W};
use crate::sim::Particle;

/// Fill the playfield with a vertical gradient
pub fn vertical_gradient(ctx: &CanvasRenderingContext2d, stops: &[(f32, &str)]) {
    let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, PLAYFIELD_H as f64);
    for (offset, color) in stops {
        let _ = gradient.add_color_stop(*offset, color);
    }
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.fill_rect(0.0, 0.0, PLAYFIELD_W as f64, PLAYFIELD_H as f64);
}

/// Drifting pseudo-random starfield; deterministic per star index
pub fn starfield(
    ctx: &CanvasRenderingContext2d,
    time: f64,
    count: u32,
    stride: (u32, u32),
    drift: f64,
    rgb: (u8, u8, u8),
    twinkle: f64,
) {
    for i in 0..count {
        let x = f64::from(i * stride.0) % PLAYFIELD_W as f64;
        let y = (f64::from(i * stride.1) + time * drift) % PLAYFIELD_H as f64;
        let size = f64::from(i % 3 + 1);
        let alpha = 0.3 + (time + f64::from(i)).sin() * twinkle;
        ctx.set_fill_style_str(&format!(
            "rgba({},{},{},{alpha:.3})",
            rgb.0, rgb.1, rgb.2
        ));
        ctx.fill_rect(x, y, size, size);
    }
}

/// A filled circle path
pub fn fill_circle(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64) {
    ctx.begin_path();
    let _ = ctx.arc(x, y, radius, 0.0, std::f64::consts::TAU);
    ctx.fill();
}

/// Particles drawn with life-proportional alpha
pub fn draw_particles(ctx: &CanvasRenderingContext2d, particles: &[Particle]) {
    for p in particles {
        ctx.set_fill_style_str(p.color);
        ctx.set_global_alpha(f64::from(p.life));
        fill_circle(ctx, f64::from(p.pos.x), f64::from(p.pos.y), f64::from(p.size));
    }
    ctx.set_global_alpha(1.0);
}

/// Centred text in the given font
pub fn centered_text(ctx: &CanvasRenderingContext2d, text: &str, x: f64, y: f64, font: &str) {
    ctx.set_font(font);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    let _ = ctx.fill_text(text, x, y);
}
