//! Decorative animated background fields
//!
//! Stateless pixel functions of (time, pointer, zoom, uv) with no game
//! state coupling. The presenter samples them at coarse resolution for
//! backdrop tiles; nothing here reads or writes session state.

use glam::{Mat2, Vec2};

/// A color in normalized [0, 1] channels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    /// CSS color string for canvas fills
    pub fn to_css(self) -> String {
        let c = self.clamped();
        format!(
            "rgb({},{},{})",
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8
        )
    }
}

/// GLSL-style fract: always in [0, 1)
#[inline]
fn fract(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn mix_rgb(a: Rgb, b: Rgb, t: f32) -> Rgb {
    Rgb::new(mix(a.r, b.r, t), mix(a.g, b.g, t), mix(a.b, b.b, t))
}

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Hash a 2-D point into [0, 1)
fn hash(st: Vec2) -> f32 {
    fract(st.dot(Vec2::new(12.9898, 78.233)).sin() * 43758.547)
}

/// Bilinear value noise
fn value_noise(st: Vec2) -> f32 {
    let i = st.floor();
    let f = st - i;
    let a = hash(i);
    let b = hash(i + Vec2::X);
    let c = hash(i + Vec2::Y);
    let d = hash(i + Vec2::ONE);
    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);
    mix(a, b, u.x) + (c - a) * u.y * (1.0 - u.x) + (d - b) * u.x * u.y
}

/// Fractal Brownian motion, six rotated octaves
fn fbm(mut st: Vec2) -> f32 {
    let rot = Mat2::from_angle(0.5);
    let mut v = 0.0;
    let mut amplitude = 0.5;
    for _ in 0..6 {
        v += amplitude * value_noise(st);
        st = rot * st * 2.0;
        amplitude *= 0.5;
    }
    v
}

/// Warm layered cloud field
///
/// `uv` and `pointer` are in [0, 1] texture space; `zoom` scales detail.
pub fn tan_clouds(uv: Vec2, time: f32, pointer: Vec2, zoom: f32) -> Rgb {
    let mut st = uv * (3.0 * zoom);

    // The pointer drags nearby cloud matter gently toward itself
    let influence = smoothstep(0.5, 0.0, uv.distance(pointer));
    st += (pointer - Vec2::splat(0.5)) * influence * 0.8;

    let q = Vec2::new(fbm(st), fbm(st + Vec2::ONE));
    let r = Vec2::new(
        fbm(st + q + Vec2::new(1.7, 9.2) + Vec2::splat(0.05 * time)),
        fbm(st + q + Vec2::new(8.3, 2.8) + Vec2::splat(0.04 * time)),
    );
    let f = fbm(st + r);

    let dark = Rgb::new(0.4, 0.25, 0.1);
    let medium = Rgb::new(0.8, 0.55, 0.2);
    let light = Rgb::new(0.95, 0.75, 0.45);

    let mut color = mix_rgb(dark, medium, ((f * f) * 4.0).clamp(0.0, 1.0));
    color = mix_rgb(color, medium, q.length().clamp(0.0, 1.0));
    color = mix_rgb(color, light, (r.x.abs() * 0.7).clamp(0.0, 1.0));

    let glow = smoothstep(0.5, 0.7, f);
    Rgb::new(
        color.r + 0.15 * glow,
        color.g + 0.1 * glow,
        color.b + 0.05 * glow,
    )
    .clamped()
}

/// One wavy vertical strand in local [0, 1] space
fn fur_strand(uv: Vec2, offset: f32, time: f32) -> f32 {
    let wave = (uv.y * 8.0 + offset + time * 0.3).sin() * 0.08
        + (uv.y * 4.0 + offset * 2.0 + time * 0.2).sin() * 0.05;
    let strand = smoothstep(0.015, 0.0, (uv.x - (0.5 + wave)).abs());
    let fade_top = smoothstep(0.0, 0.1, uv.y);
    let fade_bottom = smoothstep(1.0, 0.8, uv.y);
    strand * fade_top * fade_bottom
}

/// Long golden fur strands with wavy curls
pub fn fur_strands(uv: Vec2, time: f32, pointer: Vec2, zoom: f32) -> Rgb {
    let mut st = uv * zoom;

    // Pointer proximity adds a gentle wave distortion
    let mouse_wave = smoothstep(0.4, 0.0, uv.distance(pointer)) * 0.02;
    st.x += (uv.y * 10.0 + time).sin() * mouse_wave;

    let num_strands = (40.0 * zoom).min(40.0);
    let mut pattern = 0.0;
    for i in 0..40 {
        if i as f32 > num_strands {
            break;
        }
        let offset = i as f32 / 40.0;
        let strand_uv = Vec2::new(fract(st.x * 40.0 + offset), st.y);
        let strand_noise = hash(Vec2::new(i as f32, 0.0));
        pattern += fur_strand(strand_uv, strand_noise * 10.0, time) * (0.5 + strand_noise * 0.5);
    }

    // Fine noise breaks up the strands for depth
    let detail = value_noise(st * 50.0 + Vec2::splat(time * 0.1));
    pattern = mix(pattern, pattern * detail, 0.3);

    let dark = Rgb::new(0.35, 0.22, 0.08);
    let medium = Rgb::new(0.75, 0.5, 0.18);
    let light = Rgb::new(0.92, 0.7, 0.35);

    let mut color = mix_rgb(dark, medium, pattern * 1.5);
    color = mix_rgb(color, light, pattern * pattern * 2.0);

    let highlight = pattern.powi(3);
    color.r += 0.2 * highlight;
    color.g += 0.15 * highlight;
    color.b += 0.05 * highlight;

    let lighting = value_noise(uv * 2.0) * 0.2 + 0.8;
    Rgb::new(color.r * lighting, color.g * lighting, color.b * lighting).clamped()
}
