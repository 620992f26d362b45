use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

/// The drawing surface a render pass targets, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// A color in hue/saturation/lightness space.
///
/// Flows keep one hue per flow class and vary only the lightness to express
/// emphasis, so the protocol carries the HSL triple instead of a resolved
/// RGB value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    /// Degrees, `0..360`.
    pub hue: f64,
    /// Percent, `0..=100`.
    pub saturation: f64,
    /// Percent, `0..=100`.
    pub lightness: f64,
}

impl Hsl {
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// `hsl(hue, 50%, intensity%)`, the flow color encoding.
    pub fn flow(hue: f64, intensity: f64) -> Self {
        Self::new(hue, 50.0, intensity)
    }

    /// CSS functional notation, e.g. `hsl(230, 50%, 70%)`.
    pub fn to_css(&self) -> String {
        format!(
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }

    /// Convert to an opaque RGBA color with channels in `0.0..=1.0`.
    pub fn to_color(&self) -> Color {
        let h = self.hue.rem_euclid(360.0) / 360.0;
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let l = (self.lightness / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            let v = l as f32;
            return Color::rgba(v, v, v, 1.0);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Color::rgba(
            hue_to_channel(p, q, h + 1.0 / 3.0) as f32,
            hue_to_channel(p, q, h) as f32,
            hue_to_channel(p, q, h - 1.0 / 3.0) as f32,
            1.0,
        )
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
