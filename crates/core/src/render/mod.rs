//! Drawing surface abstraction.
//!
//! [`Canvas`] is the host's 2D surface. Browser hosts forward the calls to a
//! canvas context; [`RecordingCanvas`] keeps the most recent frame as a list
//! of serialisable commands for headless runs and tests.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Hue/saturation/lightness triple as used by CSS (`h` in degrees,
/// `s` and `l` in percent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    pub fn with_alpha(self, alpha: f64) -> Color {
        Color::Hsla {
            h: self.h.rem_euclid(360.0),
            s: self.s,
            l: self.l,
            a: alpha.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Rgba { r: u8, g: u8, b: u8, a: f64 },
    Hsla { h: f64, s: f64, l: f64, a: f64 },
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgba { r, g, b, a: 1.0 }
    }

    pub fn alpha(&self) -> f64 {
        match self {
            Self::Rgba { a, .. } | Self::Hsla { a, .. } => *a,
        }
    }

    /// CSS colour string, e.g. `hsla(340, 60%, 70%, 0.12)`.
    pub fn to_css(&self) -> String {
        match self {
            Self::Rgba { r, g, b, a } if *a >= 1.0 => format!("rgb({r}, {g}, {b})"),
            Self::Rgba { r, g, b, a } => format!("rgba({r}, {g}, {b}, {a})"),
            Self::Hsla { h, s, l, a } => format!("hsla({h}, {s}%, {l}%, {a})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Color,
}

impl ColorStop {
    pub fn new(offset: f64, color: Color) -> Self {
        Self { offset, color }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<ColorStop>,
}

/// Radial gradient from radius zero at `center` out to `radius`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialGradient {
    pub center: Point,
    pub radius: f64,
    pub stops: Vec<ColorStop>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Paint {
    Solid { color: Color },
    Linear(LinearGradient),
    Radial(RadialGradient),
}

/// Host drawing surface.
pub trait Canvas {
    fn size(&self) -> (u32, u32);

    fn resize(&mut self, width: u32, height: u32);

    /// Paints the whole surface with an opaque colour, starting a new frame.
    fn clear(&mut self, color: Color);

    /// Fills a closed polygon.
    fn fill_polygon(&mut self, points: &[Point], paint: &Paint);

    /// Fills the whole surface with `paint`, blended over what is there.
    fn fill_surface(&mut self, paint: &Paint);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear { color: Color },
    Polygon { points: Vec<Point>, paint: Paint },
    Surface { paint: Paint },
    Circle { center: Point, radius: f64, color: Color },
}

/// Headless [`Canvas`] that records the current frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.clear();
    }

    fn clear(&mut self, color: Color) {
        // An opaque clear hides everything drawn before it.
        self.commands.clear();
        self.commands.push(DrawCommand::Clear { color });
    }

    fn fill_polygon(&mut self, points: &[Point], paint: &Paint) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            paint: paint.clone(),
        });
    }

    fn fill_surface(&mut self, paint: &Paint) {
        self.commands.push(DrawCommand::Surface {
            paint: paint.clone(),
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }
}
