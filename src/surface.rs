//! Drawing surfaces.
//!
//! Style routines never touch pixels. They emit [`DrawOp`]s into a
//! [`Surface`]; the built-in [`DisplayList`] records them so they can be
//! serialized to JSON and replayed onto an HTML canvas (see
//! [`crate::page`]), or inspected directly in tests.

use serde::Serialize;

use crate::config::Color;

/// Fill or stroke color with opacity and an optional glow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Paint {
    pub color: Color,
    /// 0.0 (transparent) to 1.0 (opaque)
    pub alpha: f32,
    /// Shadow blur radius in pixels, drawn in `color`; 0.0 disables it
    pub glow: f32,
}

impl Paint {
    pub fn new(color: Color, alpha: f32) -> Self {
        Self {
            color,
            alpha,
            glow: 0.0,
        }
    }

    #[must_use]
    pub fn with_glow(mut self, radius: f32) -> Self {
        self.glow = radius;
        self
    }
}

/// Font family class; the canvas player maps these to CSS font stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    Sans,
    Mono,
}

/// Horizontal anchor of a text run. Text is always vertically centered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Text font.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Font {
    /// Size in pixels
    pub size: f32,
    /// CSS weight (100-900)
    pub weight: u16,
    pub family: FontFamily,
}

/// One primitive drawing operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// Filled rectangle with optional corner radius
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        paint: Paint,
    },
    /// Stroked rectangle outline with optional corner radius
    StrokeRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        line_width: f32,
        paint: Paint,
    },
    /// Rectangle filled with a vertical gradient
    GradientRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        top: Paint,
        bottom: Paint,
    },
    /// Filled disc
    FillCircle { cx: f32, cy: f32, r: f32, paint: Paint },
    /// Stroked arc, angles in radians, clockwise from 3 o'clock
    StrokeArc {
        cx: f32,
        cy: f32,
        r: f32,
        start: f32,
        end: f32,
        line_width: f32,
        paint: Paint,
    },
    /// Straight line segment
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        line_width: f32,
        paint: Paint,
    },
    /// Single line of text anchored at `(x, y)`
    Text {
        text: String,
        x: f32,
        y: f32,
        align: TextAlign,
        font: Font,
        paint: Paint,
    },
}

/// Target of style routines.
pub trait Surface {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Append one operation.
    fn draw(&mut self, op: DrawOp);

    /// Discard everything drawn so far.
    fn reset(&mut self);
}

/// A surface that records operations in order.
///
/// # Example
///
/// ```
/// use lifegrid::surface::{DisplayList, Surface};
/// use lifegrid::{styles, WallpaperConfig};
///
/// let config = WallpaperConfig::default().with_size(400, 800);
/// let mut list = DisplayList::new(config.width, config.height);
/// styles::render(&mut list, &config, chrono::Local::now().fixed_offset());
///
/// assert!(!list.ops().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayList {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    /// Recorded operations, in drawing order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Text of every [`DrawOp::Text`], in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Serialize to JSON for the canvas player.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Surface for DisplayList {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    fn reset(&mut self) {
        self.ops.clear();
    }
}
