//! Wallpaper style routines.
//!
//! [`render`] is the single entry point. It looks up the routine for the
//! configured [`WallpaperType`] in [`handler`], an exhaustive match, so a
//! new style cannot be added without a routine.
//!
//! Every routine:
//! - starts from a surface already filled with `theme.bg`,
//! - draws all ink in `theme.accent`, using alpha to separate elapsed
//!   (1.0) from remaining (0.15-0.2),
//! - sizes geometry from the surface dimensions, never absolute pixels,
//! - draws a localized placeholder for unusable inputs instead of failing.
//!
//! Errors raised inside a routine are caught by [`render`], which replaces
//! the partial drawing with a dark "Error rendering wallpaper" panel.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

use crate::config::{Color, Theme, WallpaperConfig, WallpaperType};
use crate::error::RenderError;
use crate::i18n::Dictionary;
use crate::surface::{DrawOp, Font, FontFamily, Paint, Surface, TextAlign};

mod classic;
mod info;
mod themed;

/// Text of the fallback panel.
pub const FALLBACK_MESSAGE: &str = "Error rendering wallpaper";

/// A style routine.
pub type StyleFn = fn(&mut Frame<'_>, &Scene<'_>) -> Result<(), RenderError>;

/// Inputs shared by all style routines.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub config: &'a WallpaperConfig,
    /// Instant being drawn, with the viewer's UTC offset
    pub now: DateTime<FixedOffset>,
    pub dict: &'static Dictionary,
}

impl Scene<'_> {
    /// Viewer's wall-clock time.
    pub fn local(&self) -> NaiveDateTime {
        self.now.naive_local()
    }

    /// The same instant in UTC.
    pub fn utc(&self) -> DateTime<Utc> {
        self.now.with_timezone(&Utc)
    }
}

/// Routine for each style.
pub fn handler(kind: WallpaperType) -> StyleFn {
    match kind {
        WallpaperType::Year => classic::year,
        WallpaperType::Goal => classic::goal,
        WallpaperType::Month => classic::month,
        WallpaperType::Week => classic::week,
        WallpaperType::Minimal => classic::minimal,
        WallpaperType::Gradient => themed::gradient,
        WallpaperType::Cyberpunk => themed::cyberpunk,
        WallpaperType::Nature => themed::nature,
        WallpaperType::Retro => themed::retro,
        WallpaperType::Glass => themed::glass,
        WallpaperType::Digital => info::digital,
        WallpaperType::Quote => info::quote,
        WallpaperType::Stats => info::stats,
        WallpaperType::Season => info::season,
        WallpaperType::Binary => info::binary,
        WallpaperType::Moon => info::moon,
    }
}

/// Draw `config` at instant `now` onto `surface`.
///
/// Never fails: a routine error is logged and replaced by the fallback
/// panel.
pub fn render(surface: &mut dyn Surface, config: &WallpaperConfig, now: DateTime<FixedOffset>) {
    render_with(surface, config, now, handler(config.kind));
}

fn render_with(
    surface: &mut dyn Surface,
    config: &WallpaperConfig,
    now: DateTime<FixedOffset>,
    draw: StyleFn,
) {
    let scene = Scene {
        config,
        now,
        dict: config.language.dictionary(),
    };

    tracing::debug!(
        "Rendering {} wallpaper at {}x{}",
        config.kind,
        surface.width(),
        surface.height()
    );

    let result = Frame::new(surface, config.theme).and_then(|mut frame| {
        frame.clear()?;
        draw(&mut frame, &scene)
    });

    if let Err(err) = result {
        tracing::warn!("Failed to render {} wallpaper: {}", config.kind, err);
        paint_fallback(surface);
    }
}

/// Replace whatever was drawn with the dark error panel.
fn paint_fallback(surface: &mut dyn Surface) {
    let (w, h) = (surface.width() as f32, surface.height() as f32);
    surface.reset();
    surface.draw(DrawOp::FillRect {
        x: 0.0,
        y: 0.0,
        w,
        h,
        radius: 0.0,
        paint: Paint::new(Color::BLACK, 1.0),
    });
    surface.draw(DrawOp::Text {
        text: FALLBACK_MESSAGE.to_string(),
        x: w / 2.0,
        y: h / 2.0,
        align: TextAlign::Center,
        font: sans(30.0, 400),
        paint: Paint::new(Color::WHITE, 1.0),
    });
}

/// Sans-serif font.
pub fn sans(size: f32, weight: u16) -> Font {
    Font {
        size,
        weight,
        family: FontFamily::Sans,
    }
}

/// Monospace font.
pub fn mono(size: f32, weight: u16) -> Font {
    Font {
        size,
        weight,
        family: FontFamily::Mono,
    }
}

/// Number of grid cells to fill for `percent` out of `total`.
pub fn filled_cells(percent: f64, total: usize) -> usize {
    (((percent / 100.0) * total as f64).floor().max(0.0) as usize).min(total)
}

/// `"79%"` style label, rounding down.
fn percent_label(percent: f64) -> String {
    format!("{}%", percent.floor() as i64)
}

/// Drawing context handed to style routines.
///
/// Wraps the surface with the theme and validates geometry before emitting
/// operations.
pub struct Frame<'a> {
    surface: &'a mut dyn Surface,
    theme: Theme,
    /// Surface width in pixels
    pub w: f32,
    /// Surface height in pixels
    pub h: f32,
}

impl<'a> Frame<'a> {
    /// Wrap `surface`; fails on a zero-sized surface.
    pub fn new(surface: &'a mut dyn Surface, theme: Theme) -> Result<Self, RenderError> {
        let (width, height) = (surface.width(), surface.height());
        if width == 0 || height == 0 {
            return Err(RenderError::EmptySurface { width, height });
        }
        Ok(Self {
            surface,
            theme,
            w: width as f32,
            h: height as f32,
        })
    }

    pub fn min_side(&self) -> f32 {
        self.w.min(self.h)
    }

    pub fn cx(&self) -> f32 {
        self.w / 2.0
    }

    pub fn cy(&self) -> f32 {
        self.h / 2.0
    }

    /// Accent paint at `alpha`.
    pub fn ink(&self, alpha: f32) -> Paint {
        Paint::new(self.theme.accent, alpha)
    }

    /// Background paint at `alpha`.
    pub fn backdrop(&self, alpha: f32) -> Paint {
        Paint::new(self.theme.bg, alpha)
    }

    /// Fill the whole surface with the background color.
    pub fn clear(&mut self) -> Result<(), RenderError> {
        let paint = self.backdrop(1.0);
        self.round_rect(0.0, 0.0, self.w, self.h, 0.0, paint)
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint) -> Result<(), RenderError> {
        self.round_rect(x, y, w, h, 0.0, paint)
    }

    /// Filled rectangle; the radius is capped at half the shorter side.
    pub fn round_rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        paint: Paint,
    ) -> Result<(), RenderError> {
        let radius = radius.min(w / 2.0).min(h / 2.0).max(0.0);
        self.emit(
            "rect",
            &[x, y, w, h, radius],
            DrawOp::FillRect {
                x,
                y,
                w,
                h,
                radius,
                paint,
            },
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn stroke_round_rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        line_width: f32,
        paint: Paint,
    ) -> Result<(), RenderError> {
        let radius = radius.min(w / 2.0).min(h / 2.0).max(0.0);
        self.emit(
            "stroke_rect",
            &[x, y, w, h, radius, line_width],
            DrawOp::StrokeRect {
                x,
                y,
                w,
                h,
                radius,
                line_width,
                paint,
            },
        )
    }

    /// Rectangle with a vertical gradient from `top` to `bottom`.
    pub fn gradient(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        top: Paint,
        bottom: Paint,
    ) -> Result<(), RenderError> {
        self.emit(
            "gradient",
            &[x, y, w, h],
            DrawOp::GradientRect {
                x,
                y,
                w,
                h,
                top,
                bottom,
            },
        )
    }

    pub fn circle(&mut self, cx: f32, cy: f32, r: f32, paint: Paint) -> Result<(), RenderError> {
        self.emit("circle", &[cx, cy, r], DrawOp::FillCircle { cx, cy, r, paint })
    }

    /// Stroked arc from `start` to `end` radians (clockwise, 0 = 3 o'clock).
    #[allow(clippy::too_many_arguments)]
    pub fn arc(
        &mut self,
        cx: f32,
        cy: f32,
        r: f32,
        start: f32,
        end: f32,
        line_width: f32,
        paint: Paint,
    ) -> Result<(), RenderError> {
        self.emit(
            "arc",
            &[cx, cy, r, start, end, line_width],
            DrawOp::StrokeArc {
                cx,
                cy,
                r,
                start,
                end,
                line_width,
                paint,
            },
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn line(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        line_width: f32,
        paint: Paint,
    ) -> Result<(), RenderError> {
        self.emit(
            "line",
            &[x1, y1, x2, y2, line_width],
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                line_width,
                paint,
            },
        )
    }

    /// Centered sans-serif text in accent color.
    pub fn text(
        &mut self,
        text: impl Into<String>,
        x: f32,
        y: f32,
        size: f32,
        weight: u16,
        alpha: f32,
    ) -> Result<(), RenderError> {
        let paint = self.ink(alpha);
        self.text_with(text, x, y, TextAlign::Center, sans(size, weight), paint)
    }

    /// Text with explicit alignment, font and paint.
    pub fn text_with(
        &mut self,
        text: impl Into<String>,
        x: f32,
        y: f32,
        align: TextAlign,
        font: Font,
        paint: Paint,
    ) -> Result<(), RenderError> {
        self.emit(
            "text",
            &[x, y, font.size],
            DrawOp::Text {
                text: text.into(),
                x,
                y,
                align,
                font,
                paint,
            },
        )
    }

    /// Rounded track at 0.2 alpha with the elapsed `fraction` on top.
    pub fn progress_bar(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        fraction: f64,
    ) -> Result<(), RenderError> {
        let track = self.ink(0.2);
        self.round_rect(x, y, w, h, h / 2.0, track)?;

        let filled = w * fraction.clamp(0.0, 1.0) as f32;
        if filled > 0.0 {
            let ink = self.ink(1.0);
            self.round_rect(x, y, filled, h, h / 2.0, ink)?;
        }
        Ok(())
    }

    /// Centered message used when an input cannot be drawn.
    pub fn placeholder(&mut self, message: &str) -> Result<(), RenderError> {
        let size = self.min_side() / 18.0;
        self.text(message, self.cx(), self.cy(), size, 500, 1.0)
    }

    fn emit(&mut self, what: &'static str, values: &[f32], op: DrawOp) -> Result<(), RenderError> {
        if values.iter().all(|v| v.is_finite()) {
            self.surface.draw(op);
            Ok(())
        } else {
            Err(RenderError::NonFinite(what))
        }
    }
}

/// Split `text` into lines no wider than `max_width` at font `size`.
///
/// Widths are estimated (CJK glyphs one em, others just over half an em).
/// Latin text breaks between words, CJK text between characters.
pub fn wrap_text(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut width = 0.0;

    for token in tokens(text) {
        let spaced = line
            .chars()
            .last()
            .zip(token.chars().next())
            .is_some_and(|(a, b)| !is_wide(a) && !is_wide(b));
        let sep_width = if spaced { size * 0.3 } else { 0.0 };
        let token_width = measure(token, size);

        if !line.is_empty() && width + sep_width + token_width > max_width {
            lines.push(std::mem::take(&mut line));
            width = 0.0;
        } else if spaced {
            line.push(' ');
            width += sep_width;
        }
        line.push_str(token);
        width += token_width;
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn tokens(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        if is_wide(c) || c.is_whitespace() {
            if let Some(s) = start.take() {
                out.push(&text[s..i]);
            }
            if is_wide(c) {
                out.push(&text[i..i + c.len_utf8()]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        out.push(&text[s..]);
    }
    out
}

fn is_wide(c: char) -> bool {
    c >= '\u{2E80}'
}

fn measure(text: &str, size: f32) -> f32 {
    text.chars()
        .map(|c| if is_wide(c) { size } else { size * 0.55 })
        .sum()
}
