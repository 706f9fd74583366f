//! Decorative year-progress styles.

use std::f32::consts::PI;

use chrono::Datelike;

use super::{filled_cells, mono, percent_label, sans, Frame, Scene};
use crate::error::RenderError;
use crate::progress::{month_progress, week_progress, year_progress};
use crate::surface::TextAlign;

const NEON_SEGMENTS: usize = 20;
const RETRO_COLS: usize = 20;

/// Background fading from `bg` at the top into `accent` at the bottom.
pub(super) fn gradient(f: &mut Frame<'_>, s: &Scene<'_>) -> Result<(), RenderError> {
    let progress = year_progress(s.local());
    let (w, h) = (f.w, f.h);

    let top = f.backdrop(1.0);
    let bottom = f.ink(0.35);
    f.gradient(0.0, 0.0, w, h, top, bottom)?;

    f.text(percent_label(progress.percent), f.cx(), h * 0.42, w * 0.25, 800, 1.0)?;
    f.text(
        progress.year.to_string(),
        f.cx(),
        h * 0.52,
        f.min_side() * 0.05,
        400,
        0.7,
    )?;

    let bar_w = w * 0.6;
    f.progress_bar((w - bar_w) / 2.0, h * 0.58, bar_w, (h * 0.004).max(2.0), progress.percent / 100.0)
}

/// Neon grid, a glowing segmented bar and a monospace day counter.
pub(super) fn cyberpunk(f: &mut Frame<'_>, s: &Scene<'_>) -> Result<(), RenderError> {
    let progress = year_progress(s.local());
    let (w, h) = (f.w, f.h);
    let min = f.min_side();

    let step = min / 12.0;
    let grid = f.ink(0.08);
    let mut x = 0.0;
    while x <= w {
        f.line(x, 0.0, x, h, 1.0, grid)?;
        x += step;
    }
    let mut y = 0.0;
    while y <= h {
        f.line(0.0, y, w, y, 1.0, grid)?;
        y += step;
    }

    let bar_w = w * 0.8;
    let seg_gap = bar_w * 0.01;
    let seg_w = (bar_w - seg_gap * (NEON_SEGMENTS - 1) as f32) / NEON_SEGMENTS as f32;
    let seg_h = min * 0.05;
    let x0 = (w - bar_w) / 2.0;
    let y0 = f.cy();
    let lit = filled_cells(progress.percent, NEON_SEGMENTS);
    for i in 0..NEON_SEGMENTS {
        let paint = if i < lit {
            f.ink(1.0).with_glow(seg_h * 0.8)
        } else {
            f.ink(0.15)
        };
        f.rect(x0 + i as f32 * (seg_w + seg_gap), y0, seg_w, seg_h, paint)?;
    }
    let frame = f.ink(0.6);
    f.stroke_round_rect(
        x0 - seg_gap * 2.0,
        y0 - seg_gap * 2.0,
        bar_w + seg_gap * 4.0,
        seg_h + seg_gap * 4.0,
        0.0,
        2.0,
        frame,
    )?;

    let glow = f.ink(1.0).with_glow(min * 0.03);
    f.text_with(
        format!("{:.1}%", progress.percent),
        f.cx(),
        y0 - h * 0.08,
        TextAlign::Center,
        mono(min * 0.16, 700),
        glow,
    )?;

    let counter = f.ink(0.8);
    f.text_with(
        format!("DAY {:03}/{}", progress.elapsed_days, progress.total_days),
        f.cx(),
        y0 + seg_h + h * 0.06,
        TextAlign::Center,
        mono(min * 0.05, 500),
        counter,
    )
}

/// A sun travelling over the horizon with the year, above twelve month
/// leaves.
pub(super) fn nature(f: &mut Frame<'_>, s: &Scene<'_>) -> Result<(), RenderError> {
    let local = s.local();
    let progress = year_progress(local);
    let (w, h) = (f.w, f.h);
    let min = f.min_side();

    let cx = f.cx();
    let horizon = h * 0.5;
    let radius = w * 0.38;

    let path = f.ink(0.2);
    f.arc(cx, horizon, radius, PI, 2.0 * PI, min * 0.006, path)?;
    let ground = f.ink(0.5);
    f.line(w * 0.05, horizon, w * 0.95, horizon, min * 0.004, ground)?;

    // left horizon (pi) at day one, right horizon (2 pi) at year end
    let angle = PI + PI * (progress.percent / 100.0) as f32;
    let sun_x = cx + radius * angle.cos();
    let sun_y = horizon + radius * angle.sin();
    let sun = f.ink(1.0).with_glow(min * 0.05);
    f.circle(sun_x, sun_y, min * 0.045, sun)?;

    let leaf = min * 0.05;
    let gap = leaf * 0.5;
    let row_w = 6.0 * leaf + 5.0 * gap;
    let months_done = local.month0() as usize;
    for i in 0..12 {
        let col = (i % 6) as f32;
        let row = (i / 6) as f32;
        let x = (w - row_w) / 2.0 + col * (leaf + gap) + leaf / 2.0;
        let y = horizon + h * 0.08 + row * (leaf + gap);
        let paint = f.ink(if i <= months_done { 1.0 } else { 0.2 });
        f.circle(x, y, leaf / 2.0, paint)?;
    }

    f.text(
        percent_label(progress.percent),
        cx,
        horizon + h * 0.25,
        min * 0.12,
        700,
        1.0,
    )?;
    f.text(s.dict.months[local.month0() as usize], cx, horizon + h * 0.31, min * 0.05, 400, 0.7)
}

/// One pixel cell per day of the year, twenty to a row.
pub(super) fn retro(f: &mut Frame<'_>, s: &Scene<'_>) -> Result<(), RenderError> {
    let progress = year_progress(s.local());
    let total = progress.total_days as usize;
    let rows = total.div_ceil(RETRO_COLS);
    let min = f.min_side();

    let pitch = (f.w * 0.8 / RETRO_COLS as f32).min(f.h * 0.55 / rows as f32);
    let cell = pitch * 0.8;
    let grid_w = pitch * RETRO_COLS as f32;
    let grid_h = pitch * rows as f32;
    let x0 = (f.w - grid_w) / 2.0;
    let y0 = (f.h - grid_h) / 2.0;

    for day in 0..total {
        let x = x0 + (day % RETRO_COLS) as f32 * pitch;
        let y = y0 + (day / RETRO_COLS) as f32 * pitch;
        let alpha = if day < progress.elapsed_days as usize { 1.0 } else { 0.15 };
        let paint = f.ink(alpha);
        f.rect(x, y, cell, cell, paint)?;
    }

    let ink = f.ink(1.0);
    f.text_with(
        format!("DAY {}/{}", progress.elapsed_days, progress.total_days),
        f.cx(),
        y0 - f.h * 0.05,
        TextAlign::Center,
        mono(min * 0.06, 700),
        ink,
    )?;
    let dim = f.ink(0.7);
    f.text_with(
        percent_label(progress.percent),
        f.cx(),
        y0 + grid_h + f.h * 0.05,
        TextAlign::Center,
        mono(min * 0.05, 400),
        dim,
    )
}

/// Frosted card with year, month and week bars.
pub(super) fn glass(f: &mut Frame<'_>, s: &Scene<'_>) -> Result<(), RenderError> {
    let local = s.local();
    let rows = [
        (s.dict.year, year_progress(local).percent),
        (s.dict.month, month_progress(local).percent),
        (s.dict.week, week_progress(local).percent),
    ];
    let min = f.min_side();

    let card_w = f.w * 0.8;
    let card_h = f.h * 0.36;
    let card_x = (f.w - card_w) / 2.0;
    let card_y = (f.h - card_h) / 2.0;
    let radius = min * 0.05;

    let panel = f.ink(0.08);
    f.round_rect(card_x, card_y, card_w, card_h, radius, panel)?;
    let border = f.ink(0.25);
    f.stroke_round_rect(card_x, card_y, card_w, card_h, radius, 2.0, border)?;

    let pad = card_w * 0.08;
    let inner_w = card_w - pad * 2.0;
    let row_h = (card_h - pad * 2.0) / rows.len() as f32;
    let label_size = min * 0.045;
    let bar_h = label_size * 0.4;

    let title = f.ink(0.6);
    f.text_with(
        local.year().to_string(),
        f.cx(),
        card_y - f.h * 0.04,
        TextAlign::Center,
        sans(min * 0.05, 300),
        title,
    )?;

    for (i, (label, percent)) in rows.into_iter().enumerate() {
        let top = card_y + pad + i as f32 * row_h;
        let text_y = top + label_size * 0.6;
        let label_paint = f.ink(0.8);
        f.text_with(
            label,
            card_x + pad,
            text_y,
            TextAlign::Left,
            sans(label_size, 500),
            label_paint,
        )?;
        let value_paint = f.ink(1.0);
        f.text_with(
            percent_label(percent),
            card_x + pad + inner_w,
            text_y,
            TextAlign::Right,
            sans(label_size, 700),
            value_paint,
        )?;
        f.progress_bar(card_x + pad, top + label_size * 1.6, inner_w, bar_h, percent / 100.0)?;
    }
    Ok(())
}
