//! Text-heavy and astronomical styles.

use std::f32::consts::{FRAC_PI_2, TAU};

use chrono::{Datelike, Timelike};

use super::{mono, percent_label, sans, wrap_text, Frame, Scene};
use crate::error::RenderError;
use crate::progress::{
    month_progress, moon_phase, season_progress, week_progress, year_progress, Season,
};
use crate::surface::TextAlign;

/// Monospace clock with the date, weekday and a two-decimal year percent.
pub(super) fn digital(f: &mut Frame<'_>, s: &Scene<'_>) -> Result<(), RenderError> {
    let local = s.local();
    let progress = year_progress(local);
    let min = f.min_side();
    let cx = f.cx();
    let cy = f.cy();

    let clock = f.ink(1.0).with_glow(min * 0.02);
    f.text_with(
        format!("{:02}:{:02}", local.hour(), local.minute()),
        cx,
        cy - f.h * 0.08,
        TextAlign::Center,
        mono(f.w * 0.22, 700),
        clock,
    )?;

    let dim = f.ink(0.7);
    f.text_with(
        local.format("%Y-%m-%d").to_string(),
        cx,
        cy + f.h * 0.01,
        TextAlign::Center,
        mono(min * 0.06, 400),
        dim,
    )?;
    f.text(
        s.dict.weekdays[local.weekday().num_days_from_monday() as usize],
        cx,
        cy + f.h * 0.05,
        min * 0.05,
        500,
        0.7,
    )?;

    let bar_w = f.w * 0.6;
    let bar_y = cy + f.h * 0.1;
    f.progress_bar((f.w - bar_w) / 2.0, bar_y, bar_w, min * 0.012, progress.percent / 100.0)?;

    let ink = f.ink(1.0);
    f.text_with(
        format!("{:05.2}%", progress.percent),
        cx,
        bar_y + f.h * 0.04,
        TextAlign::Center,
        mono(min * 0.05, 500),
        ink,
    )
}

/// Quote of the day with a small year footer.
pub(super) fn quote(f: &mut Frame<'_>, s: &Scene<'_>) -> Result<(), RenderError> {
    let local = s.local();
    let progress = year_progress(local);
    let quotes = s.dict.quotes;
    if quotes.is_empty() {
        return f.placeholder(&percent_label(progress.percent));
    }
    let text = quotes[local.day() as usize % quotes.len()];

    let min = f.min_side();
    let size = min * 0.065;
    let line_h = size * 1.5;
    let lines = wrap_text(text, f.w * 0.8, size);
    let block_h = line_h * lines.len() as f32;
    let mut y = f.cy() - block_h / 2.0 + line_h / 2.0;
    for line in lines {
        f.text(line, f.cx(), y, size, 500, 1.0)?;
        y += line_h;
    }

    let rule_y = f.cy() + block_h / 2.0 + f.h * 0.04;
    let rule = f.ink(0.3);
    f.line(f.cx() - f.w * 0.1, rule_y, f.cx() + f.w * 0.1, rule_y, 2.0, rule)?;
    f.text(
        format!("{} · {}", progress.year, percent_label(progress.percent)),
        f.cx(),
        rule_y + f.h * 0.04,
        min * 0.04,
        400,
        0.6,
    )
}

/// Rows of figures with mini bars for the percentages.
pub(super) fn stats(f: &mut Frame<'_>, s: &Scene<'_>) -> Result<(), RenderError> {
    let local = s.local();
    let year = year_progress(local);
    let month = month_progress(local).percent;
    let week = week_progress(local).percent;
    let rows = [
        (s.dict.year, percent_label(year.percent), Some(year.percent)),
        (s.dict.month, percent_label(month), Some(month)),
        (s.dict.week, percent_label(week), Some(week)),
        (s.dict.day_of_year, year.elapsed_days.to_string(), None),
        (s.dict.days_remaining, year.days_remaining.to_string(), None),
    ];

    let min = f.min_side();
    let left = f.w * 0.12;
    let right = f.w * 0.88;
    let row_h = f.h * 0.09;
    let size = min * 0.05;
    let mut y = f.cy() - row_h * (rows.len() as f32 - 1.0) / 2.0;

    for (label, value, bar) in rows {
        let label_paint = f.ink(0.7);
        f.text_with(label, left, y, TextAlign::Left, sans(size, 400), label_paint)?;
        let value_paint = f.ink(1.0);
        f.text_with(value, right, y, TextAlign::Right, mono(size, 700), value_paint)?;
        if let Some(percent) = bar {
            f.progress_bar(left, y + size * 0.9, right - left, size * 0.2, percent / 100.0)?;
        }
        y += row_h;
    }
    Ok(())
}

/// Four quadrant arcs, one per season, around the progress of the current
/// one.
pub(super) fn season(f: &mut Frame<'_>, s: &Scene<'_>) -> Result<(), RenderError> {
    let progress = season_progress(s.local());
    let (cx, cy) = (f.cx(), f.cy());
    let min = f.min_side();
    let outer = min * 0.32;
    let inner = outer * 0.75;
    let line_width = min * 0.025;
    let gap = 0.06;

    for season in Season::ALL {
        let start = -FRAC_PI_2 + season.index() as f32 * FRAC_PI_2;
        let paint = f.ink(if season == progress.season { 1.0 } else { 0.2 });
        f.arc(cx, cy, outer, start + gap, start + FRAC_PI_2 - gap, line_width, paint)?;
    }

    let track = f.ink(0.15);
    f.arc(cx, cy, inner, 0.0, TAU, line_width * 0.6, track)?;
    let sweep = TAU * (progress.percent / 100.0) as f32;
    if sweep > 0.0 {
        let ink = f.ink(1.0);
        f.arc(cx, cy, inner, -FRAC_PI_2, -FRAC_PI_2 + sweep, line_width * 0.6, ink)?;
    }

    f.text(
        s.dict.seasons[progress.season.index()],
        cx,
        cy - inner * 0.15,
        inner * 0.45,
        700,
        1.0,
    )?;
    f.text(
        percent_label(progress.percent),
        cx,
        cy + inner * 0.35,
        inner * 0.18,
        500,
        0.7,
    )
}

/// The year percent as eight bit cells.
pub(super) fn binary(f: &mut Frame<'_>, s: &Scene<'_>) -> Result<(), RenderError> {
    let progress = year_progress(s.local());
    let value = progress.percent.floor().clamp(0.0, 255.0) as u8;
    let bits = format!("{:08b}", value);
    let min = f.min_side();

    let cell = f.w * 0.08;
    let gap = cell * 0.35;
    let row_w = 8.0 * cell + 7.0 * gap;
    let x0 = (f.w - row_w) / 2.0;
    let y0 = f.cy() - f.h * 0.08;

    for (i, bit) in bits.chars().enumerate() {
        let x = x0 + i as f32 * (cell + gap);
        if bit == '1' {
            let on = f.ink(1.0).with_glow(cell * 0.3);
            f.round_rect(x, y0, cell, cell, cell * 0.15, on)?;
        } else {
            let off = f.ink(0.3);
            f.stroke_round_rect(x, y0, cell, cell, cell * 0.15, 2.0, off)?;
        }
    }

    let ink = f.ink(1.0);
    f.text_with(
        bits,
        f.cx(),
        y0 + cell + f.h * 0.06,
        TextAlign::Center,
        mono(min * 0.07, 700),
        ink,
    )?;
    let dim = f.ink(0.6);
    f.text_with(
        format!("= {}", percent_label(progress.percent)),
        f.cx(),
        y0 + cell + f.h * 0.11,
        TextAlign::Center,
        mono(min * 0.05, 400),
        dim,
    )
}

/// Current lunar phase.
///
/// The lit disc is covered by a background-colored disc shifted sideways by
/// `illumination * 2r`: fully covering at new moon, clear of it at full.
pub(super) fn moon(f: &mut Frame<'_>, s: &Scene<'_>) -> Result<(), RenderError> {
    let phase = moon_phase(s.utc());
    let (cx, cy) = (f.cx(), f.cy() - f.h * 0.05);
    let r = f.min_side() * 0.25;

    let lit = f.ink(1.0);
    f.circle(cx, cy, r, lit)?;

    let shift = phase.illumination as f32 * 2.0 * r;
    let shadow_x = if phase.waxing { cx - shift } else { cx + shift };
    let shadow = f.backdrop(1.0);
    f.circle(shadow_x, cy, r * 1.01, shadow)?;

    let outline = f.ink(0.3);
    f.arc(cx, cy, r, 0.0, TAU, r * 0.02, outline)?;

    f.text(
        s.dict.moon_phases[phase.index],
        f.cx(),
        cy + r + f.h * 0.08,
        r * 0.28,
        600,
        1.0,
    )?;
    f.text(
        format!(
            "{} {}%",
            s.dict.illumination,
            (phase.illumination * 100.0).round() as i64
        ),
        f.cx(),
        cy + r + f.h * 0.13,
        r * 0.16,
        400,
        0.7,
    )
}
