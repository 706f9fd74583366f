//! The original five styles: year grid, goal ring, month bar, week dots
//! and the minimal percentage.

use std::f32::consts::{FRAC_PI_2, TAU};

use chrono::{Datelike, NaiveDate};

use super::{filled_cells, percent_label, Frame, Scene};
use crate::error::RenderError;
use crate::progress::{
    default_target_date, goal_progress, month_progress, week_progress, year_progress,
    GOAL_WINDOW_DAYS,
};

const YEAR_COLS: usize = 13;
const YEAR_ROWS: usize = 10;

/// 13 x 10 grid of rounded cells, filled in proportion to the year.
pub(super) fn year(f: &mut Frame<'_>, s: &Scene<'_>) -> Result<(), RenderError> {
    let progress = year_progress(s.local());
    let min = f.min_side();

    let cell = min / 28.0;
    let gap = cell * 0.25;
    let grid_w = YEAR_COLS as f32 * cell + (YEAR_COLS - 1) as f32 * gap;
    let grid_h = YEAR_ROWS as f32 * cell + (YEAR_ROWS - 1) as f32 * gap;
    let x0 = (f.w - grid_w) / 2.0;
    let y0 = (f.h - grid_h) / 2.0 - f.h * 0.05;

    let total = YEAR_COLS * YEAR_ROWS;
    let filled = filled_cells(progress.percent, total);
    for i in 0..total {
        let x = x0 + (i % YEAR_COLS) as f32 * (cell + gap);
        let y = y0 + (i / YEAR_COLS) as f32 * (cell + gap);
        let paint = f.ink(if i < filled { 1.0 } else { 0.2 });
        f.round_rect(x, y, cell, cell, cell * 0.2, paint)?;
    }

    let text_y = y0 + grid_h + f.h * 0.12;
    f.text(percent_label(progress.percent), f.cx(), text_y, min / 10.0, 700, 1.0)?;
    f.text(
        progress.year.to_string(),
        f.cx(),
        text_y + f.h * 0.08,
        min / 22.0,
        500,
        0.6,
    )
}

/// Countdown ring towards the goal date.
///
/// The ring fills against a fixed 100-day window, so any goal further than
/// 100 days away shows an empty ring.
pub(super) fn goal(f: &mut Frame<'_>, s: &Scene<'_>) -> Result<(), RenderError> {
    let target = match s.config.target_date.as_deref() {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
        None => Some(default_target_date(s.utc().date_naive())),
    };
    let Some(target) = target else {
        return f.placeholder(s.dict.invalid_target);
    };

    let goal = goal_progress(target, s.utc(), GOAL_WINDOW_DAYS);
    let (cx, cy) = (f.cx(), f.cy());
    let radius = f.min_side() / 6.0;
    let line_width = radius * 0.08;

    let track = f.ink(0.2);
    f.arc(cx, cy, radius, 0.0, TAU, line_width, track)?;

    let start = -FRAC_PI_2;
    let sweep = TAU * (goal.percent / 100.0) as f32;
    if sweep > 0.0 {
        let ink = f.ink(1.0);
        f.arc(cx, cy, radius, start, start + sweep, line_width, ink)?;
    }

    f.text(
        goal.days_remaining.max(0).to_string(),
        cx,
        cy - radius * 0.1,
        radius * 0.9,
        700,
        1.0,
    )?;
    f.text(s.dict.days_left, cx, cy + radius * 0.5, radius * 0.18, 500, 0.7)?;

    let name = if s.config.goal_name.is_empty() {
        s.dict.default_goal
    } else {
        s.config.goal_name.as_str()
    };
    f.text(name, cx, f.h * 0.68, f.min_side() * 0.07, 600, 1.0)
}

/// Single bar scaled by the (sub-day precise) month percentage.
pub(super) fn month(f: &mut Frame<'_>, s: &Scene<'_>) -> Result<(), RenderError> {
    let local = s.local();
    let progress = month_progress(local);
    let min = f.min_side();

    let bar_w = f.w * 0.75;
    let bar_h = (f.h * 0.025).min(min * 0.06);
    let x = (f.w - bar_w) / 2.0;
    let y = f.cy();
    f.progress_bar(x, y, bar_w, bar_h, progress.percent / 100.0)?;

    f.text(
        percent_label(progress.percent),
        f.cx(),
        y - f.h * 0.08,
        min * 0.2,
        700,
        1.0,
    )?;
    f.text(
        s.dict.months[local.month0() as usize],
        f.cx(),
        y + f.h * 0.1,
        min * 0.08,
        500,
        0.7,
    )
}

/// Seven dots, Monday first; today glows.
pub(super) fn week(f: &mut Frame<'_>, s: &Scene<'_>) -> Result<(), RenderError> {
    let local = s.local();
    let today = local.weekday().num_days_from_monday() as usize;
    let progress = week_progress(local);

    let dot = (f.w / 12.0).min(f.h / 20.0);
    let gap = dot * 0.6;
    let total_w = 7.0 * dot + 6.0 * gap;
    let cy = f.cy();
    let mut x = (f.w - total_w) / 2.0;

    for day in 0..7 {
        let paint = if day < today {
            f.ink(1.0)
        } else if day == today {
            f.ink(1.0).with_glow(dot * 0.6)
        } else {
            f.ink(0.2)
        };
        f.circle(x + dot / 2.0, cy, dot / 2.2, paint)?;
        x += dot + gap;
    }

    f.text(
        format!("{} · {}", s.dict.this_week, percent_label(progress.percent)),
        f.cx(),
        cy + dot + f.h * 0.06,
        f.min_side() * 0.06,
        500,
        0.8,
    )
}

/// Just the year percentage, large.
pub(super) fn minimal(f: &mut Frame<'_>, s: &Scene<'_>) -> Result<(), RenderError> {
    let progress = year_progress(s.local());
    let (cx, cy) = (f.cx(), f.cy());

    f.text(percent_label(progress.percent), cx, cy - f.h * 0.02, f.w * 0.3, 800, 1.0)?;
    f.text(
        progress.year.to_string(),
        cx,
        cy + f.h * 0.12,
        f.min_side() * 0.06,
        300,
        0.5,
    )
}
