//! Calendar progress math.
//!
//! Every function here is pure: it takes the instant explicitly and returns
//! the same value for the same input. Local wall-clock values
//! ([`NaiveDateTime`]) drive year / month / week / season progress; absolute
//! instants ([`DateTime<Utc>`]) drive the goal countdown and the moon phase.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use lifegrid::progress::{year_progress, week_progress};
//!
//! let monday = NaiveDate::from_ymd_opt(2024, 1, 1)
//!     .unwrap()
//!     .and_hms_opt(0, 0, 0)
//!     .unwrap();
//!
//! assert_eq!(year_progress(monday).elapsed_days, 1);
//! assert_eq!(week_progress(monday).percent, 0.0);
//! ```

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};

/// Milliseconds in one day
pub const MS_PER_DAY: i64 = 86_400_000;

/// Length of the synodic month in days
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_67;

/// Reference new moon: 2000-01-06T18:14:00Z, as Unix milliseconds
pub const REFERENCE_NEW_MOON_MS: i64 = 947_182_440_000;

/// Goal countdowns are drawn against a fixed 100-day window.
pub const GOAL_WINDOW_DAYS: u32 = 100;

/// Progress through a calendar year, at whole-day granularity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearProgress {
    /// Calendar year
    pub year: i32,
    /// Percentage of the year elapsed (0-100)
    pub percent: f64,
    /// Days elapsed, counting today
    pub elapsed_days: u32,
    /// Days in the year (365 or 366)
    pub total_days: u32,
    /// Days left after today
    pub days_remaining: u32,
}

/// Progress through a month or a week, at millisecond granularity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodProgress {
    /// Percentage of the period elapsed (0-100)
    pub percent: f64,
    /// Milliseconds since the period started
    pub elapsed_ms: i64,
    /// Total length of the period in milliseconds
    pub total_ms: i64,
}

/// Countdown towards a goal date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    /// Whole days left, rounded up. Zero or negative once the date passed.
    pub days_remaining: i64,
    /// Display percentage against the 100-day window.
    ///
    /// This is a visual convention, not the fraction of the goal's real
    /// duration that has elapsed.
    pub percent: f64,
}

/// Meteorological season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    /// December - February
    Winter,
    /// March - May
    Spring,
    /// June - August
    Summer,
    /// September - November
    Autumn,
}

impl Season {
    /// All seasons in table order.
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Autumn];

    /// Season containing the given zero-based month.
    pub fn from_month0(month0: u32) -> Self {
        Self::ALL[(((month0 + 1) % 12) / 3) as usize]
    }

    /// Position in [`Season::ALL`] and in the localized season tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Zero-based month in which the season starts.
    pub fn start_month0(self) -> u32 {
        (self.index() as u32 * 3 + 11) % 12
    }
}

/// Progress through the current season.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonProgress {
    /// Current season
    pub season: Season,
    /// Percentage of the season elapsed (0-100)
    pub percent: f64,
}

/// Approximate lunar phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonPhase {
    /// Days since the last new moon
    pub age_days: f64,
    /// Position in the cycle, 0.0 (new) to 1.0 (next new)
    pub normalized: f64,
    /// Lit fraction of the disc, 0.0 to 1.0
    pub illumination: f64,
    /// Whether the lit fraction is growing
    pub waxing: bool,
    /// Index into the 8-entry phase name table
    pub index: usize,
}

/// Whether `year` is a Gregorian leap year.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `year`.
pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// One-based day of the year.
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

/// Default goal date used when none (or a malformed one) is given: a week
/// after `today`.
pub fn default_target_date(today: NaiveDate) -> NaiveDate {
    today
        .checked_add_signed(TimeDelta::days(7))
        .unwrap_or(NaiveDate::MAX)
}

/// Progress through the year containing `now`.
pub fn year_progress(now: NaiveDateTime) -> YearProgress {
    let year = now.year();
    let total_days = days_in_year(year);
    let elapsed_days = now.ordinal().min(total_days);
    let percent = (100.0 * f64::from(elapsed_days) / f64::from(total_days)).clamp(0.0, 100.0);

    YearProgress {
        year,
        percent,
        elapsed_days,
        total_days,
        days_remaining: total_days - elapsed_days,
    }
}

/// Progress through the month containing `now`.
///
/// Unlike [`year_progress`] this keeps sub-day precision.
pub fn month_progress(now: NaiveDateTime) -> PeriodProgress {
    let start = month_start(now.year(), now.month());
    let end = add_months(now.year(), now.month(), 1);
    period(now, start, end)
}

/// Progress through the Monday-based week containing `now`.
pub fn week_progress(now: NaiveDateTime) -> PeriodProgress {
    let offset = i64::from(now.weekday().num_days_from_monday());
    let start = (now.date() - TimeDelta::days(offset)).and_time(NaiveTime::MIN);
    let end = start + TimeDelta::days(7);
    period(now, start, end)
}

/// Progress through the meteorological season containing `now`.
pub fn season_progress(now: NaiveDateTime) -> SeasonProgress {
    let season = Season::from_month0(now.month0());
    let start_month0 = season.start_month0();
    let start_year = if now.month0() < start_month0 {
        now.year() - 1
    } else {
        now.year()
    };
    let start = month_start(start_year, start_month0 + 1);
    let end = add_months(start_year, start_month0 + 1, 3);

    SeasonProgress {
        season,
        percent: period(now, start, end).percent,
    }
}

/// Countdown towards `target` (midnight UTC), drawn against `window_days`.
pub fn goal_progress(target: NaiveDate, now: DateTime<Utc>, window_days: u32) -> GoalProgress {
    let target = target.and_time(NaiveTime::MIN).and_utc();
    let diff_ms = (target - now).num_milliseconds();
    let days_remaining = (diff_ms as f64 / MS_PER_DAY as f64).ceil() as i64;

    let window = f64::from(window_days.max(1));
    let percent = (100.0 - (days_remaining as f64 / window) * 100.0).clamp(0.0, 100.0);

    GoalProgress {
        days_remaining,
        percent,
    }
}

/// Moon phase at the instant `at`.
pub fn moon_phase(at: DateTime<Utc>) -> MoonPhase {
    let days_since = (at.timestamp_millis() - REFERENCE_NEW_MOON_MS) as f64 / MS_PER_DAY as f64;
    let age_days = days_since.rem_euclid(SYNODIC_MONTH_DAYS);
    let normalized = age_days / SYNODIC_MONTH_DAYS;
    let waxing = normalized <= 0.5;
    let illumination = if waxing {
        normalized * 2.0
    } else {
        (1.0 - normalized) * 2.0
    };

    MoonPhase {
        age_days,
        normalized,
        illumination,
        waxing,
        index: (normalized * 8.0).round() as usize % 8,
    }
}

fn period(now: NaiveDateTime, start: NaiveDateTime, end: NaiveDateTime) -> PeriodProgress {
    let total_ms = (end - start).num_milliseconds().max(1);
    let elapsed_ms = (now - start).num_milliseconds().clamp(0, total_ms);

    PeriodProgress {
        percent: (100.0 * elapsed_ms as f64 / total_ms as f64).clamp(0.0, 100.0),
        elapsed_ms,
        total_ms,
    }
}

/// Midnight on the first day of `month` (1-based).
fn month_start(year: i32, month: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or(NaiveDate::MAX)
        .and_time(NaiveTime::MIN)
}

/// Midnight on the first day of the month `delta` months after `month`.
fn add_months(year: i32, month: u32, delta: u32) -> NaiveDateTime {
    let index = month - 1 + delta;
    month_start(year + (index / 12) as i32, index % 12 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn utc(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert_eq!(days_in_year(2024), 366);
        assert_eq!(days_in_year(2025), 365);
    }

    #[test]
    fn test_day_of_year() {
        assert_eq!(day_of_year(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()), 1);
        assert_eq!(day_of_year(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()), 61);
        assert_eq!(day_of_year(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()), 365);
    }

    #[test]
    fn test_default_target_date() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 28).unwrap();
        assert_eq!(
            default_target_date(today),
            NaiveDate::from_ymd_opt(2025, 1, 4).unwrap()
        );
    }

    #[test]
    fn test_year_progress_bounds() {
        let first = year_progress(at(2024, 1, 1, 0, 0, 0));
        assert_eq!(first.elapsed_days, 1);
        assert_eq!(first.total_days, 366);
        assert_eq!(first.days_remaining, 365);
        assert!((first.percent - 100.0 / 366.0).abs() < 1e-9);

        let last = year_progress(at(2024, 12, 31, 23, 59, 59));
        assert_eq!(last.percent, 100.0);
        assert_eq!(last.days_remaining, 0);
    }

    #[test]
    fn test_year_progress_whole_day_granularity() {
        let morning = year_progress(at(2023, 6, 1, 0, 0, 1));
        let evening = year_progress(at(2023, 6, 1, 23, 59, 59));
        assert_eq!(morning.percent, evening.percent);
    }

    #[test]
    fn test_year_progress_monotonic_and_resets() {
        let mut date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let mut previous = -1.0;
        while date.year() == 2023 {
            let p = year_progress(date.and_hms_opt(12, 0, 0).unwrap()).percent;
            assert!((0.0..=100.0).contains(&p));
            assert!(p >= previous, "{date}: {p} < {previous}");
            previous = p;
            date = date.succ_opt().unwrap();
        }
        let next_year = year_progress(date.and_hms_opt(12, 0, 0).unwrap()).percent;
        assert!(next_year < previous);
    }

    #[test]
    fn test_month_progress_is_fractional() {
        // 14.5 days into a 29-day February
        let p = month_progress(at(2024, 2, 15, 12, 0, 0));
        assert!((p.percent - 50.0).abs() < 1e-9);
        assert_eq!(p.total_ms, 29 * MS_PER_DAY);

        let start = month_progress(at(2024, 12, 1, 0, 0, 0));
        assert_eq!(start.percent, 0.0);
        assert_eq!(start.total_ms, 31 * MS_PER_DAY);
    }

    #[test]
    fn test_week_progress_monday_start() {
        // 2024-01-01 is a Monday
        assert_eq!(week_progress(at(2024, 1, 1, 0, 0, 0)).percent, 0.0);

        let sunday_end = NaiveDate::from_ymd_opt(2024, 1, 7)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap();
        let p = week_progress(sunday_end).percent;
        assert!(p > 99.99 && p < 100.0);

        let thursday_noon = week_progress(at(2024, 1, 4, 12, 0, 0));
        assert!((thursday_noon.percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_goal_progress_countdown() {
        let target = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let now = at(2024, 12, 31, 12, 0, 0).and_utc();
        let goal = goal_progress(target, now, GOAL_WINDOW_DAYS);
        assert_eq!(goal.days_remaining, 1);
        assert!((goal.percent - 99.0).abs() < 1e-9);

        let far = goal_progress(target, at(2024, 9, 23, 0, 0, 0).and_utc(), GOAL_WINDOW_DAYS);
        assert_eq!(far.days_remaining, 100);
        assert_eq!(far.percent, 0.0);
    }

    #[test]
    fn test_goal_progress_past_target() {
        let target = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let goal = goal_progress(target, at(2025, 1, 10, 8, 0, 0).and_utc(), GOAL_WINDOW_DAYS);
        assert!(goal.days_remaining <= 0);
        assert_eq!(goal.percent, 100.0);
    }

    #[test]
    fn test_moon_phase_reference_new_moon() {
        let phase = moon_phase(utc(REFERENCE_NEW_MOON_MS));
        assert!(phase.illumination.abs() < 1e-9);
        assert!(phase.waxing);
        assert_eq!(phase.index, 0);
    }

    #[test]
    fn test_moon_phase_full_moon() {
        let half = (SYNODIC_MONTH_DAYS / 2.0 * MS_PER_DAY as f64) as i64;
        let phase = moon_phase(utc(REFERENCE_NEW_MOON_MS + half));
        assert!((phase.illumination - 1.0).abs() < 1e-6);
        assert_eq!(phase.index, 4);
    }

    #[test]
    fn test_moon_phase_before_reference() {
        let quarter = (SYNODIC_MONTH_DAYS / 4.0 * MS_PER_DAY as f64) as i64;
        let phase = moon_phase(utc(REFERENCE_NEW_MOON_MS - quarter));
        assert!(!phase.waxing);
        assert!((phase.illumination - 0.5).abs() < 1e-6);
        assert_eq!(phase.index, 6);
    }

    #[test]
    fn test_season_lookup() {
        assert_eq!(Season::from_month0(11), Season::Winter);
        assert_eq!(Season::from_month0(0), Season::Winter);
        assert_eq!(Season::from_month0(2), Season::Spring);
        assert_eq!(Season::from_month0(5), Season::Summer);
        assert_eq!(Season::from_month0(8), Season::Autumn);
        assert_eq!(Season::Winter.start_month0(), 11);
        assert_eq!(Season::Autumn.start_month0(), 8);
    }

    #[test]
    fn test_season_progress_spans_year_boundary() {
        let january = season_progress(at(2024, 1, 15, 0, 0, 0));
        assert_eq!(january.season, Season::Winter);
        // 2023-12-01 .. 2024-03-01 is 91 days; Jan 15 is 45 days in
        assert!((january.percent - 100.0 * 45.0 / 91.0).abs() < 1e-9);

        let spring = season_progress(at(2024, 3, 1, 0, 0, 0));
        assert_eq!(spring.season, Season::Spring);
        assert_eq!(spring.percent, 0.0);
    }
}
