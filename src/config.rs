//! Wallpaper configuration model and field normalizers.
//!
//! A [`WallpaperConfig`] is an immutable value: it is built (from defaults,
//! a UI form or a decoded query string), handed to the renderer and
//! dropped. Builder methods return a new value instead of mutating shared
//! state.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::i18n::Language;

/// Default canvas width (iPhone 16 Pro)
pub const DEFAULT_WIDTH: u32 = 1179;

/// Default canvas height (iPhone 16 Pro)
pub const DEFAULT_HEIGHT: u32 = 2556;

/// Accepted width range for external input
pub const WIDTH_RANGE: (u32, u32) = (320, 4320);

/// Accepted height range for external input
pub const HEIGHT_RANGE: (u32, u32) = (320, 7680);

/// Maximum goal name length, in characters
pub const GOAL_NAME_MAX_CHARS: usize = 40;

/// Visual template of a wallpaper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallpaperType {
    #[default]
    Year,
    Goal,
    Month,
    Week,
    Minimal,
    Gradient,
    Cyberpunk,
    Nature,
    Retro,
    Glass,
    Digital,
    Quote,
    Stats,
    Season,
    Binary,
    Moon,
}

impl WallpaperType {
    /// Every supported style, in catalog order.
    pub const ALL: [WallpaperType; 16] = [
        WallpaperType::Year,
        WallpaperType::Goal,
        WallpaperType::Month,
        WallpaperType::Week,
        WallpaperType::Minimal,
        WallpaperType::Gradient,
        WallpaperType::Cyberpunk,
        WallpaperType::Nature,
        WallpaperType::Retro,
        WallpaperType::Glass,
        WallpaperType::Digital,
        WallpaperType::Quote,
        WallpaperType::Stats,
        WallpaperType::Season,
        WallpaperType::Binary,
        WallpaperType::Moon,
    ];

    /// Identifier used in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            WallpaperType::Year => "year",
            WallpaperType::Goal => "goal",
            WallpaperType::Month => "month",
            WallpaperType::Week => "week",
            WallpaperType::Minimal => "minimal",
            WallpaperType::Gradient => "gradient",
            WallpaperType::Cyberpunk => "cyberpunk",
            WallpaperType::Nature => "nature",
            WallpaperType::Retro => "retro",
            WallpaperType::Glass => "glass",
            WallpaperType::Digital => "digital",
            WallpaperType::Quote => "quote",
            WallpaperType::Stats => "stats",
            WallpaperType::Season => "season",
            WallpaperType::Binary => "binary",
            WallpaperType::Moon => "moon",
        }
    }

    /// Look up a style by identifier (exact match).
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == id)
    }

    /// Resolve a possibly missing or unknown identifier; falls back to `year`.
    pub fn resolve(id: Option<&str>) -> Self {
        id.and_then(Self::parse).unwrap_or_default()
    }
}

impl fmt::Display for WallpaperType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque RGB color, written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Default background (`#000000`).
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    /// Default accent (`#FFFFFF`).
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    /// Create a color from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a strict `#RRGGBB` string (case-insensitive hex digits).
    ///
    /// ```
    /// use lifegrid::Color;
    ///
    /// assert_eq!(Color::parse_hex("#ABCDEF"), Some(Color::rgb(0xAB, 0xCD, 0xEF)));
    /// assert_eq!(Color::parse_hex("blue"), None);
    /// assert_eq!(Color::parse_hex("#FFF"), None);
    /// ```
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Background and foreground colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    /// Background fill
    pub bg: Color,
    /// All foreground ink
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: Color::BLACK,
            accent: Color::WHITE,
        }
    }
}

/// Everything needed to draw one wallpaper.
///
/// # Example
///
/// ```
/// use lifegrid::{Language, WallpaperConfig, WallpaperType};
///
/// let config = WallpaperConfig::default()
///     .with_kind(WallpaperType::Goal)
///     .with_goal("2030-01-01", "Ship it")
///     .with_language(Language::En);
///
/// assert_eq!(config.kind, WallpaperType::Goal);
/// assert_eq!(config.target_date.as_deref(), Some("2030-01-01"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WallpaperConfig {
    /// Style to draw
    #[serde(rename = "type")]
    pub kind: WallpaperType,

    /// Canvas width in pixels
    pub width: u32,

    /// Canvas height in pixels
    pub height: u32,

    /// Colors
    pub theme: Theme,

    /// Goal date as `YYYY-MM-DD` (goal style only).
    ///
    /// `None` means "a week from now" at render time. A string that matches
    /// the pattern but is not a real date is kept and drawn as an error
    /// placeholder.
    pub target_date: Option<String>,

    /// Goal label, trimmed and capped; empty means the localized default
    pub goal_name: String,

    /// Text language
    pub language: Language,
}

impl Default for WallpaperConfig {
    fn default() -> Self {
        Self {
            kind: WallpaperType::Year,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            theme: Theme::default(),
            target_date: None,
            goal_name: String::new(),
            language: Language::Zh,
        }
    }
}

impl WallpaperConfig {
    /// Set the style.
    #[must_use]
    pub fn with_kind(mut self, kind: WallpaperType) -> Self {
        self.kind = kind;
        self
    }

    /// Set the canvas size (not clamped; in-memory configs are trusted).
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set both colors.
    #[must_use]
    pub fn with_theme(mut self, bg: Color, accent: Color) -> Self {
        self.theme = Theme { bg, accent };
        self
    }

    /// Set the goal date and label, normalizing the label.
    #[must_use]
    pub fn with_goal(mut self, target_date: impl Into<String>, name: &str) -> Self {
        self.target_date = Some(target_date.into());
        self.goal_name = normalize_goal_name(Some(name));
        self
    }

    /// Set the text language.
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}

/// Validate a `#RRGGBB` color, returning `fallback` for anything else.
pub fn normalize_hex_color(input: Option<&str>, fallback: Color) -> Color {
    input
        .map(str::trim)
        .and_then(Color::parse_hex)
        .unwrap_or(fallback)
}

/// Parse the leading integer of `input` and clamp it to `[min, max]`.
///
/// Leading whitespace and a sign are accepted and trailing garbage is
/// ignored (`"1200px"` is 1200). Out-of-range magnitudes saturate before
/// clamping. Input without any digits yields `fallback`.
pub fn clamp_int(input: Option<&str>, min: u32, max: u32, fallback: u32) -> u32 {
    let Some(value) = input.and_then(parse_leading_int) else {
        return fallback;
    };
    value.clamp(i64::from(min), i64::from(max)) as u32
}

fn parse_leading_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen = true;
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }

    seen.then_some(if negative { -value } else { value })
}

/// Check the `YYYY-MM-DD` shape (digits only; not calendar validity).
pub fn is_date_pattern(input: &str) -> bool {
    let b = input.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b
            .iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit())
}

/// Trim and cap a goal name.
pub fn normalize_goal_name(input: Option<&str>) -> String {
    input
        .map(|s| s.trim().chars().take(GOAL_NAME_MAX_CHARS).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_resolution() {
        assert_eq!(WallpaperType::resolve(Some("moon")), WallpaperType::Moon);
        assert_eq!(WallpaperType::resolve(Some("bogus")), WallpaperType::Year);
        assert_eq!(WallpaperType::resolve(Some("Goal")), WallpaperType::Year);
        assert_eq!(WallpaperType::resolve(None), WallpaperType::Year);
    }

    #[test]
    fn test_type_identifiers_round_trip() {
        for kind in WallpaperType::ALL {
            assert_eq!(WallpaperType::parse(kind.as_str()), Some(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }

    #[test]
    fn test_normalize_hex_color() {
        assert_eq!(normalize_hex_color(Some("blue"), Color::BLACK), Color::BLACK);
        assert_eq!(
            normalize_hex_color(Some("#ABCDEF"), Color::BLACK).to_string(),
            "#ABCDEF"
        );
        assert_eq!(
            normalize_hex_color(Some("  #00ff00 "), Color::BLACK),
            Color::rgb(0, 0xFF, 0)
        );
        assert_eq!(normalize_hex_color(Some("#GG0000"), Color::WHITE), Color::WHITE);
        assert_eq!(normalize_hex_color(Some("#1234567"), Color::WHITE), Color::WHITE);
        assert_eq!(normalize_hex_color(None, Color::WHITE), Color::WHITE);
    }

    #[test]
    fn test_clamp_int() {
        assert_eq!(clamp_int(Some("1200"), 320, 4320, 1179), 1200);
        assert_eq!(clamp_int(Some("1200px"), 320, 4320, 1179), 1200);
        assert_eq!(clamp_int(Some("10"), 320, 4320, 1179), 320);
        assert_eq!(clamp_int(Some("-50"), 320, 4320, 1179), 320);
        assert_eq!(clamp_int(Some("99999999999999999999999"), 320, 4320, 1179), 4320);
        assert_eq!(clamp_int(Some("abc"), 320, 4320, 1179), 1179);
        assert_eq!(clamp_int(Some(""), 320, 4320, 1179), 1179);
        assert_eq!(clamp_int(None, 320, 7680, 2556), 2556);
    }

    #[test]
    fn test_date_pattern() {
        assert!(is_date_pattern("2025-01-01"));
        assert!(is_date_pattern("2025-13-45"));
        assert!(!is_date_pattern("2025-1-01"));
        assert!(!is_date_pattern("2025/01/01"));
        assert!(!is_date_pattern("２０２５-01-01"));
    }

    #[test]
    fn test_goal_name_cap() {
        let long = "x".repeat(60);
        assert_eq!(normalize_goal_name(Some(&long)).len(), GOAL_NAME_MAX_CHARS);
        assert_eq!(normalize_goal_name(Some("  launch  ")), "launch");
        let cjk = "目".repeat(50);
        assert_eq!(normalize_goal_name(Some(&cjk)).chars().count(), 40);
        assert_eq!(normalize_goal_name(None), "");
    }

    #[test]
    fn test_builders_return_new_values() {
        let base = WallpaperConfig::default();
        let goal = base
            .clone()
            .with_kind(WallpaperType::Goal)
            .with_goal("2025-01-01", "  Marathon ");
        assert_eq!(base.kind, WallpaperType::Year);
        assert_eq!(goal.goal_name, "Marathon");
        assert_eq!(goal.width, DEFAULT_WIDTH);
    }
}
