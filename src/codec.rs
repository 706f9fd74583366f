//! Query-string codec for [`WallpaperConfig`].
//!
//! The browser preview, shared links and the PNG endpoint all use the same
//! parameter names:
//!
//! | Param | Meaning | Validation |
//! |-------|---------|------------|
//! | `type` | style id | allow-list, else `year` |
//! | `bg` | background color | `#RRGGBB`, else `#000000` |
//! | `accent` | foreground color | `#RRGGBB`, else `#FFFFFF` |
//! | `lang` | `zh` or `en` | else `zh` |
//! | `w`, `h` | pixel size | clamped to 320-4320 x 320-7680 |
//! | `target` | goal date `YYYY-MM-DD` | else today + 7 days |
//! | `name` | goal label | trimmed, at most 40 characters |
//!
//! Decoding is total: every input, including garbage, yields a valid config.
//!
//! # Example
//!
//! ```
//! use lifegrid::codec;
//! use lifegrid::WallpaperType;
//!
//! let config = codec::decode("type=moon&bg=%23112233&w=99999&utm_source=x");
//! assert_eq!(config.kind, WallpaperType::Moon);
//! assert_eq!(config.theme.bg.to_string(), "#112233");
//! assert_eq!(config.width, 4320);
//!
//! let query = codec::encode(&config);
//! assert_eq!(codec::decode(&query), config);
//! ```

use chrono::{NaiveDate, Utc};

use crate::config::{
    clamp_int, is_date_pattern, normalize_goal_name, normalize_hex_color, Color, Theme,
    WallpaperConfig, WallpaperType, DEFAULT_HEIGHT, DEFAULT_WIDTH, HEIGHT_RANGE, WIDTH_RANGE,
};
use crate::i18n::Language;
use crate::progress::default_target_date;

/// Path of the PNG export endpoint, relative to the server root.
pub const IMAGE_PATH: &str = "api/wallpaper.png";

/// Path of the render-only page, relative to the server root.
pub const PREVIEW_PATH: &str = "wallpaper.html";

/// Raw, un-validated parameters as they appear in a query string.
///
/// The first occurrence of a repeated key wins; unknown keys are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParams {
    pub kind: Option<String>,
    pub bg: Option<String>,
    pub accent: Option<String>,
    pub lang: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub target: Option<String>,
    pub name: Option<String>,
}

impl RawParams {
    /// Collect known keys from an `application/x-www-form-urlencoded` string.
    pub fn from_query(query: &str) -> Self {
        let mut raw = Self::default();
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            let slot = match key.as_ref() {
                "type" => &mut raw.kind,
                "bg" => &mut raw.bg,
                "accent" => &mut raw.accent,
                "lang" => &mut raw.lang,
                "w" => &mut raw.width,
                "h" => &mut raw.height,
                "target" => &mut raw.target,
                "name" => &mut raw.name,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        raw
    }

    /// Validate every field independently, defaulting what is invalid.
    ///
    /// `today` anchors the default goal date.
    pub fn normalize(&self, today: NaiveDate) -> WallpaperConfig {
        let target_date = self
            .target
            .as_deref()
            .map(str::trim)
            .filter(|s| is_date_pattern(s))
            .map(str::to_string)
            .unwrap_or_else(|| default_target_date(today).format("%Y-%m-%d").to_string());

        WallpaperConfig {
            kind: WallpaperType::resolve(self.kind.as_deref()),
            width: clamp_int(self.width.as_deref(), WIDTH_RANGE.0, WIDTH_RANGE.1, DEFAULT_WIDTH),
            height: clamp_int(
                self.height.as_deref(),
                HEIGHT_RANGE.0,
                HEIGHT_RANGE.1,
                DEFAULT_HEIGHT,
            ),
            theme: Theme {
                bg: normalize_hex_color(self.bg.as_deref(), Color::BLACK),
                accent: normalize_hex_color(self.accent.as_deref(), Color::WHITE),
            },
            target_date: Some(target_date),
            goal_name: normalize_goal_name(self.name.as_deref()),
            language: Language::resolve(self.lang.as_deref()),
        }
    }
}

/// Decode a query string, using today's UTC date for the goal default.
pub fn decode(query: &str) -> WallpaperConfig {
    decode_at(query, Utc::now().date_naive())
}

/// Decode a query string with an explicit "today".
pub fn decode_at(query: &str, today: NaiveDate) -> WallpaperConfig {
    RawParams::from_query(query).normalize(today)
}

/// Encode a config as a query string.
///
/// `target` and `name` are only written for the goal style, and only when
/// present / non-empty.
pub fn encode(config: &WallpaperConfig) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("type", config.kind.as_str())
        .append_pair("bg", &config.theme.bg.to_string())
        .append_pair("accent", &config.theme.accent.to_string())
        .append_pair("lang", config.language.as_str())
        .append_pair("w", &config.width.to_string())
        .append_pair("h", &config.height.to_string());

    if config.kind == WallpaperType::Goal {
        if let Some(target) = &config.target_date {
            query.append_pair("target", target);
        }
        if !config.goal_name.is_empty() {
            query.append_pair("name", &config.goal_name);
        }
    }

    query.finish()
}

/// URL of the PNG export for `config` under `base_url`.
///
/// ```
/// use lifegrid::{codec, WallpaperConfig};
///
/// let url = codec::image_url("https://wall.example", &WallpaperConfig::default());
/// assert!(url.starts_with("https://wall.example/api/wallpaper.png?type=year"));
/// ```
pub fn image_url(base_url: &str, config: &WallpaperConfig) -> String {
    format!("{}{}?{}", normalize_base_url(base_url), IMAGE_PATH, encode(config))
}

/// URL of the render-only page for `config` under `base_url`.
pub fn preview_url(base_url: &str, config: &WallpaperConfig) -> String {
    format!("{}{}?{}", normalize_base_url(base_url), PREVIEW_PATH, encode(config))
}

/// Empty becomes `/`; otherwise a trailing slash is ensured.
fn normalize_base_url(base_url: &str) -> String {
    if base_url.is_empty() {
        "/".to_string()
    } else if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    }
}
