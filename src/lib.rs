//! # lifegrid
//!
//! Time-progress wallpapers: how much of the year, month, week or a
//! personal countdown has passed, drawn as a phone or desktop wallpaper.
//!
//! The crate is split into layers:
//! - [`progress`]: pure calendar math (year / month / week / season
//!   progress, goal countdowns, moon phase)
//! - [`config`] and [`codec`]: the wallpaper configuration and its
//!   query-string form, shared by previews, links and the PNG endpoint
//! - [`styles`]: sixteen style routines drawing onto a [`surface::Surface`]
//! - [`page`]: a standalone HTML page replaying a drawing on a canvas
//! - `render`: PNG capture of that page in a shared headless Chrome
//! - `server`: the HTTP server tying it together
//!
//! ## Quick Start
//!
//! ```
//! use lifegrid::surface::DisplayList;
//! use lifegrid::{codec, styles, WallpaperType};
//!
//! let config = codec::decode("type=week&lang=en&w=1170&h=2532");
//! assert_eq!(config.kind, WallpaperType::Week);
//!
//! let mut list = DisplayList::new(config.width, config.height);
//! styles::render(&mut list, &config, chrono::Utc::now().fixed_offset());
//! assert!(list.texts().any(|t| t.starts_with("This week")));
//! ```
//!
//! ## Query Parameters
//!
//! | Param | Meaning | Default |
//! |-------|---------|---------|
//! | `type` | one of [`WallpaperType::ALL`] | `year` |
//! | `bg` / `accent` | `#RRGGBB` colors | `#000000` / `#FFFFFF` |
//! | `lang` | `zh` or `en` | `zh` |
//! | `w` / `h` | size in pixels | 1179 x 2556 |
//! | `target` / `name` | goal date and label | a week from today / localized |
//!
//! ## Feature Flags
//!
//! - `axum` - [`WallpaperConfig`] as an axum extractor
//! - `render` - PNG capture via headless Chrome
//! - `server` - HTTP server, settings and static preview (implies `axum`
//!   and `render`)
//! - `full` - All features

pub mod codec;
pub mod config;
pub mod devices;
mod error;
pub mod i18n;
pub mod page;
pub mod progress;
pub mod styles;
pub mod surface;

pub use config::{Color, Theme, WallpaperConfig, WallpaperType};
pub use devices::{detect_device, Device, DeviceCategory};
pub use error::{Error, RenderError};
pub use i18n::Language;

// Optional modules
#[cfg(feature = "render")]
pub mod render;
#[cfg(feature = "render")]
pub use render::{BrowserCapture, Capture, CaptureConfig};

#[cfg(feature = "server")]
pub mod server;

// Re-export axum integration
#[cfg(feature = "axum")]
pub mod axum_ext;
