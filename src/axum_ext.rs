//! Axum integration.
//!
//! [`WallpaperConfig`] can be used directly as an extractor. It decodes the
//! request's query string with [`crate::codec::decode`] and never rejects:
//! missing or malformed parameters fall back to their defaults.
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use lifegrid::WallpaperConfig;
//!
//! async fn describe(config: WallpaperConfig) -> String {
//!     tracing::info!("Rendering {} at {}x{}", config.kind, config.width, config.height);
//!     lifegrid::codec::encode(&config)
//! }
//!
//! let app = Router::new().route("/describe", get(describe));
//! ```

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::codec;
use crate::config::WallpaperConfig;

impl<S> FromRequestParts<S> for WallpaperConfig
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        Ok(codec::decode(query))
    }
}
