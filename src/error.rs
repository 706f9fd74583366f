//! Error types for lifegrid.

use thiserror::Error;

/// Errors surfaced by the capture path, the server and settings loading.
///
/// Input validation never produces an error: bad query parameters are
/// normalized to defaults instead.
#[derive(Debug, Error)]
pub enum Error {
    /// File I/O failed (static assets, settings file)
    #[error("I/O error: {0}")]
    Io(String),

    /// Headless browser could not be launched or driven
    #[error("Browser error: {0}")]
    Browser(String),

    /// The wallpaper canvas never reported a non-zero size
    #[error("Canvas not ready after {timeout_ms}ms")]
    CaptureTimeout {
        /// Configured readiness timeout in milliseconds
        timeout_ms: u64,
    },

    /// The page rendered but no PNG could be extracted
    #[error("Capture failed: {0}")]
    Capture(String),

    /// Settings file or environment is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Static file does not exist
    #[error("File not found: {0}")]
    NotFound(String),

    /// Static path escapes the asset root
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl Error {
    /// Machine-readable code used in JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Io(_) => "FILE_READ_FAILED",
            Error::Browser(_) | Error::CaptureTimeout { .. } | Error::Capture(_) => {
                "RENDER_FAILED"
            }
            Error::Config(_) => "CONFIG_INVALID",
            Error::NotFound(_) => "NOT_FOUND",
            Error::InvalidPath(_) => "INVALID_PATH",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Capture(err.to_string())
    }
}

/// Errors raised inside a style routine.
///
/// These never leave [`crate::styles::render`]; they trigger the dark
/// fallback panel instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// Surface has no drawable area
    #[error("surface is empty ({width}x{height})")]
    EmptySurface {
        /// Surface width in pixels
        width: u32,
        /// Surface height in pixels
        height: u32,
    },

    /// A computed coordinate or size is NaN or infinite
    #[error("non-finite geometry in {0}")]
    NonFinite(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::CaptureTimeout { timeout_ms: 10_000 };
        assert!(err.to_string().contains("10000ms"));

        let err = Error::NotFound("/missing.css".to_string());
        assert!(err.to_string().contains("/missing.css"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::Browser("gone".into()).code(), "RENDER_FAILED");
        assert_eq!(Error::CaptureTimeout { timeout_ms: 1 }.code(), "RENDER_FAILED");
        assert_eq!(Error::Io("eof".into()).code(), "FILE_READ_FAILED");
        assert_eq!(Error::InvalidPath("..".into()).code(), "INVALID_PATH");
        assert_eq!(Error::NotFound("x".into()).code(), "NOT_FOUND");
    }

    #[test]
    fn test_render_error_display() {
        let err = RenderError::EmptySurface { width: 0, height: 10 };
        assert_eq!(err.to_string(), "surface is empty (0x10)");
    }
}
