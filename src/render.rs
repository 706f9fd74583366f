//! PNG capture through a shared headless Chrome.
//!
//! The server renders a wallpaper by loading its own render-only page
//! (`/wallpaper.html?<query>`) in a headless tab, waiting for the canvas
//! player to finish and reading the canvas back as PNG.
//!
//! # Requirements
//!
//! - Google Chrome or Chromium must be installed (or `chrome_path` set)
//! - The render base URL must reach the server serving `/wallpaper.html`
//!
//! # Example
//!
//! ```rust,ignore
//! use lifegrid::render::{BrowserCapture, Capture, CaptureConfig};
//! use lifegrid::WallpaperConfig;
//!
//! let capture = BrowserCapture::new(
//!     CaptureConfig::default().with_base_url("http://127.0.0.1:3000"),
//! );
//! let png = capture.capture(&WallpaperConfig::default())?;
//! capture.close();
//! ```

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use base64::Engine as _;
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::{Emulation, Page};
use headless_chrome::{Browser, LaunchOptions};

use crate::codec;
use crate::config::WallpaperConfig;
use crate::error::Error;
use crate::page::CANVAS_ID;

/// Prefix of a PNG data URL as produced by `canvas.toDataURL()`.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Default bound on waiting for the canvas.
pub const DEFAULT_CAPTURE_TIMEOUT_MS: u64 = 10_000;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Something that turns a wallpaper config into PNG bytes.
///
/// Calls block; async callers run them on a blocking thread.
pub trait Capture: Send + Sync {
    /// Render `config` and return the encoded PNG.
    fn capture(&self, config: &WallpaperConfig) -> Result<Vec<u8>, Error>;

    /// Release any shared resources. Later captures may reacquire them.
    fn close(&self) {}
}

/// Configuration for [`BrowserCapture`].
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Origin the browser uses to reach the render-only page
    pub render_base_url: String,

    /// Chrome executable; `None` lets headless_chrome locate one
    pub chrome_path: Option<PathBuf>,

    /// How long to wait for the canvas to be drawn (default: 10s)
    pub ready_timeout: Duration,

    /// How long navigation may take (default: 15s)
    pub navigation_timeout: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            render_base_url: "http://127.0.0.1:3000".to_string(),
            chrome_path: None,
            ready_timeout: Duration::from_millis(DEFAULT_CAPTURE_TIMEOUT_MS),
            navigation_timeout: Duration::from_secs(15),
        }
    }
}

impl CaptureConfig {
    /// Create config with a custom render base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.render_base_url = url.into();
        self
    }

    /// Create config with a custom Chrome path.
    #[must_use]
    pub fn with_chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    /// Create config with a custom canvas readiness timeout.
    #[must_use]
    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }
}

/// Captures wallpapers with one lazily launched, shared Chrome process.
///
/// The lock only guards launching and cloning the browser handle; each
/// capture then works in its own tab, so captures run concurrently.
pub struct BrowserCapture {
    config: CaptureConfig,
    browser: Mutex<Option<Browser>>,
}

impl BrowserCapture {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            browser: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// The shared browser, launching it on first use or when the cached
    /// one no longer answers.
    fn browser(&self) -> Result<Browser, Error> {
        let mut slot = self
            .browser
            .lock()
            .map_err(|_| Error::Browser("browser lock poisoned".to_string()))?;

        reuse_or_launch(
            &mut *slot,
            |browser| browser.get_version().is_ok(),
            || self.launch(),
        )
    }

    fn launch(&self) -> Result<Browser, Error> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .path(self.config.chrome_path.clone())
            .idle_browser_timeout(Duration::from_secs(24 * 60 * 60))
            .build()
            .map_err(|e| Error::Browser(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(options)
            .map_err(|e| Error::Browser(format!("Failed to launch browser: {}", e)))?;

        tracing::info!("Launched headless browser");
        Ok(browser)
    }

    /// Drop the cached browser so the next capture relaunches it.
    fn forget_browser(&self) {
        if let Ok(mut slot) = self.browser.lock() {
            slot.take();
        }
    }

    fn open_tab(&self) -> Result<Arc<Tab>, Error> {
        let browser = self.browser()?;
        browser.new_tab().map_err(|e| {
            self.forget_browser();
            Error::Browser(format!("Failed to open tab: {}", e))
        })
    }

    /// Poll until the canvas player reports it is done.
    fn wait_until_ready(&self, tab: &Tab) -> Result<(), Error> {
        let deadline = Instant::now() + self.config.ready_timeout;
        let probe = ready_probe();

        loop {
            match tab.evaluate(&probe, false) {
                Ok(result) if result.value == Some(serde_json::Value::Bool(true)) => return Ok(()),
                Ok(_) => {}
                Err(e) => tracing::debug!("Readiness probe failed: {}", e),
            }

            if Instant::now() >= deadline {
                return Err(Error::CaptureTimeout {
                    timeout_ms: self.config.ready_timeout.as_millis() as u64,
                });
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn read_canvas(&self, tab: &Tab) -> Result<Vec<u8>, Error> {
        let script = format!(
            "document.getElementById('{}').toDataURL('image/png')",
            CANVAS_ID
        );
        let result = tab
            .evaluate(&script, false)
            .map_err(|e| Error::Capture(format!("Failed to read canvas: {}", e)))?;

        let data_url = result
            .value
            .as_ref()
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::Capture("Canvas returned no data URL".to_string()))?;

        decode_data_url(data_url)
    }

    fn screenshot(&self, tab: &Tab, config: &WallpaperConfig) -> Result<Vec<u8>, Error> {
        let clip = Page::Viewport {
            x: 0.0,
            y: 0.0,
            width: f64::from(config.width),
            height: f64::from(config.height),
            scale: 1.0,
        };
        tab.capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, Some(clip), true)
            .map_err(|e| Error::Capture(format!("Screenshot failed: {}", e)))
    }
}

impl Capture for BrowserCapture {
    fn capture(&self, config: &WallpaperConfig) -> Result<Vec<u8>, Error> {
        let tab = self.open_tab()?;
        let _guard = TabGuard(Arc::clone(&tab));

        tab.set_default_timeout(self.config.navigation_timeout);
        tab.call_method(device_metrics(config)?)
            .map_err(|e| Error::Browser(format!("Failed to size viewport: {}", e)))?;

        let url = codec::preview_url(&self.config.render_base_url, config);
        tracing::debug!("Capturing {}", url);

        tab.navigate_to(&url)
            .map_err(|e| Error::Browser(format!("Navigation failed: {}", e)))?;
        tab.wait_until_navigated()
            .map_err(|e| Error::Browser(format!("Wait for navigation failed: {}", e)))?;

        self.wait_until_ready(&tab)?;

        let png = match self.read_canvas(&tab) {
            Ok(png) => png,
            Err(e) => {
                tracing::warn!("Canvas export failed, falling back to screenshot: {}", e);
                self.screenshot(&tab, config)?
            }
        };

        tracing::info!("Captured {} wallpaper: {} bytes", config.kind, png.len());
        Ok(png)
    }

    fn close(&self) {
        if let Ok(mut slot) = self.browser.lock() {
            if slot.take().is_some() {
                tracing::info!("Closed headless browser");
            }
        }
    }
}

/// Cached value from `slot` while `alive` holds, else a fresh `launch`.
fn reuse_or_launch<T, E>(
    slot: &mut Option<T>,
    alive: impl Fn(&T) -> bool,
    launch: impl FnOnce() -> Result<T, E>,
) -> Result<T, E>
where
    T: Clone,
{
    if let Some(cached) = slot.as_ref() {
        if alive(cached) {
            return Ok(cached.clone());
        }
        tracing::warn!("Cached browser stopped responding, relaunching");
        *slot = None;
    }

    let fresh = launch()?;
    *slot = Some(fresh.clone());
    Ok(fresh)
}

/// Viewport override matching the wallpaper size at 1 CSS px per pixel.
///
/// Built from JSON so the optional protocol fields keep their defaults.
fn device_metrics(config: &WallpaperConfig) -> Result<Emulation::SetDeviceMetricsOverride, Error> {
    serde_json::from_value(serde_json::json!({
        "width": config.width,
        "height": config.height,
        "deviceScaleFactor": 1.0,
        "mobile": false,
    }))
    .map_err(|e| Error::Browser(format!("Invalid device metrics: {}", e)))
}

/// Closes its tab when dropped, whatever path the capture took.
struct TabGuard(Arc<Tab>);

impl Drop for TabGuard {
    fn drop(&mut self) {
        if let Err(e) = self.0.close(true) {
            tracing::debug!("Failed to close tab: {}", e);
        }
    }
}

/// Script that is `true` once the canvas is sized and fully drawn.
fn ready_probe() -> String {
    format!(
        "(() => {{ const c = document.getElementById('{}'); \
         return !!c && c.width > 0 && c.height > 0 && c.dataset.ready === '1'; }})()",
        CANVAS_ID
    )
}

/// Decode a `data:image/png;base64,...` URL.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, Error> {
    let encoded = data_url
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or_else(|| Error::Capture("Canvas data URL is not a PNG".to_string()))?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| Error::Capture(format!("Invalid base64 in data URL: {}", e)))?;

    if bytes.is_empty() {
        return Err(Error::Capture("Canvas produced an empty image".to_string()));
    }
    Ok(bytes)
}
