//! HTTP server: PNG export, render-only page and the static preview.
//!
//! | Route | Result |
//! |-------|--------|
//! | `GET /api/wallpaper.png?...` | PNG of the normalized config |
//! | `GET /wallpaper.html?...` | render-only page (used by capture and the preview iframe) |
//! | `GET /api/devices` | known device resolutions that can be rendered as-is |
//! | `GET /api/link?...` | shareable image and preview URLs, plus the device name |
//! | any other `GET` | static file under `static_root` |
//!
//! Every error is a JSON body `{code, message, details?}`.
//!
//! # Settings
//!
//! Defaults, then an optional YAML file named by `LIFEGRID_CONFIG`, then
//! environment variables:
//!
//! ```yaml
//! port: 3000
//! render_base_url: "http://127.0.0.1:3000"
//! public_base_url: "https://wall.example.com"
//! static_root: "public"
//! timezone: "Asia/Shanghai"
//! chrome_path: "/usr/bin/chromium"
//! capture_timeout_ms: 10000
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use tower::{ServiceBuilder, ServiceExt};
use tower_http::services::ServeFile;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::codec;
use crate::config::WallpaperConfig;
use crate::devices::{self, Device};
use crate::error::Error;
use crate::page;
use crate::render::{Capture, CaptureConfig, DEFAULT_CAPTURE_TIMEOUT_MS};

/// Environment variable naming the optional YAML settings file.
pub const CONFIG_ENV: &str = "LIFEGRID_CONFIG";

/// Default wallpaper timezone.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Shanghai;

const NO_STORE: &str = "no-store, max-age=0";
const PUBLIC_CACHE: &str = "public, max-age=3600";

// =============================================================================
// Settings
// =============================================================================

/// Server settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Listening port (default: 3000)
    pub port: u16,
    /// Origin the headless browser uses to reach this server
    /// (default: `http://127.0.0.1:<port>`)
    pub render_base_url: String,
    /// Origin used in shared links; `None` uses the request's `Host`
    pub public_base_url: Option<String>,
    /// Directory of the static preview (default: `public`)
    pub static_root: PathBuf,
    /// Timezone defining "now" for rendered wallpapers
    pub timezone: Tz,
    /// Chrome executable, if not on the default search path
    pub chrome_path: Option<PathBuf>,
    /// Canvas readiness timeout in milliseconds (default: 10000)
    pub capture_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 3000,
            render_base_url: "http://127.0.0.1:3000".to_string(),
            public_base_url: None,
            static_root: PathBuf::from("public"),
            timezone: DEFAULT_TIMEZONE,
            chrome_path: None,
            capture_timeout_ms: DEFAULT_CAPTURE_TIMEOUT_MS,
        }
    }
}

/// Settings file contents; every key is optional.
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    port: Option<u16>,
    render_base_url: Option<String>,
    public_base_url: Option<String>,
    static_root: Option<PathBuf>,
    timezone: Option<String>,
    chrome_path: Option<PathBuf>,
    capture_timeout_ms: Option<u64>,
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// Reads the YAML file named by `LIFEGRID_CONFIG` when set, then applies
    /// `PORT`, `RENDER_BASE_URL`, `PUBLIC_BASE_URL`, `STATIC_ROOT`,
    /// `WALLPAPER_TZ`, `CHROME_PATH` and `CAPTURE_TIMEOUT_MS`.
    pub fn load() -> Result<Self, Error> {
        let yaml = match std::env::var(CONFIG_ENV) {
            Ok(path) => Some(read_settings_file(&path)?),
            Err(_) => None,
        };
        Self::from_sources(yaml.as_deref(), |key| std::env::var(key).ok())
    }

    /// Parse settings from a YAML string alone.
    ///
    /// ```
    /// use lifegrid::server::Settings;
    ///
    /// let settings = Settings::from_yaml("port: 8080\ntimezone: Europe/Berlin").unwrap();
    /// assert_eq!(settings.port, 8080);
    /// assert_eq!(settings.render_base_url, "http://127.0.0.1:8080");
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        Self::from_sources(Some(yaml), |_| None)
    }

    /// Merge defaults, an optional YAML document and environment lookups.
    pub fn from_sources<F>(yaml: Option<&str>, env: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: SettingsFile = match yaml {
            Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str(yaml)
                .map_err(|e| Error::Config(format!("Invalid settings YAML: {}", e)))?,
            _ => SettingsFile::default(),
        };

        let mut settings = Settings::default();

        let port = match env("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("Invalid PORT '{}': {}", raw, e)))?,
            None => file.port.unwrap_or(settings.port),
        };
        settings.port = port;

        settings.render_base_url = env("RENDER_BASE_URL")
            .or(file.render_base_url)
            .unwrap_or_else(|| format!("http://127.0.0.1:{}", port));

        settings.public_base_url = env("PUBLIC_BASE_URL").or(file.public_base_url);

        if let Some(root) = env("STATIC_ROOT").map(PathBuf::from).or(file.static_root) {
            settings.static_root = root;
        }

        if let Some(name) = env("WALLPAPER_TZ").or(file.timezone) {
            match name.trim().parse::<Tz>() {
                Ok(tz) => settings.timezone = tz,
                Err(e) => tracing::warn!(
                    "Unknown timezone '{}' ({}), using {}",
                    name,
                    e,
                    settings.timezone
                ),
            }
        }

        settings.chrome_path = env("CHROME_PATH").map(PathBuf::from).or(file.chrome_path);

        settings.capture_timeout_ms = match env("CAPTURE_TIMEOUT_MS") {
            Some(raw) => raw.trim().parse().map_err(|e| {
                Error::Config(format!("Invalid CAPTURE_TIMEOUT_MS '{}': {}", raw, e))
            })?,
            None => file.capture_timeout_ms.unwrap_or(settings.capture_timeout_ms),
        };

        Ok(settings)
    }

    /// Current instant in the wallpaper timezone.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.timezone).fixed_offset()
    }

    /// Capture settings derived from these server settings.
    pub fn capture_config(&self) -> CaptureConfig {
        let mut config = CaptureConfig::default()
            .with_base_url(self.render_base_url.clone())
            .with_ready_timeout(Duration::from_millis(self.capture_timeout_ms));
        if let Some(path) = &self.chrome_path {
            config = config.with_chrome_path(path.clone());
        }
        config
    }
}

fn read_settings_file(path: &str) -> Result<String, Error> {
    std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read settings file '{}': {}", path, e)))
}

// =============================================================================
// Errors
// =============================================================================

/// JSON error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub code: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: &'static str) -> Self {
        Self {
            status,
            code,
            message,
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// 500 for a failed wallpaper render or capture.
    pub fn render_failed(err: &Error) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "RENDER_FAILED",
            "Failed to render wallpaper image",
        )
        .with_details(err.to_string())
    }

    pub fn method_not_allowed() -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            "METHOD_NOT_ALLOWED",
            "Only GET is supported",
        )
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", "File not found"),
            Error::InvalidPath(_) => {
                Self::new(StatusCode::BAD_REQUEST, "INVALID_PATH", "Invalid path")
            }
            Error::Io(ref e) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "FILE_READ_FAILED",
                "Failed to read file",
            )
            .with_details(e.clone()),
            Error::Browser(_) | Error::CaptureTimeout { .. } | Error::Capture(_) => {
                Self::render_failed(&err)
            }
            Error::Config(ref e) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "UNEXPECTED_ERROR",
                "Unexpected server error",
            )
            .with_details(e.clone()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(&self)).into_response();
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
        response
    }
}

// =============================================================================
// Router
// =============================================================================

/// Shared handler state.
pub struct AppState {
    pub settings: Settings,
    pub capture: Arc<dyn Capture>,
}

impl AppState {
    pub fn new(settings: Settings, capture: Arc<dyn Capture>) -> Self {
        Self { settings, capture }
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/wallpaper.png",
            get(wallpaper_png).fallback(method_not_allowed),
        )
        .route(
            "/wallpaper.html",
            get(wallpaper_page).fallback(method_not_allowed),
        )
        .route("/api/devices", get(devices).fallback(method_not_allowed))
        .route("/api/link", get(link).fallback(method_not_allowed))
        .fallback(static_file)
        .with_state(state)
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

/// GET /api/wallpaper.png
async fn wallpaper_png(
    State(state): State<Arc<AppState>>,
    config: WallpaperConfig,
) -> Result<Response, ApiError> {
    let capture = Arc::clone(&state.capture);
    let png = tokio::task::spawn_blocking(move || capture.capture(&config))
        .await
        .map_err(|e| ApiError::render_failed(&Error::Capture(format!("Capture task failed: {}", e))))?
        .map_err(|e| {
            tracing::warn!("Wallpaper render failed: {}", e);
            ApiError::render_failed(&e)
        })?;

    let length = png.len();
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("image/png")),
            (header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE)),
            (header::CONTENT_LENGTH, HeaderValue::from(length)),
        ],
        Body::from(png),
    )
        .into_response())
}

/// GET /wallpaper.html
async fn wallpaper_page(
    State(state): State<Arc<AppState>>,
    config: WallpaperConfig,
) -> Result<Response, ApiError> {
    let html = page::render_page(&config, state.settings.now()).map_err(|e| {
        tracing::warn!("Wallpaper page failed: {}", e);
        ApiError::render_failed(&e)
    })?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            ),
            (header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE)),
        ],
        html,
    )
        .into_response())
}

/// GET /api/devices
async fn devices() -> Json<Vec<&'static Device>> {
    Json(devices::renderable_devices().collect())
}

/// Shareable URLs for a config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkResponse {
    pub image_url: String,
    pub preview_url: String,
    /// Device name or size class of the wallpaper resolution
    pub device: String,
}

/// GET /api/link
async fn link(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    config: WallpaperConfig,
) -> Json<LinkResponse> {
    let base = state.settings.public_base_url.clone().unwrap_or_else(|| {
        headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(|host| format!("http://{}", host))
            .unwrap_or_default()
    });

    Json(LinkResponse {
        image_url: codec::image_url(&base, &config),
        preview_url: codec::preview_url(&base, &config),
        device: devices::describe(config.width, config.height).to_string(),
    })
}

/// Any other path: a file under `static_root`.
async fn static_file(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let method = request.method();
    if method != Method::GET && method != Method::HEAD {
        return ApiError::method_not_allowed().into_response();
    }

    let request_path = request.uri().path().to_string();
    let result = match resolve_static_path(&state.settings.static_root, &request_path) {
        Ok(path) => serve_file(&path, request).await,
        Err(e) => Err(e),
    };

    result.unwrap_or_else(|e| {
        tracing::debug!("Static file {} failed: {}", request_path, e);
        ApiError::from(e).into_response()
    })
}

/// Map a request path onto `root`, rejecting anything that escapes it.
///
/// `/` maps to `index.html`.
pub fn resolve_static_path(root: &Path, request_path: &str) -> Result<PathBuf, Error> {
    let decoded = percent_decode_str(request_path)
        .decode_utf8()
        .map_err(|_| Error::InvalidPath(request_path.to_string()))?;

    let relative = decoded.trim_start_matches('/');
    let relative = if relative.is_empty() {
        "index.html"
    } else {
        relative
    };

    let mut path = root.to_path_buf();
    for segment in relative.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(Error::InvalidPath(request_path.to_string())),
            s if s.contains('\\') || s.contains('\0') || s.contains(':') => {
                return Err(Error::InvalidPath(request_path.to_string()))
            }
            s => path.push(s),
        }
    }
    Ok(path)
}

/// Serve one resolved file with `ServeFile`, which handles content type,
/// `HEAD` and conditional requests.
async fn serve_file(path: &Path, request: Request) -> Result<Response, Error> {
    let display = path.display().to_string();
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(Error::NotFound(display)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::NotFound(display))
        }
        Err(e) => return Err(Error::Io(format!("Failed to stat {}: {}", display, e))),
    }

    let cache = if is_html(path) { NO_STORE } else { PUBLIC_CACHE };
    let service = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static(cache),
        ))
        .service(ServeFile::new(path));

    let response = match service.oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    match response.status() {
        StatusCode::NOT_FOUND => Err(Error::NotFound(display)),
        status if status.is_server_error() => {
            Err(Error::Io(format!("Failed to read {}: {}", display, status)))
        }
        _ => Ok(response.map(Body::new)),
    }
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html"))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, OnceLock};

    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::config::WallpaperType;

    const FAKE_PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[derive(Default)]
    struct FakeCapture {
        calls: AtomicUsize,
        last: Mutex<Option<WallpaperConfig>>,
        fail: bool,
    }

    impl Capture for FakeCapture {
        fn capture(&self, config: &WallpaperConfig) -> Result<Vec<u8>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(config.clone());
            if self.fail {
                Err(Error::CaptureTimeout { timeout_ms: 10_000 })
            } else {
                Ok(FAKE_PNG.to_vec())
            }
        }
    }

    fn static_root() -> PathBuf {
        static ROOT: OnceLock<PathBuf> = OnceLock::new();
        ROOT.get_or_init(|| {
            let dir =
                std::env::temp_dir().join(format!("lifegrid-static-{}", std::process::id()));
            std::fs::create_dir_all(dir.join("css")).unwrap();
            std::fs::write(dir.join("index.html"), "<h1>preview</h1>").unwrap();
            std::fs::write(dir.join("css/site.css"), "body{}").unwrap();
            dir
        })
        .clone()
    }

    fn app(capture: Arc<FakeCapture>) -> Router {
        let settings = Settings {
            static_root: static_root(),
            ..Settings::default()
        };
        router(Arc::new(AppState::new(settings, capture)))
    }

    async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::HOST, "wall.test")
            .body(Body::empty())
            .unwrap();
        send_request(app, request).await
    }

    async fn send_request(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        (status, headers, body)
    }

    fn json(body: &[u8]) -> serde_json::Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn test_png_export() {
        let capture = Arc::new(FakeCapture::default());
        let (status, headers, body) = send(
            app(Arc::clone(&capture)),
            Method::GET,
            "/api/wallpaper.png?type=moon&w=99999&utm_source=x",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "image/png");
        assert_eq!(headers[header::CACHE_CONTROL], NO_STORE);
        assert_eq!(headers[header::CONTENT_LENGTH], FAKE_PNG.len().to_string().as_str());
        assert_eq!(body, FAKE_PNG);

        assert_eq!(capture.calls.load(Ordering::SeqCst), 1);
        let seen = capture.last.lock().unwrap().clone().unwrap();
        assert_eq!(seen.kind, WallpaperType::Moon);
        assert_eq!(seen.width, 4320);
    }

    #[tokio::test]
    async fn test_png_export_failure_is_json() {
        let capture = Arc::new(FakeCapture {
            fail: true,
            ..FakeCapture::default()
        });
        let (status, headers, body) = send(app(capture), Method::GET, "/api/wallpaper.png").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("application/json"));
        let body = json(&body);
        assert_eq!(body["code"], "RENDER_FAILED");
        assert_eq!(body["message"], "Failed to render wallpaper image");
        assert!(body["details"].as_str().unwrap().contains("10000ms"));
    }

    #[tokio::test]
    async fn test_non_get_is_rejected() {
        let capture = Arc::new(FakeCapture::default());
        for uri in ["/api/wallpaper.png", "/index.html", "/api/devices"] {
            let (status, _, body) = send(app(Arc::clone(&capture)), Method::POST, uri).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{uri}");
            assert_eq!(json(&body)["code"], "METHOD_NOT_ALLOWED");
        }
        assert_eq!(capture.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_wallpaper_page() {
        let capture = Arc::new(FakeCapture::default());
        let (status, headers, body) = send(
            app(capture),
            Method::GET,
            "/wallpaper.html?type=goal&name=%3Cscript%3E&w=400&h=800",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "text/html; charset=utf-8");
        assert_eq!(headers[header::CACHE_CONTROL], NO_STORE);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains(r#"id="wallpaperCanvas""#));
        assert!(html.contains(r#"{"width":400,"height":800"#));
        assert_eq!(html.matches("<script>").count(), 1);
    }

    #[tokio::test]
    async fn test_devices_endpoint() {
        let (status, _, body) = send(
            app(Arc::new(FakeCapture::default())),
            Method::GET,
            "/api/devices",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let list = json(&body);
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), devices::renderable_devices().count());
        assert_eq!(list[0]["width"], devices::DEVICES[0].width);
        // every offered size is accepted by the codec as-is
        for device in list {
            let width = device["width"].as_u64().unwrap() as u32;
            assert!(width <= crate::config::WIDTH_RANGE.1, "{device}");
        }
    }

    #[tokio::test]
    async fn test_link_uses_host_header() {
        let (status, _, body) = send(
            app(Arc::new(FakeCapture::default())),
            Method::GET,
            "/api/link?type=week&lang=en",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let link: LinkResponse = serde_json::from_slice(&body).unwrap();
        assert!(link
            .image_url
            .starts_with("http://wall.test/api/wallpaper.png?type=week"));
        assert!(link.preview_url.starts_with("http://wall.test/wallpaper.html?"));
        assert!(link.image_url.contains("lang=en"));
        assert_eq!(link.device, "iPhone 17 / 16 / 15 / 14 Pro");

        let (_, _, body) = send(
            app(Arc::new(FakeCapture::default())),
            Method::GET,
            "/api/link?w=1920&h=1200",
        )
        .await;
        let link: LinkResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(link.device, "Full HD display");
    }

    #[tokio::test]
    async fn test_static_files() {
        let capture = Arc::new(FakeCapture::default());

        let (status, headers, body) = send(app(Arc::clone(&capture)), Method::GET, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
        assert_eq!(headers[header::CACHE_CONTROL], NO_STORE);
        assert_eq!(body, b"<h1>preview</h1>");

        let (status, headers, _) =
            send(app(Arc::clone(&capture)), Method::GET, "/css/site.css").await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/css"));
        assert_eq!(headers[header::CACHE_CONTROL], PUBLIC_CACHE);

        let (status, _, body) =
            send(app(Arc::clone(&capture)), Method::GET, "/%FF%FE.html").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["code"], "INVALID_PATH");

        let (status, _, body) = send(app(Arc::clone(&capture)), Method::GET, "/missing.js").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json(&body)["code"], "NOT_FOUND");

        let (status, _, _) = send(app(Arc::clone(&capture)), Method::GET, "/css").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, body) =
            send(app(capture), Method::GET, "/%2e%2e/%2e%2e/etc/passwd").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["code"], "INVALID_PATH");
    }

    #[tokio::test]
    async fn test_static_head_and_conditional_get() {
        let capture = Arc::new(FakeCapture::default());

        let (status, headers, body) =
            send(app(Arc::clone(&capture)), Method::HEAD, "/css/site.css").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_LENGTH], "6");
        assert!(body.is_empty());

        let last_modified = headers[header::LAST_MODIFIED].clone();
        let request = Request::builder()
            .uri("/css/site.css")
            .header(header::IF_MODIFIED_SINCE, last_modified)
            .body(Body::empty())
            .unwrap();
        let (status, headers, body) = send_request(app(capture), request).await;
        assert_eq!(status, StatusCode::NOT_MODIFIED);
        assert_eq!(headers[header::CACHE_CONTROL], PUBLIC_CACHE);
        assert!(body.is_empty());
    }

    #[test]
    fn test_resolve_static_path() {
        let root = Path::new("/srv/public");
        assert_eq!(
            resolve_static_path(root, "/").unwrap(),
            PathBuf::from("/srv/public/index.html")
        );
        assert_eq!(
            resolve_static_path(root, "/a/./b%20c.png").unwrap(),
            PathBuf::from("/srv/public/a/b c.png")
        );
        assert!(matches!(
            resolve_static_path(root, "/../secret"),
            Err(Error::InvalidPath(_))
        ));
        assert!(resolve_static_path(root, "/a/%2E%2E/%2E%2E/x").is_err());
        assert!(resolve_static_path(root, "/bad%FF").is_err());
        // malformed escapes stay literal
        assert_eq!(
            resolve_static_path(root, "/100%zz.txt").unwrap(),
            PathBuf::from("/srv/public/100%zz.txt")
        );
        assert!(resolve_static_path(root, "/..%5Cwin.ini").is_err());
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::from_sources(None, |_| None).unwrap();
        assert_eq!(settings.port, 3000);
        assert_eq!(settings.render_base_url, "http://127.0.0.1:3000");
        assert_eq!(settings.static_root, PathBuf::from("public"));
        assert_eq!(settings.timezone, chrono_tz::Asia::Shanghai);
        assert_eq!(settings.capture_timeout_ms, 10_000);
        assert!(settings.public_base_url.is_none());
    }

    #[test]
    fn test_settings_env_overrides_yaml() {
        let yaml = "port: 4000\nstatic_root: site\ntimezone: Europe/Berlin\ncapture_timeout_ms: 5000\n";
        let env = |key: &str| match key {
            "PORT" => Some("5000".to_string()),
            "WALLPAPER_TZ" => Some("America/New_York".to_string()),
            _ => None,
        };
        let settings = Settings::from_sources(Some(yaml), env).unwrap();
        assert_eq!(settings.port, 5000);
        assert_eq!(settings.render_base_url, "http://127.0.0.1:5000");
        assert_eq!(settings.static_root, PathBuf::from("site"));
        assert_eq!(settings.timezone, chrono_tz::America::New_York);
        assert_eq!(settings.capture_timeout_ms, 5000);

        let capture = settings.capture_config();
        assert_eq!(capture.ready_timeout, Duration::from_millis(5000));
        assert_eq!(capture.render_base_url, "http://127.0.0.1:5000");
    }

    #[test]
    fn test_settings_bad_values() {
        let settings = Settings::from_sources(Some("timezone: Mars/Olympus"), |_| None).unwrap();
        assert_eq!(settings.timezone, DEFAULT_TIMEZONE);

        let err = Settings::from_sources(None, |key| {
            (key == "PORT").then(|| "eighty".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        assert!(Settings::from_yaml("port: [1, 2]").is_err());
    }

    #[test]
    fn test_api_error_mapping() {
        let err = ApiError::from(Error::NotFound("x".into()));
        assert_eq!((err.status, err.code), (StatusCode::NOT_FOUND, "NOT_FOUND"));

        let err = ApiError::from(Error::Io("disk".into()));
        assert_eq!(err.code, "FILE_READ_FAILED");
        assert_eq!(err.details.as_deref(), Some("disk"));

        let err = ApiError::from(Error::Browser("gone".into()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, "RENDER_FAILED");
    }
}
