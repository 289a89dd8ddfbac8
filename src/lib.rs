use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::PathBuf, time::Duration};

pub mod brightness;
pub mod cache_clear;
pub mod color;
pub mod startup_checks;
pub mod static_files;
pub mod styling;
pub mod templating;
pub mod unsplash;
pub mod wallpaper;

use styling::FadeRegion;
use unsplash::Orientation;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub templates: TemplateConfig,
    pub static_files: StaticConfig,
    pub unsplash: UnsplashConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Wallberry".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub directory: PathBuf,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("templates"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticConfig {
    pub directory: PathBuf,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("static"),
        }
    }
}

/// Where photos come from and how often. camelCase option names are
/// accepted as aliases.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UnsplashConfig {
    #[serde(alias = "unsplashAccessKey")]
    pub access_key: String,
    /// Comma-separated collection ids.
    pub collections: String,
    pub queries: Vec<String>,
    /// Milliseconds between fetches.
    #[serde(alias = "updateInterval")]
    pub update_interval: u64,
    pub orientation: Orientation,
    #[serde(alias = "resizeForScreen")]
    pub resize_for_screen: bool,
    pub api_base_url: String,
    pub request_timeout_secs: Option<u64>,
}

impl Default for UnsplashConfig {
    fn default() -> Self {
        Self {
            access_key: String::new(),
            collections: String::new(),
            queries: Vec::new(),
            update_interval: 300 * 1000,
            orientation: Orientation::Portrait,
            resize_for_screen: true,
            api_base_url: unsplash::DEFAULT_API_BASE.to_string(),
            request_timeout_secs: Some(30),
        }
    }
}

impl UnsplashConfig {
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    #[serde(alias = "backgroundOpacity")]
    pub background_opacity: f64,
    #[serde(alias = "brightImageOpacity")]
    pub bright_image_opacity: f64,
    #[serde(alias = "autoDimOn")]
    pub auto_dim_on: bool,
    #[serde(alias = "addBackgroundFade")]
    pub add_background_fade: Vec<FadeRegion>,
    #[serde(alias = "clearCacheOnStart")]
    pub clear_cache_on_start: bool,
    /// Cache directory of the browser showing the page, emptied on start.
    pub browser_cache_directory: Option<PathBuf>,
    pub screen: ScreenConfig,
    /// Rendered height of each layout bar, keyed by region name.
    pub region_heights: BTreeMap<String, u32>,
    /// How often the page checks for a new photo.
    pub poll_seconds: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let region_heights = [
            (FadeRegion::Top.region_name().to_string(), 180),
            (FadeRegion::Bottom.region_name().to_string(), 180),
        ]
        .into_iter()
        .collect();

        Self {
            background_opacity: 1.0,
            bright_image_opacity: 0.85,
            auto_dim_on: true,
            add_background_fade: vec![FadeRegion::Top, FadeRegion::Bottom],
            clear_cache_on_start: true,
            browser_cache_directory: None,
            screen: ScreenConfig::default(),
            region_heights,
            poll_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
        }
    }
}

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub template_engine: Arc<templating::TemplateEngine>,
    pub static_handler: static_files::StaticFileHandler,
    pub wallpaper: wallpaper::WallpaperHandle,
    pub config: Config,
}

async fn static_file_handler(
    State(app_state): State<AppState>,
    Path(path): Path<String>,
) -> impl IntoResponse {
    app_state.static_handler.serve(&path).await
}

pub fn create_app(config: Config, wallpaper: wallpaper::WallpaperHandle) -> Router {
    let template_engine = Arc::new(templating::TemplateEngine::new(
        config.templates.directory.clone(),
    ));

    let static_handler =
        static_files::StaticFileHandler::new(config.static_files.directory.clone());

    let app_state = AppState {
        template_engine,
        static_handler,
        wallpaper,
        config,
    };

    Router::new()
        .route(
            "/",
            axum::routing::get(wallpaper::handlers::display_page_handler),
        )
        .route(
            "/api/photo",
            axum::routing::get(wallpaper::handlers::photo_handler),
        )
        .route(
            "/api/style",
            axum::routing::get(wallpaper::handlers::style_handler),
        )
        .route(
            "/api/suspend",
            axum::routing::post(wallpaper::handlers::suspend_handler),
        )
        .route(
            "/api/resume",
            axum::routing::post(wallpaper::handlers::resume_handler),
        )
        .route("/static/{*path}", axum::routing::get(static_file_handler))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let method = request.method();
                    let uri = request.uri();
                    let matched_path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched_path| matched_path.as_str());

                    tracing::info_span!(
                        "http_request",
                        method = %method,
                        uri = %uri,
                        matched_path,
                    )
                })
                .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                    tracing::debug!(
                        target: "access_log",
                        method = %request.method(),
                        path = %request.uri().path(),
                        "request"
                    );
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::debug!(
                            target: "access_log",
                            status = %response.status(),
                            latency_ms = %latency.as_millis(),
                            "response"
                        );
                    },
                ),
        )
        .with_state(app_state)
}
