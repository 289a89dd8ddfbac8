use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tempfile::TempDir;
use wallberry::{
    Config,
    cache_clear::NoopCacheClearer,
    create_app,
    unsplash::{FetchError, PhotoRequest, PhotoSource, UnsplashPhoto},
    wallpaper::{DisplayState, Wallpaper, WallpaperHandle},
};

const PAGE_TEMPLATE: &str = include_str!("../templates/wallberry.html.liquid");

/// Always answers with the same photo, or the same error.
struct FixedSource {
    photo: Option<&'static str>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl PhotoSource for FixedSource {
    async fn random_photo(&self, _request: &PhotoRequest) -> Result<UnsplashPhoto, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.photo {
            Some(json) => Ok(serde_json::from_str(json).unwrap()),
            None => Err(FetchError::Api {
                status: 401,
                errors: vec!["invalid client_id".to_string()],
            }),
        }
    }

    async fn download_image(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
        Err(FetchError::ImageLoad("not used".to_string()))
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

fn create_test_config(temp_dir: &TempDir) -> Config {
    let templates = temp_dir.path().join("templates");
    let static_dir = temp_dir.path().join("static");
    std::fs::create_dir_all(&templates).unwrap();
    std::fs::create_dir_all(&static_dir).unwrap();
    std::fs::write(templates.join("wallberry.html.liquid"), PAGE_TEMPLATE).unwrap();
    std::fs::write(static_dir.join("wallberry.css"), "body { color: white; }").unwrap();

    let mut config = Config::default();
    config.templates.directory = templates;
    config.static_files.directory = static_dir;
    config.unsplash.access_key = "test".to_string();
    config.unsplash.resize_for_screen = false;
    config.display.auto_dim_on = false;
    config.display.clear_cache_on_start = false;
    config
}

struct Running {
    server: TestServer,
    handle: WallpaperHandle,
    calls: Arc<AtomicUsize>,
}

async fn start(config: &Config, photo: Option<&'static str>) -> Running {
    let calls = Arc::new(AtomicUsize::new(0));
    let source = Arc::new(FixedSource {
        photo,
        calls: calls.clone(),
    });
    let (handle, _task) = Wallpaper::new(config, source).spawn(Arc::new(NoopCacheClearer));

    handle
        .subscribe()
        .wait_for(|snapshot| snapshot.state != DisplayState::Loading)
        .await
        .unwrap();

    let server = TestServer::new(create_app(config.clone(), handle.clone())).unwrap();
    Running {
        server,
        handle,
        calls,
    }
}

const PHOTO: &str = r##"{
    "urls": { "full": "https://images.example/full.jpg" },
    "color": "#336699",
    "user": { "name": "Ansel Example" },
    "location": { "city": "Yosemite Valley", "country": "United States" }
}"##;

#[tokio::test]
async fn test_photo_endpoint_returns_record() {
    let temp_dir = TempDir::new().unwrap();
    let Running { server, .. } = start(&create_test_config(&temp_dir), Some(PHOTO)).await;

    let response = server.get("/api/photo").await;
    response.assert_status_ok();

    let json: serde_json::Value = response.json();
    assert_eq!(json["status"], "photo");
    assert_eq!(json["image_url"], "https://images.example/full.jpg");
    assert_eq!(json["author_name"], "Ansel Example");
    assert_eq!(json["city"], "Yosemite Valley");
    assert_eq!(json["country"], "United States");
    let hue = json["base_color_hsv"]["h"].as_f64().unwrap();
    assert!((hue - 210.0).abs() < 1e-6);
    assert!(json["is_light"].is_null());
}

#[tokio::test]
async fn test_error_is_exposed() {
    let temp_dir = TempDir::new().unwrap();
    let Running { server, .. } = start(&create_test_config(&temp_dir), None).await;

    let json: serde_json::Value = server.get("/api/photo").await.json();
    assert_eq!(json["status"], "error");
    assert!(
        json["message"]
            .as_str()
            .unwrap()
            .contains("invalid client_id")
    );

    let page = server.get("/").await;
    page.assert_status_ok();
    assert!(page.text().contains("invalid client_id"));
}

#[tokio::test]
async fn test_display_page_renders_photo() {
    let temp_dir = TempDir::new().unwrap();
    let Running { server, .. } = start(&create_test_config(&temp_dir), Some(PHOTO)).await;

    let page = server.get("/").await;
    page.assert_status_ok();
    let html = page.text();

    assert!(html.contains("https://images.example/full.jpg"));
    assert!(html.contains("Photo by Ansel Example"));
    assert!(html.contains("Yosemite Valley, United States"));
    assert!(html.contains("wb-fade-top"));
    assert!(html.contains("wb-fade-bottom"));
    assert!(html.contains("height: 250px"));
}

const HOSTILE_PHOTO: &str = r##"{
    "urls": { "full": "https://images.example/x.jpg\" onerror=\"alert(2)" },
    "color": "#336699",
    "user": { "name": "<script>alert(1)</script>" },
    "location": { "city": "<b>Nowhere</b>", "country": null }
}"##;

#[tokio::test]
async fn test_display_page_escapes_photo_text() {
    let temp_dir = TempDir::new().unwrap();
    let Running { server, .. } = start(&create_test_config(&temp_dir), Some(HOSTILE_PHOTO)).await;

    let html = server.get("/").await.text();
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!html.contains("<b>Nowhere</b>"));
    assert!(!html.contains("\" onerror=\"alert(2)"));
}

#[tokio::test]
async fn test_fades_can_be_disabled() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = create_test_config(&temp_dir);
    config.display.add_background_fade.clear();
    let Running { server, .. } = start(&config, Some(PHOTO)).await;

    let html = server.get("/").await.text();
    assert!(!html.contains("wb-fade-top"));

    let style: serde_json::Value = server.get("/api/style").await.json();
    assert_eq!(style["fades"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_suspend_and_resume_endpoints() {
    let temp_dir = TempDir::new().unwrap();
    let Running {
        server,
        handle,
        calls,
    } = start(&create_test_config(&temp_dir), Some(PHOTO)).await;

    server
        .post("/api/suspend")
        .await
        .assert_status(StatusCode::ACCEPTED);

    let mut style: serde_json::Value = server.get("/api/style").await.json();
    for _ in 0..50 {
        if style["background_css"] == "rgb(0, 0, 0)" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        style = server.get("/api/style").await.json();
    }
    assert_eq!(style["background_css"], "rgb(0, 0, 0)");

    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Suspended: nothing new is published until resume.
    let mut updates = handle.subscribe();
    assert!(
        tokio::time::timeout(Duration::from_millis(200), updates.changed())
            .await
            .is_err()
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    server
        .post("/api/resume")
        .await
        .assert_status(StatusCode::ACCEPTED);

    tokio::time::timeout(Duration::from_secs(5), updates.changed())
        .await
        .expect("resume should fetch right away")
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_lifecycle_after_loop_stopped() {
    let temp_dir = TempDir::new().unwrap();
    let Running { server, handle, .. } = start(&create_test_config(&temp_dir), Some(PHOTO)).await;

    handle.shutdown().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    server
        .post("/api/resume")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_static_files() {
    let temp_dir = TempDir::new().unwrap();
    let Running { server, .. } = start(&create_test_config(&temp_dir), Some(PHOTO)).await;

    let response = server.get("/static/wallberry.css").await;
    response.assert_status_ok();
    assert!(
        response
            .header("content-type")
            .to_str()
            .unwrap()
            .starts_with("text/css")
    );
    assert_eq!(response.text(), "body { color: white; }");

    server
        .get("/static/missing.css")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
