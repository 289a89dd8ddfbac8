use axum::{
    body::Body,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::path::{Component, Path, PathBuf};
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, error};

/// Serves the display's stylesheet and other assets from one directory.
#[derive(Clone)]
pub struct StaticFileHandler {
    pub static_dir: PathBuf,
}

impl StaticFileHandler {
    pub fn new(static_dir: PathBuf) -> Self {
        Self { static_dir }
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.static_dir.join(relative))
    }

    pub async fn serve(&self, path: &str) -> Response {
        let Some(file_path) = self.resolve(path) else {
            error!("Path traversal attempt: {:?}", path);
            return (StatusCode::FORBIDDEN, "Forbidden").into_response();
        };

        debug!("Attempting to serve static file: {:?}", file_path);

        let metadata = match tokio::fs::metadata(&file_path).await {
            Ok(m) if m.is_file() => m,
            Ok(_) => return (StatusCode::NOT_FOUND, "File not found").into_response(),
            Err(e) => {
                debug!("Failed to get metadata for {:?}: {}", file_path, e);
                return (StatusCode::NOT_FOUND, "File not found").into_response();
            }
        };

        let file = match File::open(&file_path).await {
            Ok(file) => file,
            Err(e) => {
                debug!("Failed to open file {:?}: {}", file_path, e);
                return (StatusCode::NOT_FOUND, "File not found").into_response();
            }
        };

        let content_type = mime_guess::from_path(&file_path)
            .first_or_octet_stream()
            .to_string();

        let body = Body::from_stream(ReaderStream::new(file));

        let mut response = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CACHE_CONTROL, "public, max-age=300, must-revalidate");

        if let Ok(modified) = metadata.modified() {
            response = response.header(header::LAST_MODIFIED, httpdate::fmt_http_date(modified));
        }

        response.body(body).unwrap_or_else(|e| {
            error!("Failed to build static file response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_rejects_traversal() {
        let handler = StaticFileHandler::new(PathBuf::from("static"));
        assert_eq!(
            handler.resolve("wallberry.css"),
            Some(PathBuf::from("static/wallberry.css"))
        );
        assert_eq!(
            handler.resolve("/fonts/a.woff2"),
            Some(PathBuf::from("static/fonts/a.woff2"))
        );
        assert!(handler.resolve("../Cargo.toml").is_none());
        assert!(handler.resolve("fonts/../../secret").is_none());
    }
}
