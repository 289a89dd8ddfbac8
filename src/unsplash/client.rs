use super::{FetchError, PhotoRequest, PhotoSource, UnsplashErrorBody, UnsplashPhoto};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, error, info};

pub const DEFAULT_API_BASE: &str = "https://api.unsplash.com";

/// `PhotoSource` backed by the real Unsplash HTTP API.
pub struct UnsplashClient {
    client: Client,
    api_base: String,
}

impl UnsplashClient {
    pub fn new(api_base: impl Into<String>, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(FetchError::from_transport)?;

        Ok(Self {
            client,
            api_base: api_base.into(),
        })
    }

    pub fn from_config(config: &crate::UnsplashConfig) -> Result<Self, FetchError> {
        let timeout = config
            .request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        Self::new(config.api_base_url.clone(), timeout)
    }
}

/// Turns a status code and body into a photo or the matching error.
pub fn parse_random_response(status: StatusCode, body: &str) -> Result<UnsplashPhoto, FetchError> {
    if status == StatusCode::OK {
        return Ok(serde_json::from_str(body)?);
    }

    if let Ok(error_body) = serde_json::from_str::<UnsplashErrorBody>(body) {
        return Err(FetchError::Api {
            status: status.as_u16(),
            errors: error_body.errors,
        });
    }

    error!("Unsplash Error: {}", body);
    Err(FetchError::Status {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    })
}

#[async_trait]
impl PhotoSource for UnsplashClient {
    async fn random_photo(&self, request: &PhotoRequest) -> Result<UnsplashPhoto, FetchError> {
        let url = request.to_url(&self.api_base)?;
        debug!(
            orientation = %request.orientation,
            query = ?request.query,
            "Requesting random photo from {}",
            self.api_base
        );

        let response = self
            .client
            .get(url)
            .header("Accept-Version", "v1")
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(FetchError::from_transport)?;

        let photo = parse_random_response(status, &body)?;
        info!(
            "Got Unsplash photo {} by {}",
            photo.id.as_deref().unwrap_or("(no id)"),
            photo.user.name
        );
        Ok(photo)
    }

    async fn download_image(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ImageLoad(format!(
                "image request returned {}",
                status
            )));
        }

        let bytes = response.bytes().await.map_err(FetchError::from_transport)?;
        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }

    fn name(&self) -> &str {
        "unsplash"
    }
}
