pub mod client;
pub mod error;
pub mod request;
pub mod types;

pub use client::{DEFAULT_API_BASE, UnsplashClient};
pub use error::FetchError;
pub use request::PhotoRequest;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait PhotoSource: Send + Sync {
    async fn random_photo(&self, request: &PhotoRequest) -> Result<UnsplashPhoto, FetchError>;
    async fn download_image(&self, url: &str) -> Result<Vec<u8>, FetchError>;
    fn name(&self) -> &str;
}

pub type DynPhotoSource = Arc<dyn PhotoSource>;
