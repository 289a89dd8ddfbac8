use serde::{Deserialize, Serialize};
use std::fmt;

/// Photo orientation filter accepted by `/photos/random`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
    Squarish,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
            Orientation::Squarish => "squarish",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Only the fields the display uses; everything else in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct UnsplashPhoto {
    #[serde(default)]
    pub id: Option<String>,
    pub urls: PhotoUrls,
    pub color: String,
    pub user: UnsplashUser,
    #[serde(default)]
    pub location: Option<UnsplashLocation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoUrls {
    #[serde(default)]
    pub custom: Option<String>,
    #[serde(default)]
    pub full: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnsplashUser {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnsplashLocation {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Body of a non-200 response, e.g. `{"errors": ["OAuth error: The access token is invalid"]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UnsplashErrorBody {
    pub errors: Vec<String>,
}
