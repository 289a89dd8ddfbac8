use crate::color::ColorError;
use thiserror::Error;

/// Everything that can go wrong while fetching a photo. The `Display` text is
/// shown on screen as-is.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("The Unsplash API returned the error \"{}\"", .errors.join(", "))]
    Api { status: u16, errors: Vec<String> },

    #[error("Unsplash Error: {status}, {reason}")]
    Status { status: u16, reason: String },

    #[error("Could not connect to the Unsplash server.")]
    Network(String),

    #[error("The Unsplash server did not respond in time.")]
    Timeout,

    #[error("The Unsplash API returned an unreadable response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("The Unsplash API response is missing {0}")]
    MissingField(&'static str),

    #[error("The Unsplash API returned an unusable color: {0}")]
    InvalidColor(#[from] ColorError),

    #[error("Could not load the photo: {0}")]
    ImageLoad(String),

    #[error("Invalid Unsplash API URL: {0}")]
    Url(#[from] url::ParseError),
}

impl FetchError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(err.to_string())
        }
    }
}
