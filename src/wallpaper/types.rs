use crate::{
    color::{Hsv, Rgb},
    styling::PageStyle,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fetched photo together with the colors derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub image_url: String,
    pub base_color_hsv: Hsv,
    pub light_shade_rgb: Rgb,
    pub dark_shade_rgb: Rgb,
    pub author_name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    /// `None` when auto-dim is off or the image could not be sampled.
    pub is_light: Option<bool>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

impl ErrorRecord {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            occurred_at: Utc::now(),
        }
    }
}

/// What the display currently shows. Replaced as a whole, never patched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DisplayState {
    #[default]
    Loading,
    Photo(PhotoRecord),
    Error(ErrorRecord),
}

impl DisplayState {
    pub fn photo(&self) -> Option<&PhotoRecord> {
        match self {
            DisplayState::Photo(record) => Some(record),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorRecord> {
        match self {
            DisplayState::Error(record) => Some(record),
            _ => None,
        }
    }
}

/// State and style published together, so readers never pair a new photo
/// with the previous photo's style.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySnapshot {
    pub state: DisplayState,
    pub style: PageStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Photo,
    Error,
    /// Another fetch already held the slot.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Suspend,
    Resume,
    Shutdown,
}
