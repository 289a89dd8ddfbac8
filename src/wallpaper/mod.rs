// Wallpaper module - fetch/retry loop and display state
pub mod core;
pub mod deriver;
pub mod error;
pub mod handlers;
pub mod types;

pub use self::core::{Wallpaper, WallpaperHandle};
pub use error::WallpaperError;
pub use types::{DisplaySnapshot, DisplayState, ErrorRecord, FetchOutcome, PhotoRecord};
