use thiserror::Error;

#[derive(Debug, Error)]
pub enum WallpaperError {
    #[error("Wallpaper loop is no longer running")]
    LoopStopped,
}
