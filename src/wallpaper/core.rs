use super::{
    deriver,
    error::WallpaperError,
    types::{Command, DisplaySnapshot, DisplayState, ErrorRecord, FetchOutcome, PhotoRecord},
};
use crate::{
    Config, DisplayConfig, UnsplashConfig, brightness,
    cache_clear::DynCacheClearer,
    color::Rgb,
    styling::{self, PageStyle},
    unsplash::{DynPhotoSource, FetchError, PhotoRequest},
};
use tokio::{
    sync::{Mutex, mpsc, watch},
    task::JoinHandle,
    time::{Instant, sleep_until},
};
use tracing::{debug, error, info, warn};

/// Fetches photos and publishes the resulting display state.
pub struct Wallpaper {
    unsplash: UnsplashConfig,
    display: DisplayConfig,
    source: DynPhotoSource,
    snapshot: watch::Sender<DisplaySnapshot>,
    fetch_slot: Mutex<()>,
}

impl Wallpaper {
    pub fn new(config: &Config, source: DynPhotoSource) -> Self {
        let (snapshot, _) = watch::channel(DisplaySnapshot {
            state: DisplayState::Loading,
            style: styling::style_for(&DisplayState::Loading, &config.display),
        });

        Self {
            unsplash: config.unsplash.clone(),
            display: config.display.clone(),
            source,
            snapshot,
            fetch_slot: Mutex::new(()),
        }
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn current(&self) -> DisplayState {
        self.snapshot.borrow().state.clone()
    }

    pub fn current_style(&self) -> PageStyle {
        self.snapshot.borrow().style.clone()
    }

    /// Only changes published after this call are reported by `changed()`.
    pub fn subscribe(&self) -> watch::Receiver<DisplaySnapshot> {
        self.snapshot.subscribe()
    }

    pub fn set_background_tint(&self, tint: Rgb) {
        self.snapshot
            .send_modify(|snapshot| snapshot.style.set_background_tint(tint));
    }

    /// Runs one full fetch: API request, color derivation and, with auto-dim
    /// on, image sampling. Only one fetch may be in flight; a call made while
    /// another is running returns [`FetchOutcome::Skipped`].
    pub async fn fetch_photo(&self) -> FetchOutcome {
        let Ok(_slot) = self.fetch_slot.try_lock() else {
            warn!("Photo fetch already in flight, skipping");
            return FetchOutcome::Skipped;
        };

        match self.load_photo().await {
            Ok(record) => {
                info!(
                    author = %record.author_name,
                    is_light = ?record.is_light,
                    "Showing new photo {}",
                    record.image_url
                );
                self.publish(DisplayState::Photo(record));
                FetchOutcome::Photo
            }
            Err(e) => {
                self.process_error(e);
                FetchOutcome::Error
            }
        }
    }

    fn next_request(&self) -> PhotoRequest {
        let mut rng = rand::rng();
        PhotoRequest::from_config(&self.unsplash, &self.display.screen, &mut rng)
    }

    async fn load_photo(&self) -> Result<PhotoRecord, FetchError> {
        let request = self.next_request();
        let photo = self.source.random_photo(&request).await?;
        debug!("Got Unsplash photo data: {:?}", photo);

        let mut record = deriver::build_record(&photo, self.unsplash.resize_for_screen)?;
        if self.display.auto_dim_on {
            record.is_light = self.classify_image(&record.image_url).await;
        }

        Ok(record)
    }

    async fn classify_image(&self, url: &str) -> Option<bool> {
        let bytes = match self.source.download_image(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Could not download photo for brightness check: {}", e);
                return None;
            }
        };

        match tokio::task::spawn_blocking(move || brightness::classify_bytes(&bytes)).await {
            Ok(Ok(is_light)) => Some(is_light),
            Ok(Err(e)) => {
                warn!("Could not decode photo for brightness check: {}", e);
                None
            }
            Err(e) => {
                error!("Brightness check task failed: {}", e);
                None
            }
        }
    }

    fn process_error(&self, err: FetchError) {
        error!("Photo fetch failed: {:?}", err);
        self.publish(DisplayState::Error(ErrorRecord::new(err.to_string())));
    }

    fn publish(&self, state: DisplayState) {
        let style = styling::style_for(&state, &self.display);
        self.snapshot.send_replace(DisplaySnapshot { state, style });
    }

    /// Starts the fetch loop. When `clear_cache_on_start` is set the cache is
    /// cleared before the first fetch.
    pub fn spawn(self, clearer: DynCacheClearer) -> (WallpaperHandle, JoinHandle<()>) {
        let (commands, receiver) = mpsc::channel(16);
        let handle = WallpaperHandle {
            commands,
            snapshot: self.snapshot.subscribe(),
        };

        let task = tokio::spawn(self.run(receiver, clearer));
        (handle, task)
    }

    async fn run(self, mut commands: mpsc::Receiver<Command>, clearer: DynCacheClearer) {
        info!("Starting wallpaper loop with {} photo source", self.source.name());

        if self.display.clear_cache_on_start {
            match clearer.clear_cache().await {
                Ok(()) => info!("Display cache cleared ({})", clearer.name()),
                Err(e) => warn!("Failed to clear display cache: {}", e),
            }
        }

        let interval = self.unsplash.update_interval();
        // The only timer: `None` while suspended.
        let mut next_fetch = Some(Instant::now());

        loop {
            let timer = async move {
                match next_fetch {
                    Some(deadline) => sleep_until(deadline).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Suspend) => {
                        info!("Suspending wallpaper loop");
                        next_fetch = None;
                        self.set_background_tint(Rgb::BLACK);
                    }
                    Some(Command::Resume) => {
                        info!("Waking wallpaper loop");
                        next_fetch = Some(Instant::now());
                    }
                    Some(Command::Shutdown) | None => {
                        info!("Wallpaper loop stopped");
                        break;
                    }
                },
                _ = timer => {
                    self.fetch_photo().await;
                    next_fetch = Some(Instant::now() + interval);
                    debug!("Next photo fetch in {:?}", interval);
                }
            }
        }
    }
}

/// Cheap, cloneable control surface for a running loop.
#[derive(Clone)]
pub struct WallpaperHandle {
    commands: mpsc::Sender<Command>,
    snapshot: watch::Receiver<DisplaySnapshot>,
}

impl WallpaperHandle {
    async fn send(&self, command: Command) -> Result<(), WallpaperError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| WallpaperError::LoopStopped)
    }

    /// Cancels the pending fetch and snaps the background to black.
    pub async fn suspend(&self) -> Result<(), WallpaperError> {
        self.send(Command::Suspend).await
    }

    /// Fetches immediately, replacing any pending timer.
    pub async fn resume(&self) -> Result<(), WallpaperError> {
        self.send(Command::Resume).await
    }

    pub async fn shutdown(&self) -> Result<(), WallpaperError> {
        self.send(Command::Shutdown).await
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn current(&self) -> DisplayState {
        self.snapshot.borrow().state.clone()
    }

    pub fn style(&self) -> PageStyle {
        self.snapshot.borrow().style.clone()
    }

    /// Only changes published after this call are reported by `changed()`.
    pub fn subscribe(&self) -> watch::Receiver<DisplaySnapshot> {
        let mut receiver = self.snapshot.clone();
        receiver.mark_unchanged();
        receiver
    }
}
