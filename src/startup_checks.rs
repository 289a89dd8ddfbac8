use crate::{Config, styling, templating::PAGE_TEMPLATE};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error, PartialEq)]
pub enum StartupCheckError {
    #[error("Unsplash access key is not set")]
    MissingAccessKey,

    #[error("Update interval must be greater than zero")]
    InvalidUpdateInterval,

    #[error("{name} must be between 0 and 1, got {value}")]
    InvalidOpacity { name: &'static str, value: f64 },

    #[error("Background fade region has no configured height: {0}")]
    UnknownFadeRegion(String),

    #[error("Template missing: {0}")]
    TemplateMissing(String),

    #[error("Static files directory does not exist")]
    StaticDirectoryMissing,
}

impl StartupCheckError {
    /// Critical errors stop the server from starting.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            StartupCheckError::InvalidUpdateInterval | StartupCheckError::InvalidOpacity { .. }
        )
    }
}

pub async fn perform_startup_checks(config: &Config) -> Result<(), Vec<StartupCheckError>> {
    let mut errors = Vec::new();

    info!("Performing startup checks...");

    if config.unsplash.access_key.trim().is_empty() {
        warn!("No Unsplash access key configured, every fetch will be rejected");
        errors.push(StartupCheckError::MissingAccessKey);
    }

    if config.unsplash.update_interval == 0 {
        error!("Update interval is zero");
        errors.push(StartupCheckError::InvalidUpdateInterval);
    } else {
        info!(
            "Fetching a new photo every {:?}",
            config.unsplash.update_interval()
        );
    }

    let opacities = [
        ("background_opacity", config.display.background_opacity),
        ("bright_image_opacity", config.display.bright_image_opacity),
    ];
    for (name, value) in opacities {
        if !(0.0..=1.0).contains(&value) {
            error!("{} out of range: {}", name, value);
            errors.push(StartupCheckError::InvalidOpacity { name, value });
        }
    }

    for region in &config.display.add_background_fade {
        let name = region.region_name();
        if styling::fade_height(&config.display.region_heights, name).is_err() {
            warn!("No height configured for fade region '{}'", name);
            errors.push(StartupCheckError::UnknownFadeRegion(name.to_string()));
        }
    }

    let template_path = config.templates.directory.join(PAGE_TEMPLATE);
    if !tokio::fs::try_exists(&template_path).await.unwrap_or(false) {
        warn!("Page template does not exist: {:?}", template_path);
        errors.push(StartupCheckError::TemplateMissing(
            template_path.display().to_string(),
        ));
    } else {
        info!("Page template exists: {:?}", template_path);
    }

    if !config.static_files.directory.exists() {
        warn!(
            "Static files directory does not exist: {:?}",
            config.static_files.directory
        );
        errors.push(StartupCheckError::StaticDirectoryMissing);
    }

    if errors.is_empty() {
        info!("All startup checks passed");
        Ok(())
    } else {
        error!("Startup checks failed with {} errors", errors.len());
        Err(errors)
    }
}
