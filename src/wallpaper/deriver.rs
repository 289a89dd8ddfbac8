use super::types::PhotoRecord;
use crate::color::{self, ColorError, DARK_SHADE, Hsv, LIGHT_SHADE, Rgb};
use crate::unsplash::{FetchError, UnsplashPhoto};
use chrono::Utc;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedColors {
    pub base: Hsv,
    pub light: Rgb,
    pub dark: Rgb,
}

/// Base HSV plus the light and dark shades that share its hue.
pub fn derive_colors(hex: &str) -> Result<DerivedColors, ColorError> {
    let base = color::rgb_to_hsv(color::hex_to_rgb(hex)?);

    Ok(DerivedColors {
        base,
        light: color::hsv_to_rgb(base.with_sv(LIGHT_SHADE.0, LIGHT_SHADE.1)),
        dark: color::hsv_to_rgb(base.with_sv(DARK_SHADE.0, DARK_SHADE.1)),
    })
}

pub fn select_image_url(
    photo: &UnsplashPhoto,
    resize_for_screen: bool,
) -> Result<String, FetchError> {
    let urls = &photo.urls;
    if resize_for_screen {
        if let Some(custom) = &urls.custom {
            return Ok(custom.clone());
        }
        warn!("Resized photo URL missing from response, using full size");
    }

    urls.full.clone().ok_or(FetchError::MissingField("urls.full"))
}

/// Builds the display record. Brightness is filled in later, once the image
/// itself has been sampled.
pub fn build_record(
    photo: &UnsplashPhoto,
    resize_for_screen: bool,
) -> Result<PhotoRecord, FetchError> {
    let image_url = select_image_url(photo, resize_for_screen)?;
    let colors = derive_colors(&photo.color)?;
    let location = photo.location.clone().unwrap_or_default();

    Ok(PhotoRecord {
        image_url,
        base_color_hsv: colors.base,
        light_shade_rgb: colors.light,
        dark_shade_rgb: colors.dark,
        author_name: photo.user.name.clone(),
        city: location.city,
        country: location.country,
        is_light: None,
        fetched_at: Utc::now(),
    })
}
