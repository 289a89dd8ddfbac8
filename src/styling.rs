//! Presentation helpers: background tint, fade overlays and image opacity.

use crate::DisplayConfig;
use crate::color::Rgb;
use crate::wallpaper::{DisplayState, PhotoRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

/// Added to a region's rendered height so the fade covers margin and padding.
pub const FADE_MARGIN: u32 = 70;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StyleError {
    #[error("Unknown layout region: {0}")]
    UnknownRegion(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FadeRegion {
    Top,
    Bottom,
}

impl FadeRegion {
    /// Name of the layout bar the fade sits behind.
    pub fn region_name(&self) -> &'static str {
        match self {
            FadeRegion::Top => "top bar",
            FadeRegion::Bottom => "bottom bar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fade {
    pub region: FadeRegion,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageStyle {
    pub background_tint: Rgb,
    pub background_css: String,
    pub image_opacity: f64,
    pub dimmed: bool,
    pub fades: Vec<Fade>,
}

impl Default for PageStyle {
    fn default() -> Self {
        Self {
            background_tint: Rgb::BLACK,
            background_css: Rgb::BLACK.to_css(),
            image_opacity: 1.0,
            dimmed: false,
            fades: Vec::new(),
        }
    }
}

impl PageStyle {
    pub fn set_background_tint(&mut self, tint: Rgb) {
        self.background_tint = tint;
        self.background_css = tint.to_css();
    }
}

/// Rendered height of `region` plus [`FADE_MARGIN`].
pub fn fade_height(
    region_heights: &BTreeMap<String, u32>,
    region: &str,
) -> Result<u32, StyleError> {
    region_heights
        .get(region)
        .map(|height| height.saturating_add(FADE_MARGIN))
        .ok_or_else(|| StyleError::UnknownRegion(region.to_string()))
}

/// One fade per configured region; regions missing from the layout are skipped.
pub fn fades(display: &DisplayConfig) -> Vec<Fade> {
    display
        .add_background_fade
        .iter()
        .filter_map(|region| {
            match fade_height(&display.region_heights, region.region_name()) {
                Ok(height) => Some(Fade {
                    region: *region,
                    height,
                }),
                Err(e) => {
                    warn!("Skipping background fade: {}", e);
                    None
                }
            }
        })
        .collect()
}

pub fn is_dimmed(display: &DisplayConfig, record: &PhotoRecord) -> bool {
    display.auto_dim_on && record.is_light == Some(true)
}

pub fn image_opacity(display: &DisplayConfig, record: &PhotoRecord) -> f64 {
    if is_dimmed(display, record) {
        display.bright_image_opacity
    } else {
        display.background_opacity
    }
}

pub fn style_for(state: &DisplayState, display: &DisplayConfig) -> PageStyle {
    let mut style = PageStyle {
        fades: fades(display),
        image_opacity: display.background_opacity,
        ..PageStyle::default()
    };

    if let DisplayState::Photo(record) = state {
        style.image_opacity = image_opacity(display, record);
        style.dimmed = is_dimmed(display, record);
        if style.dimmed {
            style.set_background_tint(record.dark_shade_rgb);
        }
    }

    style
}
