use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Saturation/value pair used for the light gradient shade.
pub const LIGHT_SHADE: (f64, f64) = (20.0, 30.0);
/// Saturation/value pair used for the dark background shade.
pub const DARK_SHADE: (f64, f64) = (40.0, 7.0);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("Invalid hex color: {0:?}")]
    InvalidHex(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS `rgb(r, g, b)` notation.
    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Hue in degrees `[0, 360)`, saturation and value in percent `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    pub fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }

    /// Same hue, different saturation and value.
    pub fn with_sv(self, s: f64, v: f64) -> Self {
        Self { h: self.h, s, v }
    }
}

/// Parses `#rrggbb`, `rrggbb`, `#rgb` or `rgb`.
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, ColorError> {
    let digits = hex.trim().trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(hex.to_string()));
    }

    let expanded = match digits.len() {
        6 => digits.to_string(),
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        _ => return Err(ColorError::InvalidHex(hex.to_string())),
    };

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&expanded[range], 16)
            .map_err(|_| ColorError::InvalidHex(hex.to_string()))
    };

    Ok(Rgb {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

pub fn rgb_to_hsv(rgb: Rgb) -> Hsv {
    let r = rgb.r as f64 / 255.0;
    let g = rgb.g as f64 / 255.0;
    let b = rgb.b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    let s = if max == 0.0 { 0.0 } else { delta / max };

    Hsv {
        h: h.rem_euclid(360.0),
        s: s * 100.0,
        v: max * 100.0,
    }
}

pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let s = (hsv.s / 100.0).clamp(0.0, 1.0);
    let v = (hsv.v / 100.0).clamp(0.0, 1.0);
    let h = hsv.h.rem_euclid(360.0) / 60.0;

    let c = v * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let to_channel = |value: f64| ((value + m) * 255.0).round().clamp(0.0, 255.0) as u8;

    Rgb {
        r: to_channel(r),
        g: to_channel(g),
        b: to_channel(b),
    }
}
