//! Color types and RGB/HSB conversion.
//!
//! Provides `Rgb` (8-bit channels), `Hsb` (hue in degrees, saturation and
//! brightness in percent) and `Color`, which carries both representations
//! together with its perceived brightness. Conversions are pure functions
//! using `f64` throughout.

use crate::brightness::LuminanceWeights;
use crate::error::ColorPairError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// RGB color with 8-bit channels in [0, 255].
///
/// Serializes as a hex string `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue/saturation/brightness color.
///
/// `h` is in degrees [0, 360), `s` and `b` are percentages in [0, 100].
/// HSB brightness is the max channel, not the perceived brightness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsb {
    pub h: f64,
    pub s: f64,
    pub b: f64,
}

/// A fully characterized color: RGB, HSB and perceived brightness on both
/// the [0, 255] and [0, 100] scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub rgb: Rgb,
    pub hsb: Hsb,
    pub perceived_brightness_255: f64,
    pub perceived_brightness: f64,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// Returns `ColorPairError::InvalidColor` if the input is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Rgb, ColorPairError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ColorPairError::InvalidColor(format!(
                "expected 6 hex digits, got {:?}",
                hex
            )));
        }
        let r = u8::from_str_radix(&hex[0..2], 16)
            .map_err(|e| ColorPairError::InvalidColor(format!("invalid red component: {e}")))?;
        let g = u8::from_str_radix(&hex[2..4], 16)
            .map_err(|e| ColorPairError::InvalidColor(format!("invalid green component: {e}")))?;
        let b = u8::from_str_radix(&hex[4..6], 16)
            .map_err(|e| ColorPairError::InvalidColor(format!("invalid blue component: {e}")))?;
        Ok(Rgb { r, g, b })
    }

    /// Formats the color as `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl Color {
    /// Characterizes an RGB color: derives HSB and perceived brightness.
    pub fn from_rgb(rgb: Rgb, weights: &LuminanceWeights) -> Self {
        Self {
            rgb,
            hsb: rgb_to_hsb(rgb),
            perceived_brightness_255: weights.perceived_brightness_255(rgb),
            perceived_brightness: weights.perceived_brightness(rgb),
        }
    }

    /// Characterizes an HSB color. The HSB triple is kept as given (hue
    /// normalized to [0, 360)); RGB is its rounded conversion and perceived
    /// brightness is computed from that RGB.
    pub fn from_hsb(hsb: Hsb, weights: &LuminanceWeights) -> Self {
        let hsb = Hsb {
            h: normalize_hue(hsb.h),
            ..hsb
        };
        let rgb = hsb_to_rgb(hsb);
        Self {
            rgb,
            hsb,
            perceived_brightness_255: weights.perceived_brightness_255(rgb),
            perceived_brightness: weights.perceived_brightness(rgb),
        }
    }

    pub fn to_hex(&self) -> String {
        self.rgb.to_hex()
    }
}

/// Normalizes a hue angle to [0, 360).
///
/// `rem_euclid` may return exactly 360.0 for tiny negative inputs; that case
/// folds back to 0.
pub fn normalize_hue(h: f64) -> f64 {
    let n = h.rem_euclid(360.0);
    if n >= 360.0 {
        0.0
    } else {
        n
    }
}

/// Converts RGB to HSB (hue in degrees, saturation/brightness in percent).
///
/// Achromatic colors (all channels equal) get hue 0.
pub fn rgb_to_hsb(c: Rgb) -> Hsb {
    let r = c.r as f64 / 255.0;
    let g = c.g as f64 / 255.0;
    let b = c.b as f64 / 255.0;

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

    Hsb {
        h: normalize_hue(h),
        s: s * 100.0,
        b: max * 100.0,
    }
}

/// Converts HSB to RGB, rounding each channel to the nearest integer.
///
/// Hue wraps modulo 360; saturation and brightness are clamped to [0, 100].
pub fn hsb_to_rgb(c: Hsb) -> Rgb {
    let h = normalize_hue(c.h);
    let s = (c.s / 100.0).clamp(0.0, 1.0);
    let v = (c.b / 100.0).clamp(0.0, 1.0);

    let chroma = v * s;
    let sector = h / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let m = v - chroma;

    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    Rgb {
        r: unit_to_channel(r + m),
        g: unit_to_channel(g + m),
        b: unit_to_channel(b + m),
    }
}

fn unit_to_channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}
