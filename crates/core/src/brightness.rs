//! Perceived brightness and the body-blue feasible interval.
//!
//! Perceived brightness is a luminance-weighted Euclidean norm of the RGB
//! channels:
//!
//! ```text
//! PB255 = sqrt(wR·R² + wG·G² + wB·B²)
//! PB100 = PB255 / 255 × 100
//! ```
//!
//! With R and G fixed, a target PB255 pins B on the ellipse
//! `wB·B² = PB255² − wR·R² − wG·G²`, which is how the body sampler turns a
//! brightness range into a range for the blue channel.

use crate::color::Rgb;
use crate::error::ColorPairError;
use serde::{Deserialize, Serialize};

/// How far the weight sum may drift from 1 before validation rejects it.
const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Red/green/blue multipliers used in the perceived-brightness norm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LuminanceWeights {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Default for LuminanceWeights {
    fn default() -> Self {
        Self {
            red: 0.241,
            green: 0.691,
            blue: 0.068,
        }
    }
}

/// Feasible interval for the blue channel, in channel units [0, 255].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlueBounds {
    pub lower: f64,
    pub upper: f64,
    /// Red and green alone already exceed the brightness ceiling; the
    /// interval degraded to blue = 0.
    pub ceiling_exceeded: bool,
    /// The lower bound came out above the upper bound and was collapsed
    /// onto it.
    pub collapsed: bool,
}

impl LuminanceWeights {
    /// Perceived brightness on the [0, 255] scale.
    pub fn perceived_brightness_255(&self, rgb: Rgb) -> f64 {
        let r = rgb.r as f64;
        let g = rgb.g as f64;
        let b = rgb.b as f64;
        (self.red * r * r + self.green * g * g + self.blue * b * b).sqrt()
    }

    /// Perceived brightness on the [0, 100] scale.
    pub fn perceived_brightness(&self, rgb: Rgb) -> f64 {
        self.perceived_brightness_255(rgb) / 255.0 * 100.0
    }

    /// Checks that the weights are finite, non-negative, have a usable blue
    /// term, and sum to roughly 1.
    pub fn validate(&self) -> Result<(), ColorPairError> {
        for (name, w) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(ColorPairError::InvalidConfig(format!(
                    "{name} luminance weight must be a finite non-negative number, got {w}"
                )));
            }
        }
        if self.blue == 0.0 {
            return Err(ColorPairError::InvalidConfig(
                "blue luminance weight must be positive".to_string(),
            ));
        }
        let sum = self.red + self.green + self.blue;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ColorPairError::InvalidConfig(format!(
                "luminance weights must sum to 1, got {sum}"
            )));
        }
        Ok(())
    }

    /// Blue channel value that puts the color at `target_255` perceived
    /// brightness, clamped to [0, 255]. Returns the value and whether the
    /// radicand was negative (red and green alone overshoot the target).
    fn blue_for_target(&self, red: f64, green: f64, target_255: f64) -> (f64, bool) {
        let radicand = (target_255 * target_255
            - self.red * red * red
            - self.green * green * green)
            / self.blue;
        let overshoot = radicand < 0.0;
        (radicand.max(0.0).sqrt().clamp(0.0, 255.0), overshoot)
    }

    /// Solves the perceived-brightness ellipse for the blue channel given
    /// fixed red and green channels and a PB255 range.
    pub fn blue_bounds(&self, red: u8, green: u8, min_255: f64, max_255: f64) -> BlueBounds {
        let (r, g) = (red as f64, green as f64);
        let (lower, _) = self.blue_for_target(r, g, min_255);
        let (upper, ceiling_exceeded) = self.blue_for_target(r, g, max_255);
        let collapsed = lower > upper;
        BlueBounds {
            lower: if collapsed { upper } else { lower },
            upper,
            ceiling_exceeded,
            collapsed,
        }
    }
}

/// Converts a [0, 100] perceived-brightness percentage to the [0, 255] scale.
pub fn percent_to_255(percent: f64) -> f64 {
    percent / 100.0 * 255.0
}
