//! Sampling configuration and named presets.
//!
//! A [`PairConfig`] is built once (from a [`Preset`], from JSON, or by hand),
//! validated, and then only read by the samplers. Two presets ship with the
//! crate: `classic` (the looser tuning) and `server` (darker shadows,
//! a higher brightness floor and a brightness cap for near-gray hair).

use crate::brightness::{percent_to_255, LuminanceWeights};
use crate::color::Color;
use crate::error::ColorPairError;
use crate::params::{param_bool, param_f64, param_string};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// All available preset names.
const PRESET_NAMES: &[&str] = &["classic", "server"];

/// Shadow opacity range. Not used when sampling; consumers derive a
/// per-color opacity from it with [`PairConfig::shadow_opacity`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowOpacity {
    pub min: f64,
    pub max: f64,
}

/// Lowers the hair brightness ceiling for nearly gray hair.
///
/// When the drawn hair saturation is at most `max_saturation`, hair
/// brightness is drawn below `max_brightness` instead of 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesaturatedHairCap {
    pub max_saturation: f64,
    pub max_brightness: f64,
}

/// Constants governing one body/hair sampling run.
///
/// Percentages are on the [0, 100] scale; "total" values are sums of body
/// and hair channels and so range over [0, 200].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedPairConfig")]
pub struct PairConfig {
    /// Body perceived-brightness floor (percent).
    pub min_perceived_brightness: f64,
    /// Body perceived-brightness ceiling (percent).
    pub max_perceived_brightness: f64,
    /// Maximum spread, in degrees, of the hair hue around the body's complement.
    pub body_and_hair_hue_distance: f64,
    /// Body saturation + hair saturation floor.
    pub min_total_saturation: f64,
    /// Body brightness + hair brightness floor.
    pub min_total_brightness: f64,
    /// Absolute hair brightness floor.
    pub min_hair_brightness: f64,
    pub shadow_opacity: ShadowOpacity,
    pub weights: LuminanceWeights,
    pub desaturated_hair_cap: Option<DesaturatedHairCap>,
    /// Perceived brightness (percent) below which a color counts as dark.
    pub light_to_dark_switch_point: f64,
}

impl Default for PairConfig {
    fn default() -> Self {
        Self {
            min_perceived_brightness: 15.0,
            max_perceived_brightness: 95.0,
            body_and_hair_hue_distance: 90.0,
            min_total_saturation: 60.0,
            min_total_brightness: 120.0,
            min_hair_brightness: 30.0,
            shadow_opacity: ShadowOpacity {
                min: 0.15,
                max: 0.45,
            },
            weights: LuminanceWeights::default(),
            desaturated_hair_cap: None,
            light_to_dark_switch_point: 30.0,
        }
    }
}

/// Deserialization mirror of [`PairConfig`]. JSON input is converted
/// through `TryFrom`, which runs [`PairConfig::validate`]; missing keys take
/// the classic defaults.
#[derive(Deserialize)]
#[serde(default)]
struct UncheckedPairConfig {
    min_perceived_brightness: f64,
    max_perceived_brightness: f64,
    body_and_hair_hue_distance: f64,
    min_total_saturation: f64,
    min_total_brightness: f64,
    min_hair_brightness: f64,
    shadow_opacity: ShadowOpacity,
    weights: LuminanceWeights,
    desaturated_hair_cap: Option<DesaturatedHairCap>,
    light_to_dark_switch_point: f64,
}

impl Default for UncheckedPairConfig {
    fn default() -> Self {
        let PairConfig {
            min_perceived_brightness,
            max_perceived_brightness,
            body_and_hair_hue_distance,
            min_total_saturation,
            min_total_brightness,
            min_hair_brightness,
            shadow_opacity,
            weights,
            desaturated_hair_cap,
            light_to_dark_switch_point,
        } = PairConfig::default();
        Self {
            min_perceived_brightness,
            max_perceived_brightness,
            body_and_hair_hue_distance,
            min_total_saturation,
            min_total_brightness,
            min_hair_brightness,
            shadow_opacity,
            weights,
            desaturated_hair_cap,
            light_to_dark_switch_point,
        }
    }
}

impl TryFrom<UncheckedPairConfig> for PairConfig {
    type Error = ColorPairError;

    fn try_from(raw: UncheckedPairConfig) -> Result<Self, Self::Error> {
        let config = PairConfig {
            min_perceived_brightness: raw.min_perceived_brightness,
            max_perceived_brightness: raw.max_perceived_brightness,
            body_and_hair_hue_distance: raw.body_and_hair_hue_distance,
            min_total_saturation: raw.min_total_saturation,
            min_total_brightness: raw.min_total_brightness,
            min_hair_brightness: raw.min_hair_brightness,
            shadow_opacity: raw.shadow_opacity,
            weights: raw.weights,
            desaturated_hair_cap: raw.desaturated_hair_cap,
            light_to_dark_switch_point: raw.light_to_dark_switch_point,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Named configuration presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Classic,
    Server,
}

impl Preset {
    /// Looks up a preset by name (case insensitive).
    pub fn from_name(name: &str) -> Result<Self, ColorPairError> {
        match name.to_ascii_lowercase().as_str() {
            "classic" => Ok(Preset::Classic),
            "server" => Ok(Preset::Server),
            _ => Err(ColorPairError::UnknownPreset(name.to_string())),
        }
    }

    /// Returns a slice of all recognized preset names.
    pub fn list_names() -> &'static [&'static str] {
        PRESET_NAMES
    }

    pub fn config(self) -> PairConfig {
        match self {
            Preset::Classic => PairConfig::default(),
            Preset::Server => PairConfig {
                min_perceived_brightness: 18.0,
                min_total_brightness: 130.0,
                min_hair_brightness: 40.0,
                shadow_opacity: ShadowOpacity {
                    min: 0.075,
                    max: 0.4,
                },
                desaturated_hair_cap: Some(DesaturatedHairCap {
                    max_saturation: 10.0,
                    max_brightness: 90.0,
                }),
                ..PairConfig::default()
            },
        }
    }
}

fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<(), ColorPairError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ColorPairError::InvalidConfig(format!(
            "{name} must be in [{min}, {max}], got {value}"
        )));
    }
    Ok(())
}

impl PairConfig {
    /// Builds a config from a flat JSON object.
    ///
    /// `"preset"` selects the starting point (default `"classic"`); every
    /// other recognized key overrides one constant. Unknown keys are ignored,
    /// but a recognized key holding the wrong JSON type is an error. The
    /// result is validated before it is returned.
    pub fn from_params(params: &Value) -> Result<Self, ColorPairError> {
        let base = Preset::from_name(&param_string(params, "preset", "classic")?)?.config();
        let base_cap = base.desaturated_hair_cap.unwrap_or(DesaturatedHairCap {
            max_saturation: 10.0,
            max_brightness: 90.0,
        });
        let cap_enabled = param_bool(
            params,
            "desaturated_hair_cap",
            base.desaturated_hair_cap.is_some(),
        )?;
        let desaturated_hair_cap = if cap_enabled {
            Some(DesaturatedHairCap {
                max_saturation: param_f64(
                    params,
                    "hair_saturation_dynamic_min",
                    base_cap.max_saturation,
                )?,
                max_brightness: param_f64(
                    params,
                    "hair_brightness_dynamic_max",
                    base_cap.max_brightness,
                )?,
            })
        } else {
            None
        };

        let config = Self {
            min_perceived_brightness: param_f64(
                params,
                "min_perceived_brightness",
                base.min_perceived_brightness,
            )?,
            max_perceived_brightness: param_f64(
                params,
                "max_perceived_brightness",
                base.max_perceived_brightness,
            )?,
            body_and_hair_hue_distance: param_f64(
                params,
                "body_and_hair_hue_distance",
                base.body_and_hair_hue_distance,
            )?,
            min_total_saturation: param_f64(
                params,
                "min_total_saturation",
                base.min_total_saturation,
            )?,
            min_total_brightness: param_f64(
                params,
                "min_total_brightness",
                base.min_total_brightness,
            )?,
            min_hair_brightness: param_f64(
                params,
                "min_hair_brightness",
                base.min_hair_brightness,
            )?,
            shadow_opacity: ShadowOpacity {
                min: param_f64(params, "min_shadow_opacity", base.shadow_opacity.min)?,
                max: param_f64(params, "max_shadow_opacity", base.shadow_opacity.max)?,
            },
            weights: LuminanceWeights {
                red: param_f64(params, "red_pb_multiplier", base.weights.red)?,
                green: param_f64(params, "green_pb_multiplier", base.weights.green)?,
                blue: param_f64(params, "blue_pb_multiplier", base.weights.blue)?,
            },
            desaturated_hair_cap,
            light_to_dark_switch_point: param_f64(
                params,
                "light_to_dark_switch_point",
                base.light_to_dark_switch_point,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects internally inconsistent configurations.
    pub fn validate(&self) -> Result<(), ColorPairError> {
        check_range(
            "min_perceived_brightness",
            self.min_perceived_brightness,
            0.0,
            100.0,
        )?;
        check_range(
            "max_perceived_brightness",
            self.max_perceived_brightness,
            0.0,
            100.0,
        )?;
        if self.min_perceived_brightness > self.max_perceived_brightness {
            return Err(ColorPairError::InvalidConfig(format!(
                "min_perceived_brightness ({}) exceeds max_perceived_brightness ({})",
                self.min_perceived_brightness, self.max_perceived_brightness
            )));
        }
        check_range(
            "body_and_hair_hue_distance",
            self.body_and_hair_hue_distance,
            0.0,
            180.0,
        )?;
        check_range("min_total_saturation", self.min_total_saturation, 0.0, 200.0)?;
        check_range("min_total_brightness", self.min_total_brightness, 0.0, 200.0)?;
        check_range("min_hair_brightness", self.min_hair_brightness, 0.0, 100.0)?;

        check_range("shadow_opacity.min", self.shadow_opacity.min, 0.0, 1.0)?;
        check_range("shadow_opacity.max", self.shadow_opacity.max, 0.0, 1.0)?;
        if self.shadow_opacity.min > self.shadow_opacity.max {
            return Err(ColorPairError::InvalidConfig(format!(
                "shadow_opacity.min ({}) exceeds shadow_opacity.max ({})",
                self.shadow_opacity.min, self.shadow_opacity.max
            )));
        }

        self.weights.validate()?;

        if let Some(cap) = self.desaturated_hair_cap {
            check_range(
                "desaturated_hair_cap.max_saturation",
                cap.max_saturation,
                0.0,
                100.0,
            )?;
            check_range(
                "desaturated_hair_cap.max_brightness",
                cap.max_brightness,
                0.0,
                100.0,
            )?;
            if self.min_hair_brightness > cap.max_brightness {
                return Err(ColorPairError::InvalidConfig(format!(
                    "min_hair_brightness ({}) exceeds desaturated_hair_cap.max_brightness ({})",
                    self.min_hair_brightness, cap.max_brightness
                )));
            }
        }

        check_range(
            "light_to_dark_switch_point",
            self.light_to_dark_switch_point,
            0.0,
            100.0,
        )
    }

    /// Body perceived-brightness floor on the [0, 255] scale.
    pub fn min_perceived_brightness_255(&self) -> f64 {
        percent_to_255(self.min_perceived_brightness)
    }

    /// Body perceived-brightness ceiling on the [0, 255] scale.
    pub fn max_perceived_brightness_255(&self) -> f64 {
        percent_to_255(self.max_perceived_brightness)
    }

    /// Shadow opacity for a color: darker colors get stronger shadows,
    /// interpolating linearly from `max` (black) to `min` (full brightness).
    pub fn shadow_opacity(&self, color: &Color) -> f64 {
        let darkness = (1.0 - color.perceived_brightness / 100.0).clamp(0.0, 1.0);
        self.shadow_opacity.min + darkness * (self.shadow_opacity.max - self.shadow_opacity.min)
    }

    /// Whether a color is dark enough that overlays on it should switch to
    /// their light variants.
    pub fn is_dark(&self, color: &Color) -> bool {
        color.perceived_brightness < self.light_to_dark_switch_point
    }
}
