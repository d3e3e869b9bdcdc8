//! Error types for color pair generation.
//!
//! Sampling itself never fails; every variant here is raised while building
//! or parsing inputs (configuration, presets, hex colors, entropy strings,
//! replay draw lists).

use thiserror::Error;

/// Errors produced while constructing inputs for the samplers.
#[derive(Debug, Error)]
pub enum ColorPairError {
    /// The configuration was internally inconsistent (bounds inverted,
    /// values out of range, unusable luminance weights).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A requested preset name was not recognized.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// An entropy string could not be turned into a PRNG seed.
    #[error("invalid entropy: {0}")]
    InvalidEntropy(String),

    /// A replay draw list was empty or held a non-finite value.
    #[error("invalid draw sequence: {0}")]
    InvalidSequence(String),
}
