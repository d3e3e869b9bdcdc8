#![deny(unsafe_code)]
//! Constrained random color pairs for character and sprite generators.
//!
//! [`generate_color_pair`] samples a body color within a perceived-brightness
//! range, then a hair color whose hue sits around the body's complement and
//! whose saturation and brightness top up the body's to configured totals.
//! Constants live in [`PairConfig`] (with [`Preset`]s for the two shipped
//! tunings); randomness comes from any [`RandomSource`], such as the
//! seedable [`Xorshift64`].

pub mod brightness;
pub mod color;
pub mod config;
pub mod error;
pub mod params;
pub mod prng;
pub mod sampler;

pub use brightness::LuminanceWeights;
pub use color::{Color, Hsb, Rgb};
pub use config::{DesaturatedHairCap, PairConfig, Preset, ShadowOpacity};
pub use error::ColorPairError;
pub use prng::{RandomSource, SequenceSource, Xorshift64};
pub use sampler::{generate_color_pair, generate_from_entropy, ColorPair};

#[cfg(feature = "rand")]
pub use prng::RandRng;
