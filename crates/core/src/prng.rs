//! Random sources for the samplers.
//!
//! Every draw the samplers make goes through the [`RandomSource`] trait, so
//! callers can plug in the bundled [`Xorshift64`] PRNG, replay a fixed list
//! of draws with [`SequenceSource`], or (with the `rand` feature) adapt any
//! `rand` generator via [`RandRng`].

use crate::error::ColorPairError;
use serde::{Deserialize, Serialize};

/// A source of uniform draws in [0, 1).
///
/// Only `next_f64` is required; range helpers are derived from it so every
/// implementation maps draws to values identically.
pub trait RandomSource {
    /// Returns a uniformly distributed f64 in [0, 1).
    fn next_f64(&mut self) -> f64;

    /// Returns a uniformly distributed f64 in [min, max).
    ///
    /// When `min == max` the result is exactly `min`.
    fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Returns a uniformly distributed channel value in [0, 255].
    fn next_channel(&mut self) -> u8 {
        (self.next_f64() * 256.0).floor().clamp(0.0, 255.0) as u8
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Xorshift64 deterministic PRNG. Same seed always produces the same sequence.
///
/// Uses the standard shift parameters (13, 7, 17). Seed of 0 is replaced
/// with a non-zero fallback to avoid the all-zeros fixed point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Fallback seed used when the caller provides 0, which is a fixed point
    /// of the xorshift algorithm.
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new PRNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Creates a PRNG seeded from a hex entropy string such as a hash digest.
    ///
    /// See [`seed_from_entropy`].
    pub fn from_entropy(entropy: &str) -> Result<Self, ColorPairError> {
        seed_from_entropy(entropy).map(Self::new)
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}

impl RandomSource for Xorshift64 {
    /// Upper 53 bits of `next_u64()` divided by 2^53.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// Values are clamped into [0, 1) so a hand-written sequence can use `1.0`
/// to mean "the top of the range".
#[derive(Debug, Clone)]
pub struct SequenceSource {
    draws: Vec<f64>,
    pos: usize,
}

impl SequenceSource {
    /// Largest f64 strictly below 1.
    const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

    /// Creates a replay source. Requires at least one draw.
    pub fn new(draws: Vec<f64>) -> Result<Self, ColorPairError> {
        if draws.is_empty() {
            return Err(ColorPairError::InvalidSequence(
                "sequence source requires at least 1 draw".to_string(),
            ));
        }
        if let Some(bad) = draws.iter().find(|d| !d.is_finite()) {
            return Err(ColorPairError::InvalidSequence(format!(
                "sequence draws must be finite, got {bad}"
            )));
        }
        Ok(Self { draws, pos: 0 })
    }

    /// Number of draws consumed so far (including wrap-arounds).
    pub fn consumed(&self) -> usize {
        self.pos
    }
}

impl RandomSource for SequenceSource {
    fn next_f64(&mut self) -> f64 {
        let v = self.draws[self.pos % self.draws.len()];
        self.pos += 1;
        v.clamp(0.0, Self::BELOW_ONE)
    }
}

/// Derives a 64-bit seed from a hex entropy string.
///
/// Uses the first 16 hex digits (fewer if the string is shorter). Leading
/// and trailing whitespace is ignored.
pub fn seed_from_entropy(entropy: &str) -> Result<u64, ColorPairError> {
    let entropy = entropy.trim();
    if entropy.is_empty() {
        return Err(ColorPairError::InvalidEntropy(
            "entropy string is empty".to_string(),
        ));
    }
    let digits: String = entropy.chars().take(16).collect();
    u64::from_str_radix(&digits, 16)
        .map_err(|e| ColorPairError::InvalidEntropy(format!("{digits:?}: {e}")))
}

/// Adapts a `rand` generator into a [`RandomSource`].
#[cfg(feature = "rand")]
#[derive(Debug, Clone)]
pub struct RandRng<R>(pub R);

#[cfg(feature = "rand")]
impl<R: rand::RngCore> RandomSource for RandRng<R> {
    fn next_f64(&mut self) -> f64 {
        use rand::Rng;
        self.0.random::<f64>()
    }
}
