//! Body and hair color samplers.
//!
//! The body color is sampled first: red and green uniformly, then blue from
//! the interval that keeps perceived brightness inside the configured range.
//! The hair color is then sampled in HSB relative to the body: hue around
//! the body's complement, saturation and brightness topping up the body's
//! values to the configured totals.
//!
//! Draw order is fixed (body red, green, blue; hair hue, saturation,
//! brightness), so a replayed sequence of six draws reproduces a pair.

use crate::brightness::BlueBounds;
use crate::color::{normalize_hue, Color, Hsb, Rgb};
use crate::config::PairConfig;
use crate::error::ColorPairError;
use crate::prng::{RandomSource, Xorshift64};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// A sampled body color and the hair color chosen to go with it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorPair {
    pub body: Color,
    pub hair: Color,
}

impl ColorPair {
    /// Circular distance between the hair hue and the body's complementary
    /// hue. Never exceeds the configured `body_and_hair_hue_distance`.
    pub fn hue_distance(&self) -> f64 {
        hue_distance(self.hair.hsb.h, self.body.hsb.h + 180.0)
    }
}

/// Circular (mod 360) angular distance between two hues, in [0, 180].
pub fn hue_distance(a: f64, b: f64) -> f64 {
    let d = normalize_hue(a - b);
    d.min(360.0 - d)
}

/// Samples a body color whose perceived brightness lies within the
/// configured range whenever red and green leave room for it.
pub fn sample_body<R: RandomSource + ?Sized>(config: &PairConfig, rng: &mut R) -> Color {
    let red = rng.next_channel();
    let green = rng.next_channel();

    let bounds = config.weights.blue_bounds(
        red,
        green,
        config.min_perceived_brightness_255(),
        config.max_perceived_brightness_255(),
    );
    if bounds.ceiling_exceeded {
        debug!(
            "red {red} and green {green} exceed the perceived brightness ceiling; blue pinned to {}",
            bounds.upper
        );
    }
    if bounds.collapsed {
        debug!(
            "blue interval for red {red}, green {green} collapsed onto {}",
            bounds.upper
        );
    }

    let blue = round_blue(rng.next_range(bounds.lower, bounds.upper), &bounds);
    let color = Color::from_rgb(Rgb::new(red, green, blue), &config.weights);
    trace!(
        "body {} hsb=({:.2}, {:.2}, {:.2}) pb={:.2}",
        color.to_hex(),
        color.hsb.h,
        color.hsb.s,
        color.hsb.b,
        color.perceived_brightness
    );
    color
}

/// Rounds a continuous blue draw to a channel value, staying inside the
/// integer part of the feasible interval when it has one.
fn round_blue(draw: f64, bounds: &BlueBounds) -> u8 {
    let lo = bounds.lower.ceil();
    let hi = bounds.upper.floor();
    let rounded = draw.round();
    let blue = if lo <= hi {
        rounded.clamp(lo, hi)
    } else {
        rounded
    };
    blue.clamp(0.0, 255.0) as u8
}

/// Samples a hair color constrained by the body's HSB values.
pub fn sample_hair<R: RandomSource + ?Sized>(
    config: &PairConfig,
    body: &Hsb,
    rng: &mut R,
) -> Color {
    let spread = config.body_and_hair_hue_distance;
    let complement = body.h - 180.0;
    let hue = normalize_hue(rng.next_range(complement - spread, complement + spread));

    let min_saturation = (config.min_total_saturation - body.s).clamp(0.0, 100.0);
    let saturation = rng.next_range(min_saturation, 100.0);

    let ceiling = match config.desaturated_hair_cap {
        Some(cap) if saturation <= cap.max_saturation => cap.max_brightness,
        _ => 100.0,
    };
    let wanted = (config.min_total_brightness - body.b).max(config.min_hair_brightness);
    if wanted > ceiling {
        debug!("hair brightness floor {wanted:.2} exceeds ceiling {ceiling}; pinned to ceiling");
    }
    let brightness = rng.next_range(wanted.min(ceiling), ceiling);

    let color = Color::from_hsb(
        Hsb {
            h: hue,
            s: saturation,
            b: brightness,
        },
        &config.weights,
    );
    trace!(
        "hair {} hsb=({:.2}, {:.2}, {:.2}) pb={:.2}",
        color.to_hex(),
        color.hsb.h,
        color.hsb.s,
        color.hsb.b,
        color.perceived_brightness
    );
    color
}

/// Samples a body color and a matching hair color.
pub fn generate_color_pair<R: RandomSource + ?Sized>(
    config: &PairConfig,
    rng: &mut R,
) -> ColorPair {
    let body = sample_body(config, rng);
    let hair = sample_hair(config, &body.hsb, rng);
    ColorPair { body, hair }
}

/// Generates a pair from a hex entropy string (e.g. a hash digest), so the
/// same identifier always maps to the same colors.
pub fn generate_from_entropy(
    config: &PairConfig,
    entropy: &str,
) -> Result<ColorPair, ColorPairError> {
    let mut rng = Xorshift64::from_entropy(entropy)?;
    Ok(generate_color_pair(config, &mut rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DesaturatedHairCap, Preset};
    use crate::prng::SequenceSource;

    const EPSILON: f64 = 1e-9;

    /// Draw that `next_channel` maps to exactly `c`.
    fn channel_draw(c: u8) -> f64 {
        (c as f64 + 0.5) / 256.0
    }

    fn seq(draws: &[f64]) -> SequenceSource {
        SequenceSource::new(draws.to_vec()).unwrap()
    }

    // -- Body --

    #[test]
    fn body_uses_drawn_red_and_green() {
        let config = PairConfig::default();
        let mut rng = seq(&[channel_draw(200), channel_draw(150), 0.5]);
        let body = sample_body(&config, &mut rng);
        assert_eq!(body.rgb.r, 200);
        assert_eq!(body.rgb.g, 150);
        assert_eq!(rng.consumed(), 3);
    }

    #[test]
    fn body_red_200_green_150_stays_under_ceiling() {
        let config = PairConfig::default();
        for top in [0.0, 0.5, 1.0] {
            let mut rng = seq(&[channel_draw(200), channel_draw(150), top]);
            let body = sample_body(&config, &mut rng);
            assert!(body.perceived_brightness_255 <= config.max_perceived_brightness_255());
            assert!(body.perceived_brightness >= config.min_perceived_brightness);
        }
    }

    #[test]
    fn dark_red_and_green_push_blue_up_to_the_floor() {
        let config = PairConfig::default();
        let mut rng = seq(&[0.0, 0.0, 0.0]);
        let body = sample_body(&config, &mut rng);
        assert_eq!(body.rgb.r, 0);
        assert_eq!(body.rgb.g, 0);
        assert!(body.rgb.b >= 147, "blue {}", body.rgb.b);
        assert!(body.perceived_brightness + EPSILON >= config.min_perceived_brightness);
    }

    #[test]
    fn red_and_green_above_ceiling_pin_blue_to_zero() {
        let config = PairConfig::default();
        let mut rng = seq(&[channel_draw(255), channel_draw(255), 0.7]);
        let body = sample_body(&config, &mut rng);
        assert_eq!(body.rgb, Rgb::new(255, 255, 0));
    }

    #[test]
    fn body_hsb_matches_rgb() {
        let config = PairConfig::default();
        let mut rng = Xorshift64::new(1234);
        let body = sample_body(&config, &mut rng);
        assert_eq!(crate::color::hsb_to_rgb(body.hsb), body.rgb);
    }

    #[test]
    fn round_blue_respects_integer_interval() {
        let bounds = BlueBounds {
            lower: 10.2,
            upper: 20.7,
            ceiling_exceeded: false,
            collapsed: false,
        };
        assert_eq!(round_blue(10.2, &bounds), 11);
        assert_eq!(round_blue(20.69, &bounds), 20);
        assert_eq!(round_blue(15.4, &bounds), 15);
    }

    // -- Hair --

    #[test]
    fn body_hue_zero_wraps_hair_hue_into_range() {
        let config = PairConfig::default();
        let body = Hsb {
            h: 0.0,
            s: 50.0,
            b: 50.0,
        };
        for draw in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let mut rng = seq(&[draw, 0.5, 0.5]);
            let hair = sample_hair(&config, &body, &mut rng);
            assert!((0.0..360.0).contains(&hair.hsb.h), "hue {}", hair.hsb.h);
            assert!(
                hue_distance(hair.hsb.h, 180.0) <= 90.0 + EPSILON,
                "hue {} too far from 180",
                hair.hsb.h
            );
        }
    }

    #[test]
    fn lowest_hue_draw_lands_on_spread_edge() {
        let config = PairConfig::default();
        let body = Hsb {
            h: 0.0,
            s: 50.0,
            b: 50.0,
        };
        let mut rng = seq(&[0.0, 0.5, 0.5]);
        let hair = sample_hair(&config, &body, &mut rng);
        // -270 wraps to 90
        assert!((hair.hsb.h - 90.0).abs() < EPSILON, "hue {}", hair.hsb.h);
    }

    #[test]
    fn hair_saturation_tops_up_body_saturation() {
        let config = PairConfig::default();
        let body = Hsb {
            h: 120.0,
            s: 20.0,
            b: 80.0,
        };
        let mut rng = seq(&[0.5, 0.0, 0.5]);
        let hair = sample_hair(&config, &body, &mut rng);
        assert!((hair.hsb.s - 40.0).abs() < EPSILON, "s {}", hair.hsb.s);
    }

    #[test]
    fn saturated_body_allows_any_hair_saturation() {
        let config = PairConfig::default();
        let body = Hsb {
            h: 120.0,
            s: 90.0,
            b: 80.0,
        };
        let mut rng = seq(&[0.5, 0.0, 0.5]);
        let hair = sample_hair(&config, &body, &mut rng);
        assert_eq!(hair.hsb.s, 0.0);
    }

    #[test]
    fn unreachable_saturation_total_pins_hair_at_100() {
        let config = PairConfig {
            min_total_saturation: 160.0,
            ..PairConfig::default()
        };
        let body = Hsb {
            h: 10.0,
            s: 0.0,
            b: 70.0,
        };
        let mut rng = seq(&[0.5, 0.3, 0.5]);
        let hair = sample_hair(&config, &body, &mut rng);
        assert_eq!(hair.hsb.s, 100.0);
    }

    #[test]
    fn dark_body_pins_hair_brightness_at_100() {
        let config = PairConfig::default();
        let body = Hsb {
            h: 10.0,
            s: 50.0,
            b: 10.0,
        };
        let mut rng = seq(&[0.5, 0.5, 0.3]);
        let hair = sample_hair(&config, &body, &mut rng);
        assert_eq!(hair.hsb.b, 100.0);
    }

    #[test]
    fn bright_body_still_respects_hair_floor() {
        let config = PairConfig::default();
        let body = Hsb {
            h: 10.0,
            s: 50.0,
            b: 100.0,
        };
        let mut rng = seq(&[0.5, 0.5, 0.0]);
        let hair = sample_hair(&config, &body, &mut rng);
        assert!((hair.hsb.b - config.min_hair_brightness).abs() < EPSILON);
    }

    #[test]
    fn desaturated_hair_is_capped_below_full_brightness() {
        let config = Preset::Server.config();
        let body = Hsb {
            h: 200.0,
            s: 80.0,
            b: 90.0,
        };
        // saturation draw 0 -> 0 (body already saturated), brightness 40 + 0.9 * 50.
        let mut rng = seq(&[0.5, 0.0, 0.9]);
        let hair = sample_hair(&config, &body, &mut rng);
        assert!(hair.hsb.s <= 10.0);
        assert!((hair.hsb.b - 85.0).abs() < EPSILON, "b {}", hair.hsb.b);
        assert!(hair.hsb.b >= config.min_hair_brightness);
    }

    #[test]
    fn saturated_hair_ignores_desaturated_cap() {
        let config = PairConfig {
            desaturated_hair_cap: Some(DesaturatedHairCap {
                max_saturation: 10.0,
                max_brightness: 50.0,
            }),
            ..PairConfig::default()
        };
        let body = Hsb {
            h: 200.0,
            s: 80.0,
            b: 90.0,
        };
        let mut rng = seq(&[0.5, 0.9, 0.9]);
        let hair = sample_hair(&config, &body, &mut rng);
        assert!(hair.hsb.s > 10.0);
        assert!(hair.hsb.b > 50.0);
    }

    #[test]
    fn hair_rgb_is_conversion_of_drawn_hsb() {
        let config = PairConfig::default();
        let body = Hsb {
            h: 45.0,
            s: 30.0,
            b: 60.0,
        };
        let mut rng = Xorshift64::new(77);
        let hair = sample_hair(&config, &body, &mut rng);
        assert_eq!(hair.rgb, crate::color::hsb_to_rgb(hair.hsb));
        let expected = config.weights.perceived_brightness(hair.rgb);
        assert!((hair.perceived_brightness - expected).abs() < EPSILON);
    }

    // -- Pipeline --

    #[test]
    fn pipeline_consumes_six_draws() {
        let config = PairConfig::default();
        let mut rng = seq(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
        generate_color_pair(&config, &mut rng);
        assert_eq!(rng.consumed(), 6);
    }

    #[test]
    fn same_seed_gives_bit_identical_pairs() {
        let config = PairConfig::default();
        let a = generate_color_pair(&config, &mut Xorshift64::new(42));
        let b = generate_color_pair(&config, &mut Xorshift64::new(42));
        assert_eq!(a, b);
        assert_eq!(a.hair.hsb.h.to_bits(), b.hair.hsb.h.to_bits());
        assert_eq!(
            a.body.perceived_brightness.to_bits(),
            b.body.perceived_brightness.to_bits()
        );
    }

    #[test]
    fn same_sequence_gives_identical_pairs() {
        let config = Preset::Server.config();
        let draws = [0.9, 0.05, 0.33, 0.71, 0.12, 0.58];
        let a = generate_color_pair(&config, &mut seq(&draws));
        let b = generate_color_pair(&config, &mut seq(&draws));
        assert_eq!(a, b);
    }

    #[test]
    fn entropy_maps_to_a_stable_pair() {
        let config = PairConfig::default();
        let a = generate_from_entropy(&config, "9f86d081884c7d65").unwrap();
        let b = generate_from_entropy(&config, "9f86d081884c7d65").unwrap();
        assert_eq!(a, b);
        assert!(generate_from_entropy(&config, "not hex").is_err());
    }

    #[test]
    fn pair_hue_distance_is_within_spread() {
        let config = PairConfig::default();
        let mut rng = Xorshift64::new(5);
        for _ in 0..500 {
            let pair = generate_color_pair(&config, &mut rng);
            assert!(pair.hue_distance() <= config.body_and_hair_hue_distance + EPSILON);
        }
    }

    #[test]
    fn hue_distance_is_circular() {
        assert!((hue_distance(350.0, 10.0) - 20.0).abs() < EPSILON);
        assert!((hue_distance(10.0, 350.0) - 20.0).abs() < EPSILON);
        assert!((hue_distance(0.0, 180.0) - 180.0).abs() < EPSILON);
        assert_eq!(hue_distance(42.0, 42.0), 0.0);
    }

    #[test]
    fn color_pair_json_round_trip() {
        let pair = generate_color_pair(&PairConfig::default(), &mut Xorshift64::new(8));
        let json = serde_json::to_string(&pair).unwrap();
        let restored: ColorPair = serde_json::from_str(&json).unwrap();
        assert_eq!(pair, restored);
    }

    #[test]
    fn color_pair_json_round_trip_is_bit_exact_across_seeds() {
        let config = Preset::Server.config();
        let mut rng = Xorshift64::new(2024);
        for i in 0..500 {
            let pair = generate_color_pair(&config, &mut rng);
            let json = serde_json::to_string(&pair).unwrap();
            let restored: ColorPair = serde_json::from_str(&json).unwrap();
            for (a, b) in [
                (pair.body.hsb.h, restored.body.hsb.h),
                (pair.body.hsb.s, restored.body.hsb.s),
                (pair.hair.hsb.h, restored.hair.hsb.h),
                (pair.hair.hsb.b, restored.hair.hsb.b),
                (pair.hair.perceived_brightness, restored.hair.perceived_brightness),
            ] {
                assert_eq!(a.to_bits(), b.to_bits(), "pair {i}: {a} vs {b}");
            }
            assert_eq!(pair, restored, "pair {i}");
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn hair_hue_within_spread_of_complement(
                body_h in 0.0_f64..360.0,
                spread in 0.0_f64..=180.0,
                draw in 0.0_f64..1.0,
            ) {
                let config = PairConfig {
                    body_and_hair_hue_distance: spread,
                    ..PairConfig::default()
                };
                let body = Hsb { h: body_h, s: 50.0, b: 50.0 };
                let mut rng = SequenceSource::new(vec![draw, 0.5, 0.5]).unwrap();
                let hair = sample_hair(&config, &body, &mut rng);
                prop_assert!((0.0..360.0).contains(&hair.hsb.h));
                prop_assert!(hue_distance(hair.hsb.h, body_h + 180.0) <= spread + 1e-9);
            }

            #[test]
            fn hair_constraints_hold_for_any_body(
                body_s in 0.0_f64..=100.0,
                body_b in 0.0_f64..=100.0,
                seed: u64,
            ) {
                for config in [Preset::Classic.config(), Preset::Server.config()] {
                    let body = Hsb { h: 0.0, s: body_s, b: body_b };
                    let hair = sample_hair(&config, &body, &mut Xorshift64::new(seed));
                    prop_assert!(
                        hair.hsb.s + body_s >= config.min_total_saturation - 1e-9
                            || hair.hsb.s == 100.0
                    );
                    prop_assert!(hair.hsb.b >= config.min_hair_brightness - 1e-9);
                    prop_assert!(hair.hsb.b <= 100.0);
                }
            }
        }
    }
}
