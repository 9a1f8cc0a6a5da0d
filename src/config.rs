//! Overlay tuning
//!
//! Every constant the simulation reads lives here. `Default` yields the
//! values in [`crate::consts`]; a partial JSON document can override any field.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Closed range sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform sample; a degenerate span returns `min`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.random_range(self.min..=self.max)
        } else {
            self.min
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Finite, ordered, and with a finite width so sampling cannot overflow
    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min.is_finite() && self.min <= self.max && (self.max - self.min).is_finite() {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange {
                field,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Largest accepted speed component (px/ms)
const SPEED_LIMIT: f32 = 10.0;

/// Overlay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    // === Cat pool ===
    pub initial_population: usize,
    pub population_floor: usize,
    pub population_cap: usize,
    pub top_up_interval_ms: f32,
    pub cat_size: Span,
    pub spawn_margin: f32,
    /// Extra bottom inset kept free for the HUD
    pub chrome_margin: f32,
    pub bounce_margin: f32,
    /// Symmetric initial speed range per axis (px/ms)
    pub spawn_speed: Vec2,
    pub lifetime_ms: Span,
    pub respawn_delay_ms: Span,

    // === Pointer ===
    pub attract_base: f32,
    pub attract_step: f32,
    pub attract_variants: usize,
    /// Symmetric velocity clamp per axis (px/ms)
    pub max_speed: Vec2,

    // === Hold meter ===
    /// `KeyboardEvent.code` of the charge key
    pub charge_key: String,
    pub hold_rate: f32,
    pub decay_rate: f32,
    pub unlock_threshold: f32,
    pub hold_haptic_ms: u32,
    pub jiggle_rate: f32,
    pub jiggle_amplitude: f32,

    // === Sparkles ===
    pub sparkle_interval_ms: f32,
    pub sparkle_rise: f32,
    pub sparkle_ttl_ms: f32,
    pub sparkle_duration_ms: Span,
    pub sparkle_fade_ms: f32,

    // === Celebration ===
    pub banner_ms: f32,
    pub confetti_count: usize,
    pub confetti_duration_ms: Span,
    pub confetti_linger_ms: f32,
    pub flash_ms: f32,
    pub unlock_phrase: String,
    /// Click wiggle on an unlocked cat: duration (ms) and peak lift (px)
    pub wiggle_ms: f32,
    pub wiggle_lift: f32,
    /// Use the speech capability when present
    pub speech: bool,
    /// Use the haptic capability when present
    pub haptics: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            initial_population: INITIAL_POPULATION,
            population_floor: POPULATION_FLOOR,
            population_cap: POPULATION_CAP,
            top_up_interval_ms: TOP_UP_INTERVAL_MS,
            cat_size: Span::new(CAT_SIZE_MIN, CAT_SIZE_MAX),
            spawn_margin: SPAWN_MARGIN,
            chrome_margin: CHROME_MARGIN,
            bounce_margin: BOUNCE_MARGIN,
            spawn_speed: Vec2::new(SPAWN_SPEED_X, SPAWN_SPEED_Y),
            lifetime_ms: Span::new(LIFETIME_MIN_MS, LIFETIME_MAX_MS),
            respawn_delay_ms: Span::new(RESPAWN_DELAY_MIN_MS, RESPAWN_DELAY_MAX_MS),

            attract_base: ATTRACT_BASE,
            attract_step: ATTRACT_STEP,
            attract_variants: ATTRACT_VARIANTS,
            max_speed: Vec2::new(MAX_SPEED_X, MAX_SPEED_Y),

            charge_key: CHARGE_KEY.to_string(),
            hold_rate: HOLD_RATE,
            decay_rate: DECAY_RATE,
            unlock_threshold: UNLOCK_THRESHOLD,
            hold_haptic_ms: HOLD_HAPTIC_MS,
            jiggle_rate: JIGGLE_RATE,
            jiggle_amplitude: JIGGLE_AMPLITUDE,

            sparkle_interval_ms: SPARKLE_INTERVAL_MS,
            sparkle_rise: SPARKLE_RISE,
            sparkle_ttl_ms: SPARKLE_TTL_MS,
            sparkle_duration_ms: Span::new(SPARKLE_DURATION_MIN_MS, SPARKLE_DURATION_MAX_MS),
            sparkle_fade_ms: SPARKLE_FADE_MS,

            banner_ms: BANNER_MS,
            confetti_count: CONFETTI_COUNT,
            confetti_duration_ms: Span::new(CONFETTI_DURATION_MIN_MS, CONFETTI_DURATION_MAX_MS),
            confetti_linger_ms: CONFETTI_LINGER_MS,
            flash_ms: FLASH_MS,
            unlock_phrase: UNLOCK_PHRASE.to_string(),
            wiggle_ms: WIGGLE_MS,
            wiggle_lift: WIGGLE_LIFT,
            speech: true,
            haptics: true,
        }
    }
}

impl OverlayConfig {
    /// Parse a (possibly partial) JSON override and validate the result
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Whether a `KeyboardEvent.code` is the charge key
    pub fn is_charge_key(&self, code: &str) -> bool {
        code == self.charge_key
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cat_size.check("cat_size")?;
        self.lifetime_ms.check("lifetime_ms")?;
        self.respawn_delay_ms.check("respawn_delay_ms")?;
        self.sparkle_duration_ms.check("sparkle_duration_ms")?;
        self.confetti_duration_ms.check("confetti_duration_ms")?;

        if self.cat_size.min <= 0.0 {
            return Err(invalid("cat_size", "must be positive"));
        }
        // A zero lifetime would expire and respawn cats in the same pump forever
        if self.lifetime_ms.min <= 0.0 {
            return Err(invalid("lifetime_ms", "must be positive"));
        }
        for (field, span) in [
            ("respawn_delay_ms", self.respawn_delay_ms),
            ("sparkle_duration_ms", self.sparkle_duration_ms),
            ("confetti_duration_ms", self.confetti_duration_ms),
        ] {
            if span.min < 0.0 {
                return Err(invalid(field, "must not be negative"));
            }
        }
        if self.population_floor > self.population_cap {
            return Err(invalid("population_floor", "must not exceed population_cap"));
        }
        // Repeating timers with a zero period would never let the queue drain
        for (field, interval) in [
            ("top_up_interval_ms", self.top_up_interval_ms),
            ("sparkle_interval_ms", self.sparkle_interval_ms),
        ] {
            if !(interval.is_finite() && interval > 0.0) {
                return Err(invalid(field, "must be a positive number of milliseconds"));
            }
        }
        for (field, value) in [
            ("hold_rate", self.hold_rate),
            ("decay_rate", self.decay_rate),
            ("spawn_margin", self.spawn_margin),
            ("chrome_margin", self.chrome_margin),
            ("bounce_margin", self.bounce_margin),
            ("sparkle_ttl_ms", self.sparkle_ttl_ms),
            ("banner_ms", self.banner_ms),
            ("flash_ms", self.flash_ms),
            ("sparkle_fade_ms", self.sparkle_fade_ms),
            ("confetti_linger_ms", self.confetti_linger_ms),
            ("wiggle_ms", self.wiggle_ms),
            ("wiggle_lift", self.wiggle_lift),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, "must be a non-negative number"));
            }
        }
        if !(self.unlock_threshold > 0.0 && self.unlock_threshold <= 1.0) {
            return Err(invalid("unlock_threshold", "must lie in (0, 1]"));
        }
        if self.sparkle_ttl_ms < self.sparkle_duration_ms.max {
            return Err(invalid(
                "sparkle_ttl_ms",
                "must outlast the longest sparkle animation",
            ));
        }
        if self.attract_variants == 0 {
            return Err(invalid("attract_variants", "must be at least 1"));
        }
        for (field, speed) in [("max_speed", self.max_speed), ("spawn_speed", self.spawn_speed)] {
            if !(speed.min_element() >= 0.0 && speed.max_element() <= SPEED_LIMIT) {
                return Err(invalid(field, "must lie in [0, 10] px/ms"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::InvalidValue { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn default_is_valid() {
        assert!(OverlayConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = OverlayConfig::from_json(r#"{ "hold_rate": 0.5, "confetti_count": 10 }"#)
            .expect("valid override");
        assert_eq!(config.hold_rate, 0.5);
        assert_eq!(config.confetti_count, 10);
        assert_eq!(config.decay_rate, DECAY_RATE);
        assert_eq!(config.charge_key, "Space");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = OverlayConfig::from_json("{ hold_rate: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = OverlayConfig::from_json(r#"{ "cat_size": { "min": 90, "max": 50 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidRange {
                field: "cat_size",
                ..
            }
        ));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = OverlayConfig {
            sparkle_interval_ms: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "sparkle_interval_ms",
                ..
            })
        ));
    }

    #[test]
    fn huge_spawn_speed_is_rejected() {
        let err = OverlayConfig::from_json(r#"{ "spawn_speed": [3e38, 0.08] }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "spawn_speed",
                ..
            }
        ));
        assert!(OverlayConfig::from_json(r#"{ "max_speed": [0.25, 1e30] }"#).is_err());
    }

    #[test]
    fn range_wider_than_f32_is_rejected() {
        let err = OverlayConfig::from_json(r#"{ "lifetime_ms": { "min": -3e38, "max": 3e38 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidRange {
                field: "lifetime_ms",
                ..
            }
        ));
    }

    #[test]
    fn zero_lifetime_is_rejected() {
        let err = OverlayConfig::from_json(r#"{ "lifetime_ms": { "min": 0, "max": 0 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "lifetime_ms",
                ..
            }
        ));
    }

    #[test]
    fn negative_delays_and_durations_are_rejected() {
        for (json, expected) in [
            (
                r#"{ "respawn_delay_ms": { "min": -50, "max": 0 } }"#,
                "respawn_delay_ms",
            ),
            (
                r#"{ "sparkle_duration_ms": { "min": -10, "max": 700 } }"#,
                "sparkle_duration_ms",
            ),
            (
                r#"{ "confetti_duration_ms": { "min": -1, "max": 800 } }"#,
                "confetti_duration_ms",
            ),
            (r#"{ "confetti_linger_ms": -5 }"#, "confetti_linger_ms"),
        ] {
            match OverlayConfig::from_json(json) {
                Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, expected),
                other => panic!("{} accepted: {:?}", json, other.map(|_| ())),
            }
        }
    }

    #[test]
    fn span_sampling_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        let span = Span::new(600.0, 1600.0);
        for _ in 0..500 {
            assert!(span.contains(span.sample(&mut rng)));
        }
        assert_eq!(Span::new(3.0, 3.0).sample(&mut rng), 3.0);
    }

    #[test]
    fn charge_key_matches_code() {
        let config = OverlayConfig::default();
        assert!(config.is_charge_key("Space"));
        assert!(!config.is_charge_key("Enter"));
    }
}
