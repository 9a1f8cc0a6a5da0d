//! Cat Overlay - drifting cats and a hold-to-unlock celebration
//!
//! Core modules:
//! - `sim`: Platform-free simulation (cat physics, hold meter, particles, timers)
//! - `platform`: Rendering surface seam and the browser implementation
//! - `config`: Tunable constants with JSON overrides
//! - `error`: Configuration errors

pub mod config;
pub mod error;
pub mod platform;
pub mod sim;

pub use config::OverlayConfig;
pub use error::ConfigError;
pub use sim::Overlay;

/// Overlay configuration constants
pub mod consts {
    /// Cats alive after start-up
    pub const INITIAL_POPULATION: usize = 7;
    /// Top-up check spawns cats until at least this many are alive
    pub const POPULATION_FLOOR: usize = 6;
    /// Respawns are dropped once this many cats are alive
    pub const POPULATION_CAP: usize = 12;
    /// Interval between top-up checks (ms)
    pub const TOP_UP_INTERVAL_MS: f32 = 2500.0;

    /// Cat edge length range (px)
    pub const CAT_SIZE_MIN: f32 = 56.0;
    pub const CAT_SIZE_MAX: f32 = 96.0;
    /// Spawn inset on every side (px)
    pub const SPAWN_MARGIN: f32 = 8.0;
    /// Extra spawn inset at the bottom, reserved for the HUD (px)
    pub const CHROME_MARGIN: f32 = 120.0;
    /// Bounce inset on every side (px)
    pub const BOUNCE_MARGIN: f32 = 6.0;
    /// Initial speed range per axis (px/ms, symmetric)
    pub const SPAWN_SPEED_X: f32 = 0.12;
    pub const SPAWN_SPEED_Y: f32 = 0.08;
    /// Cat lifetime range (ms)
    pub const LIFETIME_MIN_MS: f32 = 8000.0;
    pub const LIFETIME_MAX_MS: f32 = 16000.0;
    /// Delay between expiry and respawn (ms)
    pub const RESPAWN_DELAY_MIN_MS: f32 = 600.0;
    pub const RESPAWN_DELAY_MAX_MS: f32 = 1600.0;

    /// Pointer pull: base fraction plus a per-cat step cycling over `ATTRACT_VARIANTS`
    pub const ATTRACT_BASE: f32 = 0.02;
    pub const ATTRACT_STEP: f32 = 0.01;
    pub const ATTRACT_VARIANTS: usize = 3;
    /// Velocity clamp after a pointer nudge (px/ms)
    pub const MAX_SPEED_X: f32 = 0.25;
    pub const MAX_SPEED_Y: f32 = 0.18;

    /// Progress gained per second of holding
    pub const HOLD_RATE: f32 = 0.9;
    /// Progress lost per second while idle
    pub const DECAY_RATE: f32 = 0.08;
    /// Progress needed at release to unlock (absorbs float error)
    pub const UNLOCK_THRESHOLD: f32 = 0.999;
    /// Haptic pulse on hold start (ms)
    pub const HOLD_HAPTIC_MS: u32 = 20;
    /// Jiggle phase speed (rad/s) and scale amplitude while holding
    pub const JIGGLE_RATE: f32 = 8.0;
    pub const JIGGLE_AMPLITUDE: f32 = 0.03;

    /// Sparkle cadence while holding (ms)
    pub const SPARKLE_INTERVAL_MS: f32 = 110.0;
    /// Sparkle rise distance (px)
    pub const SPARKLE_RISE: f32 = 160.0;
    /// Sparkle removal timeout (ms), longer than any sparkle animation
    pub const SPARKLE_TTL_MS: f32 = 1600.0;
    pub const SPARKLE_DURATION_MIN_MS: f32 = 700.0;
    pub const SPARKLE_DURATION_MAX_MS: f32 = 1400.0;
    /// Sparkle opacity fade time (ms)
    pub const SPARKLE_FADE_MS: f32 = 1000.0;

    /// Banner display time (ms)
    pub const BANNER_MS: f32 = 1800.0;
    /// Confetti burst size
    pub const CONFETTI_COUNT: usize = 24;
    pub const CONFETTI_DURATION_MIN_MS: f32 = 800.0;
    pub const CONFETTI_DURATION_MAX_MS: f32 = 1700.0;
    /// Confetti lingers this long after its fall before removal (ms)
    pub const CONFETTI_LINGER_MS: f32 = 40.0;
    /// Glow flash lifetime (ms)
    pub const FLASH_MS: f32 = 700.0;
    pub const UNLOCK_PHRASE: &str = "Unlocked! Nice hold.";
    /// Click wiggle on an unlocked cat (ms) and its peak lift (px)
    pub const WIGGLE_MS: f32 = 300.0;
    pub const WIGGLE_LIFT: f32 = 8.0;

    /// Key code that charges the meter
    pub const CHARGE_KEY: &str = "Space";

    /// Cat body colours (0xRRGGBB)
    pub const CAT_COLORS: [u32; 5] = [0xff9e3b, 0xffd94d, 0x7be495, 0x7bdff7, 0xb497ff];
    pub const SPARKLE_GLYPHS: [char; 4] = ['✨', '•', '✦', '✺'];
    pub const CONFETTI_GLYPHS: [char; 4] = ['🎉', '✨', '🌟', '💫'];
}

/// Shift every channel of a 0xRRGGBB colour by `amount`, saturating at 0 and 255
#[inline]
pub fn shade(color: u32, amount: i32) -> u32 {
    let channel = |shift: u32| ((((color >> shift) & 0xff) as i32) + amount).clamp(0, 255) as u32;
    (channel(16) << 16) | (channel(8) << 8) | channel(0)
}

/// Format a 0xRRGGBB colour as `#rrggbb`
#[inline]
pub fn css_hex(color: u32) -> String {
    format!("#{:06x}", color & 0x00ff_ffff)
}

/// Ease-out cubic on [0, 1]
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shade_darkens_and_saturates() {
        assert_eq!(shade(0xff9e3b, -12), 0xf3922f);
        assert_eq!(shade(0x050505, -12), 0x000000);
        assert_eq!(shade(0xfafafa, 12), 0xffffff);
    }

    #[test]
    fn css_hex_pads() {
        assert_eq!(css_hex(0x00ff00), "#00ff00");
        assert_eq!(css_hex(0x7bdff7), "#7bdff7");
    }

    #[test]
    fn ease_is_clamped() {
        assert_eq!(ease_out_cubic(-1.0), 0.0);
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(2.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
    }
}
