//! Hold sparkles and celebration confetti
//!
//! Particles are fire-and-forget: each one animates from its origin toward a
//! fixed offset and is removed by its own timer, which always outlasts the
//! animation. Nothing else ever cancels a particle.

use glam::Vec2;
use rand::Rng;

use super::entity::Bounds;
use super::timers::{Task, TimerId, TimerQueue};
use crate::config::{OverlayConfig, Span};
use crate::consts::{CONFETTI_GLYPHS, SPARKLE_GLYPHS};
use crate::ease_out_cubic;

/// Stacking order of hold sparkles
pub const SPARKLE_LAYER: i32 = 120;
/// Stacking order of confetti
pub const CONFETTI_LAYER: i32 = 260;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Rises from the meter while holding
    Sparkle,
    /// Falls from above on unlock
    Confetti,
}

/// An ephemeral glyph
#[derive(Debug, Clone)]
pub struct Particle {
    pub id: u32,
    pub kind: ParticleKind,
    pub glyph: char,
    /// Viewport px (top-left of the glyph box, estimated from the font size
    /// when the particle is anchored to the bottom)
    pub origin: Vec2,
    /// Distance from the viewport bottom for bottom-anchored particles (px)
    pub bottom: Option<f32>,
    /// Displacement reached at the end of the animation
    pub target_offset: Vec2,
    /// Degrees at the start and end of the animation
    pub rotation: (f32, f32),
    /// Font size, px
    pub size: f32,
    pub opacity: (f32, f32),
    pub born_ms: f64,
    /// Motion duration
    pub duration_ms: f64,
    /// Opacity fade duration
    pub fade_ms: f64,
    /// Removal timeout (always >= duration)
    pub ttl_ms: f64,
}

/// Sampled transform of a particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticlePose {
    pub offset: Vec2,
    pub rotation_deg: f32,
    pub opacity: f32,
}

impl Particle {
    /// Rising sparkle near the horizontal centre of the viewport bottom
    pub fn sparkle<R: Rng + ?Sized>(
        id: u32,
        rng: &mut R,
        viewport: &Bounds,
        config: &OverlayConfig,
        now_ms: f64,
    ) -> Self {
        let size = Span::new(10.0, 28.0).sample(rng);
        let x = viewport.width() * Span::new(0.40, 0.60).sample(rng);
        let bottom = Span::new(18.0, 24.0).sample(rng);
        let duration = f64::from(config.sparkle_duration_ms.sample(rng));
        Self {
            id,
            kind: ParticleKind::Sparkle,
            glyph: SPARKLE_GLYPHS[rng.random_range(0..SPARKLE_GLYPHS.len())],
            origin: Vec2::new(x, viewport.height() - bottom - size),
            bottom: Some(bottom),
            target_offset: Vec2::new(0.0, -config.sparkle_rise),
            rotation: (0.0, Span::new(0.0, 360.0).sample(rng).round()),
            size,
            opacity: (0.95, 0.18),
            born_ms: now_ms,
            duration_ms: duration,
            fade_ms: f64::from(config.sparkle_fade_ms),
            ttl_ms: f64::from(config.sparkle_ttl_ms).max(duration),
        }
    }

    /// Confetti piece starting just above the viewport
    pub fn confetti<R: Rng + ?Sized>(
        id: u32,
        rng: &mut R,
        viewport: &Bounds,
        config: &OverlayConfig,
        now_ms: f64,
    ) -> Self {
        let duration = f64::from(config.confetti_duration_ms.sample(rng));
        let tilt = Span::new(0.0, 360.0).sample(rng).round();
        Self {
            id,
            kind: ParticleKind::Confetti,
            glyph: CONFETTI_GLYPHS[rng.random_range(0..CONFETTI_GLYPHS.len())],
            origin: Vec2::new(
                (viewport.width() * Span::new(0.0, 1.0).sample(rng)).round(),
                -0.04 * viewport.height(),
            ),
            bottom: None,
            target_offset: Vec2::new(0.0, 1.2 * viewport.height()),
            rotation: (tilt, tilt + 360.0),
            size: Span::new(12.0, 40.0).sample(rng),
            opacity: (Span::new(0.4, 0.9).sample(rng), 0.2),
            born_ms: now_ms,
            duration_ms: duration,
            fade_ms: duration,
            ttl_ms: duration + f64::from(config.confetti_linger_ms),
        }
    }

    pub fn layer(&self) -> i32 {
        match self.kind {
            ParticleKind::Sparkle => SPARKLE_LAYER,
            ParticleKind::Confetti => CONFETTI_LAYER,
        }
    }

    /// Pose at `now_ms`; holds the final pose once the animation is done
    pub fn pose(&self, now_ms: f64) -> ParticlePose {
        let age = (now_ms - self.born_ms).max(0.0);
        let motion = progress(age, self.duration_ms);
        let fade = progress(age, self.fade_ms);
        let eased = ease_out_cubic(motion);
        ParticlePose {
            offset: self.target_offset * eased,
            rotation_deg: self.rotation.0 + (self.rotation.1 - self.rotation.0) * eased,
            opacity: self.opacity.0 + (self.opacity.1 - self.opacity.0) * fade,
        }
    }
}

fn progress(age: f64, duration: f64) -> f32 {
    if duration > 0.0 {
        (age / duration).clamp(0.0, 1.0) as f32
    } else {
        1.0
    }
}

/// Live particles owned by the emitter and the celebration
#[derive(Debug, Clone, Default)]
pub struct ParticleSet {
    particles: Vec<Particle>,
}

impl ParticleSet {
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn insert(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Remove by id; already removed is a no-op
    pub fn remove(&mut self, id: u32) -> Option<Particle> {
        let idx = self.particles.iter().position(|p| p.id == id)?;
        Some(self.particles.remove(idx))
    }

    pub fn get(&self, id: u32) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn count(&self, kind: ParticleKind) -> usize {
        self.particles.iter().filter(|p| p.kind == kind).count()
    }

    pub fn drain_ids(&mut self) -> Vec<u32> {
        self.particles.drain(..).map(|p| p.id).collect()
    }
}

/// Fixed-cadence sparkle source while the key is held
#[derive(Debug, Clone)]
pub struct SparkleEmitter {
    interval_ms: f64,
    timer: Option<TimerId>,
}

impl SparkleEmitter {
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            interval_ms: f64::from(config.sparkle_interval_ms).max(1.0),
            timer: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Begin emitting; a running emitter keeps its cadence
    pub fn start(&mut self, timers: &mut TimerQueue, now_ms: f64) {
        if self.timer.is_none() {
            self.timer = Some(timers.schedule(now_ms, self.interval_ms, Task::EmitSparkle));
        }
    }

    /// Halt future emission; in-flight sparkles are left alone
    pub fn stop(&mut self, timers: &mut TimerQueue) {
        if let Some(id) = self.timer.take() {
            timers.cancel(id);
        }
    }

    /// Called when the cadence timer fires: schedules the next beat.
    ///
    /// Returns `false` for a stale beat from a stopped emitter.
    pub fn on_beat(&mut self, timers: &mut TimerQueue, fired_at_ms: f64) -> bool {
        if self.timer.is_none() {
            return false;
        }
        self.timer = Some(timers.schedule(fired_at_ms, self.interval_ms, Task::EmitSparkle));
        true
    }
}
