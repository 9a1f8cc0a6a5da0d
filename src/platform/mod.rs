//! Platform abstraction layer
//!
//! The simulation never touches the page. A [`Surface`] stands for the
//! rendering side: it reports the area rectangle, holds one visual node per
//! cat and particle, and carries the optional haptic/speech capabilities.
//! [`present`] mirrors the overlay onto a surface once per frame.

#[cfg(target_arch = "wasm32")]
pub mod web;

use glam::Vec2;

use crate::sim::{Bounds, Cat, Overlay, OverlayEvent, OverlayMode, Particle, ParticlePose};

/// Rendering side of the overlay.
///
/// Implementations must tolerate missing elements and unknown ids: every
/// method is a no-op when there is nothing to act on.
pub trait Surface {
    /// Interactive area in page coordinates, `None` while it is missing
    fn area(&self) -> Option<Bounds>;

    /// Visible viewport for fixed-position effects
    fn viewport(&self) -> Option<Bounds> {
        self.area()
    }

    fn attach_cat(&mut self, cat: &Cat);
    fn place_cat(&mut self, id: u32, pos: Vec2, scale: f32);
    fn detach_cat(&mut self, id: u32);

    fn attach_particle(&mut self, particle: &Particle);
    fn place_particle(&mut self, id: u32, pose: &ParticlePose);
    fn detach_particle(&mut self, id: u32);

    /// Progress indicator width in whole percent
    fn set_fill(&mut self, percent: u32);
    /// Reflect locked/holding/unlocked as page classes
    fn set_mode(&mut self, mode: OverlayMode);
    fn set_banner(&mut self, visible: bool);
    fn set_flash(&mut self, visible: bool);

    /// Optional haptic capability
    fn vibrate(&mut self, _ms: u32) {}
    /// Optional speech capability
    fn speak(&mut self, _phrase: &str) {}
}

/// Apply pending overlay events to `surface`, then sync positions and the meter
pub fn present<S: Surface + ?Sized>(overlay: &mut Overlay, surface: &mut S) {
    let events = overlay.drain_events();
    let state = overlay.state();

    for event in events {
        match event {
            OverlayEvent::CatSpawned(id) => {
                // A cat spawned and removed within one batch never reaches the page
                if let Some(cat) = state.pool.get(id) {
                    surface.attach_cat(cat);
                }
            }
            OverlayEvent::CatRemoved(id) => surface.detach_cat(id),
            OverlayEvent::ParticleSpawned(id) => {
                if let Some(particle) = state.particles.get(id) {
                    surface.attach_particle(particle);
                }
            }
            OverlayEvent::ParticleRemoved(id) => surface.detach_particle(id),
            OverlayEvent::ModeChanged => surface.set_mode(state.hold.mode()),
            OverlayEvent::BannerShown => surface.set_banner(true),
            OverlayEvent::BannerHidden => surface.set_banner(false),
            OverlayEvent::FlashShown => surface.set_flash(true),
            OverlayEvent::FlashHidden => surface.set_flash(false),
            OverlayEvent::Vibrate(ms) => surface.vibrate(ms),
            OverlayEvent::Speak(phrase) => surface.speak(&phrase),
        }
    }

    let config = &state.config;
    for cat in state.pool.iter() {
        let lift = cat.wiggle_offset(state.now_ms, config.wiggle_ms, config.wiggle_lift);
        surface.place_cat(cat.id, cat.pos + Vec2::new(0.0, lift), cat.scale);
    }
    for particle in state.particles.iter() {
        surface.place_particle(particle.id, &particle.pose(state.now_ms));
    }
    surface.set_fill(state.hold.fill_percent());
}

/// Pull the surface rectangles into the overlay
pub fn sync_bounds<S: Surface + ?Sized>(overlay: &mut Overlay, surface: &S) {
    overlay.set_surface_bounds(surface.area(), surface.viewport());
}
