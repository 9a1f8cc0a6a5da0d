//! Unlock celebration: banner, confetti, glow flash and a spoken cue

use super::particles::Particle;
use super::state::{OverlayEvent, OverlayState};
use super::timers::{Task, TimerQueue};

/// Visibility of the celebration's one-off pieces
#[derive(Debug, Clone, Default)]
pub struct Celebration {
    pub banner_visible: bool,
    pub flash_visible: bool,
    /// Times the sequence has run (at most once per unlock)
    pub runs: u32,
}

/// Fire the whole sequence at `now_ms`
pub fn celebrate(state: &mut OverlayState, timers: &mut TimerQueue, now_ms: f64) {
    state.celebration.runs += 1;
    log::info!("Unlocked! Celebration #{}", state.celebration.runs);

    state.celebration.banner_visible = true;
    state.push_event(OverlayEvent::BannerShown);
    timers.schedule(now_ms, f64::from(state.config.banner_ms), Task::HideBanner);

    let viewport = state.viewport_or_area();
    if let Some(viewport) = viewport {
        for _ in 0..state.config.confetti_count {
            let id = state.next_entity_id();
            let piece = Particle::confetti(id, &mut state.rng, &viewport, &state.config, now_ms);
            timers.schedule(now_ms, piece.ttl_ms, Task::RemoveParticle(id));
            state.particles.insert(piece);
            state.push_event(OverlayEvent::ParticleSpawned(id));
        }
    } else {
        log::debug!("No viewport, skipping confetti");
    }

    state.celebration.flash_visible = true;
    state.push_event(OverlayEvent::FlashShown);
    timers.schedule(now_ms, f64::from(state.config.flash_ms), Task::RemoveFlash);

    if state.config.speech {
        state.push_event(OverlayEvent::Speak(state.config.unlock_phrase.clone()));
    }
}

/// Banner timer fired
pub fn hide_banner(state: &mut OverlayState) {
    if std::mem::take(&mut state.celebration.banner_visible) {
        state.push_event(OverlayEvent::BannerHidden);
    }
}

/// Flash timer fired
pub fn remove_flash(state: &mut OverlayState) {
    if std::mem::take(&mut state.celebration.flash_visible) {
        state.push_event(OverlayEvent::FlashHidden);
    }
}
