//! Overlay state and the events it reports to the page
//!
//! Everything the overlay mutates lives in one owned context. Nothing here is
//! persisted; the state lasts for one page session.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::celebration::Celebration;
use super::entity::{Bounds, Cat};
use super::hold::HoldMeter;
use super::particles::{Particle, ParticleSet};
use super::pool::CatPool;
use super::timers::{Task, TimerQueue};
use crate::config::OverlayConfig;

/// Changes the presentation layer must mirror
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEvent {
    CatSpawned(u32),
    CatRemoved(u32),
    ParticleSpawned(u32),
    ParticleRemoved(u32),
    /// Locked/holding/unlocked changed
    ModeChanged,
    BannerShown,
    BannerHidden,
    FlashShown,
    FlashHidden,
    /// Best-effort haptic pulse (ms)
    Vibrate(u32),
    /// Best-effort spoken phrase
    Speak(String),
}

/// Complete overlay state
#[derive(Debug, Clone)]
pub struct OverlayState {
    pub config: OverlayConfig,
    /// Interactive area (page coordinates); `None` while the element is missing
    pub area: Option<Bounds>,
    /// Visible viewport for fixed-position effects
    pub viewport: Option<Bounds>,
    pub rng: Pcg32,
    pub pool: CatPool,
    pub hold: HoldMeter,
    pub particles: ParticleSet,
    pub celebration: Celebration,
    /// Jiggle oscillator phase (radians)
    pub jiggle_phase: f32,
    /// Timestamp of the latest frame (ms)
    pub now_ms: f64,
    events: Vec<OverlayEvent>,
    next_id: u32,
}

impl OverlayState {
    pub fn new(config: OverlayConfig, seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            pool: CatPool::new(
                config.initial_population,
                config.population_floor,
                config.population_cap,
            ),
            hold: HoldMeter::new(&config),
            particles: ParticleSet::default(),
            celebration: Celebration::default(),
            area: None,
            viewport: None,
            jiggle_phase: 0.0,
            now_ms: 0.0,
            events: Vec::new(),
            next_id: 1,
            config,
        }
    }

    /// Allocate a new entity ID (shared by cats and particles)
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_event(&mut self, event: OverlayEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<OverlayEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_area(&mut self, area: Option<Bounds>) {
        self.area = area.filter(Bounds::is_usable);
    }

    pub fn set_viewport(&mut self, viewport: Option<Bounds>) {
        self.viewport = viewport.filter(Bounds::is_usable);
    }

    /// Viewport, falling back to the interactive area
    pub fn viewport_or_area(&self) -> Option<Bounds> {
        self.viewport.or(self.area)
    }

    /// Spawn one cat and schedule its expiry. No area, no cat.
    pub fn spawn_cat(&mut self, timers: &mut TimerQueue, now_ms: f64) -> Option<u32> {
        let area = self.area?;
        let id = self.next_id;
        let cat = Cat::spawn(id, &mut self.rng, &area, &self.config, now_ms)?;
        self.next_id += 1;
        timers.schedule(now_ms, cat.lifetime_ms, Task::ExpireCat(id));
        log::debug!("Cat {} spawned ({} alive)", id, self.pool.len() + 1);
        self.pool.insert(cat);
        self.push_event(OverlayEvent::CatSpawned(id));
        Some(id)
    }

    /// Remove a cat if it is still alive
    pub fn remove_cat(&mut self, id: u32) -> bool {
        if self.pool.remove(id).is_some() {
            log::debug!("Cat {} removed ({} alive)", id, self.pool.len());
            self.push_event(OverlayEvent::CatRemoved(id));
            true
        } else {
            false
        }
    }

    /// Spawn one hold sparkle and schedule its removal
    pub fn spawn_sparkle(&mut self, timers: &mut TimerQueue, now_ms: f64) -> Option<u32> {
        let viewport = self.viewport_or_area()?;
        let id = self.next_entity_id();
        let sparkle = Particle::sparkle(id, &mut self.rng, &viewport, &self.config, now_ms);
        timers.schedule(now_ms, sparkle.ttl_ms, Task::RemoveParticle(id));
        self.particles.insert(sparkle);
        self.push_event(OverlayEvent::ParticleSpawned(id));
        Some(id)
    }

    /// Remove a particle if it is still alive
    pub fn remove_particle(&mut self, id: u32) -> bool {
        if self.particles.remove(id).is_some() {
            self.push_event(OverlayEvent::ParticleRemoved(id));
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_across_kinds() {
        let mut state = OverlayState::new(OverlayConfig::default(), 1);
        state.set_area(Some(Bounds::from_size(800.0, 600.0)));
        let mut timers = TimerQueue::new();
        let cat = state.spawn_cat(&mut timers, 0.0).expect("cat");
        let sparkle = state.spawn_sparkle(&mut timers, 0.0).expect("sparkle");
        assert_ne!(cat, sparkle);
        assert_eq!(timers.len(), 2);
    }

    #[test]
    fn missing_area_spawns_nothing() {
        let mut state = OverlayState::new(OverlayConfig::default(), 1);
        let mut timers = TimerQueue::new();
        assert!(state.spawn_cat(&mut timers, 0.0).is_none());
        assert!(state.spawn_sparkle(&mut timers, 0.0).is_none());
        assert!(timers.is_empty());
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn unusable_area_is_treated_as_missing() {
        let mut state = OverlayState::new(OverlayConfig::default(), 1);
        state.set_area(Some(Bounds::from_size(0.0, 400.0)));
        assert!(state.area.is_none());
    }

    #[test]
    fn removal_reports_once() {
        let mut state = OverlayState::new(OverlayConfig::default(), 2);
        state.set_area(Some(Bounds::from_size(800.0, 600.0)));
        let mut timers = TimerQueue::new();
        let id = state.spawn_cat(&mut timers, 0.0).expect("cat");
        state.drain_events();
        assert!(state.remove_cat(id));
        assert!(!state.remove_cat(id));
        assert_eq!(state.drain_events(), vec![OverlayEvent::CatRemoved(id)]);
    }
}
