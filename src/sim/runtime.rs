//! Overlay runtime: the context every browser callback talks to
//!
//! Owns the state, the timer queue and the clocks. Frames, key edges,
//! pointer moves and timer pumps all arrive here with their own timestamps.

use glam::Vec2;

use super::attractor::attract;
use super::celebration::{celebrate, hide_banner, remove_flash};
use super::entity::Bounds;
use super::hold::Release;
use super::particles::SparkleEmitter;
use super::state::{OverlayEvent, OverlayState};
use super::tick::{FrameInput, frame, sanitize_dt};
use super::timers::{Task, TimerQueue};
use crate::config::OverlayConfig;

/// Upper bound on tasks run by one pump, so a bad clock cannot spin forever
const MAX_TASKS_PER_PUMP: usize = 4096;

pub struct Overlay {
    state: OverlayState,
    timers: TimerQueue,
    emitter: SparkleEmitter,
    /// Timestamp of the previous frame
    last_frame_ms: Option<f64>,
    /// Timestamp up to which the hold meter has been settled
    hold_clock_ms: Option<f64>,
    started: bool,
}

impl Overlay {
    pub fn new(config: OverlayConfig, seed: u64) -> Self {
        let emitter = SparkleEmitter::new(&config);
        Self {
            state: OverlayState::new(config, seed),
            timers: TimerQueue::new(),
            emitter,
            last_frame_ms: None,
            hold_clock_ms: None,
            started: false,
        }
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.state.config
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn drain_events(&mut self) -> Vec<OverlayEvent> {
        self.state.drain_events()
    }

    /// Refresh the area and viewport rectangles (page coordinates)
    pub fn set_surface_bounds(&mut self, area: Option<Bounds>, viewport: Option<Bounds>) {
        self.state.set_area(area);
        self.state.set_viewport(viewport);
    }

    /// Spawn the initial population and begin the top-up cadence
    pub fn start(&mut self, now_ms: f64) {
        if self.started {
            return;
        }
        self.started = true;
        self.state.now_ms = now_ms;
        for _ in 0..self.state.pool.target_population {
            self.state.spawn_cat(&mut self.timers, now_ms);
        }
        self.schedule_top_up(now_ms);
        self.state.push_event(OverlayEvent::ModeChanged);
        log::info!(
            "Overlay started with {} cats (floor {}, cap {})",
            self.state.pool.len(),
            self.state.pool.floor,
            self.state.pool.cap
        );
    }

    /// Display refresh at `now_ms`
    pub fn on_frame(&mut self, now_ms: f64) {
        let dt_ms = self.last_frame_ms.map_or(0.0, |last| now_ms - last);
        let hold_dt_ms = self.hold_clock_ms.map_or(0.0, |last| now_ms - last);
        // A clock that runs backwards is clamped rather than rewinding anything
        if now_ms.is_finite() {
            self.last_frame_ms = Some(self.last_frame_ms.map_or(now_ms, |l| l.max(now_ms)));
            self.hold_clock_ms = Some(self.hold_clock_ms.map_or(now_ms, |l| l.max(now_ms)));
            self.state.now_ms = self.state.now_ms.max(now_ms);
        }
        frame(&mut self.state, FrameInput { dt_ms, hold_dt_ms });
    }

    /// Charge key went down
    pub fn on_key_down(&mut self, now_ms: f64) {
        self.settle_hold(now_ms);
        if !self.state.hold.press() {
            return;
        }
        log::debug!("Hold started at {:.2}", self.state.hold.progress());
        self.emitter.start(&mut self.timers, now_ms);
        self.state.push_event(OverlayEvent::ModeChanged);
        if self.state.config.haptics {
            self.state
                .push_event(OverlayEvent::Vibrate(self.state.config.hold_haptic_ms));
        }
    }

    /// Charge key came up.
    ///
    /// The meter is settled up to `now_ms` first, so the unlock check sees
    /// every millisecond of holding before the release.
    pub fn on_key_up(&mut self, now_ms: f64) {
        self.settle_hold(now_ms);
        let was_holding = self.state.hold.is_holding();
        self.emitter.stop(&mut self.timers);
        match self.state.hold.release() {
            Release::Unlocked => {
                self.state.push_event(OverlayEvent::ModeChanged);
                celebrate(&mut self.state, &mut self.timers, now_ms);
            }
            Release::Retained => {
                log::debug!("Released at {:.2}, still locked", self.state.hold.progress());
                if was_holding {
                    self.state.push_event(OverlayEvent::ModeChanged);
                }
            }
            Release::Ignored => {}
        }
    }

    /// Pointer moved to `page` (page coordinates); last event wins
    pub fn on_pointer_move(&mut self, page: Vec2) {
        if let Some(area) = self.state.area {
            attract(&mut self.state.pool, page, &area, &self.state.config);
        }
    }

    /// A cat was clicked: start its wiggle. Unknown ids are ignored.
    pub fn on_cat_click(&mut self, id: u32, now_ms: f64) -> bool {
        let Some(cat) = self.state.pool.get_mut(id) else {
            return false;
        };
        cat.wiggle_from_ms = Some(now_ms);
        log::debug!("Cat {} wiggles", id);
        true
    }

    /// Run every timer due at or before `now_ms`; returns how many ran
    pub fn run_timers(&mut self, now_ms: f64) -> usize {
        let mut ran = 0;
        while ran < MAX_TASKS_PER_PUMP {
            let Some((at, task)) = self.timers.pop_due(now_ms) else {
                break;
            };
            log::trace!("Timer {:?} at {:.0}", task, at);
            self.dispatch(task, at);
            ran += 1;
        }
        ran
    }

    /// Cancel all pending work and detach everything
    pub fn teardown(&mut self) {
        self.emitter.stop(&mut self.timers);
        self.timers.clear();
        for id in self.state.pool.drain_ids() {
            self.state.push_event(OverlayEvent::CatRemoved(id));
        }
        for id in self.state.particles.drain_ids() {
            self.state.push_event(OverlayEvent::ParticleRemoved(id));
        }
        hide_banner(&mut self.state);
        remove_flash(&mut self.state);
        self.started = false;
        log::info!("Overlay torn down");
    }

    fn settle_hold(&mut self, now_ms: f64) {
        if let Some(last) = self.hold_clock_ms {
            let dt_ms = sanitize_dt(now_ms - last);
            self.state.hold.update((dt_ms / 1000.0) as f32);
            self.hold_clock_ms = Some(last + dt_ms);
        }
    }

    fn schedule_top_up(&mut self, now_ms: f64) {
        let interval = f64::from(self.state.config.top_up_interval_ms).max(1.0);
        self.timers.schedule(now_ms, interval, Task::TopUp);
    }

    fn dispatch(&mut self, task: Task, at: f64) {
        match task {
            Task::ExpireCat(id) => {
                if self.state.remove_cat(id) {
                    let span = self.state.config.respawn_delay_ms;
                    let delay = f64::from(span.sample(&mut self.state.rng));
                    self.timers.schedule(at, delay, Task::RespawnCat);
                }
            }
            Task::RespawnCat => {
                if self.state.pool.at_cap() {
                    log::debug!("Respawn skipped at cap {}", self.state.pool.cap);
                } else {
                    self.state.spawn_cat(&mut self.timers, at);
                }
            }
            Task::TopUp => {
                let deficit = self.state.pool.deficit();
                for _ in 0..deficit {
                    if self.state.spawn_cat(&mut self.timers, at).is_none() {
                        break;
                    }
                }
                if deficit > 0 {
                    log::debug!("Top-up: {} cats alive", self.state.pool.len());
                }
                self.schedule_top_up(at);
            }
            Task::EmitSparkle => {
                if self.emitter.on_beat(&mut self.timers, at) {
                    self.state.spawn_sparkle(&mut self.timers, at);
                }
            }
            Task::RemoveParticle(id) => {
                self.state.remove_particle(id);
            }
            Task::HideBanner => hide_banner(&mut self.state),
            Task::RemoveFlash => remove_flash(&mut self.state),
        }
    }
}
