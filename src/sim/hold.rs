//! Hold-to-unlock meter
//!
//! Holding the charge key fills the meter; letting go drains it slowly.
//! Releasing with a full meter unlocks, once and for good.


use crate::config::OverlayConfig;

/// One-way gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockState {
    #[default]
    Locked,
    Unlocked,
}

/// Visual mode reflected back onto the page as classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayMode {
    /// Locked and idle
    Locked,
    /// Locked, charge key down
    Holding,
    Unlocked,
}

/// Result of a release edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Meter was full: the gate just opened
    Unlocked,
    /// Still locked, progress retained
    Retained,
    /// Already unlocked, nothing gated
    Ignored,
}

/// Progress meter state machine
#[derive(Debug, Clone)]
pub struct HoldMeter {
    progress: f32,
    lock: LockState,
    holding: bool,
    hold_rate: f32,
    decay_rate: f32,
    threshold: f32,
}

impl HoldMeter {
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            progress: 0.0,
            lock: LockState::Locked,
            holding: false,
            hold_rate: config.hold_rate,
            decay_rate: config.decay_rate,
            threshold: config.unlock_threshold,
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn lock_state(&self) -> LockState {
        self.lock
    }

    pub fn is_holding(&self) -> bool {
        self.holding
    }

    pub fn is_unlocked(&self) -> bool {
        self.lock == LockState::Unlocked
    }

    pub fn mode(&self) -> OverlayMode {
        match (self.lock, self.holding) {
            (LockState::Unlocked, _) => OverlayMode::Unlocked,
            (LockState::Locked, true) => OverlayMode::Holding,
            (LockState::Locked, false) => OverlayMode::Locked,
        }
    }

    /// Indicator width, whole percent
    pub fn fill_percent(&self) -> u32 {
        (self.progress * 100.0).round().clamp(0.0, 100.0) as u32
    }

    /// Down edge. Returns `true` when this edge started a hold.
    pub fn press(&mut self) -> bool {
        if self.lock == LockState::Unlocked || self.holding {
            return false;
        }
        self.holding = true;
        true
    }

    /// Up edge, evaluated against the current (already settled) progress
    pub fn release(&mut self) -> Release {
        self.holding = false;
        if self.lock == LockState::Unlocked {
            return Release::Ignored;
        }
        if self.progress >= self.threshold {
            self.lock = LockState::Unlocked;
            Release::Unlocked
        } else {
            Release::Retained
        }
    }

    /// Charge or decay over `dt_secs`; invalid or non-positive time is ignored
    pub fn update(&mut self, dt_secs: f32) {
        if self.lock == LockState::Unlocked || !(dt_secs.is_finite() && dt_secs > 0.0) {
            return;
        }
        if self.holding {
            self.progress = (self.progress + self.hold_rate * dt_secs).min(1.0);
        } else {
            self.progress = (self.progress - self.decay_rate * dt_secs).max(0.0);
        }
    }
}
