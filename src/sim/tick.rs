//! Per-frame update
//!
//! One call per display refresh. Physics runs first, then the hold meter,
//! then frame-local feedback, so nothing downstream sees a half-moved world.

use super::state::OverlayState;

/// Elapsed times for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Since the previous frame (ms)
    pub dt_ms: f64,
    /// Since the hold meter was last settled (ms). Differs from `dt_ms` when a
    /// key edge settled the meter between frames.
    pub hold_dt_ms: f64,
}

impl FrameInput {
    /// Same elapsed time for physics and the hold meter
    pub fn uniform(dt_ms: f64) -> Self {
        Self {
            dt_ms,
            hold_dt_ms: dt_ms,
        }
    }
}

/// Elapsed time usable for integration: invalid or backwards time is zero
#[inline]
pub fn sanitize_dt(dt_ms: f64) -> f64 {
    if dt_ms.is_finite() && dt_ms > 0.0 { dt_ms } else { 0.0 }
}

/// Advance the overlay by one frame
pub fn frame(state: &mut OverlayState, input: FrameInput) {
    let dt_ms = sanitize_dt(input.dt_ms);
    let hold_dt_ms = sanitize_dt(input.hold_dt_ms);

    // 1. Cat physics
    if let Some(area) = state.area {
        state
            .pool
            .step(dt_ms as f32, &area, state.config.bounce_margin);
    }

    // 2. Hold meter
    state.hold.update((hold_dt_ms / 1000.0) as f32);

    // 3. Jiggle while holding
    if state.hold.is_holding() {
        state.jiggle_phase += (dt_ms / 1000.0) as f32 * state.config.jiggle_rate;
        let phase = state.jiggle_phase;
        let amplitude = state.config.jiggle_amplitude;
        state
            .pool
            .apply_scale(|i| 1.0 + (phase + i as f32).sin() * amplitude);
    } else {
        state.pool.apply_scale(|_| 1.0);
    }
}
