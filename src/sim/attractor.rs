//! Pointer attraction
//!
//! Each pointer update nudges every cat's velocity a little toward the
//! pointer. Cats keep drifting and bouncing on their own; the nudge only
//! biases them.

use glam::Vec2;

use super::entity::Bounds;
use super::pool::CatPool;
use crate::config::OverlayConfig;

/// Pull fraction for the cat at `index`; cycling variants desynchronise motion
pub fn pull_fraction(index: usize, config: &OverlayConfig) -> f32 {
    let variant = index % config.attract_variants.max(1);
    config.attract_base + variant as f32 * config.attract_step
}

/// Nudge all cats toward `pointer` (page coordinates).
///
/// Returns `false` without touching anything when the pointer or area is unusable.
pub fn attract(pool: &mut CatPool, pointer: Vec2, area: &Bounds, config: &OverlayConfig) -> bool {
    if !pointer.is_finite() || !area.is_usable() {
        return false;
    }
    let local = area.to_local(pointer);
    let limit = config.max_speed;
    for (i, cat) in pool.iter_mut().enumerate() {
        let delta = (local - cat.center()) / area.size;
        cat.vel += delta * pull_fraction(i, config);
        cat.vel = cat.vel.clamp(-limit, limit);
    }
    true
}
