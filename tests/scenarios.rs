// Integration scenarios (native) for the `cat-overlay` crate.
// Everything here drives the platform-free runtime with explicit timestamps,
// the way the browser callbacks would.

use cat_overlay::sim::{Bounds, Cat, HoldMeter, LockState, OverlayEvent, ParticleKind};
use cat_overlay::{Overlay, OverlayConfig};
use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

const FRAME_MS: f64 = 16.0;

fn area() -> Bounds {
    Bounds::from_size(1024.0, 768.0)
}

fn started(seed: u64) -> Overlay {
    let mut overlay = Overlay::new(OverlayConfig::default(), seed);
    overlay.set_surface_bounds(Some(area()), Some(area()));
    overlay.start(0.0);
    overlay.on_frame(0.0);
    overlay
}

/// Frames and timer pumps from `from` to `to`
fn advance(overlay: &mut Overlay, from: f64, to: f64) {
    let mut t = from;
    while t < to {
        t = (t + FRAME_MS).min(to);
        overlay.run_timers(t);
        overlay.on_frame(t);
    }
}

fn celebrations(events: &[OverlayEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, OverlayEvent::BannerShown))
        .count()
}

// Hold for 1.2 s: the meter saturates and the release unlocks exactly once
#[test]
fn full_hold_unlocks_once() {
    let mut overlay = started(100);
    overlay.drain_events();
    overlay.on_key_down(0.0);
    advance(&mut overlay, 0.0, 1200.0);
    assert_eq!(overlay.state().hold.progress(), 1.0);
    overlay.on_key_up(1200.0);

    let events = overlay.drain_events();
    assert_eq!(celebrations(&events), 1);
    assert_eq!(overlay.state().hold.lock_state(), LockState::Unlocked);
    assert_eq!(overlay.state().particles.count(ParticleKind::Confetti), 24);
    assert!(events.contains(&OverlayEvent::Speak("Unlocked! Nice hold.".into())));
}

// Hold 0.5 s then idle 5 s: charge to ~0.45, decay to ~0.05, never unlock
#[test]
fn short_hold_decays_without_unlocking() {
    let mut overlay = started(101);
    overlay.on_key_down(0.0);
    advance(&mut overlay, 0.0, 500.0);
    assert!((overlay.state().hold.progress() - 0.45).abs() < 1e-3);

    overlay.on_key_up(500.0);
    assert_eq!(overlay.state().hold.lock_state(), LockState::Locked);

    advance(&mut overlay, 500.0, 5500.0);
    let progress = overlay.state().hold.progress();
    assert!((progress - 0.05).abs() < 1e-3, "progress {}", progress);

    advance(&mut overlay, 5500.0, 12_000.0);
    assert_eq!(overlay.state().hold.progress(), 0.0);
    assert_eq!(overlay.state().celebration.runs, 0);
}

// Two complete hold/release cycles: one celebration, state stays unlocked
#[test]
fn second_cycle_does_not_celebrate_again() {
    let mut overlay = started(102);
    overlay.on_key_down(0.0);
    advance(&mut overlay, 0.0, 1300.0);
    overlay.on_key_up(1300.0);
    advance(&mut overlay, 1300.0, 2000.0);
    overlay.on_key_down(2000.0);
    advance(&mut overlay, 2000.0, 3300.0);
    overlay.on_key_up(3300.0);

    assert_eq!(overlay.state().celebration.runs, 1);
    assert!(overlay.state().hold.is_unlocked());
    // No sparkles are emitted once unlocked
    advance(&mut overlay, 3300.0, 6000.0);
    assert_eq!(overlay.state().particles.count(ParticleKind::Sparkle), 0);
}

// Removing an already-removed cat or particle changes nothing
#[test]
fn double_removal_is_a_noop() {
    let mut overlay = started(103);
    overlay.drain_events();
    // Run well past every lifetime so expiry timers fire on their own
    advance(&mut overlay, 0.0, 40_000.0);
    let events = overlay.drain_events();

    let mut removed: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            OverlayEvent::CatRemoved(id) => Some(*id),
            _ => None,
        })
        .collect();
    let total = removed.len();
    removed.sort_unstable();
    removed.dedup();
    assert_eq!(removed.len(), total, "a cat was removed twice");

    overlay.teardown();
    let after_teardown = overlay.drain_events().len();
    overlay.teardown();
    let repeated: Vec<_> = overlay
        .drain_events()
        .into_iter()
        .filter(|e| !matches!(e, OverlayEvent::BannerHidden | OverlayEvent::FlashHidden))
        .collect();
    assert!(after_teardown > 0);
    assert!(repeated.is_empty());
}

// The pool dips below the floor only between two top-up checks
#[test]
fn population_recovers_to_floor() {
    let mut overlay = started(104);
    let interval = f64::from(overlay.config().top_up_interval_ms);
    let floor = overlay.config().population_floor;

    let mut t = 0.0;
    let mut below_since: Option<f64> = None;
    while t < 60_000.0 {
        advance(&mut overlay, t, t + 100.0);
        t += 100.0;
        if overlay.state().pool.len() < floor {
            let since = *below_since.get_or_insert(t);
            assert!(t - since <= interval + 100.0, "below floor for {} ms", t - since);
        } else {
            below_since = None;
        }
        assert!(overlay.state().pool.len() <= overlay.config().population_cap);
    }
}

// Pointer input nudges but never exceeds the speed clamp
#[test]
fn pointer_storm_respects_speed_clamp() {
    let mut overlay = started(105);
    let max = overlay.config().max_speed;
    for i in 0..500 {
        let corner = if i % 2 == 0 {
            Vec2::ZERO
        } else {
            Vec2::new(1024.0, 768.0)
        };
        overlay.on_pointer_move(corner);
    }
    for cat in overlay.state().pool.iter() {
        assert!(cat.vel.x.abs() <= max.x + 1e-6);
        assert!(cat.vel.y.abs() <= max.y + 1e-6);
    }
}

#[derive(Debug, Clone)]
enum Input {
    Down,
    Up,
    Wait(f64),
}

fn input() -> impl Strategy<Value = Input> {
    prop_oneof![
        Just(Input::Down),
        Just(Input::Up),
        (0.0f64..800.0).prop_map(Input::Wait),
    ]
}

proptest! {
    #[test]
    fn progress_stays_in_unit_range(seed in any::<u64>(), inputs in prop::collection::vec(input(), 0..80)) {
        let mut overlay = started(seed);
        let mut now = 0.0;
        let mut was_unlocked = false;
        for step in inputs {
            match step {
                Input::Down => overlay.on_key_down(now),
                Input::Up => overlay.on_key_up(now),
                Input::Wait(ms) => {
                    advance(&mut overlay, now, now + ms);
                    now += ms;
                }
            }
            let progress = overlay.state().hold.progress();
            prop_assert!((0.0..=1.0).contains(&progress));
            // Unlocked is terminal
            if was_unlocked {
                prop_assert!(overlay.state().hold.is_unlocked());
            }
            was_unlocked = overlay.state().hold.is_unlocked();
            prop_assert!(overlay.state().celebration.runs <= 1);
        }
    }

    #[test]
    fn meter_unlocks_only_on_release_over_threshold(updates in prop::collection::vec(0.0f32..0.5, 1..20)) {
        let config = OverlayConfig::default();
        let mut meter = HoldMeter::new(&config);
        meter.press();
        for dt in updates {
            meter.update(dt);
            prop_assert_eq!(meter.lock_state(), LockState::Locked);
        }
        let over = meter.progress() >= config.unlock_threshold;
        meter.release();
        prop_assert_eq!(meter.is_unlocked(), over);
    }

    #[test]
    fn cats_stay_inside_margins(
        seed in any::<u64>(),
        width in 300.0f32..2000.0,
        height in 300.0f32..1400.0,
        dts in prop::collection::vec(0.0f32..120.0, 1..100),
    ) {
        let config = OverlayConfig::default();
        let area = Bounds::from_size(width, height);
        let mut rng = Pcg32::seed_from_u64(seed);
        let Some(mut cat) = Cat::spawn(1, &mut rng, &area, &config, 0.0) else {
            return Ok(());
        };
        let margin = config.bounce_margin;
        for dt in dts {
            let before = cat.vel;
            let bounce = cat.step(dt, &area, margin);
            prop_assert!(cat.within(&area, margin));
            // Speed is reflected, never scaled
            prop_assert_eq!(cat.vel.abs(), before.abs());
            if !bounce.x {
                prop_assert_eq!(cat.vel.x, before.x);
            }
            if !bounce.y {
                prop_assert_eq!(cat.vel.y, before.y);
            }
        }
    }
}
