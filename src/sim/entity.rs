//! Kinetic cats and the rectangle they live in

use glam::Vec2;
use rand::Rng;

use crate::config::{OverlayConfig, Span};
use crate::consts::CAT_COLORS;

/// Axis-aligned rectangle in page coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Top-left corner relative to the page
    pub origin: Vec2,
    pub size: Vec2,
}

impl Bounds {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Rectangle anchored at the page origin
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(width, height))
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Non-empty and finite
    pub fn is_usable(&self) -> bool {
        self.origin.is_finite() && self.size.is_finite() && self.size.x > 0.0 && self.size.y > 0.0
    }

    /// Page position to area-local position
    pub fn to_local(&self, page: Vec2) -> Vec2 {
        page - self.origin
    }
}

/// Which walls a step bounced off
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounce {
    pub x: bool,
    pub y: bool,
}

/// A drifting cat
#[derive(Debug, Clone)]
pub struct Cat {
    pub id: u32,
    /// Top-left corner, area-local px
    pub pos: Vec2,
    /// px/ms
    pub vel: Vec2,
    /// Edge length (cats are square)
    pub size: f32,
    /// 0xRRGGBB body colour
    pub color: u32,
    /// Render scale (jiggle while holding)
    pub scale: f32,
    pub born_ms: f64,
    pub lifetime_ms: f64,
    /// Start of the click wiggle, if one was triggered
    pub wiggle_from_ms: Option<f64>,
}

impl Cat {
    /// Roll a new cat somewhere inside `area`.
    ///
    /// Returns `None` when the area cannot fit the rolled size inside the
    /// spawn margins.
    pub fn spawn<R: Rng + ?Sized>(
        id: u32,
        rng: &mut R,
        area: &Bounds,
        config: &OverlayConfig,
        now_ms: f64,
    ) -> Option<Self> {
        if !area.is_usable() {
            return None;
        }
        let size = config.cat_size.sample(rng);
        let margin = config.spawn_margin;
        let max_x = area.width() - size - margin;
        let max_y = area.height() - size - margin - config.chrome_margin;
        if max_x < margin || max_y < margin {
            return None;
        }

        let pos = Vec2::new(
            Span::new(margin, max_x).sample(rng),
            Span::new(margin, max_y).sample(rng),
        );
        let speed = config.spawn_speed;
        let vel = Vec2::new(
            Span::new(-speed.x, speed.x).sample(rng),
            Span::new(-speed.y, speed.y).sample(rng),
        );
        let color = CAT_COLORS[rng.random_range(0..CAT_COLORS.len())];

        Some(Self {
            id,
            pos,
            vel,
            size,
            color,
            scale: 1.0,
            born_ms: now_ms,
            lifetime_ms: f64::from(config.lifetime_ms.sample(rng)),
            wiggle_from_ms: None,
        })
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    /// Advance by `dt_ms` and reflect off the area inset by `margin`.
    ///
    /// A crossed wall clamps the coordinate onto it and turns the matching
    /// velocity component back inside; speed is never scaled.
    pub fn step(&mut self, dt_ms: f32, area: &Bounds, margin: f32) -> Bounce {
        let mut bounce = Bounce::default();
        if !(dt_ms.is_finite() && dt_ms > 0.0) {
            return bounce;
        }
        self.pos += self.vel * dt_ms;

        let far = area.size - Vec2::splat(self.size + margin);

        // Far wall first so a too-small area still pins the cat at the near margin
        if self.pos.x > far.x {
            self.pos.x = far.x;
            self.vel.x = -self.vel.x.abs();
            bounce.x = true;
        }
        if self.pos.x < margin {
            self.pos.x = margin;
            self.vel.x = self.vel.x.abs();
            bounce.x = true;
        }
        if self.pos.y > far.y {
            self.pos.y = far.y;
            self.vel.y = -self.vel.y.abs();
            bounce.y = true;
        }
        if self.pos.y < margin {
            self.pos.y = margin;
            self.vel.y = self.vel.y.abs();
            bounce.y = true;
        }
        bounce
    }

    /// Vertical offset of the click wiggle at `now_ms` (negative is up).
    ///
    /// Rises to `lift` and settles back over `duration_ms`; zero outside it.
    pub fn wiggle_offset(&self, now_ms: f64, duration_ms: f32, lift: f32) -> f32 {
        let Some(start) = self.wiggle_from_ms else {
            return 0.0;
        };
        let duration = f64::from(duration_ms);
        if duration <= 0.0 {
            return 0.0;
        }
        let t = (now_ms - start) / duration;
        if !(0.0..1.0).contains(&t) {
            return 0.0;
        }
        -(std::f32::consts::PI * t as f32).sin() * lift
    }

    /// Whether the whole cat lies inside `area` inset by `margin`
    pub fn within(&self, area: &Bounds, margin: f32) -> bool {
        let far = area.size - Vec2::splat(self.size + margin);
        let eps = 1e-3;
        self.pos.x >= margin - eps
            && self.pos.y >= margin - eps
            && self.pos.x <= far.x + eps
            && self.pos.y <= far.y + eps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn cat_at(pos: Vec2, vel: Vec2) -> Cat {
        Cat {
            id: 1,
            pos,
            vel,
            size: 60.0,
            color: CAT_COLORS[0],
            scale: 1.0,
            born_ms: 0.0,
            lifetime_ms: 10_000.0,
            wiggle_from_ms: None,
        }
    }

    #[test]
    fn spawn_respects_margins_and_ranges() {
        let config = OverlayConfig::default();
        let area = Bounds::from_size(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(42);
        for id in 0..200 {
            let cat = Cat::spawn(id, &mut rng, &area, &config, 0.0).expect("room to spawn");
            assert!(config.cat_size.contains(cat.size));
            assert!(cat.pos.x >= 8.0 && cat.pos.x + cat.size <= 800.0 - 8.0);
            assert!(cat.pos.y >= 8.0 && cat.pos.y + cat.size <= 600.0 - 8.0 - 120.0);
            assert!(cat.vel.x.abs() <= 0.12 && cat.vel.y.abs() <= 0.08);
            assert!(config.lifetime_ms.contains(cat.lifetime_ms as f32));
            assert!(CAT_COLORS.contains(&cat.color));
        }
    }

    #[test]
    fn spawn_refuses_tiny_or_missing_area() {
        let config = OverlayConfig::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let tiny = Bounds::from_size(50.0, 50.0);
        assert!(Cat::spawn(1, &mut rng, &tiny, &config, 0.0).is_none());
        let empty = Bounds::from_size(0.0, 0.0);
        assert!(Cat::spawn(1, &mut rng, &empty, &config, 0.0).is_none());
    }

    #[test]
    fn step_moves_by_velocity_times_dt() {
        let area = Bounds::from_size(800.0, 600.0);
        let mut cat = cat_at(Vec2::new(100.0, 100.0), Vec2::new(0.1, -0.05));
        let bounce = cat.step(100.0, &area, 6.0);
        assert_eq!(bounce, Bounce::default());
        assert!((cat.pos - Vec2::new(110.0, 95.0)).length() < 1e-4);
    }

    #[test]
    fn crossing_right_wall_clamps_and_flips() {
        let area = Bounds::from_size(800.0, 600.0);
        let mut cat = cat_at(Vec2::new(730.0, 100.0), Vec2::new(0.2, 0.01));
        let bounce = cat.step(50.0, &area, 6.0);
        assert!(bounce.x && !bounce.y);
        assert_eq!(cat.pos.x, 800.0 - 60.0 - 6.0);
        assert_eq!(cat.vel.x, -0.2);
        assert_eq!(cat.vel.y, 0.01);
    }

    #[test]
    fn crossing_top_wall_clamps_and_flips() {
        let area = Bounds::from_size(800.0, 600.0);
        let mut cat = cat_at(Vec2::new(100.0, 10.0), Vec2::new(0.0, -0.1));
        let bounce = cat.step(100.0, &area, 6.0);
        assert!(bounce.y && !bounce.x);
        assert_eq!(cat.pos.y, 6.0);
        assert_eq!(cat.vel.y, 0.1);
    }

    #[test]
    fn invalid_dt_means_no_motion() {
        let area = Bounds::from_size(800.0, 600.0);
        let start = Vec2::new(100.0, 100.0);
        for dt in [0.0, -16.0, f32::NAN, f32::INFINITY] {
            let mut cat = cat_at(start, Vec2::new(0.1, 0.1));
            cat.step(dt, &area, 6.0);
            assert_eq!(cat.pos, start);
        }
    }

    #[test]
    fn huge_dt_still_lands_inside() {
        let area = Bounds::from_size(800.0, 600.0);
        let mut cat = cat_at(Vec2::new(100.0, 100.0), Vec2::new(-0.25, 0.18));
        cat.step(60_000.0, &area, 6.0);
        assert!(cat.within(&area, 6.0));
    }

    #[test]
    fn wiggle_lifts_then_settles() {
        let mut cat = cat_at(Vec2::new(100.0, 100.0), Vec2::ZERO);
        assert_eq!(cat.wiggle_offset(50.0, 300.0, 8.0), 0.0);
        cat.wiggle_from_ms = Some(1000.0);
        assert_eq!(cat.wiggle_offset(999.0, 300.0, 8.0), 0.0);
        assert!((cat.wiggle_offset(1150.0, 300.0, 8.0) + 8.0).abs() < 1e-4);
        assert!(cat.wiggle_offset(1075.0, 300.0, 8.0) < 0.0);
        assert_eq!(cat.wiggle_offset(1300.0, 300.0, 8.0), 0.0);
        assert_eq!(cat.wiggle_offset(1150.0, 0.0, 8.0), 0.0);
    }

    #[test]
    fn bounds_local_conversion() {
        let area = Bounds::new(Vec2::new(20.0, 40.0), Vec2::new(300.0, 200.0));
        assert_eq!(area.to_local(Vec2::new(25.0, 50.0)), Vec2::new(5.0, 10.0));
        assert!(area.is_usable());
        assert!(!Bounds::from_size(f32::NAN, 10.0).is_usable());
    }
}
