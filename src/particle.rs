use crate::field::FlowField;
use crate::palette::{Palette, Rgb, PALETTE_SIZE};
use crate::rng::SeededRandom;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Speed cap applied after each integration step
pub const MAX_SPEED: f64 = 2.0;

/// Scale `v` down to `max` if it is longer
fn limit(v: DVec2, max: f64) -> DVec2 {
    let mag_sq = v.x * v.x + v.y * v.y;
    if mag_sq > max * max {
        v / mag_sq.sqrt() * max
    } else {
        v
    }
}

/// One trail stroke emitted by a particle for a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: DVec2,
    pub to: DVec2,
    pub color: Rgb,
    /// Stroke opacity on a 0-255 scale (may exceed 255 before clamping)
    pub alpha: f64,
}

impl Segment {
    /// Opacity clamped into [0, 1]
    pub fn opacity(&self) -> f64 {
        (self.alpha / 255.0).clamp(0.0, 1.0)
    }
}

/// A point steered by the flow field
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: DVec2,
    pub vel: DVec2,
    pub acc: DVec2,
    pub prev: DVec2,
    pub color_index: usize,
    pub alpha: f64,
}

impl Particle {
    /// Place a particle using four draws: x, y, color index, alpha
    pub fn spawn(rng: &mut SeededRandom, width: f64, height: f64) -> Self {
        let x = rng.next() * width;
        let y = rng.next() * height;
        let pos = DVec2::new(x, y);
        let color_index = (rng.next() * PALETTE_SIZE as f64).floor() as usize;
        let alpha = rng.range(50.0, 150.0);

        Self {
            pos,
            vel: DVec2::ZERO,
            acc: DVec2::ZERO,
            prev: pos,
            color_index,
            alpha,
        }
    }

    /// Accumulate the field vector under the particle; no-op off the grid
    pub fn follow(&mut self, field: &FlowField) {
        if let Some(force) = field.force_at(self.pos) {
            self.apply_force(force);
        }
    }

    pub fn apply_force(&mut self, force: DVec2) {
        self.acc += force;
    }

    /// Integrate velocity and position, then clear acceleration
    pub fn update(&mut self) {
        self.vel += self.acc;
        self.vel = limit(self.vel, MAX_SPEED);
        self.pos += self.vel;
        self.acc = DVec2::ZERO;
    }

    /// Toroidal wrap. Each wrap resets the trail so no streak crosses the canvas.
    pub fn edges(&mut self, width: f64, height: f64) {
        if self.pos.x > width {
            self.pos.x = 0.0;
            self.update_prev();
        }
        if self.pos.x < 0.0 {
            self.pos.x = width;
            self.update_prev();
        }
        if self.pos.y > height {
            self.pos.y = 0.0;
            self.update_prev();
        }
        if self.pos.y < 0.0 {
            self.pos.y = height;
            self.update_prev();
        }
    }

    /// Emit the stroke from the previous to the current position
    pub fn draw(&mut self, palette: Palette) -> Segment {
        let segment = Segment {
            from: self.prev,
            to: self.pos,
            color: palette.color(self.color_index),
            alpha: self.alpha,
        };
        self.update_prev();
        segment
    }

    fn update_prev(&mut self) {
        self.prev = self.pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::NoiseField;

    fn resting(x: f64, y: f64) -> Particle {
        let pos = DVec2::new(x, y);
        Particle {
            pos,
            vel: DVec2::ZERO,
            acc: DVec2::ZERO,
            prev: pos,
            color_index: 0,
            alpha: 100.0,
        }
    }

    #[test]
    fn test_spawn_uses_four_draws() {
        let mut rng = SeededRandom::new("abc");
        let mut reference = SeededRandom::new("abc");
        let p = Particle::spawn(&mut rng, 800.0, 800.0);

        assert_eq!(p.pos.x, reference.next() * 800.0);
        assert_eq!(p.pos.y, reference.next() * 800.0);
        let _color = reference.next();
        let _alpha = reference.next();
        assert_eq!(rng.state(), reference.state());
        assert_eq!(p.prev, p.pos);
        assert_eq!(p.vel, DVec2::ZERO);
    }

    #[test]
    fn test_spawn_ranges() {
        let mut rng = SeededRandom::new("ranges");
        for _ in 0..500 {
            let p = Particle::spawn(&mut rng, 800.0, 800.0);
            assert!(p.color_index < PALETTE_SIZE);
            assert!((50.0..150.0).contains(&p.alpha));
            assert!((0.0..800.0).contains(&p.pos.x));
            assert!((0.0..800.0).contains(&p.pos.y));
        }
    }

    #[test]
    fn test_update_limits_speed() {
        let mut p = resting(100.0, 100.0);
        p.apply_force(DVec2::new(3.0, 4.0));
        p.update();
        assert!((p.vel.length() - MAX_SPEED).abs() < 1e-12);
        assert!((p.pos - DVec2::new(101.2, 101.6)).length() < 1e-12);
        assert_eq!(p.acc, DVec2::ZERO);
    }

    #[test]
    fn test_update_keeps_slow_velocity() {
        let mut p = resting(10.0, 10.0);
        p.apply_force(DVec2::new(0.5, 0.0));
        p.update();
        assert_eq!(p.vel, DVec2::new(0.5, 0.0));
        assert_eq!(p.pos, DVec2::new(10.5, 10.0));
    }

    #[test]
    fn test_follow_adds_field_vector() {
        let field = FlowField::build(40, 40, 20.0, &NoiseField::from_seed(5.0));
        let mut p = resting(45.0, 65.0);
        p.follow(&field);
        assert_eq!(p.acc, field.get(2 + 3 * 40).unwrap());
    }

    #[test]
    fn test_follow_off_grid_is_noop() {
        let field = FlowField::build(40, 40, 20.0, &NoiseField::from_seed(5.0));
        let mut p = resting(10.0, 810.0);
        p.follow(&field);
        assert_eq!(p.acc, DVec2::ZERO);
    }

    #[test]
    fn test_edges_wrap_right_to_left() {
        let mut p = resting(803.0, 400.0);
        p.vel = DVec2::new(2.0, 0.0);
        p.update();
        assert_eq!(p.pos.x, 805.0);

        p.edges(800.0, 800.0);
        assert_eq!(p.pos.x, 0.0);
        assert_eq!(p.prev, p.pos);

        // The next stroke starts at the wrapped position
        let seg = p.draw(Palette::Cosmic);
        assert_eq!(seg.from, seg.to);
    }

    #[test]
    fn test_edges_wrap_each_axis() {
        let mut p = resting(-1.0, 801.0);
        p.edges(800.0, 800.0);
        assert_eq!(p.pos, DVec2::new(800.0, 0.0));

        let mut q = resting(400.0, -0.5);
        q.edges(800.0, 800.0);
        assert_eq!(q.pos, DVec2::new(400.0, 800.0));
    }

    #[test]
    fn test_edges_leave_interior_alone() {
        let mut p = resting(400.0, 400.0);
        p.prev = DVec2::new(399.0, 399.0);
        p.edges(800.0, 800.0);
        assert_eq!(p.prev, DVec2::new(399.0, 399.0));
    }

    #[test]
    fn test_draw_emits_segment_and_advances_prev() {
        let mut p = resting(10.0, 10.0);
        p.color_index = 2;
        p.pos = DVec2::new(11.0, 12.0);
        let seg = p.draw(Palette::Ocean);
        assert_eq!(seg.from, DVec2::new(10.0, 10.0));
        assert_eq!(seg.to, DVec2::new(11.0, 12.0));
        assert_eq!(seg.color, Palette::Ocean.colors()[2]);
        assert_eq!(p.prev, p.pos);
    }

    #[test]
    fn test_segment_opacity_clamps() {
        let seg = Segment {
            from: DVec2::ZERO,
            to: DVec2::ONE,
            color: Rgb::new(1, 2, 3),
            alpha: 300.0,
        };
        assert_eq!(seg.opacity(), 1.0);
    }
}
