//! Seeded selection helpers shared by every stochastic decision.
//!
//! One `GameRng` lives inside each engine so sessions replay identically for
//! the same seed and never share a random stream.

use bevy::math::Vec2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Deterministic RNG with the uniform pick/range helpers the simulation uses.
#[derive(Debug, Clone)]
pub struct GameRng {
    inner: Xoshiro256PlusPlus,
}

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Uniform float in `[lo, hi)`. Degenerate ranges return `lo`.
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.inner.gen_range(lo..hi)
    }

    /// Uniform integer in `[lo, hi]` (inclusive).
    pub fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.inner.gen_range(lo..=hi)
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f64) -> bool {
        self.inner.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform pick; `None` on an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.inner)
    }

    pub fn pick_copied<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        self.pick(items).copied()
    }

    /// Uniform point inside the axis-aligned box `[min, max)`.
    pub fn point_in(&mut self, min: Vec2, max: Vec2) -> Vec2 {
        Vec2::new(self.range_f32(min.x, max.x), self.range_f32(min.y, max.y))
    }

    /// Unit vector at a uniform angle in `[lo, hi)` radians.
    pub fn direction_between(&mut self, lo: f32, hi: f32) -> Vec2 {
        Vec2::from_angle(self.range_f32(lo, hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = GameRng::seeded(7);
        let mut b = GameRng::seeded(7);
        for _ in 0..32 {
            assert_eq!(a.range_i32(1, 5), b.range_i32(1, 5));
            assert_eq!(a.range_f32(0.0, 10.0), b.range_f32(0.0, 10.0));
        }
    }

    #[test]
    fn test_range_i32_inclusive() {
        let mut rng = GameRng::seeded(1);
        let mut seen = [false; 5];
        for _ in 0..500 {
            let v = rng.range_i32(1, 5);
            assert!((1..=5).contains(&v));
            seen[(v - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "every value should appear");
    }

    #[test]
    fn test_degenerate_ranges() {
        let mut rng = GameRng::seeded(3);
        assert_eq!(rng.range_i32(4, 4), 4);
        assert_eq!(rng.range_i32(6, 2), 6);
        assert_eq!(rng.range_f32(2.5, 2.5), 2.5);
    }

    #[test]
    fn test_pick_empty() {
        let mut rng = GameRng::seeded(3);
        let empty: [i32; 0] = [];
        assert!(rng.pick(&empty).is_none());
        assert_eq!(rng.pick_copied(&[9]), Some(9));
    }

    #[test]
    fn test_point_in_bounds() {
        let mut rng = GameRng::seeded(11);
        let min = Vec2::new(10.0, 20.0);
        let max = Vec2::new(30.0, 25.0);
        for _ in 0..100 {
            let p = rng.point_in(min, max);
            assert!(p.x >= 10.0 && p.x < 30.0);
            assert!(p.y >= 20.0 && p.y < 25.0);
        }
    }

    #[test]
    fn test_direction_is_unit() {
        let mut rng = GameRng::seeded(5);
        let d = rng.direction_between(0.0, std::f32::consts::PI);
        assert!((d.length() - 1.0).abs() < 1e-5);
        assert!(d.y >= 0.0);
    }
}
