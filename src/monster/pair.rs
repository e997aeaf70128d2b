//! Two-monster records: the celebration join barrier and the bump animation.

use std::f32::consts::PI;

use bevy::math::Vec2;

use super::MonsterId;
use crate::constants::{BUMP_APART_SPEED, BUMP_PHASE_RATE, BUMP_TOGETHER_SPEED};
use crate::zone::ZoneId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairId(pub u32);

/// Shared by the two celebrating monsters. Each reports completion once; the
/// pair resolves when the last one reports.
#[derive(Debug, Clone, PartialEq)]
pub struct CelebrationPair {
    pub zone: ZoneId,
    pub members: [MonsterId; 2],
    /// This success took the score over the parade threshold
    pub arm_parade: bool,
    done: [bool; 2],
}

impl CelebrationPair {
    pub fn new(zone: ZoneId, members: [MonsterId; 2], arm_parade: bool) -> Self {
        Self {
            zone,
            members,
            arm_parade,
            done: [false; 2],
        }
    }

    /// Record that `id` finished dancing. True when this was the last member.
    pub fn complete(&mut self, id: MonsterId) -> bool {
        let Some(slot) = self.members.iter().position(|m| *m == id) else {
            return false;
        };
        if self.done[slot] {
            return false;
        }
        self.done[slot] = true;
        self.done.iter().all(|d| *d)
    }

    /// Members still dancing
    pub fn pending(&self) -> usize {
        self.done.iter().filter(|d| !**d).count()
    }
}

/// Push-together-then-apart animation of a mismatched pair
#[derive(Debug, Clone, PartialEq)]
pub struct BumpMotion {
    pub members: [MonsterId; 2],
    /// Unit direction from each member toward the other
    dirs: [Vec2; 2],
    phase: f32,
}

impl BumpMotion {
    pub fn new(members: [MonsterId; 2], positions: [Vec2; 2]) -> Self {
        let toward = (positions[1] - positions[0]).normalize_or_zero();
        let dirs = if toward == Vec2::ZERO {
            [Vec2::X, Vec2::NEG_X]
        } else {
            [toward, -toward]
        };
        Self {
            members,
            dirs,
            phase: 0.0,
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Displacements for this step, or `None` once the animation has ended.
    pub fn advance(&mut self, dt: f32) -> Option<[Vec2; 2]> {
        if self.phase >= PI * 3.0 {
            return None;
        }
        self.phase += BUMP_PHASE_RATE * dt;
        let step = if self.phase < PI {
            BUMP_TOGETHER_SPEED * dt
        } else if self.phase < PI * 3.0 {
            -BUMP_APART_SPEED * dt
        } else {
            return None;
        };
        Some([self.dirs[0] * step, self.dirs[1] * step])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barrier_fires_on_last_member() {
        let mut pair = CelebrationPair::new(ZoneId(0), [MonsterId(1), MonsterId(2)], false);
        assert!(!pair.complete(MonsterId(2)));
        assert_eq!(pair.pending(), 1);
        assert!(pair.complete(MonsterId(1)));
        // a late duplicate report does not fire again
        assert!(!pair.complete(MonsterId(1)));
    }

    #[test]
    fn test_barrier_ignores_strangers() {
        let mut pair = CelebrationPair::new(ZoneId(0), [MonsterId(1), MonsterId(2)], false);
        assert!(!pair.complete(MonsterId(9)));
        assert_eq!(pair.pending(), 2);
    }

    #[test]
    fn test_bump_moves_together_then_apart() {
        let a = Vec2::new(100.0, 100.0);
        let b = Vec2::new(200.0, 100.0);
        let mut bump = BumpMotion::new([MonsterId(0), MonsterId(1)], [a, b]);
        let (mut pa, mut pb) = (a, b);
        let mut min_gap = f32::MAX;
        let mut frames = 0;
        while let Some([da, db]) = bump.advance(1.0 / 60.0) {
            pa += da;
            pb += db;
            min_gap = min_gap.min(pb.x - pa.x);
            frames += 1;
        }
        assert!(min_gap < 100.0);
        assert!(pb.x - pa.x > 100.0);
        // 3*PI at 6 rad/s is about 1.57 s
        assert!((90..=96).contains(&frames));
    }

    #[test]
    fn test_bump_same_position_fallback() {
        let p = Vec2::new(50.0, 50.0);
        let mut bump = BumpMotion::new([MonsterId(0), MonsterId(1)], [p, p]);
        let [da, db] = bump.advance(0.1).expect("running");
        assert!(da.x > 0.0);
        assert!(db.x < 0.0);
    }
}
