//! Per-state motion: wandering, following, celebration dances and exit runs.
//!
//! Each step function takes the playfield and `dt` and returns the new
//! position (plus any cosmetic side effect) so the engine stays the only
//! owner of state transitions.

use std::f32::consts::{PI, TAU};

use bevy::math::Vec2;

use super::pair::PairId;
use super::WanderPlan;
use crate::constants::{
    CELEBRATION_SECS, EXIT_EDGE_OVERSHOOT, EXIT_LOOP_SECS, EXIT_TRAIL_CHANCE, EXIT_TRAIL_INTERVAL,
    FOLLOW_SNAP_DISTANCE, MONSTER_FAST_SPEED, MONSTER_SPEED, SCATTER_DISTANCE_MAX,
    SCATTER_DISTANCE_MIN, SCATTER_EDGE_MARGIN, SCATTER_MIN_Y_FRAC, SCATTER_TIMER_MAX,
    SCATTER_TIMER_MIN, WANDER_ARRIVE_DISTANCE, WANDER_TIMER_MAX, WANDER_TIMER_MIN,
};
use crate::player::Hand;
use crate::rng::GameRng;
use crate::world::Playfield;

// =====================================================
// Wandering
// =====================================================

/// Rest regions as (min, max) playfield fractions: left, right, bottom-mid, top-mid
const WANDER_REGIONS: [((f32, f32), (f32, f32)); 4] = [
    ((0.10, 0.35), (0.35, 0.65)),
    ((0.65, 0.35), (0.90, 0.65)),
    ((0.30, 0.55), (0.70, 0.85)),
    ((0.30, 0.35), (0.70, 0.50)),
];

pub fn pick_wander_target(field: &Playfield, rng: &mut GameRng) -> Vec2 {
    let (min, max) = rng
        .pick_copied(&WANDER_REGIONS)
        .unwrap_or(WANDER_REGIONS[0]);
    rng.point_in(field.frac(min.0, min.1), field.frac(max.0, max.1))
}

pub fn fresh_wander_plan(field: &Playfield, rng: &mut GameRng) -> WanderPlan {
    let target = pick_wander_target(field, rng);
    WanderPlan::toward(target, rng.range_f32(WANDER_TIMER_MIN, WANDER_TIMER_MAX))
}

/// Wander toward a point drawn from the box `[min_frac, max_frac]` of the field.
pub fn plan_in_box(
    field: &Playfield,
    min_frac: (f32, f32),
    max_frac: (f32, f32),
    rng: &mut GameRng,
) -> WanderPlan {
    let target = rng.point_in(
        field.frac(min_frac.0, min_frac.1),
        field.frac(max_frac.0, max_frac.1),
    );
    WanderPlan::toward(target, rng.range_f32(WANDER_TIMER_MIN, WANDER_TIMER_MAX))
}

/// Scatter away from the avatar after a release. Left-hand monsters fly into
/// the left half-plane, right-hand ones into the right.
pub fn scatter_plan(avatar: Vec2, hand: Hand, field: &Playfield, rng: &mut GameRng) -> WanderPlan {
    let (lo, hi) = hand.scatter_arc();
    let direction = rng.direction_between(lo, hi);
    let distance = rng.range_f32(SCATTER_DISTANCE_MIN, SCATTER_DISTANCE_MAX);
    let raw = avatar + direction * distance;
    let target = Vec2::new(
        raw.x.clamp(
            SCATTER_EDGE_MARGIN,
            (field.width - SCATTER_EDGE_MARGIN).max(SCATTER_EDGE_MARGIN),
        ),
        raw.y.clamp(
            field.height * SCATTER_MIN_Y_FRAC,
            (field.height - SCATTER_EDGE_MARGIN).max(field.height * SCATTER_MIN_Y_FRAC),
        ),
    );
    WanderPlan::toward(target, rng.range_f32(SCATTER_TIMER_MIN, SCATTER_TIMER_MAX))
}

/// One wander step. Refreshes the plan when its timer runs out or it has no target.
pub fn step_wander(
    position: Vec2,
    plan: &mut WanderPlan,
    field: &Playfield,
    dt: f32,
    rng: &mut GameRng,
) -> Vec2 {
    plan.timer -= dt;
    if plan.timer <= 0.0 || plan.target.is_none() {
        *plan = fresh_wander_plan(field, rng);
    }
    let Some(target) = plan.target else {
        return field.clamp_inset(position);
    };
    let to_target = target - position;
    let next = if to_target.length() > WANDER_ARRIVE_DISTANCE {
        position + to_target.normalize_or_zero() * MONSTER_SPEED * dt
    } else {
        position
    };
    field.clamp_inset(next)
}

// =====================================================
// Following
// =====================================================

/// Chase a hand slot at fast speed, snapping on within a few units.
pub fn step_follow(position: Vec2, slot: Vec2, field: &Playfield, dt: f32) -> Vec2 {
    let to_slot = slot - position;
    let distance = to_slot.length();
    let next = if distance <= FOLLOW_SNAP_DISTANCE {
        slot
    } else {
        let travel = MONSTER_FAST_SPEED * dt;
        if travel >= distance {
            slot
        } else {
            position + to_slot / distance * travel
        }
    };
    field.clamp_inset(next)
}

// =====================================================
// Celebration
// =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CelebrationPattern {
    CircleDance,
    JumpWave,
    SpinJump,
    WiggleHop,
}

impl CelebrationPattern {
    pub const ALL: [CelebrationPattern; 4] = [
        CelebrationPattern::CircleDance,
        CelebrationPattern::JumpWave,
        CelebrationPattern::SpinJump,
        CelebrationPattern::WiggleHop,
    ];

    /// Displacement from the start point at `progress` in `[0, 1]`
    pub fn offset(self, progress: f32) -> Vec2 {
        let p = progress.clamp(0.0, 1.0);
        match self {
            CelebrationPattern::CircleDance => {
                let a = p * PI * 4.0;
                Vec2::new(a.cos() * 25.0, a.sin() * 15.0 - (a * 2.0).sin().abs() * 10.0)
            }
            CelebrationPattern::JumpWave => Vec2::new(
                (p * PI * 6.0).sin() * 20.0,
                -(p * PI * 8.0).sin().abs() * 30.0,
            ),
            CelebrationPattern::SpinJump => Vec2::new(
                (p * PI * 3.0).sin() * 15.0,
                -(p * PI * 6.0).sin().abs() * 25.0,
            ),
            CelebrationPattern::WiggleHop => Vec2::new(
                (p * PI * 12.0).sin() * 12.0,
                -(p * PI * 10.0).sin().abs() * 15.0,
            ),
        }
    }
}

/// A running celebration dance
#[derive(Debug, Clone, PartialEq)]
pub struct Celebration {
    pub pair: PairId,
    pub pattern: CelebrationPattern,
    pub origin: Vec2,
    pub elapsed: f32,
    pub done: bool,
}

impl Celebration {
    pub fn new(pair: PairId, origin: Vec2, rng: &mut GameRng) -> Self {
        let pattern = rng
            .pick_copied(&CelebrationPattern::ALL)
            .unwrap_or(CelebrationPattern::CircleDance);
        Self {
            pair,
            pattern,
            origin,
            elapsed: 0.0,
            done: false,
        }
    }

    /// Advance the dance. Returns the new position and whether it just finished.
    pub fn advance(&mut self, dt: f32) -> (Vec2, bool) {
        if self.done {
            return (self.origin + self.pattern.offset(1.0), false);
        }
        self.elapsed += dt;
        let progress = self.elapsed / CELEBRATION_SECS;
        let position = self.origin + self.pattern.offset(progress);
        if progress >= 1.0 {
            self.done = true;
            return (position, true);
        }
        (position, false)
    }
}

// =====================================================
// Exit
// =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitPath {
    Straight,
    Zigzag,
    Spiral,
    Bouncy,
    Loop,
}

impl ExitPath {
    pub const ALL: [ExitPath; 5] = [
        ExitPath::Straight,
        ExitPath::Zigzag,
        ExitPath::Spiral,
        ExitPath::Bouncy,
        ExitPath::Loop,
    ];
}

/// A monster running off the nearest edge
#[derive(Debug, Clone, PartialEq)]
pub struct ExitRun {
    pub path: ExitPath,
    pub heading: Vec2,
    /// Ground track; path shapes are drawn as offsets around it
    pub base: Vec2,
    pub elapsed: f32,
    pub last_trail: f32,
}

/// Result of one exit step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitStep {
    pub position: Vec2,
    pub drop_trail: bool,
}

/// Point just past the playfield edge nearest to `position`
pub fn nearest_exit(position: Vec2, field: &Playfield) -> Vec2 {
    let left = position.x;
    let right = field.width - position.x;
    let top = position.y;
    let bottom = field.height - position.y;
    let nearest = left.min(right).min(top).min(bottom);
    if nearest == left {
        Vec2::new(-EXIT_EDGE_OVERSHOOT, position.y)
    } else if nearest == right {
        Vec2::new(field.width + EXIT_EDGE_OVERSHOOT, position.y)
    } else if nearest == top {
        Vec2::new(position.x, -EXIT_EDGE_OVERSHOOT)
    } else {
        Vec2::new(position.x, field.height + EXIT_EDGE_OVERSHOOT)
    }
}

impl ExitRun {
    pub fn new(position: Vec2, field: &Playfield, rng: &mut GameRng) -> Self {
        let path = rng.pick_copied(&ExitPath::ALL).unwrap_or(ExitPath::Straight);
        let heading = (nearest_exit(position, field) - position).normalize_or(Vec2::NEG_X);
        Self {
            path,
            heading,
            base: position,
            elapsed: 0.0,
            last_trail: 0.0,
        }
    }

    pub fn step(&mut self, dt: f32, rng: &mut GameRng) -> ExitStep {
        self.elapsed += dt;
        let t = self.elapsed;
        let speed = MONSTER_FAST_SPEED;
        let side = self.heading.perp();

        let position = match self.path {
            ExitPath::Straight => {
                self.base += self.heading * speed * dt;
                self.base
            }
            ExitPath::Zigzag => {
                let sway = side * (t * 10.0).sin() * 0.5;
                self.base += (self.heading + sway) * speed * dt;
                self.base
            }
            ExitPath::Spiral => {
                let surge = 1.0 + (t * 8.0).sin() * 0.3;
                let swirl = Vec2::from_angle(t * 5.0) * 0.4;
                self.base += (self.heading * surge + swirl) * speed * dt;
                self.base
            }
            ExitPath::Bouncy => {
                self.base += self.heading * speed * dt;
                self.base - Vec2::new(0.0, (t * 12.0).sin().abs() * 8.0)
            }
            ExitPath::Loop => {
                if t < EXIT_LOOP_SECS {
                    let angle = t / EXIT_LOOP_SECS * TAU;
                    self.base + (Vec2::from_angle(angle) - Vec2::X) * 30.0
                } else {
                    self.base += self.heading * speed * dt;
                    self.base
                }
            }
        };

        let mut drop_trail = false;
        if t - self.last_trail > EXIT_TRAIL_INTERVAL && rng.chance(EXIT_TRAIL_CHANCE) {
            self.last_trail = t;
            drop_trail = true;
        }
        ExitStep {
            position,
            drop_trail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::EXIT_MARGIN;

    fn field() -> Playfield {
        Playfield::new(800.0, 600.0)
    }

    #[test]
    fn test_wander_target_inside_regions() {
        let mut rng = GameRng::seeded(2);
        let field = field();
        for _ in 0..200 {
            let t = pick_wander_target(&field, &mut rng);
            assert!(t.x >= 80.0 && t.x <= 720.0);
            assert!(t.y >= 210.0 && t.y <= 510.0);
        }
    }

    #[test]
    fn test_wander_refreshes_expired_plan() {
        let mut rng = GameRng::seeded(2);
        let field = field();
        let mut plan = WanderPlan::default();
        step_wander(Vec2::new(400.0, 300.0), &mut plan, &field, 0.016, &mut rng);
        assert!(plan.target.is_some());
        assert!(plan.timer >= WANDER_TIMER_MIN && plan.timer <= WANDER_TIMER_MAX);
    }

    #[test]
    fn test_wander_moves_at_slow_speed() {
        let mut rng = GameRng::seeded(2);
        let field = field();
        let mut plan = WanderPlan::toward(Vec2::new(500.0, 300.0), 5.0);
        let next = step_wander(Vec2::new(400.0, 300.0), &mut plan, &field, 0.5, &mut rng);
        assert!((next.x - 430.0).abs() < 1e-3);
        assert_eq!(plan.target, Some(Vec2::new(500.0, 300.0)));
    }

    #[test]
    fn test_wander_rests_near_target() {
        let mut rng = GameRng::seeded(2);
        let field = field();
        let mut plan = WanderPlan::toward(Vec2::new(405.0, 300.0), 5.0);
        let next = step_wander(Vec2::new(400.0, 300.0), &mut plan, &field, 0.5, &mut rng);
        assert_eq!(next, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_follow_snaps() {
        let field = field();
        let slot = Vec2::new(300.0, 300.0);
        assert_eq!(step_follow(Vec2::new(303.0, 300.0), slot, &field, 0.016), slot);
        let far = step_follow(Vec2::new(100.0, 300.0), slot, &field, 0.1);
        assert!((far.x - 142.0).abs() < 1e-3);
    }

    #[test]
    fn test_scatter_sides() {
        let mut rng = GameRng::seeded(3);
        let field = field();
        let avatar = Vec2::new(400.0, 300.0);
        for _ in 0..100 {
            let left = scatter_plan(avatar, Hand::Left, &field, &mut rng);
            let right = scatter_plan(avatar, Hand::Right, &field, &mut rng);
            let (l, r) = (left.target.unwrap_or_default(), right.target.unwrap_or_default());
            assert!(l.x <= avatar.x + 1e-3);
            assert!(r.x >= avatar.x - 1e-3);
            for p in [l, r] {
                assert!(p.x >= 50.0 && p.x <= 750.0);
                assert!(p.y >= 210.0 && p.y <= 550.0);
            }
            assert!(left.timer >= SCATTER_TIMER_MIN && left.timer <= SCATTER_TIMER_MAX);
        }
    }

    #[test]
    fn test_celebration_finishes_once() {
        let mut rng = GameRng::seeded(1);
        let mut dance = Celebration::new(PairId(0), Vec2::new(100.0, 100.0), &mut rng);
        let mut finished = 0;
        for _ in 0..120 {
            let (_, done) = dance.advance(1.0 / 60.0);
            if done {
                finished += 1;
            }
        }
        assert_eq!(finished, 1);
        assert!(dance.done);
    }

    #[test]
    fn test_celebration_starts_at_origin_offset() {
        for pattern in CelebrationPattern::ALL {
            let o = pattern.offset(0.0);
            assert!(o.y.abs() < 1e-4);
            assert!(o.length() <= 25.0 + 1e-4);
        }
    }

    #[test]
    fn test_nearest_exit() {
        let field = field();
        assert_eq!(nearest_exit(Vec2::new(100.0, 300.0), &field), Vec2::new(-50.0, 300.0));
        assert_eq!(nearest_exit(Vec2::new(700.0, 300.0), &field), Vec2::new(850.0, 300.0));
        assert_eq!(nearest_exit(Vec2::new(400.0, 550.0), &field), Vec2::new(400.0, 650.0));
        assert_eq!(nearest_exit(Vec2::new(400.0, 20.0), &field), Vec2::new(400.0, -50.0));
    }

    #[test]
    fn test_every_exit_path_leaves_field() {
        let field = field();
        let mut rng = GameRng::seeded(6);
        for path in ExitPath::ALL {
            let start = Vec2::new(400.0, 480.0);
            let mut run = ExitRun::new(start, &field, &mut rng);
            run.path = path;
            let mut left = false;
            for _ in 0..300 {
                let step = run.step(1.0 / 60.0, &mut rng);
                if field.is_beyond(step.position, EXIT_MARGIN) {
                    left = true;
                    break;
                }
            }
            assert!(left, "{path:?} never left the field");
        }
    }
}
