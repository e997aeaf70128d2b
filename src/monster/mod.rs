//! Numbered monsters: identity, design catalog and behavior state.
//!
//! A monster carries a value 1-5 and one of eight designs. Its behavior is a
//! single [`MonsterState`] so the mutually exclusive states can never overlap;
//! per-state data (wander plan, celebration clock, exit path) lives inside the
//! variant and disappears with it.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::DESIGN_COUNT;
use crate::player::Hand;
use crate::zone::ZoneId;

pub mod behavior;
pub mod pair;
pub mod registry;

pub use behavior::{CelebrationPattern, ExitPath, ExitRun};
pub use pair::{BumpMotion, CelebrationPair, PairId};
pub use registry::{DesignPool, MonsterRegistry};

/// Stable identity of a live monster. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonsterId(pub u32);

// =====================================================
// Design catalog
// =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyShape {
    Circle,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EyeStyle {
    Big,
    Sleepy,
    Wide,
    Small,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feature {
    Antennae,
    Horns,
    Spots,
    Spikes,
    Ears,
    Bow,
    Freckles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expression {
    Happy,
    Silly,
    Surprised,
    Wink,
    Content,
}

/// Visual variant. The renderer draws it; the core only tracks uniqueness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonsterDesign {
    pub name: &'static str,
    pub body_color: [u8; 3],
    pub shape: BodyShape,
    pub eyes: EyeStyle,
    pub feature: Feature,
    pub expression: Expression,
}

pub const MONSTER_DESIGNS: [MonsterDesign; DESIGN_COUNT] = [
    MonsterDesign {
        name: "Blobby",
        body_color: [255, 150, 180],
        shape: BodyShape::Circle,
        eyes: EyeStyle::Big,
        feature: Feature::Antennae,
        expression: Expression::Happy,
    },
    MonsterDesign {
        name: "Ziggy",
        body_color: [150, 255, 170],
        shape: BodyShape::Square,
        eyes: EyeStyle::Sleepy,
        feature: Feature::Horns,
        expression: Expression::Silly,
    },
    MonsterDesign {
        name: "Puff",
        body_color: [150, 180, 255],
        shape: BodyShape::Circle,
        eyes: EyeStyle::Wide,
        feature: Feature::Spots,
        expression: Expression::Surprised,
    },
    MonsterDesign {
        name: "Sunny",
        body_color: [255, 230, 130],
        shape: BodyShape::Square,
        eyes: EyeStyle::Big,
        feature: Feature::Spikes,
        expression: Expression::Happy,
    },
    MonsterDesign {
        name: "Tangy",
        body_color: [255, 180, 130],
        shape: BodyShape::Circle,
        eyes: EyeStyle::Small,
        feature: Feature::Ears,
        expression: Expression::Wink,
    },
    MonsterDesign {
        name: "Grape",
        body_color: [200, 160, 255],
        shape: BodyShape::Square,
        eyes: EyeStyle::Big,
        feature: Feature::Bow,
        expression: Expression::Happy,
    },
    MonsterDesign {
        name: "Minty",
        body_color: [160, 255, 220],
        shape: BodyShape::Circle,
        eyes: EyeStyle::Wide,
        feature: Feature::Antennae,
        expression: Expression::Silly,
    },
    MonsterDesign {
        name: "Coral",
        body_color: [255, 160, 160],
        shape: BodyShape::Square,
        eyes: EyeStyle::Sleepy,
        feature: Feature::Freckles,
        expression: Expression::Content,
    },
];

// =====================================================
// Behavior state
// =====================================================

/// Rest point and countdown for a wandering monster
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WanderPlan {
    pub target: Option<Vec2>,
    pub timer: f32,
}

impl WanderPlan {
    pub fn toward(target: Vec2, timer: f32) -> Self {
        Self {
            target: Some(target),
            timer,
        }
    }
}

/// What moves a monster while its zone check is pending
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Drive {
    Hand(Hand),
    Wander(WanderPlan),
}

/// Per-monster behavior. Exactly one is active at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum MonsterState {
    Wandering(WanderPlan),
    Following { hand: Hand },
    /// Frozen into a zone's dwell snapshot; keeps moving under its drive
    InZoneChecking { zone: ZoneId, drive: Drive },
    Celebrating(behavior::Celebration),
    Bumping { pair: PairId },
    Parading { slot: usize },
    Exiting(ExitRun),
}

impl Default for MonsterState {
    fn default() -> Self {
        MonsterState::Wandering(WanderPlan::default())
    }
}

/// Fieldless mirror of [`MonsterState`] for queries and snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    Wandering,
    Following,
    InZoneChecking,
    Celebrating,
    Bumping,
    Parading,
    Exiting,
}

impl MonsterState {
    pub fn kind(&self) -> StateKind {
        match self {
            MonsterState::Wandering(_) => StateKind::Wandering,
            MonsterState::Following { .. } => StateKind::Following,
            MonsterState::InZoneChecking { .. } => StateKind::InZoneChecking,
            MonsterState::Celebrating(_) => StateKind::Celebrating,
            MonsterState::Bumping { .. } => StateKind::Bumping,
            MonsterState::Parading { .. } => StateKind::Parading,
            MonsterState::Exiting(_) => StateKind::Exiting,
        }
    }

    /// Hand currently holding this monster, if any
    pub fn hand(&self) -> Option<Hand> {
        match self {
            MonsterState::Following { hand } => Some(*hand),
            MonsterState::InZoneChecking {
                drive: Drive::Hand(hand),
                ..
            } => Some(*hand),
            _ => None,
        }
    }

    /// Counts toward zone occupancy and value pools
    pub fn is_in_play(&self) -> bool {
        matches!(
            self,
            MonsterState::Wandering(_)
                | MonsterState::Following { .. }
                | MonsterState::InZoneChecking { .. }
        )
    }

    /// Only idle wanderers can be picked up
    pub fn can_take_hand(&self) -> bool {
        matches!(self, MonsterState::Wandering(_))
    }

    /// Zone whose pending check holds this monster
    pub fn checking_zone(&self) -> Option<ZoneId> {
        match self {
            MonsterState::InZoneChecking { zone, .. } => Some(*zone),
            _ => None,
        }
    }

    /// Freeze into `zone`'s dwell snapshot, keeping the current drive.
    /// Returns false when the state has no drive to keep.
    pub fn enter_check(&mut self, zone: ZoneId) -> bool {
        let drive = match self {
            MonsterState::Wandering(plan) => Drive::Wander(*plan),
            MonsterState::Following { hand } => Drive::Hand(*hand),
            MonsterState::InZoneChecking { drive, .. } => *drive,
            _ => return false,
        };
        *self = MonsterState::InZoneChecking { zone, drive };
        true
    }

    /// Leave a dwell snapshot without a verdict
    pub fn resume_drive(&mut self) {
        if let MonsterState::InZoneChecking { drive, .. } = self {
            *self = match *drive {
                Drive::Hand(hand) => MonsterState::Following { hand },
                Drive::Wander(plan) => MonsterState::Wandering(plan),
            };
        }
    }

    /// Drop the hand while keeping any pending zone check
    pub fn let_go(&mut self, plan: WanderPlan) -> bool {
        match self {
            MonsterState::Following { .. } => {
                *self = MonsterState::Wandering(plan);
                true
            }
            MonsterState::InZoneChecking { drive, .. } if matches!(drive, Drive::Hand(_)) => {
                *drive = Drive::Wander(plan);
                true
            }
            _ => false,
        }
    }
}

/// A live monster record
#[derive(Debug, Clone)]
pub struct Monster {
    pub id: MonsterId,
    pub design: usize,
    pub value: i32,
    pub position: Vec2,
    pub state: MonsterState,
    /// Zone the monster currently stands in (lookup only)
    pub zone: Option<ZoneId>,
}

impl Monster {
    pub fn kind(&self) -> StateKind {
        self.state.kind()
    }

    pub fn design_info(&self) -> &'static MonsterDesign {
        &MONSTER_DESIGNS[self.design % DESIGN_COUNT]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_designs_unique_names() {
        for (i, a) in MONSTER_DESIGNS.iter().enumerate() {
            for b in MONSTER_DESIGNS.iter().skip(i + 1) {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn test_default_state_is_wandering() {
        assert_eq!(MonsterState::default().kind(), StateKind::Wandering);
    }

    #[test]
    fn test_enter_check_keeps_hand() {
        let mut state = MonsterState::Following { hand: Hand::Right };
        assert!(state.enter_check(ZoneId(1)));
        assert_eq!(state.kind(), StateKind::InZoneChecking);
        assert_eq!(state.hand(), Some(Hand::Right));
        assert_eq!(state.checking_zone(), Some(ZoneId(1)));

        state.resume_drive();
        assert_eq!(state, MonsterState::Following { hand: Hand::Right });
    }

    #[test]
    fn test_enter_check_rejects_busy_states() {
        let mut state = MonsterState::Bumping { pair: PairId(3) };
        assert!(!state.enter_check(ZoneId(0)));
        assert_eq!(state.kind(), StateKind::Bumping);

        let mut parading = MonsterState::Parading { slot: 0 };
        assert!(!parading.enter_check(ZoneId(0)));
    }

    #[test]
    fn test_let_go_inside_check() {
        let mut state = MonsterState::InZoneChecking {
            zone: ZoneId(2),
            drive: Drive::Hand(Hand::Left),
        };
        let plan = WanderPlan::toward(Vec2::new(10.0, 20.0), 2.0);
        assert!(state.let_go(plan));
        assert_eq!(state.hand(), None);
        assert_eq!(state.checking_zone(), Some(ZoneId(2)));

        // nothing left to let go of
        assert!(!state.let_go(plan));
    }

    #[test]
    fn test_eligibility() {
        assert!(MonsterState::default().can_take_hand());
        assert!(!MonsterState::Following { hand: Hand::Left }.can_take_hand());
        assert!(!MonsterState::Parading { slot: 1 }.is_in_play());
        assert!(MonsterState::Following { hand: Hand::Left }.is_in_play());
    }
}
