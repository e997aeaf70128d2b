//! Target zones and the per-tick zone controller.
//!
//! Occupancy is recomputed every tick. When a zone first holds two eligible
//! monsters, the first two (id order) are frozen into a dwell snapshot and
//! evaluated once the dwell delay has passed, whether or not they are still
//! inside the radius by then.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::arithmetic::pair_matches;
use crate::constants::{ZONE_CHECK_DELAY, ZONE_RADIUS};
use crate::monster::{MonsterId, MonsterRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub usize);

/// Visual intensity driven by occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GlowTier {
    #[default]
    Idle,
    /// One occupant: soft pulse
    Warm,
    /// Two or more: ready pulse
    Ready,
}

impl GlowTier {
    pub fn for_occupancy(count: usize) -> Self {
        match count {
            0 => GlowTier::Idle,
            1 => GlowTier::Warm,
            _ => GlowTier::Ready,
        }
    }
}

/// A dwell timer and the pair frozen when it started
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingCheck {
    pub remaining: f32,
    pub pair: [MonsterId; 2],
}

#[derive(Debug, Clone)]
pub struct TargetZone {
    pub id: ZoneId,
    pub position: Vec2,
    pub target: i32,
    pub occupancy: usize,
    pub glow: GlowTier,
    /// Clock for the renderer's pulse animation
    pub pulse_time: f32,
    pub check: Option<PendingCheck>,
}

impl TargetZone {
    pub fn new(id: ZoneId, position: Vec2, target: i32) -> Self {
        Self {
            id,
            position,
            target,
            occupancy: 0,
            glow: GlowTier::Idle,
            pulse_time: 0.0,
            check: None,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.position.distance(point) < ZONE_RADIUS
    }

    pub fn is_checking(&self) -> bool {
        self.check.is_some()
    }

    /// Drop any pending check, returning the frozen pair
    pub fn cancel_check(&mut self) -> Option<[MonsterId; 2]> {
        self.check.take().map(|c| c.pair)
    }
}

/// Pair evaluated by an elapsed dwell timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairCheck {
    pub zone: ZoneId,
    pub pair: [MonsterId; 2],
    pub values: [i32; 2],
    pub target: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneVerdict {
    Matched(PairCheck),
    Mismatched(PairCheck),
}

impl ZoneVerdict {
    pub fn check(&self) -> &PairCheck {
        match self {
            ZoneVerdict::Matched(c) | ZoneVerdict::Mismatched(c) => c,
        }
    }
}

/// Run one controller pass over every zone. Verdicts are returned for the
/// engine to apply; nothing here touches hands or score.
pub fn survey_zones(
    zones: &mut [TargetZone],
    registry: &mut MonsterRegistry,
    dt: f32,
) -> Vec<ZoneVerdict> {
    for monster in registry.iter_mut() {
        monster.zone = if monster.state.is_in_play() {
            zones
                .iter()
                .find(|z| z.contains(monster.position))
                .map(|z| z.id)
        } else {
            None
        };
    }

    let mut verdicts = Vec::new();
    for zone in zones.iter_mut() {
        let occupants: Vec<MonsterId> = registry
            .iter()
            .filter(|m| m.zone == Some(zone.id))
            .map(|m| m.id)
            .collect();
        zone.occupancy = occupants.len();
        zone.glow = GlowTier::for_occupancy(zone.occupancy);
        zone.pulse_time += dt;

        match zone.check {
            None => {
                let free: Vec<MonsterId> = occupants
                    .into_iter()
                    .filter(|id| {
                        registry
                            .get(*id)
                            .is_some_and(|m| m.state.checking_zone().is_none())
                    })
                    .take(2)
                    .collect();
                if let [a, b] = free[..] {
                    for id in [a, b] {
                        if let Some(monster) = registry.get_mut(id) {
                            monster.state.enter_check(zone.id);
                        }
                    }
                    zone.check = Some(PendingCheck {
                        remaining: ZONE_CHECK_DELAY,
                        pair: [a, b],
                    });
                    trace!(zone = zone.id.0, a = a.0, b = b.0, "dwell timer started");
                }
            }
            Some(ref mut check) => {
                check.remaining -= dt;
                if check.remaining > 0.0 {
                    continue;
                }
                let pair = check.pair;
                zone.check = None;
                if let Some(verdict) = evaluate(zone, pair, registry) {
                    verdicts.push(verdict);
                }
            }
        }
    }
    verdicts
}

/// Judge a frozen pair. Stale or no-longer-checking members turn the check
/// into a no-op and any surviving member resumes what it was doing.
fn evaluate(
    zone: &TargetZone,
    pair: [MonsterId; 2],
    registry: &mut MonsterRegistry,
) -> Option<ZoneVerdict> {
    let value_of = |id: MonsterId| {
        registry
            .get(id)
            .filter(|m| m.state.checking_zone() == Some(zone.id))
            .map(|m| m.value)
    };
    match (value_of(pair[0]), value_of(pair[1])) {
        (Some(a), Some(b)) => {
            let check = PairCheck {
                zone: zone.id,
                pair,
                values: [a, b],
                target: zone.target,
            };
            Some(if pair_matches(a, b, zone.target) {
                ZoneVerdict::Matched(check)
            } else {
                ZoneVerdict::Mismatched(check)
            })
        }
        _ => {
            trace!(zone = zone.id.0, "dwell check skipped, pair no longer valid");
            for id in pair {
                if let Some(monster) = registry.get_mut(id) {
                    if monster.state.checking_zone() == Some(zone.id) {
                        monster.state.resume_drive();
                    }
                }
            }
            None
        }
    }
}
