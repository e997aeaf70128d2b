//! Live monster registry and the recycled design pool.

use std::collections::BTreeMap;

use bevy::math::Vec2;
use tracing::{debug, warn};

use super::{Monster, MonsterId, MonsterState};
use crate::constants::DESIGN_COUNT;
use crate::rng::GameRng;

/// Tracks which of the eight designs are worn by live monsters.
#[derive(Debug, Clone, Default)]
pub struct DesignPool {
    in_use: [u8; DESIGN_COUNT],
}

impl DesignPool {
    /// Uniform pick among free designs. Falls back to any design when all
    /// eight are taken.
    pub fn acquire(&mut self, rng: &mut GameRng) -> usize {
        let free: Vec<usize> = (0..DESIGN_COUNT).filter(|d| self.is_free(*d)).collect();
        let design = match rng.pick_copied(&free) {
            Some(design) => design,
            None => {
                let reused = rng.range_i32(0, DESIGN_COUNT as i32 - 1) as usize;
                warn!(design = reused, "design pool exhausted, reusing a design");
                reused
            }
        };
        self.in_use[design] = self.in_use[design].saturating_add(1);
        design
    }

    pub fn release(&mut self, design: usize) {
        if let Some(count) = self.in_use.get_mut(design) {
            *count = count.saturating_sub(1);
        }
    }

    pub fn is_free(&self, design: usize) -> bool {
        self.in_use.get(design).is_some_and(|c| *c == 0)
    }

    pub fn free_count(&self) -> usize {
        self.in_use.iter().filter(|c| **c == 0).count()
    }
}

/// Every live monster keyed by id. Iteration is in id order, which the zone
/// controller relies on for a stable dwell snapshot.
#[derive(Debug, Default)]
pub struct MonsterRegistry {
    monsters: BTreeMap<MonsterId, Monster>,
    designs: DesignPool,
    next_id: u32,
}

impl MonsterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(
        &mut self,
        value: i32,
        position: Vec2,
        state: MonsterState,
        rng: &mut GameRng,
    ) -> MonsterId {
        let id = MonsterId(self.next_id);
        self.next_id += 1;
        let design = self.designs.acquire(rng);
        debug!(id = id.0, value, design, "monster spawned");
        self.monsters.insert(
            id,
            Monster {
                id,
                design,
                value,
                position,
                state,
                zone: None,
            },
        );
        id
    }

    /// Remove a monster and free its design. Unknown ids are a no-op.
    pub fn despawn(&mut self, id: MonsterId) -> Option<Monster> {
        let monster = self.monsters.remove(&id)?;
        self.designs.release(monster.design);
        debug!(id = id.0, design = monster.design, "monster destroyed");
        Some(monster)
    }

    pub fn get(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.get(&id)
    }

    pub fn get_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.monsters.get_mut(&id)
    }

    pub fn contains(&self, id: MonsterId) -> bool {
        self.monsters.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Monster> {
        self.monsters.values_mut()
    }

    pub fn ids(&self) -> Vec<MonsterId> {
        self.monsters.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    /// Values of monsters still in play, the pool the spawn policy solves against
    pub fn live_values(&self) -> Vec<i32> {
        self.monsters
            .values()
            .filter(|m| m.state.is_in_play())
            .map(|m| m.value)
            .collect()
    }

    pub fn designs(&self) -> &DesignPool {
        &self.designs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monster::PairId;

    fn spawn_n(registry: &mut MonsterRegistry, rng: &mut GameRng, n: usize) -> Vec<MonsterId> {
        (0..n)
            .map(|i| registry.spawn(1 + i as i32 % 5, Vec2::ZERO, MonsterState::default(), rng))
            .collect()
    }

    #[test]
    fn test_designs_unique_while_live() {
        let mut rng = GameRng::seeded(4);
        let mut registry = MonsterRegistry::new();
        spawn_n(&mut registry, &mut rng, DESIGN_COUNT);
        let mut designs: Vec<usize> = registry.iter().map(|m| m.design).collect();
        designs.sort();
        designs.dedup();
        assert_eq!(designs.len(), DESIGN_COUNT);
        assert_eq!(registry.designs().free_count(), 0);
    }

    #[test]
    fn test_freed_design_is_reused() {
        let mut rng = GameRng::seeded(4);
        let mut registry = MonsterRegistry::new();
        let ids = spawn_n(&mut registry, &mut rng, DESIGN_COUNT);
        let freed = registry.despawn(ids[3]).expect("live monster").design;
        assert!(registry.designs().is_free(freed));

        let id = registry.spawn(2, Vec2::ZERO, MonsterState::default(), &mut rng);
        assert_eq!(registry.get(id).map(|m| m.design), Some(freed));
    }

    #[test]
    fn test_exhausted_pool_still_spawns() {
        let mut rng = GameRng::seeded(4);
        let mut registry = MonsterRegistry::new();
        spawn_n(&mut registry, &mut rng, DESIGN_COUNT + 2);
        assert_eq!(registry.len(), DESIGN_COUNT + 2);
        assert!(registry.iter().all(|m| m.design < DESIGN_COUNT));
    }

    #[test]
    fn test_ids_never_reused() {
        let mut rng = GameRng::seeded(4);
        let mut registry = MonsterRegistry::new();
        let first = registry.spawn(1, Vec2::ZERO, MonsterState::default(), &mut rng);
        registry.despawn(first);
        let second = registry.spawn(1, Vec2::ZERO, MonsterState::default(), &mut rng);
        assert_ne!(first, second);
        assert!(registry.despawn(first).is_none());
    }

    #[test]
    fn test_live_values_skip_busy_monsters() {
        let mut rng = GameRng::seeded(4);
        let mut registry = MonsterRegistry::new();
        registry.spawn(2, Vec2::ZERO, MonsterState::default(), &mut rng);
        registry.spawn(3, Vec2::ZERO, MonsterState::Bumping { pair: PairId(0) }, &mut rng);
        assert_eq!(registry.live_values(), vec![2]);
    }
}
