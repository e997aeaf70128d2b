//! Property-based tests using proptest
//!
//! Invariants that must hold for all inputs:
//! - Solvability check agrees with the pairwise definition
//! - Spawn values stay in range and repair unsolvable fields when possible
//! - Target rerolls always change the target and stay in range
//! - The opening pair always solves one of the targets
//! - The design pool never hands out a duplicate while a design is free

use proptest::prelude::*;

use monster_math::arithmetic::*;
use monster_math::constants::{
    DESIGN_COUNT, MAX_MONSTER_VALUE, MAX_TARGET, MIN_MONSTER_VALUE, MIN_TARGET,
};
use monster_math::monster::{DesignPool, MonsterRegistry, MonsterState};
use monster_math::rng::GameRng;

fn values() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(MIN_MONSTER_VALUE..=MAX_MONSTER_VALUE, 0..8)
}

fn targets() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(MIN_TARGET..=MAX_TARGET, 1..4)
}

// ============================================================
// Arithmetic resolver
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn prop_solvable_matches_pairwise_definition(numbers in values(), targets in targets()) {
        let expected = numbers.iter().enumerate().any(|(i, a)| {
            numbers
                .iter()
                .skip(i + 1)
                .any(|b| targets.contains(&(a + b)))
        });
        prop_assert_eq!(is_solvable(&numbers, &targets), expected);
    }

    #[test]
    fn prop_constrained_value_in_range(
        seed in any::<u64>(),
        numbers in values(),
        targets in targets(),
    ) {
        let mut rng = GameRng::seeded(seed);
        let value = choose_constrained_value(&numbers, &targets, &mut rng);
        prop_assert!((MIN_MONSTER_VALUE..=MAX_MONSTER_VALUE).contains(&value));
        if !constrained_candidates(&numbers, &targets).is_empty() {
            prop_assert!(
                numbers.iter().any(|e| targets.contains(&(e + value))),
                "{value} completes nothing in {numbers:?} for {targets:?}"
            );
        }
    }

    #[test]
    fn prop_spawn_repairs_unsolvable_field(
        seed in any::<u64>(),
        numbers in values(),
        targets in targets(),
    ) {
        let mut rng = GameRng::seeded(seed);
        let value = pick_next_spawn_value(&numbers, &targets, &mut rng);
        prop_assert!((MIN_MONSTER_VALUE..=MAX_MONSTER_VALUE).contains(&value));

        let repairable = !constrained_candidates(&numbers, &targets).is_empty();
        if !is_solvable(&numbers, &targets) && repairable {
            let mut after = numbers.clone();
            after.push(value);
            prop_assert!(is_solvable(&after, &targets));
        }
    }

    #[test]
    fn prop_reroll_changes_target(seed in any::<u64>(), current in MIN_TARGET..=MAX_TARGET) {
        let mut rng = GameRng::seeded(seed);
        let next = reroll_target(current, &mut rng);
        prop_assert_ne!(next, current);
        prop_assert!((MIN_TARGET..=MAX_TARGET).contains(&next));
    }

    #[test]
    fn prop_opening_pair_solves_a_target(seed in any::<u64>(), targets in targets()) {
        let mut rng = GameRng::seeded(seed);
        let (a, b) = opening_pair(&targets, &mut rng).expect("every target in range splits");
        prop_assert!((MIN_MONSTER_VALUE..=MAX_MONSTER_VALUE).contains(&a));
        prop_assert!((MIN_MONSTER_VALUE..=MAX_MONSTER_VALUE).contains(&b));
        prop_assert!(targets.contains(&(a + b)));
    }
}

// ============================================================
// Design pool
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_designs_unique_while_free(seed in any::<u64>(), count in 1usize..=DESIGN_COUNT) {
        let mut rng = GameRng::seeded(seed);
        let mut pool = DesignPool::default();
        let mut taken: Vec<usize> = (0..count).map(|_| pool.acquire(&mut rng)).collect();
        taken.sort_unstable();
        taken.dedup();
        prop_assert_eq!(taken.len(), count);
        prop_assert_eq!(pool.free_count(), DESIGN_COUNT - count);
    }

    #[test]
    fn prop_despawn_frees_design(seed in any::<u64>(), count in 1usize..12) {
        let mut rng = GameRng::seeded(seed);
        let mut registry = MonsterRegistry::new();
        let ids: Vec<_> = (0..count)
            .map(|_| {
                registry.spawn(3, Default::default(), MonsterState::default(), &mut rng)
            })
            .collect();
        for id in ids {
            prop_assert!(registry.despawn(id).is_some());
        }
        prop_assert!(registry.is_empty());
        prop_assert_eq!(registry.designs().free_count(), DESIGN_COUNT);
    }
}
