//! Zone arithmetic resolver.
//!
//! Decides whether two monster values satisfy a zone target and picks spawn
//! values that keep the field solvable. Every function is pure apart from the
//! caller-supplied [`GameRng`], so the rules can be tested without an engine.

use crate::constants::{
    CONSTRAINED_SPAWN_CHANCE, MAX_MONSTER_VALUE, MAX_TARGET, MIN_MONSTER_VALUE, MIN_TARGET,
};
use crate::rng::GameRng;

/// True iff two values at distinct positions sum to one of `targets`.
pub fn is_solvable(numbers: &[i32], targets: &[i32]) -> bool {
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if targets.contains(&(numbers[i] + numbers[j])) {
                return true;
            }
        }
    }
    false
}

/// Whether a single pair matches a zone target
pub fn pair_matches(a: i32, b: i32, target: i32) -> bool {
    a + b == target
}

/// Every value `v` in the monster range with `e + v == t` for some
/// existing `e` and target `t`. Duplicates are kept so that values completing
/// several pairs are proportionally more likely to be picked.
pub fn constrained_candidates(existing: &[i32], targets: &[i32]) -> Vec<i32> {
    let mut candidates = Vec::new();
    for &target in targets {
        for &value in existing {
            let needed = target - value;
            if (MIN_MONSTER_VALUE..=MAX_MONSTER_VALUE).contains(&needed) {
                candidates.push(needed);
            }
        }
    }
    candidates
}

/// A value that completes some pair with `existing`, or a uniform random
/// monster value when nothing can be completed.
pub fn choose_constrained_value(existing: &[i32], targets: &[i32], rng: &mut GameRng) -> i32 {
    let candidates = constrained_candidates(existing, targets);
    match rng.pick_copied(&candidates) {
        Some(value) => value,
        None => random_value(rng),
    }
}

/// Spawn policy: repair the field when it has no solvable pair, otherwise
/// bias toward another solvable value while keeping some variety.
pub fn pick_next_spawn_value(current: &[i32], targets: &[i32], rng: &mut GameRng) -> i32 {
    if current.len() < 2 || !is_solvable(current, targets) {
        return choose_constrained_value(current, targets, rng);
    }
    if rng.chance(CONSTRAINED_SPAWN_CHANCE) {
        choose_constrained_value(current, targets, rng)
    } else {
        random_value(rng)
    }
}

/// Uniform target in `[MIN_TARGET, MAX_TARGET]` excluding `current`.
pub fn reroll_target(current: i32, rng: &mut GameRng) -> i32 {
    let options: Vec<i32> = (MIN_TARGET..=MAX_TARGET)
        .filter(|t| *t != current)
        .collect();
    rng.pick_copied(&options).unwrap_or(MIN_TARGET)
}

/// Guaranteed opening pair: a random target split into two in-range values.
pub fn opening_pair(targets: &[i32], rng: &mut GameRng) -> Option<(i32, i32)> {
    let target = rng.pick_copied(targets)?;
    let lo = (target - MAX_MONSTER_VALUE).max(MIN_MONSTER_VALUE);
    let hi = (target - MIN_MONSTER_VALUE).min(MAX_MONSTER_VALUE);
    if lo > hi {
        return None;
    }
    let first = rng.range_i32(lo, hi);
    Some((first, target - first))
}

/// Uniform monster value
pub fn random_value(rng: &mut GameRng) -> i32 {
    rng.range_i32(MIN_MONSTER_VALUE, MAX_MONSTER_VALUE)
}
