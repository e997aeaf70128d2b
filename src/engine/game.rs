use std::collections::{BTreeMap, BTreeSet};

use bevy::math::{Vec2, Vec3};
use tracing::{debug, info, trace};

use crate::arithmetic::{opening_pair, pick_next_spawn_value, reroll_target};
use crate::constants::{
    EXIT_MARGIN, MAX_MONSTER_VALUE, MAX_TARGET, MIN_MONSTER_VALUE, MIN_TARGET,
    PARADE_ARM_DELAY_SECS, PARADE_AVATAR_EASE, PARADE_BANNER_SECS, PARADE_FINALE_BURSTS,
    PARADE_FINALE_CONFETTI, PARADE_FINALE_STAGGER, PARADE_MONSTER_EASE, PARADE_SETTLE_SECS,
    REPLACEMENT_DELAY_SECS, WANDER_TIMER_MAX,
};
use crate::effects::{EffectRegistry, EntityRef};
use crate::engine::config::EngineConfig;
use crate::engine::messages::FrameSnapshot;
use crate::input::{GameKey, ReleaseTrigger, ShakeDetector};
use crate::monster::behavior::{
    fresh_wander_plan, plan_in_box, scatter_plan, step_follow, step_wander, Celebration,
};
use crate::monster::{
    BumpMotion, CelebrationPair, Drive, ExitRun, Monster, MonsterId, MonsterRegistry,
    MonsterState, PairId, WanderPlan,
};
use crate::parade::ParadeSequencer;
use crate::player::{Avatar, Hand};
use crate::rng::GameRng;
use crate::schedule::{ScheduledTask, TaskQueue};
use crate::session::SessionState;
use crate::world::{frame_ease, Playfield};
use crate::zone::{survey_zones, PairCheck, TargetZone, ZoneId, ZoneVerdict};

/// Confetti dropped at the zone on a solved pair
const SUCCESS_ZONE_CONFETTI: usize = 30;
/// Confetti dropped on each member of a solved pair
const SUCCESS_MONSTER_CONFETTI: usize = 8;
/// Confetti dropped along an exit trail
const EXIT_TRAIL_CONFETTI: usize = 2;
/// Balloons rise from just above the marcher
const BALLOON_LIFT: f32 = 20.0;

/// Lower-half box a monster wanders to after a bump
const BUMP_REST_BOX: ((f32, f32), (f32, f32)) = ((0.15, 0.5), (0.85, 0.85));
/// Box monsters wander to once the parade has settled
const SETTLE_BOX: ((f32, f32), (f32, f32)) = ((0.15, 0.15), (0.85, 0.85));

/// One game session. Owns every piece of mutable simulation state and
/// advances it a tick at a time; nothing is shared between engines.
pub struct GameEngine {
    pub config: EngineConfig,
    field: Playfield,
    rng: GameRng,
    avatar: Avatar,
    pointer: Option<Vec2>,
    /// Monsters overlapping the avatar last tick, for enter detection
    touching: BTreeSet<MonsterId>,
    monsters: MonsterRegistry,
    zones: Vec<TargetZone>,
    session: SessionState,
    parade: ParadeSequencer,
    effects: EffectRegistry,
    tasks: TaskQueue,
    shake: ShakeDetector,
    celebrations: BTreeMap<PairId, CelebrationPair>,
    bumps: BTreeMap<PairId, BumpMotion>,
    next_pair: u32,
    elapsed: f32,
}

impl GameEngine {
    pub fn new(config: EngineConfig) -> Self {
        let field = Playfield::for_layout(config.layout);
        let zones = config
            .zone_targets
            .iter()
            .zip(config.layout.zone_fractions())
            .enumerate()
            .map(|(i, (target, (fx, fy)))| TargetZone::new(ZoneId(i), field.frac(fx, fy), *target))
            .collect();

        let mut engine = Self {
            field,
            rng: GameRng::seeded(config.seed),
            avatar: Avatar::new(field.center()),
            pointer: None,
            touching: BTreeSet::new(),
            monsters: MonsterRegistry::new(),
            zones,
            session: SessionState::new(),
            parade: ParadeSequencer::new(&field),
            effects: EffectRegistry::new(),
            tasks: TaskQueue::new(),
            shake: ShakeDetector::new(config.shake),
            celebrations: BTreeMap::new(),
            bumps: BTreeMap::new(),
            next_pair: 0,
            elapsed: 0.0,
            config,
        };
        engine.spawn_opening();
        info!(
            seed = engine.config.seed,
            layout = ?engine.config.layout,
            targets = ?engine.targets(),
            monsters = engine.monsters.len(),
            "session started"
        );
        engine
    }

    fn spawn_opening(&mut self) {
        let mut remaining = self.config.opening_monsters;
        if remaining >= 2 {
            let targets = self.targets();
            if let Some((a, b)) = opening_pair(&targets, &mut self.rng) {
                for value in [a, b] {
                    let position = self.random_spawn_point();
                    self.spawn_wandering(value, position);
                }
                remaining -= 2;
            }
        }
        for _ in 0..remaining {
            self.spawn_smart();
        }
    }

    // =====================================================
    // Tick
    // =====================================================

    /// Advance the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.elapsed += dt;

        for task in self.tasks.drain_due(self.elapsed) {
            self.run_task(task);
        }

        let parading = self.session.parade_in_progress();
        if !parading {
            if let Some(pointer) = self.pointer {
                self.avatar.steer_toward(pointer, &self.field, dt);
            }
            self.collect_touching();
        }
        self.avatar.tick_celebration(dt);

        self.step_monsters(dt);
        self.step_bumps(dt);

        if parading {
            self.step_parade(dt);
        } else {
            let verdicts = survey_zones(&mut self.zones, &mut self.monsters, dt);
            for verdict in verdicts {
                match verdict {
                    ZoneVerdict::Matched(check) => self.resolve_success(check),
                    ZoneVerdict::Mismatched(check) => self.resolve_failure(check),
                }
            }
        }

        self.effects.tick(dt, &self.field);
    }

    fn run_task(&mut self, task: ScheduledTask) {
        match task {
            ScheduledTask::SpawnReplacement => {
                self.spawn_smart();
            }
            ScheduledTask::StartParade => self.start_parade(),
            ScheduledTask::ParadeFinaleBurst => self.finale_burst(),
            ScheduledTask::ParadeSettle => self.settle_parade(),
        }
    }

    /// Pick up monsters the avatar has just walked into
    fn collect_touching(&mut self) {
        let now: BTreeSet<MonsterId> = self
            .monsters
            .iter()
            .filter(|m| self.avatar.overlaps(m.position))
            .map(|m| m.id)
            .collect();
        let entered: Vec<MonsterId> = now.difference(&self.touching).copied().collect();
        self.touching = now;
        for id in entered {
            if self.avatar.hands.is_full() {
                break;
            }
            self.take_hand(id);
        }
    }

    fn take_hand(&mut self, id: MonsterId) -> Option<Hand> {
        let Some(monster) = self.monsters.get_mut(id) else {
            trace!(id = id.0, "hand request for a missing monster ignored");
            return None;
        };
        if !monster.state.can_take_hand() {
            return None;
        }
        let hand = self.avatar.hands.assign(id)?;
        monster.state = MonsterState::Following { hand };
        debug!(id = id.0, ?hand, "monster took a hand");
        Some(hand)
    }

    fn step_monsters(&mut self, dt: f32) {
        let field = self.field;
        let left = self.avatar.hand_slot(Hand::Left);
        let right = self.avatar.hand_slot(Hand::Right);
        let slot_of = |hand: Hand| match hand {
            Hand::Left => left,
            Hand::Right => right,
        };

        let mut danced: Vec<(MonsterId, PairId)> = Vec::new();
        let mut trails: Vec<(MonsterId, Vec2)> = Vec::new();
        let mut exited: Vec<MonsterId> = Vec::new();

        for monster in self.monsters.iter_mut() {
            let position = monster.position;
            monster.position = match &mut monster.state {
                MonsterState::Wandering(plan)
                | MonsterState::InZoneChecking {
                    drive: Drive::Wander(plan),
                    ..
                } => step_wander(position, plan, &field, dt, &mut self.rng),
                MonsterState::Following { hand }
                | MonsterState::InZoneChecking {
                    drive: Drive::Hand(hand),
                    ..
                } => step_follow(position, slot_of(*hand), &field, dt),
                MonsterState::Celebrating(dance) => {
                    let (next, finished) = dance.advance(dt);
                    if finished {
                        danced.push((monster.id, dance.pair));
                    }
                    next
                }
                MonsterState::Exiting(run) => {
                    let step = run.step(dt, &mut self.rng);
                    if step.drop_trail {
                        trails.push((monster.id, step.position));
                    }
                    if field.is_beyond(step.position, EXIT_MARGIN) {
                        exited.push(monster.id);
                    }
                    step.position
                }
                // moved by their own sequencers
                MonsterState::Bumping { .. } | MonsterState::Parading { .. } => position,
            };
        }

        for (id, position) in trails {
            self.effects.confetti(
                position,
                EXIT_TRAIL_CONFETTI,
                Some(EntityRef::Monster(id)),
                &mut self.rng,
            );
        }
        for (id, pair_id) in danced {
            let resolved = self
                .celebrations
                .get_mut(&pair_id)
                .is_some_and(|pair| pair.complete(id));
            if resolved {
                if let Some(pair) = self.celebrations.remove(&pair_id) {
                    self.finish_celebration(pair);
                }
            }
        }
        for id in exited {
            self.destroy_monster(id);
            self.tasks
                .schedule(self.elapsed, REPLACEMENT_DELAY_SECS, ScheduledTask::SpawnReplacement);
        }
    }

    fn step_bumps(&mut self, dt: f32) {
        let mut finished = Vec::new();
        for (pair_id, bump) in self.bumps.iter_mut() {
            let Some(deltas) = bump.advance(dt) else {
                finished.push(*pair_id);
                continue;
            };
            for (id, delta) in bump.members.into_iter().zip(deltas) {
                if let Some(monster) = self.monsters.get_mut(id) {
                    if matches!(monster.state, MonsterState::Bumping { pair } if pair == *pair_id) {
                        monster.position = self.field.clamp_inset(monster.position + delta);
                    }
                }
            }
        }
        for pair_id in finished {
            let Some(bump) = self.bumps.remove(&pair_id) else {
                continue;
            };
            for id in bump.members {
                let plan = plan_in_box(&self.field, BUMP_REST_BOX.0, BUMP_REST_BOX.1, &mut self.rng);
                match self.monsters.get_mut(id) {
                    Some(monster)
                        if matches!(monster.state, MonsterState::Bumping { pair } if pair == pair_id) =>
                    {
                        monster.state = MonsterState::Wandering(plan);
                        monster.zone = None;
                    }
                    _ => trace!(id = id.0, "bump finished for a monster no longer bumping"),
                }
            }
        }
    }

    // =====================================================
    // Zone verdicts
    // =====================================================

    fn new_pair_id(&mut self) -> PairId {
        let id = PairId(self.next_pair);
        self.next_pair += 1;
        id
    }

    fn resolve_success(&mut self, check: PairCheck) {
        info!(
            zone = check.zone.0,
            values = ?check.values,
            target = check.target,
            "pair solved"
        );
        let arm_parade = self.session.award_pair();
        let pair_id = self.new_pair_id();

        if let Some(zone) = self.zones.get(check.zone.0) {
            let source = Some(EntityRef::Zone(check.zone));
            self.effects.sparkles(zone.position, source, &mut self.rng);
            self.effects
                .confetti(zone.position, SUCCESS_ZONE_CONFETTI, source, &mut self.rng);
        }
        self.avatar.start_celebration();

        for id in check.pair {
            self.avatar.hands.clear_monster(id);
            if let Some(monster) = self.monsters.get_mut(id) {
                monster.state =
                    MonsterState::Celebrating(Celebration::new(pair_id, monster.position, &mut self.rng));
                monster.zone = None;
                let position = monster.position;
                self.effects.confetti(
                    position,
                    SUCCESS_MONSTER_CONFETTI,
                    Some(EntityRef::Monster(id)),
                    &mut self.rng,
                );
            }
        }
        self.celebrations
            .insert(pair_id, CelebrationPair::new(check.zone, check.pair, arm_parade));
    }

    fn resolve_failure(&mut self, check: PairCheck) {
        info!(
            zone = check.zone.0,
            values = ?check.values,
            target = check.target,
            "pair mismatched"
        );
        self.session.record_miss();
        let pair_id = self.new_pair_id();

        let mut positions = [Vec2::ZERO; 2];
        for (slot, id) in check.pair.into_iter().enumerate() {
            self.avatar.hands.clear_monster(id);
            if let Some(monster) = self.monsters.get_mut(id) {
                monster.state = MonsterState::Bumping { pair: pair_id };
                positions[slot] = monster.position;
            }
        }
        self.bumps
            .insert(pair_id, BumpMotion::new(check.pair, positions));
    }

    /// Both dancers are done: new target, both run off, maybe arm the parade
    fn finish_celebration(&mut self, pair: CelebrationPair) {
        self.reroll_zone(pair.zone);
        for id in pair.members {
            if let Some(monster) = self.monsters.get_mut(id) {
                if matches!(monster.state, MonsterState::Celebrating(_)) {
                    monster.state =
                        MonsterState::Exiting(ExitRun::new(monster.position, &self.field, &mut self.rng));
                }
            }
        }
        if pair.arm_parade && self.session.mark_parade_triggered() {
            info!(score = self.session.score(), "parade armed");
            self.tasks
                .schedule(self.elapsed, PARADE_ARM_DELAY_SECS, ScheduledTask::StartParade);
        }
    }

    fn reroll_zone(&mut self, zone: ZoneId) {
        if let Some(zone) = self.zones.get_mut(zone.0) {
            let previous = zone.target;
            zone.target = reroll_target(previous, &mut self.rng);
            debug!(zone = zone.id.0, previous, target = zone.target, "zone target rerolled");
        }
    }

    // =====================================================
    // Parade
    // =====================================================

    fn start_parade(&mut self) {
        if self.parade.is_active() {
            return;
        }
        if self.monsters.is_empty() {
            self.session.set_parade_in_progress(false);
            info!("parade skipped, nobody on the field");
            return;
        }
        self.session.set_parade_in_progress(true);

        let in_flight = std::mem::take(&mut self.celebrations);
        for pair in in_flight.into_values() {
            self.reroll_zone(pair.zone);
        }
        self.bumps.clear();
        for zone in self.zones.iter_mut() {
            zone.cancel_check();
        }
        self.avatar.hands.clear();
        self.touching.clear();

        // runners still on the field march too, so no replacement is owed
        let lineup = self.monsters.ids();
        for (slot, id) in lineup.iter().enumerate() {
            if let Some(monster) = self.monsters.get_mut(*id) {
                monster.state = MonsterState::Parading { slot };
                monster.zone = None;
            }
        }
        info!(marchers = lineup.len(), "parade started");
        self.parade.start(lineup);
        self.effects.banner(&self.field, PARADE_BANNER_SECS);
    }

    fn step_parade(&mut self, dt: f32) {
        let Some(step) = self.parade.tick(dt) else {
            return;
        };
        let ease = frame_ease(PARADE_MONSTER_EASE, dt);
        for target in &step.targets {
            let Some(point) = target.point else {
                continue;
            };
            if let Some(monster) = self.monsters.get_mut(target.id) {
                monster.position = monster.position.lerp(point, ease);
                monster.position.y += target.bob;
            }
        }
        if !self.monsters.is_empty() {
            self.avatar
                .ease_toward(step.avatar_target, frame_ease(PARADE_AVATAR_EASE, dt));
            self.avatar.position.y += step.avatar_bob;
        }

        if step.emit_balloon {
            if let Some((id, position)) = self.random_marcher() {
                self.effects.balloon(
                    position - Vec2::new(0.0, BALLOON_LIFT),
                    Some(EntityRef::Monster(id)),
                    &mut self.rng,
                );
            }
        }
        if step.emit_candy {
            if let Some((id, position)) = self.random_marcher() {
                let throw = Vec2::new(
                    self.rng.range_f32(-1.0, 1.0),
                    self.rng.range_f32(-0.5, 0.5),
                )
                .normalize_or(Vec2::X);
                self.effects
                    .candy(position, throw, Some(EntityRef::Monster(id)), &mut self.rng);
            }
        }

        if step.finished {
            info!("parade march finished");
            for i in 0..PARADE_FINALE_BURSTS {
                self.tasks.schedule(
                    self.elapsed,
                    i as f32 * PARADE_FINALE_STAGGER,
                    ScheduledTask::ParadeFinaleBurst,
                );
            }
            self.tasks
                .schedule(self.elapsed, PARADE_SETTLE_SECS, ScheduledTask::ParadeSettle);
        }
    }

    fn random_marcher(&mut self) -> Option<(MonsterId, Vec2)> {
        let marchers: Vec<(MonsterId, Vec2)> = self
            .monsters
            .iter()
            .filter(|m| matches!(m.state, MonsterState::Parading { .. }))
            .map(|m| (m.id, m.position))
            .collect();
        self.rng.pick_copied(&marchers)
    }

    fn finale_burst(&mut self) {
        let (w, h) = (self.field.width, self.field.height);
        let balloon = Vec2::new(self.rng.range_f32(50.0, w - 50.0), h - 50.0);
        self.effects.balloon(balloon, None, &mut self.rng);
        let confetti = Vec2::new(
            self.rng.range_f32(50.0, w - 50.0),
            self.rng.range_f32(100.0, 300.0),
        );
        self.effects
            .confetti(confetti, PARADE_FINALE_CONFETTI, None, &mut self.rng);
    }

    fn settle_parade(&mut self) {
        for monster in self.monsters.iter_mut() {
            if matches!(monster.state, MonsterState::Parading { .. }) {
                monster.state = MonsterState::Wandering(plan_in_box(
                    &self.field,
                    SETTLE_BOX.0,
                    SETTLE_BOX.1,
                    &mut self.rng,
                ));
            }
        }
        self.parade.settle();
        self.session.set_parade_in_progress(false);
        info!(score = self.session.score(), "parade finished");
    }

    // =====================================================
    // Spawning
    // =====================================================

    fn random_spawn_point(&mut self) -> Vec2 {
        let (min, max) = self.field.spawn_area();
        self.rng.point_in(min, max)
    }

    /// Spawn a monster whose value keeps the field solvable
    fn spawn_smart(&mut self) -> MonsterId {
        let value = pick_next_spawn_value(&self.monsters.live_values(), &self.targets(), &mut self.rng);
        let position = self.random_spawn_point();
        self.spawn_wandering(value, position)
    }

    fn spawn_wandering(&mut self, value: i32, position: Vec2) -> MonsterId {
        let plan = fresh_wander_plan(&self.field, &mut self.rng);
        self.spawn_with(value, position, plan)
    }

    fn spawn_with(&mut self, value: i32, position: Vec2, plan: WanderPlan) -> MonsterId {
        let id = self.monsters.spawn(
            value,
            position,
            MonsterState::Wandering(plan),
            &mut self.rng,
        );
        if let Some(slot) = self.parade.join(id) {
            if let Some(monster) = self.monsters.get_mut(id) {
                monster.state = MonsterState::Parading { slot };
            }
        }
        id
    }

    /// Place a monster directly; it rests where it is placed until its timer runs out.
    pub fn spawn_monster_at(&mut self, value: i32, position: Vec2) -> MonsterId {
        let value = value.clamp(MIN_MONSTER_VALUE, MAX_MONSTER_VALUE);
        self.spawn_with(value, position, WanderPlan::toward(position, WANDER_TIMER_MAX))
    }

    fn destroy_monster(&mut self, id: MonsterId) {
        if self.monsters.despawn(id).is_none() {
            return;
        }
        self.avatar.hands.clear_monster(id);
        self.touching.remove(&id);
        self.effects.forget_source(EntityRef::Monster(id));
    }

    // =====================================================
    // Input
    // =====================================================

    pub fn set_pointer(&mut self, position: Vec2) {
        self.pointer = Some(position);
    }

    pub fn key_pressed(&mut self, key: GameKey) -> bool {
        key.releases() && self.release_hands(ReleaseTrigger::Key)
    }

    /// Feed a device-motion sample (acceleration including gravity).
    pub fn device_motion(&mut self, acceleration: Vec3, now_ms: u64) -> bool {
        if self.session.parade_in_progress() {
            return false;
        }
        self.shake.observe(acceleration, now_ms) && self.release_hands(ReleaseTrigger::Shake)
    }

    /// Let go of both hands, scattering the monsters away from the avatar.
    pub fn release_hands(&mut self, trigger: ReleaseTrigger) -> bool {
        if self.session.parade_in_progress() {
            return false;
        }
        let released = self.avatar.hands.clear();
        if released.is_empty() {
            return false;
        }
        for (hand, id) in &released {
            let plan = scatter_plan(self.avatar.position, *hand, &self.field, &mut self.rng);
            if let Some(monster) = self.monsters.get_mut(*id) {
                monster.state.let_go(plan);
            }
        }
        self.effects.release_burst(self.avatar.position);
        debug!(?trigger, count = released.len(), "hands released");
        true
    }

    /// Host-reported overlap between the avatar and a monster
    pub fn avatar_collided(&mut self, id: MonsterId) -> Option<Hand> {
        if self.session.parade_in_progress() {
            return None;
        }
        self.take_hand(id)
    }

    // =====================================================
    // Queries
    // =====================================================

    pub fn targets(&self) -> Vec<i32> {
        self.zones.iter().map(|z| z.target).collect()
    }

    /// Returns false for an unknown zone or an out-of-range target.
    pub fn set_zone_target(&mut self, zone: ZoneId, target: i32) -> bool {
        if !(MIN_TARGET..=MAX_TARGET).contains(&target) {
            return false;
        }
        match self.zones.get_mut(zone.0) {
            Some(zone) => {
                zone.target = target;
                true
            }
            None => false,
        }
    }

    pub fn playfield(&self) -> &Playfield {
        &self.field
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn monsters(&self) -> &MonsterRegistry {
        &self.monsters
    }

    pub fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.get(id)
    }

    pub fn zones(&self) -> &[TargetZone] {
        &self.zones
    }

    pub fn zone(&self, id: ZoneId) -> Option<&TargetZone> {
        self.zones.get(id.0)
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    #[cfg(test)]
    pub(crate) fn session_mut(&mut self) -> &mut SessionState {
        &mut self.session
    }

    pub fn score(&self) -> u32 {
        self.session.score()
    }

    pub fn effects(&self) -> &EffectRegistry {
        &self.effects
    }

    pub fn parade(&self) -> &ParadeSequencer {
        &self.parade
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Replacement spawns waiting on their delay
    pub fn pending_replacements(&self) -> usize {
        self.tasks.pending(ScheduledTask::SpawnReplacement)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            elapsed: self.elapsed,
            score: self.session.score(),
            parade_triggered: self.session.parade_triggered(),
            parade_in_progress: self.session.parade_in_progress(),
            avatar: Some((&self.avatar).into()),
            monsters: self.monsters.iter().map(Into::into).collect(),
            zones: self.zones.iter().map(Into::into).collect(),
            effects: self.effects.iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectKind;

    fn empty_engine() -> GameEngine {
        GameEngine::new(EngineConfig {
            opening_monsters: 0,
            ..EngineConfig::default()
        })
    }

    #[test]
    fn test_parade_with_empty_field_is_skipped() {
        let mut engine = empty_engine();
        engine.start_parade();
        assert!(!engine.session.parade_in_progress());
        assert!(!engine.parade.is_active());
        assert_eq!(engine.effects.count(EffectKind::Banner), 0);

        // input is not blocked afterwards
        let id = engine.spawn_monster_at(3, Vec2::new(400.0, 300.0));
        assert_eq!(engine.avatar_collided(id), Some(Hand::Left));
    }

    #[test]
    fn test_parade_with_marchers_starts() {
        let mut engine = empty_engine();
        engine.spawn_monster_at(3, Vec2::new(200.0, 300.0));
        engine.start_parade();
        assert!(engine.session.parade_in_progress());
        assert!(engine.parade.is_marching());
        assert_eq!(engine.effects.count(EffectKind::Banner), 1);
    }
}
