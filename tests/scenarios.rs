//! End-to-end scenarios driving the engine at a fixed 1/60 s step.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use monster_math::effects::EffectKind;
use monster_math::engine::{
    AvatarCollision, EngineConfig, EnginePlugin, GameEngine, ReleaseRequested, SnapshotResource,
};
use monster_math::input::ReleaseTrigger;
use monster_math::monster::{MonsterId, StateKind};
use monster_math::player::Hand;
use monster_math::zone::ZoneId;

const DT: f32 = 1.0 / 60.0;

// ============================================================
// Helpers
// ============================================================

fn empty_engine() -> GameEngine {
    GameEngine::new(EngineConfig {
        opening_monsters: 0,
        ..EngineConfig::default()
    })
}

/// Tick until `done` holds or `max_secs` pass. Returns whether it held.
fn run_until(engine: &mut GameEngine, max_secs: f32, done: impl Fn(&GameEngine) -> bool) -> bool {
    let frames = (max_secs / DT).ceil() as usize;
    for _ in 0..frames {
        if done(engine) {
            return true;
        }
        engine.tick(DT);
    }
    done(engine)
}

fn zone_pos(engine: &GameEngine, zone: usize) -> Vec2 {
    engine.zone(ZoneId(zone)).expect("zone exists").position
}

fn kind(engine: &GameEngine, id: MonsterId) -> Option<StateKind> {
    engine.monster(id).map(|m| m.kind())
}

// ============================================================
// Zone resolution
// ============================================================

#[test]
fn test_correct_pair_scores_and_leaves() {
    let mut engine = empty_engine();
    let at = zone_pos(&engine, 1);
    assert_eq!(engine.zone(ZoneId(1)).map(|z| z.target), Some(7));

    let a = engine.spawn_monster_at(3, at);
    let b = engine.spawn_monster_at(4, at + Vec2::new(0.0, 30.0));

    assert!(run_until(&mut engine, 1.5, |e| e.score() == 10));
    assert_eq!(kind(&engine, a), Some(StateKind::Celebrating));
    assert_eq!(kind(&engine, b), Some(StateKind::Celebrating));

    assert!(run_until(&mut engine, 2.0, |e| kind(e, a) == Some(StateKind::Exiting)));
    assert_eq!(kind(&engine, b), Some(StateKind::Exiting));
    let target = engine.zone(ZoneId(1)).map(|z| z.target).unwrap_or(7);
    assert_ne!(target, 7);
    assert!((3..=10).contains(&target));

    // one replacement per monster that left, never more
    let mut peak = 0;
    for _ in 0..(6.0 / DT) as usize {
        engine.tick(DT);
        peak = peak.max(engine.monsters().len());
    }
    assert!(engine.monster(a).is_none());
    assert!(engine.monster(b).is_none());
    assert_eq!(engine.monsters().len(), 2);
    assert_eq!(peak, 2);
}

#[test]
fn test_wrong_pair_bumps_without_scoring() {
    let mut engine = empty_engine();
    let at = zone_pos(&engine, 2);
    let a = engine.spawn_monster_at(1, at);
    let b = engine.spawn_monster_at(1, at + Vec2::new(-25.0, 0.0));

    assert!(run_until(&mut engine, 1.5, |e| kind(e, a) == Some(StateKind::Bumping)));
    assert_eq!(kind(&engine, b), Some(StateKind::Bumping));
    assert_eq!(engine.score(), 0);
    assert_eq!(engine.zone(ZoneId(2)).map(|z| z.target), Some(4));

    assert!(run_until(&mut engine, 2.0, |e| kind(e, a) != Some(StateKind::Bumping)));
    assert!(engine.monster(a).is_some_and(|m| m.state.is_in_play()));
    assert_eq!(engine.monsters().len(), 2);
}

#[test]
fn test_lone_monster_never_checks() {
    let mut engine = empty_engine();
    let id = engine.spawn_monster_at(5, zone_pos(&engine, 0));
    assert!(!run_until(&mut engine, 3.0, |e| e
        .zone(ZoneId(0))
        .is_some_and(|z| z.is_checking())));
    assert_eq!(kind(&engine, id), Some(StateKind::Wandering));
    assert_eq!(engine.score(), 0);
}

#[test]
fn test_stale_references_are_ignored() {
    let mut engine = empty_engine();
    assert_eq!(engine.avatar_collided(MonsterId(42)), None);
    assert!(!engine.release_hands(ReleaseTrigger::Programmatic));
    assert!(engine.monster(MonsterId(42)).is_none());
}

// ============================================================
// Hands
// ============================================================

#[test]
fn test_carry_pair_into_zone() {
    let mut engine = empty_engine();
    let a = engine.spawn_monster_at(2, Vec2::new(100.0, 560.0));
    let b = engine.spawn_monster_at(2, Vec2::new(700.0, 560.0));
    assert_eq!(engine.avatar_collided(a), Some(Hand::Left));
    assert_eq!(engine.avatar_collided(b), Some(Hand::Right));

    // zone 2 wants 4
    engine.set_pointer(zone_pos(&engine, 2) - Vec2::new(0.0, 10.0));
    assert!(run_until(&mut engine, 5.0, |e| e.score() == 10));
    assert_eq!(engine.avatar().hands.following_count(), 0);
    assert!(engine.avatar().is_celebrating());
    assert!(engine.effects().count(EffectKind::Sparkle) > 0);
}

#[test]
fn test_carried_wrong_pair_frees_hands() {
    let mut engine = empty_engine();
    let a = engine.spawn_monster_at(1, Vec2::new(100.0, 560.0));
    let b = engine.spawn_monster_at(1, Vec2::new(700.0, 560.0));
    assert_eq!(engine.avatar_collided(a), Some(Hand::Left));
    assert_eq!(engine.avatar_collided(b), Some(Hand::Right));

    // zone 2 wants 4, the pair makes 2
    engine.set_pointer(zone_pos(&engine, 2) - Vec2::new(0.0, 10.0));
    assert!(run_until(&mut engine, 5.0, |e| kind(e, a) == Some(StateKind::Bumping)));
    assert_eq!(kind(&engine, b), Some(StateKind::Bumping));
    assert_eq!(engine.avatar().hands.following_count(), 0);
    assert_eq!(engine.score(), 0);

    assert!(run_until(&mut engine, 2.0, |e| kind(e, a) != Some(StateKind::Bumping)));
    for id in [a, b] {
        let monster = engine.monster(id).expect("still on the field");
        // loose again; the zone may pick them straight back up
        assert!(
            matches!(monster.kind(), StateKind::Wandering | StateKind::InZoneChecking),
            "{:?}",
            monster.kind()
        );
        assert_eq!(monster.state.hand(), None);
    }
}

#[test]
fn test_release_scatters_to_opposite_sides() {
    let mut engine = empty_engine();
    let a = engine.spawn_monster_at(1, Vec2::new(100.0, 560.0));
    let b = engine.spawn_monster_at(1, Vec2::new(700.0, 560.0));
    engine.avatar_collided(a);
    engine.avatar_collided(b);
    run_until(&mut engine, 1.0, |_| false);

    assert!(engine.release_hands(ReleaseTrigger::Programmatic));
    run_until(&mut engine, 2.0, |_| false);
    let x = |id| engine.monster(id).map_or(0.0, |m| m.position.x);
    let avatar_x = engine.avatar().position.x;
    assert!(x(a) < avatar_x, "left-hand monster went right");
    assert!(x(b) > avatar_x, "right-hand monster went left");
}

// ============================================================
// Parade
// ============================================================

#[test]
fn test_parade_after_fifty_points() {
    let mut engine = empty_engine();
    let at = zone_pos(&engine, 0);

    for _ in 0..30 {
        if engine.score() >= 50 {
            break;
        }
        let settled = run_until(&mut engine, 5.0, |e| {
            e.monsters().iter().all(|m| m.kind() != StateKind::Celebrating)
        });
        assert!(settled);
        engine.set_zone_target(ZoneId(0), 5);
        let before = engine.score();
        engine.spawn_monster_at(2, at);
        engine.spawn_monster_at(3, at);
        run_until(&mut engine, 1.5, |e| e.score() > before);
    }
    assert!(engine.score() >= 50);

    assert!(run_until(&mut engine, 6.0, |e| e.session().parade_in_progress()));
    assert!(engine.session().parade_triggered());
    assert!(engine.parade().is_marching());
    assert!(engine
        .monsters()
        .iter()
        .all(|m| m.kind() == StateKind::Parading));

    // balloons and candy while marching
    run_until(&mut engine, 2.0, |_| false);
    assert!(engine.effects().count(EffectKind::Balloon) > 0);
    assert!(engine.effects().count(EffectKind::Candy) > 0);

    // zones are idle while the parade runs, even for a correct pair
    let before = engine.score();
    engine.set_zone_target(ZoneId(0), 5);
    let two = engine.spawn_monster_at(2, at);
    let three = engine.spawn_monster_at(3, at);
    run_until(&mut engine, 3.0, |_| false);
    assert_eq!(engine.score(), before);
    assert_eq!(kind(&engine, two), Some(StateKind::Parading));
    assert_eq!(kind(&engine, three), Some(StateKind::Parading));

    assert!(run_until(&mut engine, 120.0, |e| !e.session().parade_in_progress()));
    assert_eq!(engine.parade().runs(), 1);
    assert!(engine.session().parade_triggered());
    assert!(engine
        .monsters()
        .iter()
        .all(|m| m.kind() != StateKind::Parading));

    // one-shot: more points never start another parade
    run_until(&mut engine, 10.0, |_| false);
    assert!(!engine.session().parade_in_progress());
}

// ============================================================
// Bevy host
// ============================================================

fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(DT)))
        .add_plugins(EnginePlugin::with_config(EngineConfig::default()));
    app
}

#[test]
fn test_plugin_publishes_snapshot() {
    let mut app = headless_app();
    app.update();
    app.update();
    let snapshot = &app.world().resource::<SnapshotResource>().0;
    assert_eq!(snapshot.monsters.len(), 5);
    assert_eq!(snapshot.zones.len(), 3);
    assert!(snapshot.avatar.is_some());
}

#[test]
fn test_plugin_routes_collision_and_release() {
    let mut app = headless_app();
    app.update();
    let first = app.world().resource::<SnapshotResource>().0.monsters[0].id;

    app.world_mut().send_event(AvatarCollision(MonsterId(first)));
    app.update();
    let held = app.world().resource::<SnapshotResource>().0.monsters[0].hand;
    assert_eq!(held, Some(Hand::Left));

    app.world_mut().send_event(ReleaseRequested);
    app.update();
    let snapshot = &app.world().resource::<SnapshotResource>().0;
    assert_eq!(snapshot.monsters[0].hand, None);
    assert_eq!(snapshot.avatar.as_ref().map(|a| a.following_count), Some(0));
}
