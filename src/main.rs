//! Headless runner: hosts the engine in a minimal Bevy app and lets a simple
//! autopilot play until the parade has finished or the time limit passes.

use anyhow::Context;
use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;
use tracing::info;

use monster_math::engine::{
    EngineConfig, EnginePlugin, FrameSnapshot, PointerMoved, ReleaseRequested, SnapshotResource,
};
use monster_math::logging::LoggingPlugin;
use monster_math::monster::StateKind;

/// Simulated seconds before the runner gives up
const TIME_LIMIT_SECS: f32 = 600.0;

fn main() -> anyhow::Result<()> {
    let config = EngineConfig::from_env().context("loading engine config")?;
    let step = Duration::from_secs_f64(1.0 / f64::from(config.tick_rate));

    let exit = App::new()
        .add_plugins(LoggingPlugin::default())
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::ZERO)))
        .insert_resource(TimeUpdateStrategy::ManualDuration(step))
        .add_plugins(EnginePlugin::with_config(config))
        .init_resource::<Autopilot>()
        .add_systems(Update, autopilot_system)
        .run();

    if exit.is_error() {
        anyhow::bail!("headless run ended with {exit:?}");
    }
    Ok(())
}

#[derive(Resource, Default)]
struct Autopilot {
    saw_parade: bool,
}

/// Where the autopilot wants to go this frame
enum Plan {
    Walk(Vec2),
    Release,
    Wait,
}

fn plan(snapshot: &FrameSnapshot) -> Plan {
    let Some(avatar) = &snapshot.avatar else {
        return Plan::Wait;
    };
    let here = Vec2::new(avatar.position.x, avatar.position.y);
    let targets: Vec<i32> = snapshot.zones.iter().map(|z| z.target).collect();
    let held: Vec<i32> = snapshot
        .monsters
        .iter()
        .filter(|m| m.hand.is_some())
        .map(|m| m.value)
        .collect();

    if let [a, b] = held[..] {
        return match snapshot.zones.iter().find(|z| z.target == a + b) {
            Some(zone) => Plan::Walk(Vec2::new(zone.position.x, zone.position.y)),
            None => Plan::Release,
        };
    }

    let pairs_with_held =
        |value: i32| held.first().map_or(true, |h| targets.contains(&(h + value)));
    let nearest = snapshot
        .monsters
        .iter()
        .filter(|m| m.state == StateKind::Wandering && pairs_with_held(m.value))
        .map(|m| Vec2::new(m.position.x, m.position.y))
        .min_by(|p, q| here.distance(*p).total_cmp(&here.distance(*q)));

    match (nearest, held.is_empty()) {
        (Some(point), _) => Plan::Walk(point),
        (None, false) => Plan::Release,
        (None, true) => Plan::Wait,
    }
}

fn autopilot_system(
    snapshot: Res<SnapshotResource>,
    mut pilot: ResMut<Autopilot>,
    mut pointer: EventWriter<PointerMoved>,
    mut release: EventWriter<ReleaseRequested>,
    mut exit: EventWriter<AppExit>,
) {
    let snapshot = &snapshot.0;
    if snapshot.parade_in_progress {
        pilot.saw_parade = true;
        return;
    }
    if pilot.saw_parade || snapshot.elapsed > TIME_LIMIT_SECS {
        info!(
            score = snapshot.score,
            elapsed = snapshot.elapsed,
            paraded = pilot.saw_parade,
            "autopilot finished"
        );
        exit.send(AppExit::Success);
        return;
    }
    match plan(snapshot) {
        Plan::Walk(point) => {
            pointer.send(PointerMoved(point));
        }
        Plan::Release => {
            release.send(ReleaseRequested);
        }
        Plan::Wait => {}
    }
}
