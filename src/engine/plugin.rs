use bevy::prelude::*;
use std::sync::{Arc, RwLock};

use crate::engine::config::EngineConfig;
use crate::engine::game::GameEngine;
use crate::engine::messages::FrameSnapshot;
use crate::input::{GameKey, ReleaseTrigger};
use crate::monster::MonsterId;

/// Hosts a [`GameEngine`] inside a Bevy app. Input arrives as events, the
/// engine ticks on `Update`, and a fresh [`FrameSnapshot`] is published for
/// whatever renders it.
#[derive(Default)]
pub struct EnginePlugin {
    pub config: EngineConfig,
}

impl EnginePlugin {
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }
}

impl Plugin for EnginePlugin {
    fn build(&self, app: &mut App) {
        let engine = GameEngine::new(self.config.clone());

        app.insert_resource(EngineResource(Arc::new(RwLock::new(engine))))
            .init_resource::<SnapshotResource>()
            .add_event::<PointerMoved>()
            .add_event::<KeyPressed>()
            .add_event::<DeviceMotion>()
            .add_event::<ReleaseRequested>()
            .add_event::<AvatarCollision>()
            .add_systems(
                Update,
                (engine_input_system, engine_tick_system, engine_snapshot_system).chain(),
            );
    }
}

#[derive(Resource)]
pub struct EngineResource(pub Arc<RwLock<GameEngine>>);

/// Latest render snapshot
#[derive(Resource, Default)]
pub struct SnapshotResource(pub FrameSnapshot);

// =====================================================
// Input events
// =====================================================

/// Pointer or touch position in playfield coordinates
#[derive(Event, Debug, Clone, Copy)]
pub struct PointerMoved(pub Vec2);

#[derive(Event, Debug, Clone, Copy)]
pub struct KeyPressed(pub GameKey);

/// Device-motion sample, acceleration including gravity
#[derive(Event, Debug, Clone, Copy)]
pub struct DeviceMotion {
    pub acceleration: Vec3,
    pub timestamp_ms: u64,
}

/// Release both hands from a UI control
#[derive(Event, Debug, Clone, Copy)]
pub struct ReleaseRequested;

/// The host's collision pass saw the avatar touch a monster
#[derive(Event, Debug, Clone, Copy)]
pub struct AvatarCollision(pub MonsterId);

fn engine_input_system(
    engine_res: Res<EngineResource>,
    mut pointer: EventReader<PointerMoved>,
    mut keys: EventReader<KeyPressed>,
    mut motion: EventReader<DeviceMotion>,
    mut release: EventReader<ReleaseRequested>,
    mut collisions: EventReader<AvatarCollision>,
) {
    let Ok(mut engine) = engine_res.0.write() else {
        return;
    };
    if let Some(PointerMoved(position)) = pointer.read().last() {
        engine.set_pointer(*position);
    }
    for KeyPressed(key) in keys.read() {
        engine.key_pressed(*key);
    }
    for sample in motion.read() {
        engine.device_motion(sample.acceleration, sample.timestamp_ms);
    }
    if release.read().count() > 0 {
        engine.release_hands(ReleaseTrigger::Programmatic);
    }
    for AvatarCollision(id) in collisions.read() {
        engine.avatar_collided(*id);
    }
}

fn engine_tick_system(time: Res<Time>, engine_res: Res<EngineResource>) {
    if let Ok(mut engine) = engine_res.0.write() {
        engine.tick(time.delta_secs());
    }
}

fn engine_snapshot_system(engine_res: Res<EngineResource>, mut snapshot: ResMut<SnapshotResource>) {
    if let Ok(engine) = engine_res.0.read() {
        snapshot.0 = engine.snapshot();
    }
}
