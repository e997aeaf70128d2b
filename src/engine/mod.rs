//! Game engine integration layer
//!
//! Ties the behavior modules into one tickable session:
//!   GameEngine  - owns monsters, zones, hands, effects, score and the parade
//!   EnginePlugin - runs a GameEngine inside a headless Bevy app
//!   messages    - per-frame render snapshot for an external renderer
//!   config      - RON-backed session configuration

pub mod config;
pub mod game;
pub mod messages;
pub mod plugin;

#[allow(unused_imports)]
pub use config::{ConfigError, EngineConfig, CONFIG_ENV_VAR};
#[allow(unused_imports)]
pub use game::GameEngine;
#[allow(unused_imports)]
pub use messages::*;
#[allow(unused_imports)]
pub use plugin::{
    AvatarCollision, DeviceMotion, EnginePlugin, EngineResource, KeyPressed, PointerMoved,
    ReleaseRequested, SnapshotResource,
};

// =====================================================
// Tests
// =====================================================
