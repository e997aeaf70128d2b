//! Monster Math - Core Library
//!
//! Deterministic game logic for a children's addition game:
//! - Monsters carrying small numbers wander, follow the avatar's hands,
//!   celebrate, bump and run off the field
//! - Target zones check pairs against a target sum after a dwell delay
//! - Solvability-aware spawning keeps a correct pair on the field
//! - A one-shot parade plays once the score reaches its threshold
//! - Self-terminating cosmetic effects and a per-frame render snapshot
//! - A Bevy plugin hosting the engine headlessly

pub mod arithmetic;
pub mod constants;
pub mod effects;
pub mod engine;
pub mod input;
pub mod logging;
pub mod monster;
pub mod parade;
pub mod player;
pub mod rng;
pub mod schedule;
pub mod session;
pub mod world;
pub mod zone;
