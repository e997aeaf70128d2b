//! Release triggers and shake detection.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::{SHAKE_COOLDOWN_MS, SHAKE_THRESHOLD};

/// Keys the core reacts to; the host maps its own key codes onto these
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKey {
    R,
    Escape,
    Other,
}

impl GameKey {
    pub fn releases(self) -> bool {
        matches!(self, GameKey::R | GameKey::Escape)
    }
}

/// What asked the avatar to let go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseTrigger {
    Key,
    Shake,
    Programmatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShakeConfig {
    /// Acceleration magnitude (gravity included) that counts as a shake
    pub threshold: f32,
    pub cooldown_ms: u64,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            threshold: SHAKE_THRESHOLD,
            cooldown_ms: SHAKE_COOLDOWN_MS,
        }
    }
}

/// Debounced threshold detector over device-motion samples
#[derive(Debug, Clone)]
pub struct ShakeDetector {
    config: ShakeConfig,
    last_accepted_ms: Option<u64>,
}

impl ShakeDetector {
    pub fn new(config: ShakeConfig) -> Self {
        Self {
            config,
            last_accepted_ms: None,
        }
    }

    /// Feed one sample. True when it counts as a new shake.
    pub fn observe(&mut self, acceleration: Vec3, now_ms: u64) -> bool {
        if acceleration.length() <= self.config.threshold {
            return false;
        }
        if let Some(last) = self.last_accepted_ms {
            if now_ms.saturating_sub(last) < self.config.cooldown_ms {
                return false;
            }
        }
        self.last_accepted_ms = Some(now_ms);
        true
    }

    pub fn config(&self) -> &ShakeConfig {
        &self.config
    }
}
