use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_ZONE_TARGETS, MAX_TARGET, MIN_TARGET, OPENING_MONSTERS};
use crate::input::ShakeConfig;
use crate::world::Layout;

/// Environment variable naming an optional RON config file
pub const CONFIG_ENV_VAR: &str = "MONSTER_MATH_CONFIG";

/// Zone positions each layout provides
const ZONE_SLOTS: usize = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid RON config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("at least one zone target is required")]
    NoTargets,
    #[error("layout has room for {max} zones, got {0}", max = ZONE_SLOTS)]
    TooManyZones(usize),
    #[error("zone target {0} is outside {min}..={max}", min = MIN_TARGET, max = MAX_TARGET)]
    TargetOutOfRange(i32),
    #[error("shake threshold must be positive, got {0}")]
    ShakeThreshold(f32),
    #[error("tick rate must be non-zero")]
    TickRate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub seed: u64,
    pub layout: Layout,
    /// One zone per target, placed in layout order
    pub zone_targets: Vec<i32>,
    pub opening_monsters: usize,
    pub shake: ShakeConfig,
    pub tick_rate: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            layout: Layout::Landscape,
            zone_targets: DEFAULT_ZONE_TARGETS.to_vec(),
            opening_monsters: OPENING_MONSTERS,
            shake: ShakeConfig::default(),
            tick_rate: 60,
        }
    }
}

impl EngineConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    /// Config from `MONSTER_MATH_CONFIG` if set, defaults otherwise
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.zone_targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        if self.zone_targets.len() > ZONE_SLOTS {
            return Err(ConfigError::TooManyZones(self.zone_targets.len()));
        }
        if let Some(bad) = self
            .zone_targets
            .iter()
            .find(|t| !(MIN_TARGET..=MAX_TARGET).contains(*t))
        {
            return Err(ConfigError::TargetOutOfRange(*bad));
        }
        if self.shake.threshold.is_nan() || self.shake.threshold <= 0.0 {
            return Err(ConfigError::ShakeThreshold(self.shake.threshold));
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::TickRate);
        }
        Ok(())
    }

    pub fn to_ron(&self) -> String {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()).unwrap_or_default()
    }
}
