//! Engine configuration, loaded from RON.

use crate::errors::{ConfigError, ConfigResult};
use schema::SUPER_EFFECTIVE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How the turn scheduler breaks exact priority and speed ties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreak {
    /// Player side before enemy side, lower slot first.
    #[default]
    SlotOrder,
    /// A per-round shuffle among tied actions, reproducible from the seed.
    Seeded(u64),
}

/// Precedence of the forced-effectiveness override against other overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForcedEffectivenessConfig {
    /// Multiplier forced onto the designated defending type.
    pub multiplier: f64,
    /// Forced effectiveness removes an ability's fixed multiplier (Wonder Guard, Levitate...).
    pub defeats_ability_override: bool,
    /// Forced effectiveness removes a universal damage negation.
    pub defeats_damage_negation: bool,
}

impl Default for ForcedEffectivenessConfig {
    fn default() -> Self {
        Self {
            multiplier: SUPER_EFFECTIVE,
            defeats_ability_override: true,
            defeats_damage_negation: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tie_break: TieBreak,
    /// Same-type attack bonus.
    pub stab_multiplier: f64,
    pub forced_effectiveness: ForcedEffectivenessConfig,
    /// Burn and poison deal 1/8 max HP at the end of each round.
    pub status_chip_damage: bool,
    /// Seed for damage rolls and chance effects. `None` draws from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::default(),
            stab_multiplier: 1.5,
            forced_effectiveness: ForcedEffectivenessConfig::default(),
            status_chip_damage: true,
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn from_ron_str(source: &str) -> ConfigResult<Self> {
        let config: EngineConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_ron_str(&content)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.stab_multiplier.is_finite() && self.stab_multiplier >= 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "stab_multiplier",
                message: format!("expected a finite value >= 1, found {}", self.stab_multiplier),
            });
        }
        let forced = self.forced_effectiveness.multiplier;
        if !(forced.is_finite() && forced >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "forced_effectiveness.multiplier",
                message: format!("expected a finite, non-negative value, found {}", forced),
            });
        }
        Ok(())
    }
}
