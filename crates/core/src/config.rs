//! Difficulty tiers and the numeric tuning each tier hands to its ghosts.
//! This module exists so tuning is built once, validated, and passed by reference.
//! It does not own behavior selection; it only answers "what does this tier allow".

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{Behavior, Tier};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no difficulty profile configured for tier `{0}`")]
    MissingTier(Tier),

    #[error("tier `{0}` does not enable the mandatory `random` fallback")]
    MissingRandomFallback(Tier),

    #[error("tier `{tier}` cooperation chance {value} is outside [0, 1]")]
    CooperationChanceOutOfRange { tier: Tier, value: f64 },

    #[error("unknown difficulty tier `{0}` (expected easy, medium or hard)")]
    UnknownTier(String),

    #[error("failed to parse difficulty table: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read difficulty table from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DifficultyProfile {
    /// General sight radius advertised for the tier; movement does not consume it.
    pub vision_range: u32,
    /// Radius used to notice peer ghosts before cooperating.
    pub agent_vision_range: u32,
    /// How far a ghost can directly see the target along a clear line.
    pub target_vision_range: u32,
    pub cooperation_chance: f64,
    pub enabled_behaviors: BTreeSet<Behavior>,
}

impl DifficultyProfile {
    pub fn enables(&self, behavior: Behavior) -> bool {
        self.enabled_behaviors.contains(&behavior)
    }

    fn validate(&self, tier: Tier) -> Result<(), ConfigError> {
        if !self.enables(Behavior::Random) {
            return Err(ConfigError::MissingRandomFallback(tier));
        }
        if !(0.0..=1.0).contains(&self.cooperation_chance) {
            return Err(ConfigError::CooperationChanceOutOfRange {
                tier,
                value: self.cooperation_chance,
            });
        }
        Ok(())
    }
}

/// One validated profile per tier.
#[derive(Clone, Debug, PartialEq)]
pub struct DifficultyTable {
    easy: DifficultyProfile,
    medium: DifficultyProfile,
    hard: DifficultyProfile,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTable {
    easy: Option<DifficultyProfile>,
    medium: Option<DifficultyProfile>,
    hard: Option<DifficultyProfile>,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        use Behavior::*;
        Self {
            easy: DifficultyProfile {
                vision_range: 3,
                agent_vision_range: 2,
                target_vision_range: 4,
                cooperation_chance: 0.1,
                enabled_behaviors: BTreeSet::from([Patrol, Random]),
            },
            medium: DifficultyProfile {
                vision_range: 5,
                agent_vision_range: 4,
                target_vision_range: 6,
                cooperation_chance: 0.3,
                enabled_behaviors: BTreeSet::from([Patrol, Hunt, Random]),
            },
            hard: DifficultyProfile {
                vision_range: 7,
                agent_vision_range: 6,
                target_vision_range: 8,
                cooperation_chance: 0.6,
                enabled_behaviors: BTreeSet::from([Patrol, Hunt, Block, Random]),
            },
        }
    }
}

impl DifficultyTable {
    pub fn new(
        easy: DifficultyProfile,
        medium: DifficultyProfile,
        hard: DifficultyProfile,
    ) -> Result<Self, ConfigError> {
        let table = Self { easy, medium, hard };
        for tier in Tier::ALL {
            table.profile(tier).validate(tier)?;
        }
        Ok(table)
    }

    pub fn profile(&self, tier: Tier) -> &DifficultyProfile {
        match tier {
            Tier::Easy => &self.easy,
            Tier::Medium => &self.medium,
            Tier::Hard => &self.hard,
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawTable = toml::from_str(text)?;
        let easy = raw.easy.ok_or(ConfigError::MissingTier(Tier::Easy))?;
        let medium = raw.medium.ok_or(ConfigError::MissingTier(Tier::Medium))?;
        let hard = raw.hard.ok_or(ConfigError::MissingTier(Tier::Hard))?;
        Self::new(easy, medium, hard)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text)
    }
}

impl FromStr for Tier {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ConfigError::UnknownTier(value.to_string()))
    }
}
