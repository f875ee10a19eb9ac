//! Rank caps, training actions and class tables, loaded from YAML.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::data::stats::{ClassDefinition, StatTable};
use crate::error::{Result, SquadronError};
use crate::training::step::{TrainingAction, TrainingActions};

/// Environment variable naming a YAML file that replaces the built-in tables.
pub const DATA_PATH_ENV: &str = "SQUADRON_DATA";

const BUILTIN_DATA: &str = include_str!("../../data/squadron.yaml");

#[derive(Debug, Deserialize)]
struct GameDataFile {
    #[serde(default)]
    rank_caps: BTreeMap<u8, u32>,
    #[serde(default)]
    training: Option<Vec<TrainingAction>>,
    #[serde(default)]
    classes: BTreeMap<String, ClassDefinition>,
}

#[derive(Debug, Clone)]
pub struct GameData {
    rank_caps: BTreeMap<u8, u32>,
    actions: TrainingActions,
    stats: StatTable,
}

impl GameData {
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_DATA)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let file: GameDataFile = serde_yaml::from_str(raw)?;
        let actions = match file.training {
            Some(actions) => TrainingActions::new(actions)?,
            None => TrainingActions::standard(),
        };
        if file.classes.is_empty() {
            tracing::warn!("game data defines no classes; every member will have zero stats");
        }
        Ok(Self {
            rank_caps: file.rank_caps,
            actions,
            stats: StatTable::from_definitions(&file.classes),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    /// Tables from `SQUADRON_DATA` when set, otherwise the built-in ones.
    pub fn from_env() -> Result<Self> {
        match env::var(DATA_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                tracing::debug!(%path, "loading game data");
                Self::load(path)
            }
            _ => Self::builtin(),
        }
    }

    pub fn capacity_for_rank(&self, rank: u8) -> Result<u32> {
        self.rank_caps
            .get(&rank)
            .copied()
            .ok_or(SquadronError::UnknownRank(u32::from(rank)))
    }

    pub fn rank_caps(&self) -> &BTreeMap<u8, u32> {
        &self.rank_caps
    }

    pub fn actions(&self) -> &TrainingActions {
        &self.actions
    }

    pub fn stat_table(&self) -> &StatTable {
        &self.stats
    }
}
