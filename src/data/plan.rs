//! JSON plan files: a roster in the squadron export layout plus the mission.
//!
//! ```json
//! {
//!   "recruits": {
//!     "1": { "used": true, "class": "gladiator", "level": 30, "race": "hyur",
//!            "name": "Ashe", "chemistry": { "condition": "in_squad",
//!            "effect": "self_physical", "value": 20 } }
//!   },
//!   "training": [100, 100, 100],
//!   "rank": 300,
//!   "mission": { "requirement": [350, 300, 250], "affinity": ["hyur"], "level": 40 }
//! }
//! ```
//!
//! `rank` holds either a rank number or the capacity itself, as exported
//! files do; an explicit `capacity` wins over both.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::game_data::GameData;
use crate::data::member::{ChemistryRule, Member};
use crate::data::stats::Stats;
use crate::error::{Result, SquadronError};
use crate::optimizer::{Mission, Scenario};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChemistryEntry {
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub effect: String,
    #[serde(default)]
    pub value: u32,
}

/// Exports from older tool versions stored chemistry as an array; that form
/// carries no usable rule and is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChemistryField {
    Rule(ChemistryEntry),
    Legacy(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecruitEntry {
    #[serde(default = "default_used")]
    pub used: bool,
    pub class: String,
    pub level: u8,
    #[serde(default = "default_race")]
    pub race: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub chemistry: Option<ChemistryField>,
}

impl RecruitEntry {
    pub fn chemistry_rule(&self) -> Option<ChemistryRule> {
        match &self.chemistry {
            Some(ChemistryField::Rule(entry)) => {
                ChemistryRule::from_tags(&entry.condition, &entry.effect, entry.value)
            }
            _ => None,
        }
    }
}

fn default_used() -> bool {
    true
}

fn default_race() -> String {
    "unknown".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanFile {
    #[serde(default)]
    pub recruits: BTreeMap<String, RecruitEntry>,
    #[serde(default)]
    pub training: Stats,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub mission: Mission,
}

impl PlanFile {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Active recruits as `(id, entry)`, ordered by id.
    pub fn active_recruits(&self) -> Result<Vec<(u32, &RecruitEntry)>> {
        let mut active = Vec::new();
        for (key, entry) in &self.recruits {
            if !entry.used {
                continue;
            }
            let id = parse_recruit_key(key)?;
            active.push((id, entry));
        }
        active.sort_by_key(|(id, _)| *id);
        Ok(active)
    }

    /// Capacity from `capacity`, else `rank` as a rank number, else `rank` as
    /// a capacity value found in the rank table.
    pub fn resolve_capacity(&self, data: &GameData) -> Result<u32> {
        if let Some(capacity) = self.capacity {
            return Ok(capacity);
        }
        let Some(rank) = self.rank else {
            return Err(SquadronError::MissingCapacity);
        };
        if let Ok(rank_number) = u8::try_from(rank) {
            if let Ok(capacity) = data.capacity_for_rank(rank_number) {
                return Ok(capacity);
            }
        }
        if data.rank_caps().values().any(|cap| *cap == rank) {
            return Ok(rank);
        }
        Err(SquadronError::UnknownRank(rank))
    }

    pub fn into_scenario(&self, data: &GameData) -> Result<Scenario> {
        let table = data.stat_table();
        let roster = self
            .active_recruits()?
            .into_iter()
            .map(|(id, entry)| {
                Member::new(
                    id,
                    &entry.class,
                    entry.level,
                    &entry.race,
                    entry.chemistry_rule(),
                    table,
                )
                .map(|member| member.with_name(entry.name.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        let capacity = self.resolve_capacity(data)?;
        Scenario::new(roster, self.training, capacity, self.mission.clone())
    }
}

pub fn parse_recruit_key(key: &str) -> Result<u32> {
    key.trim()
        .parse()
        .map_err(|_| SquadronError::InvalidRecruitKey(key.to_string()))
}

pub fn load_plan(path: impl AsRef<Path>) -> Result<PlanFile> {
    let raw = fs::read_to_string(path)?;
    PlanFile::from_json_str(&raw)
}
