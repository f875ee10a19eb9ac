//! Recruit snapshots and their chemistry rules.
//!
//! Chemistry tags arrive as strings (`"with_race:elezen"`, `"squad_physical"`)
//! and are parsed once here. An unrecognized condition is kept as
//! [ChemistryCondition::Unknown] and never activates; an unrecognized effect
//! drops the rule.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::stats::{normalize_tag, Attribute, StatTable, Stats, MAX_LEVEL, MIN_LEVEL};
use crate::error::{Result, SquadronError};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChemistryCondition {
    /// Active whenever the member is deployed in a squad.
    InSquad,
    /// Mission level is at least the threshold.
    MissionLevelAtLeast(u8),
    /// The member's own level is at least the threshold.
    LevelAtLeast(u8),
    /// Another squad member has this race.
    WithRace(String),
    /// Another squad member has this class.
    WithClass(String),
    /// At least `n` other members share this member's race.
    SharedRace(u8),
    /// At least `n` other members share this member's class.
    SharedClass(u8),
    /// All four members have different races.
    DistinctRaces,
    /// All four members have different classes.
    DistinctClasses,
    Unknown(String),
}

impl ChemistryCondition {
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<&str> for ChemistryCondition {
    fn from(raw: &str) -> Self {
        let (kind, arg) = match raw.split_once(':') {
            Some((kind, arg)) => (normalize_tag(kind), Some(arg.trim())),
            None => (normalize_tag(raw), None),
        };
        let number = || arg.and_then(|value| value.parse::<u8>().ok());
        let tag = || arg.filter(|value| !value.is_empty()).map(normalize_tag);

        let parsed = match kind.as_str() {
            "in_squad" => Some(Self::InSquad),
            "mission_level" => number().map(Self::MissionLevelAtLeast),
            "level" => number().map(Self::LevelAtLeast),
            "with_race" => tag().map(Self::WithRace),
            "with_class" => tag().map(Self::WithClass),
            "shared_race" => number().map(Self::SharedRace),
            "shared_class" => number().map(Self::SharedClass),
            "distinct_races" => Some(Self::DistinctRaces),
            "distinct_classes" => Some(Self::DistinctClasses),
            _ => None,
        };
        parsed.unwrap_or_else(|| Self::Unknown(raw.to_string()))
    }
}

impl From<String> for ChemistryCondition {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<ChemistryCondition> for String {
    fn from(condition: ChemistryCondition) -> Self {
        condition.to_string()
    }
}

impl fmt::Display for ChemistryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InSquad => write!(f, "in_squad"),
            Self::MissionLevelAtLeast(level) => write!(f, "mission_level:{level}"),
            Self::LevelAtLeast(level) => write!(f, "level:{level}"),
            Self::WithRace(race) => write!(f, "with_race:{race}"),
            Self::WithClass(class) => write!(f, "with_class:{class}"),
            Self::SharedRace(count) => write!(f, "shared_race:{count}"),
            Self::SharedClass(count) => write!(f, "shared_class:{count}"),
            Self::DistinctRaces => write!(f, "distinct_races"),
            Self::DistinctClasses => write!(f, "distinct_classes"),
            Self::Unknown(raw) => write!(f, "{raw}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectScope {
    SelfOnly,
    SquadWide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChemistryEffect {
    pub scope: EffectScope,
    pub attribute: Attribute,
}

impl ChemistryEffect {
    pub fn new(scope: EffectScope, attribute: Attribute) -> Self {
        Self { scope, attribute }
    }
}

impl FromStr for ChemistryEffect {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = normalize_tag(raw);
        let (scope, attribute) = normalized
            .split_once('_')
            .ok_or_else(|| format!("unrecognized chemistry effect '{raw}'"))?;
        let scope = match scope {
            "self" => EffectScope::SelfOnly,
            "squad" => EffectScope::SquadWide,
            _ => return Err(format!("unrecognized chemistry effect scope in '{raw}'")),
        };
        let attribute = match attribute {
            "physical" => Attribute::Physical,
            "mental" => Attribute::Mental,
            "tactical" => Attribute::Tactical,
            _ => return Err(format!("unrecognized chemistry effect attribute in '{raw}'")),
        };
        Ok(Self { scope, attribute })
    }
}

impl fmt::Display for ChemistryEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = match self.scope {
            EffectScope::SelfOnly => "self",
            EffectScope::SquadWide => "squad",
        };
        write!(f, "{scope}_{}", self.attribute)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChemistryRule {
    pub condition: ChemistryCondition,
    pub effect: ChemistryEffect,
    /// Whole percent, e.g. 20 for +20%.
    pub percent: u32,
}

impl ChemistryRule {
    pub fn new(condition: ChemistryCondition, effect: ChemistryEffect, percent: u32) -> Self {
        Self {
            condition,
            effect,
            percent,
        }
    }

    /// Rewrites a `with_class:` argument given as a long class name (or any
    /// alias) to the normalized table key members are compared by.
    pub fn with_resolved_class(self, table: &StatTable) -> Self {
        if let ChemistryCondition::WithClass(class) = &self.condition {
            let condition = ChemistryCondition::WithClass(table.resolve_class_tag(class));
            return Self { condition, ..self };
        }
        self
    }

    /// Builds a rule from raw tags. Empty tags mean "no chemistry"; an
    /// unrecognized effect also yields `None`.
    pub fn from_tags(condition: &str, effect: &str, percent: u32) -> Option<Self> {
        if condition.trim().is_empty() || effect.trim().is_empty() {
            return None;
        }
        match effect.parse::<ChemistryEffect>() {
            Ok(effect) => Some(Self::new(ChemistryCondition::from(condition), effect, percent)),
            Err(reason) => {
                tracing::warn!(%reason, "ignoring chemistry rule");
                None
            }
        }
    }
}

/// Immutable snapshot of one recruit at calculation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub id: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub class: String,
    pub level: u8,
    pub race: String,
    pub stats: Stats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chemistry: Option<ChemistryRule>,
}

impl Member {
    /// Snapshots a recruit, deriving base stats from `table`. The class tag
    /// is resolved to the table key when known and kept verbatim otherwise.
    pub fn new(
        id: u32,
        class: &str,
        level: u8,
        race: &str,
        chemistry: Option<ChemistryRule>,
        table: &StatTable,
    ) -> Result<Self> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            return Err(SquadronError::InvalidLevel {
                member_id: id,
                level,
            });
        }
        let class = table.canonical_class(class).unwrap_or(class).to_string();
        Ok(Self {
            id,
            name: String::new(),
            stats: table.lookup(&class, level),
            class,
            level,
            race: normalize_tag(race),
            chemistry: chemistry.map(|rule| rule.with_resolved_class(table)),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// A copy at `level` (capped at 60) with stats recomputed.
    pub fn at_level(&self, level: u8, table: &StatTable) -> Self {
        let level = level.clamp(MIN_LEVEL, MAX_LEVEL);
        Self {
            level,
            stats: table.lookup(&self.class, level),
            ..self.clone()
        }
    }

    /// A copy reclassed to `class` with stats recomputed.
    pub fn as_class(&self, class: &str, table: &StatTable) -> Self {
        let class = table.canonical_class(class).unwrap_or(class).to_string();
        Self {
            stats: table.lookup(&class, self.level),
            class,
            ..self.clone()
        }
    }

    /// Whether this member's race or class is one of `tags` (normalized).
    pub fn matches_any(&self, tags: &[String]) -> bool {
        let class = normalize_tag(&self.class);
        tags.iter().any(|tag| *tag == self.race || *tag == class)
    }
}
