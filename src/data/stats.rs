//! Attribute triples and the class/level stat lookup.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Physical,
    Mental,
    Tactical,
}

impl Attribute {
    pub const ALL: [Attribute; 3] = [Attribute::Physical, Attribute::Mental, Attribute::Tactical];

    pub fn index(self) -> usize {
        match self {
            Self::Physical => 0,
            Self::Mental => 1,
            Self::Tactical => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Mental => "mental",
            Self::Tactical => "tactical",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical / Mental / Tactical triple. Used for base stats, squad totals,
/// requirements and training pools alike. Serialized as `[p, m, t]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 3]", into = "[u32; 3]")]
pub struct Stats {
    pub physical: u32,
    pub mental: u32,
    pub tactical: u32,
}

impl Stats {
    pub const ZERO: Stats = Stats::new(0, 0, 0);

    pub const fn new(physical: u32, mental: u32, tactical: u32) -> Self {
        Self {
            physical,
            mental,
            tactical,
        }
    }

    pub fn get(&self, attribute: Attribute) -> u32 {
        match attribute {
            Attribute::Physical => self.physical,
            Attribute::Mental => self.mental,
            Attribute::Tactical => self.tactical,
        }
    }

    pub fn with(mut self, attribute: Attribute, value: u32) -> Self {
        match attribute {
            Attribute::Physical => self.physical = value,
            Attribute::Mental => self.mental = value,
            Attribute::Tactical => self.tactical = value,
        }
        self
    }

    pub fn to_array(self) -> [u32; 3] {
        [self.physical, self.mental, self.tactical]
    }

    pub fn sum(&self) -> u32 {
        self.physical
            .saturating_add(self.mental)
            .saturating_add(self.tactical)
    }

    /// Which attributes of `self` reach the matching attribute of `requirement`.
    pub fn meets(&self, requirement: &Stats) -> [bool; 3] {
        Attribute::ALL.map(|attr| self.get(attr) >= requirement.get(attr))
    }

    pub fn match_count(&self, requirement: &Stats) -> usize {
        self.meets(requirement).iter().filter(|met| **met).count()
    }

    /// Per-attribute deficit below `requirement` (zero where met).
    pub fn missing(&self, requirement: &Stats) -> Stats {
        Stats::new(
            requirement.physical.saturating_sub(self.physical),
            requirement.mental.saturating_sub(self.mental),
            requirement.tactical.saturating_sub(self.tactical),
        )
    }
}

impl Add for Stats {
    type Output = Stats;

    fn add(self, rhs: Stats) -> Stats {
        Stats::new(
            self.physical.saturating_add(rhs.physical),
            self.mental.saturating_add(rhs.mental),
            self.tactical.saturating_add(rhs.tactical),
        )
    }
}

impl From<[u32; 3]> for Stats {
    fn from(values: [u32; 3]) -> Self {
        Stats::new(values[0], values[1], values[2])
    }
}

impl From<Stats> for [u32; 3] {
    fn from(stats: Stats) -> Self {
        stats.to_array()
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P:{} M:{} T:{}", self.physical, self.mental, self.tactical)
    }
}

/// One class entry as written in the game data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassDefinition {
    /// Long-form name, accepted as an alias of the table key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub base: Stats,
    /// Tenths of a point gained per level above 1.
    #[serde(default)]
    pub growth: Stats,
    /// Explicit per-level stats starting at level 1. Overrides base/growth.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub levels: Vec<Stats>,
}

impl ClassDefinition {
    /// Same stats at every level.
    pub fn flat(stats: Stats) -> Self {
        Self {
            base: stats,
            ..Self::default()
        }
    }

    pub fn growing(base: Stats, growth: Stats) -> Self {
        Self {
            base,
            growth,
            ..Self::default()
        }
    }

    fn expand(&self) -> Vec<Stats> {
        (MIN_LEVEL..=MAX_LEVEL)
            .map(|level| {
                if !self.levels.is_empty() {
                    let index = usize::from(level - 1).min(self.levels.len() - 1);
                    return self.levels[index];
                }
                let steps = u32::from(level - 1);
                let grown =
                    |base: u32, growth: u32| base.saturating_add(growth.saturating_mul(steps) / 10);
                Stats::new(
                    grown(self.base.physical, self.growth.physical),
                    grown(self.base.mental, self.growth.mental),
                    grown(self.base.tactical, self.growth.tactical),
                )
            })
            .collect()
    }
}

/// Dense (class, level) -> stats lookup.
#[derive(Debug, Clone, Default)]
pub struct StatTable {
    classes: BTreeMap<String, Vec<Stats>>,
    aliases: BTreeMap<String, String>,
}

impl StatTable {
    pub fn from_definitions(definitions: &BTreeMap<String, ClassDefinition>) -> Self {
        let mut table = Self::default();
        for (key, definition) in definitions {
            table.classes.insert(key.clone(), definition.expand());
            table.aliases.insert(normalize_tag(key), key.clone());
            if let Some(name) = &definition.name {
                table.aliases.insert(normalize_tag(name), key.clone());
            }
        }
        table
    }

    /// Resolves a class tag or long-form name to the table key.
    pub fn canonical_class(&self, class: &str) -> Option<&str> {
        self.aliases.get(&normalize_tag(class)).map(String::as_str)
    }

    /// Normalized table key when `tag` names a known class in either form;
    /// any other tag (a race, an unknown class) is only normalized.
    pub fn resolve_class_tag(&self, tag: &str) -> String {
        match self.canonical_class(tag) {
            Some(key) => normalize_tag(key),
            None => normalize_tag(tag),
        }
    }

    /// Base stats for `class` at `level`. Level is clamped to 1..=60 and an
    /// unknown class yields zero stats.
    pub fn lookup(&self, class: &str, level: u8) -> Stats {
        let Some(key) = self.canonical_class(class) else {
            return Stats::ZERO;
        };
        let level = level.clamp(MIN_LEVEL, MAX_LEVEL);
        self.classes
            .get(key)
            .and_then(|levels| levels.get(usize::from(level - 1)))
            .copied()
            .unwrap_or_default()
    }

    /// Class keys in sorted order.
    pub fn class_keys(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Lowercase and collapse whitespace/underscores, for tag comparisons.
pub fn normalize_tag(tag: &str) -> String {
    tag.to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() || c == '_' { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}
