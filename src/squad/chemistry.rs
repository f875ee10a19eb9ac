//! Squad totals with conditional percentage bonuses.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::data::member::{ChemistryCondition, ChemistryEffect, EffectScope, Member};
use crate::data::stats::{normalize_tag, Stats};
use crate::error::{Result, SquadronError};

pub const SQUAD_SIZE: usize = 4;

/// Exactly four distinct members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Squad {
    members: Vec<Member>,
}

impl Squad {
    pub fn new(members: Vec<Member>) -> Result<Self> {
        if members.len() != SQUAD_SIZE {
            return Err(SquadronError::SquadSize(members.len()));
        }
        let mut seen = BTreeSet::new();
        for member in &members {
            if !seen.insert(member.id) {
                return Err(SquadronError::DuplicateMember(member.id));
            }
        }
        Ok(Self { members })
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Member ids in ascending order.
    pub fn member_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.members.iter().map(|member| member.id).collect();
        ids.sort_unstable();
        ids
    }

    pub fn raw_stats(&self) -> Stats {
        self.members
            .iter()
            .fold(Stats::ZERO, |total, member| total + member.stats)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveRule {
    pub member_id: u32,
    pub effect: ChemistryEffect,
    /// Percentage actually applied (doubled on an affinity match).
    pub percent: u32,
    pub affinity: bool,
    pub bonus: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SquadEvaluation {
    pub raw: Stats,
    pub chemistry_delta: Stats,
    pub effective: Stats,
    pub active_rules: Vec<ActiveRule>,
}

/// Applies every member's chemistry rule to the squad.
///
/// Each bonus is `floor(percent * base / 100)` of the pre-bonus value: the
/// member's own stat for self effects, the squad's raw total for squad-wide
/// effects. Bonuses add up; none compounds on another.
pub fn evaluate_squad(
    squad: &Squad,
    affinity: &[String],
    mission_level: Option<u8>,
) -> SquadEvaluation {
    let affinity: Vec<String> = affinity.iter().map(|tag| normalize_tag(tag)).collect();
    let raw = squad.raw_stats();
    let mut delta = [0u32; 3];
    let mut active_rules = Vec::new();

    for (index, member) in squad.members().iter().enumerate() {
        let Some(rule) = &member.chemistry else {
            continue;
        };
        if !condition_holds(&rule.condition, index, squad.members(), mission_level) {
            continue;
        }

        let affinity_match = member.matches_any(&affinity);
        let percent = if affinity_match {
            rule.percent.saturating_mul(2)
        } else {
            rule.percent
        };
        let attribute = rule.effect.attribute;
        let basis = match rule.effect.scope {
            EffectScope::SelfOnly => member.stats.get(attribute),
            EffectScope::SquadWide => raw.get(attribute),
        };
        let bonus = percent_of(basis, percent);

        let slot = &mut delta[attribute.index()];
        *slot = slot.saturating_add(bonus);
        active_rules.push(ActiveRule {
            member_id: member.id,
            effect: rule.effect,
            percent,
            affinity: affinity_match,
            bonus,
        });
    }

    let chemistry_delta = Stats::from(delta);
    SquadEvaluation {
        raw,
        chemistry_delta,
        effective: raw + chemistry_delta,
        active_rules,
    }
}

fn percent_of(value: u32, percent: u32) -> u32 {
    let scaled = u64::from(value) * u64::from(percent) / 100;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Co-presence conditions look at the other members only.
fn condition_holds(
    condition: &ChemistryCondition,
    index: usize,
    members: &[Member],
    mission_level: Option<u8>,
) -> bool {
    let member = &members[index];
    let mut others = members
        .iter()
        .enumerate()
        .filter(|(other, _)| *other != index)
        .map(|(_, other)| other);

    match condition {
        ChemistryCondition::InSquad => true,
        ChemistryCondition::MissionLevelAtLeast(threshold) => {
            matches!(mission_level, Some(level) if level >= *threshold)
        }
        ChemistryCondition::LevelAtLeast(threshold) => member.level >= *threshold,
        ChemistryCondition::WithRace(race) => others.any(|other| other.race == *race),
        ChemistryCondition::WithClass(class) => {
            others.any(|other| normalize_tag(&other.class) == *class)
        }
        ChemistryCondition::SharedRace(count) => {
            others.filter(|other| other.race == member.race).count() >= usize::from(*count)
        }
        ChemistryCondition::SharedClass(count) => {
            others.filter(|other| other.class == member.class).count() >= usize::from(*count)
        }
        ChemistryCondition::DistinctRaces => {
            distinct(members.iter().map(|m| m.race.as_str())) == members.len()
        }
        ChemistryCondition::DistinctClasses => {
            distinct(members.iter().map(|m| m.class.as_str())) == members.len()
        }
        ChemistryCondition::Unknown(_) => false,
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.collect::<BTreeSet<_>>().len()
}
