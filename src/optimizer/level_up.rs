//! Level-up what-if: raise every member by the same number of levels and see
//! which squads become viable.

use std::collections::HashSet;

use serde::Serialize;

use crate::data::member::Member;
use crate::error::Result;
use crate::optimizer::ranking::{by_outcome, improves_on, MatchKind};
use crate::optimizer::{Planner, Scenario, SquadPlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemberLevelChange {
    pub member_id: u32,
    pub from: u8,
    pub to: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelUpSuggestion {
    pub boost: u8,
    pub levels: Vec<MemberLevelChange>,
    pub plan: SquadPlan,
}

impl Planner {
    /// Tries increments 1..=max boost (levels capped at 60), keeping squads
    /// that fully match or beat `baseline_shortfall`. The sweep ends after the
    /// increment that brings the number of full matches to the target.
    ///
    /// Results: full matches first, then smaller increments, then shortfall
    /// and steps.
    pub fn level_up(
        &self,
        scenario: &Scenario,
        baseline_shortfall: Option<u32>,
    ) -> Result<Vec<LevelUpSuggestion>> {
        let originals: Vec<(u32, u8)> = scenario
            .roster()
            .iter()
            .map(|member| (member.id, member.level))
            .collect();
        let mut seen: HashSet<(Vec<u32>, u8)> = HashSet::new();
        let mut suggestions = Vec::new();
        let mut full_matches = 0usize;
        let mut previous_levels: Vec<u8> = originals.iter().map(|(_, level)| *level).collect();

        for boost in 1..=self.limits.level_up_max_boost {
            let boosted: Vec<Member> = scenario
                .roster()
                .iter()
                .map(|member| member.at_level(member.level.saturating_add(boost), &self.stats))
                .collect();
            let levels: Vec<u8> = boosted.iter().map(|member| member.level).collect();
            if levels == previous_levels {
                tracing::debug!(boost, "every member is at the level cap");
                break;
            }
            previous_levels = levels;

            let squads = self.candidate_squads(&boosted)?;
            for plan in self.plan_all(squads, scenario) {
                if !improves_on(&plan, baseline_shortfall) {
                    continue;
                }
                if !seen.insert((plan.member_ids(), boost)) {
                    continue;
                }
                if plan.kind() == MatchKind::Full {
                    full_matches += 1;
                }
                let levels = level_changes(&plan, &originals);
                suggestions.push(LevelUpSuggestion { boost, levels, plan });
            }

            if full_matches >= self.limits.level_up_full_target {
                tracing::debug!(boost, full_matches, "level-up target reached");
                break;
            }
        }

        suggestions.sort_by(|left, right| {
            left.plan
                .kind()
                .cmp(&right.plan.kind())
                .then_with(|| left.boost.cmp(&right.boost))
                .then_with(|| by_outcome(&left.plan, &right.plan))
        });
        suggestions.truncate(self.limits.level_up_top);
        Ok(suggestions)
    }
}

fn level_changes(plan: &SquadPlan, originals: &[(u32, u8)]) -> Vec<MemberLevelChange> {
    plan.squad
        .members()
        .iter()
        .filter_map(|member| {
            let (_, from) = originals.iter().find(|(id, _)| *id == member.id)?;
            Some(MemberLevelChange {
                member_id: member.id,
                from: *from,
                to: member.level,
            })
        })
        .collect()
}
