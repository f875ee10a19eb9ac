//! Reclass what-if: switch one member to another class and look for squads
//! built around them that beat the baseline.

use std::collections::HashSet;

use serde::Serialize;

use crate::data::member::Member;
use crate::error::Result;
use crate::optimizer::ranking::{by_outcome, improves_on};
use crate::optimizer::{Planner, Scenario, SquadPlan};
use crate::squad::chemistry::{Squad, SQUAD_SIZE};
use crate::squad::combinations::combinations;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReclassSuggestion {
    pub member_id: u32,
    pub from_class: String,
    pub to_class: String,
    pub plan: SquadPlan,
}

impl Planner {
    /// For each member and each other class, plans the reclassed member with
    /// every trio of remaining members. Only the best squad per
    /// (member, class) pair is kept; pairs must fully match or beat
    /// `baseline_shortfall`.
    pub fn reclass(
        &self,
        scenario: &Scenario,
        baseline_shortfall: Option<u32>,
    ) -> Result<Vec<ReclassSuggestion>> {
        let classes: Vec<&str> = self.stats.class_keys().collect();
        let mut candidates: Vec<(u32, String, String)> = Vec::new();
        let mut squads: Vec<Squad> = Vec::new();

        for (index, member) in scenario.roster().iter().enumerate() {
            let others: Vec<Member> = scenario
                .roster()
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != index)
                .map(|(_, other)| other.clone())
                .collect();
            let partner_sets = combinations(&others, SQUAD_SIZE - 1);

            for class in classes.iter().filter(|class| **class != member.class) {
                let reclassed = member.as_class(class, &self.stats);
                for partners in &partner_sets {
                    let mut lineup = Vec::with_capacity(SQUAD_SIZE);
                    lineup.push(reclassed.clone());
                    lineup.extend(partners.iter().cloned());
                    squads.push(Squad::new(lineup)?);
                    candidates.push((member.id, member.class.clone(), (*class).to_string()));
                }
            }
        }
        self.apply_budget(&mut squads);
        candidates.truncate(squads.len());
        tracing::debug!(squads = squads.len(), "reclass sweep");

        let mut suggestions: Vec<ReclassSuggestion> = candidates
            .into_iter()
            .zip(self.plan_all(squads, scenario))
            .filter(|(_, plan)| improves_on(plan, baseline_shortfall))
            .map(|((member_id, from_class, to_class), plan)| ReclassSuggestion {
                member_id,
                from_class,
                to_class,
                plan,
            })
            .collect();

        suggestions.sort_by(|left, right| by_outcome(&left.plan, &right.plan));
        let mut seen = HashSet::new();
        suggestions.retain(|suggestion| {
            seen.insert((suggestion.member_id, suggestion.to_class.clone()))
        });
        suggestions.truncate(self.limits.reclass_top);
        Ok(suggestions)
    }
}
