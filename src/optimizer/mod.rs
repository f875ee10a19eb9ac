pub mod baseline;
pub mod level_up;
pub mod ranking;
pub mod reclass;

use std::collections::BTreeSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::game_data::GameData;
use crate::data::member::Member;
use crate::data::stats::{StatTable, Stats};
use crate::error::{Result, SquadronError};
use crate::optimizer::ranking::MatchKind;
use crate::parallel::WorkerPool;
use crate::squad::chemistry::{evaluate_squad, Squad, SquadEvaluation, SQUAD_SIZE};
use crate::squad::combinations::combinations;
use crate::training::solver::{SolveResult, TrainingSolver, DEFAULT_MAX_DEPTH};

pub use baseline::BaselineReport;
pub use level_up::{LevelUpSuggestion, MemberLevelChange};
pub use reclass::ReclassSuggestion;

/// What the mission asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub requirement: Stats,
    /// Race or class tags that double a matching member's chemistry.
    #[serde(default)]
    pub affinity: Vec<String>,
    /// Mission level, for `mission_level:N` chemistry conditions.
    #[serde(default)]
    pub level: Option<u8>,
}

/// Everything one planning run needs. Built once; drivers never mutate it.
#[derive(Debug, Clone)]
pub struct Scenario {
    roster: Vec<Member>,
    initial_pool: Stats,
    capacity: u32,
    mission: Mission,
}

impl Scenario {
    /// Rejects rosters with fewer than four members or repeated ids. A pool
    /// whose sum differs from `capacity` is accepted as-is.
    pub fn new(
        roster: Vec<Member>,
        initial_pool: Stats,
        capacity: u32,
        mission: Mission,
    ) -> Result<Self> {
        if roster.len() < SQUAD_SIZE {
            return Err(SquadronError::RosterTooSmall {
                active: roster.len(),
                required: SQUAD_SIZE,
            });
        }
        let mut seen = BTreeSet::new();
        for member in &roster {
            if !seen.insert(member.id) {
                return Err(SquadronError::DuplicateMember(member.id));
            }
        }
        Ok(Self {
            roster,
            initial_pool,
            capacity,
            mission,
        })
    }

    pub fn roster(&self) -> &[Member] {
        &self.roster
    }

    pub fn initial_pool(&self) -> Stats {
        self.initial_pool
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn mission(&self) -> &Mission {
        &self.mission
    }
}

/// Result caps and search bounds for the scenario drivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioLimits {
    pub baseline_top: usize,
    /// Level-up stops after the increment that brings full matches to this count.
    pub level_up_full_target: usize,
    pub level_up_top: usize,
    pub level_up_max_boost: u8,
    pub reclass_top: usize,
    pub max_depth: usize,
    /// When Some(n), each sweep evaluates at most n candidate squads.
    pub squad_budget: Option<usize>,
}

impl Default for ScenarioLimits {
    fn default() -> Self {
        Self {
            baseline_top: 8,
            level_up_full_target: 3,
            level_up_top: 8,
            level_up_max_boost: 20,
            reclass_top: 2,
            max_depth: DEFAULT_MAX_DEPTH,
            squad_budget: None,
        }
    }
}

/// One candidate squad with its chemistry breakdown and training outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SquadPlan {
    pub squad: Squad,
    pub evaluation: SquadEvaluation,
    pub result: SolveResult,
}

impl SquadPlan {
    pub fn kind(&self) -> MatchKind {
        match self.result {
            SolveResult::FullMatch { .. } => MatchKind::Full,
            SolveResult::PartialMatch { .. } => MatchKind::Partial,
            SolveResult::NoSolution => MatchKind::None,
        }
    }

    pub fn member_ids(&self) -> Vec<u32> {
        self.squad.member_ids()
    }
}

/// Runs the scenario drivers against one set of game tables.
#[derive(Debug, Clone)]
pub struct Planner {
    stats: StatTable,
    solver: TrainingSolver,
    limits: ScenarioLimits,
    workers: WorkerPool,
}

impl Planner {
    pub fn from_game_data(data: &GameData) -> Self {
        let limits = ScenarioLimits::default();
        Self {
            stats: data.stat_table().clone(),
            solver: TrainingSolver::new(data.actions().clone()).with_max_depth(limits.max_depth),
            limits,
            workers: WorkerPool::default(),
        }
    }

    pub fn with_limits(mut self, limits: ScenarioLimits) -> Self {
        self.solver = self.solver.with_max_depth(limits.max_depth);
        self.limits = limits;
        self
    }

    pub fn with_workers(mut self, workers: WorkerPool) -> Self {
        self.workers = workers;
        self
    }

    pub fn limits(&self) -> &ScenarioLimits {
        &self.limits
    }

    pub fn stat_table(&self) -> &StatTable {
        &self.stats
    }

    pub fn solver(&self) -> &TrainingSolver {
        &self.solver
    }

    /// Evaluates chemistry for `squad` and solves its training path. Affinity
    /// tags naming a class by its long name match members of that class.
    pub fn plan_squad(&self, squad: Squad, scenario: &Scenario) -> SquadPlan {
        let mission = scenario.mission();
        let affinity: Vec<String> = mission
            .affinity
            .iter()
            .map(|tag| self.stats.resolve_class_tag(tag))
            .collect();
        let evaluation = evaluate_squad(&squad, &affinity, mission.level);
        let result = self.solver.solve(
            evaluation.effective,
            scenario.initial_pool(),
            mission.requirement,
            scenario.capacity(),
        );
        SquadPlan {
            squad,
            evaluation,
            result,
        }
    }

    /// Plans every squad in parallel. Output order matches input order.
    pub fn plan_all(&self, squads: Vec<Squad>, scenario: &Scenario) -> Vec<SquadPlan> {
        self.workers.install(|| {
            squads
                .into_par_iter()
                .map(|squad| self.plan_squad(squad, scenario))
                .collect()
        })
    }

    /// Every 4-member squad from `roster`, cut to the squad budget if one is set.
    fn candidate_squads(&self, roster: &[Member]) -> Result<Vec<Squad>> {
        let mut squads = combinations(roster, SQUAD_SIZE)
            .into_iter()
            .map(Squad::new)
            .collect::<Result<Vec<_>>>()?;
        self.apply_budget(&mut squads);
        Ok(squads)
    }

    fn apply_budget<T>(&self, candidates: &mut Vec<T>) {
        if let Some(budget) = self.limits.squad_budget {
            if candidates.len() > budget {
                tracing::debug!(total = candidates.len(), budget, "truncating candidate squads");
                candidates.truncate(budget);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::member::ChemistryRule;
    use crate::data::stats::ClassDefinition;

    fn table() -> StatTable {
        let mut defs = BTreeMap::new();
        defs.insert("TNK".to_string(), ClassDefinition::flat(Stats::new(50, 10, 10)));
        StatTable::from_definitions(&defs)
    }

    fn roster(count: u32) -> Vec<Member> {
        let table = table();
        (1..=count)
            .map(|id| Member::new(id, "TNK", 10, "hyur", None, &table).unwrap())
            .collect()
    }

    #[test]
    fn scenario_needs_four_members() {
        let err = Scenario::new(roster(3), Stats::ZERO, 0, Mission::default()).unwrap_err();
        assert!(matches!(
            err,
            SquadronError::RosterTooSmall {
                active: 3,
                required: 4
            }
        ));
    }

    #[test]
    fn scenario_rejects_repeated_ids() {
        let mut members = roster(4);
        members.push(members[0].clone());
        assert!(matches!(
            Scenario::new(members, Stats::ZERO, 0, Mission::default()),
            Err(SquadronError::DuplicateMember(1))
        ));
    }

    #[test]
    fn default_limits() {
        let limits = ScenarioLimits::default();
        assert_eq!(limits.baseline_top, 8);
        assert_eq!(limits.level_up_full_target, 3);
        assert_eq!(limits.level_up_max_boost, 20);
        assert_eq!(limits.reclass_top, 2);
        assert_eq!(limits.max_depth, 9);
        assert_eq!(limits.squad_budget, None);
    }

    #[test]
    fn plan_all_keeps_enumeration_order() {
        let data = GameData::builtin().unwrap();
        let planner = Planner::from_game_data(&data).with_workers(WorkerPool::with_workers(3));
        let scenario = Scenario::new(
            roster(6),
            Stats::ZERO,
            0,
            Mission {
                requirement: Stats::new(1, 1, 1),
                ..Mission::default()
            },
        )
        .unwrap();
        let squads = planner.candidate_squads(scenario.roster()).unwrap();
        let expected: Vec<Vec<u32>> = squads.iter().map(Squad::member_ids).collect();
        let plans = planner.plan_all(squads, &scenario);
        let got: Vec<Vec<u32>> = plans.iter().map(SquadPlan::member_ids).collect();
        assert_eq!(got, expected);
        assert_eq!(got.len(), 15);
    }

    #[test]
    fn affinity_accepts_long_and_short_class_names() {
        let data = GameData::builtin().unwrap();
        let planner = Planner::from_game_data(&data);
        let rule = ChemistryRule::from_tags("in_squad", "squad_physical", 20);
        let members: Vec<Member> = (1..=4)
            .map(|id| {
                let chemistry = if id == 1 { rule.clone() } else { None };
                Member::new(id, "gladiator", 30, "hyur", chemistry, data.stat_table()).unwrap()
            })
            .collect();
        let squad = Squad::new(members.clone()).unwrap();
        let delta_for = |affinity: &[&str]| {
            let mission = Mission {
                requirement: Stats::new(1, 1, 1),
                affinity: affinity.iter().map(|tag| tag.to_string()).collect(),
                level: None,
            };
            let scenario = Scenario::new(members.clone(), Stats::ZERO, 0, mission).unwrap();
            planner.plan_squad(squad.clone(), &scenario).evaluation.chemistry_delta
        };

        let plain = delta_for(&[]);
        let short = delta_for(&["GLA"]);
        let long = delta_for(&["Gladiator"]);
        assert_eq!(short.physical, plain.physical * 2);
        assert_eq!(long, short);
    }

    #[test]
    fn squad_budget_truncates_candidates() {
        let data = GameData::builtin().unwrap();
        let planner = Planner::from_game_data(&data).with_limits(ScenarioLimits {
            squad_budget: Some(4),
            ..ScenarioLimits::default()
        });
        assert_eq!(planner.candidate_squads(&roster(6)).unwrap().len(), 4);
    }
}
