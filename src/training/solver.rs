//! Bounded breadth-first search over training actions.

use std::collections::{HashSet, VecDeque};

use serde::Serialize;

use crate::data::stats::Stats;
use crate::training::step::{apply_training_step, TrainingActions};

/// Paths longer than this are never explored.
pub const DEFAULT_MAX_DEPTH: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SolveResult {
    /// Every attribute meets the requirement.
    FullMatch { path: Vec<String>, final_pool: Stats },
    /// Exactly two of three attributes meet the requirement.
    PartialMatch {
        path: Vec<String>,
        final_pool: Stats,
        matched: [bool; 3],
        missing: Stats,
    },
    NoSolution,
}

impl SolveResult {
    pub fn is_full_match(&self) -> bool {
        matches!(self, Self::FullMatch { .. })
    }

    pub fn is_partial_match(&self) -> bool {
        matches!(self, Self::PartialMatch { .. })
    }

    pub fn path(&self) -> &[String] {
        match self {
            Self::FullMatch { path, .. } | Self::PartialMatch { path, .. } => path,
            Self::NoSolution => &[],
        }
    }

    pub fn steps(&self) -> usize {
        self.path().len()
    }

    pub fn final_pool(&self) -> Option<Stats> {
        match self {
            Self::FullMatch { final_pool, .. } | Self::PartialMatch { final_pool, .. } => {
                Some(*final_pool)
            }
            Self::NoSolution => None,
        }
    }

    /// Total remaining deficit: zero for a full match, `None` without a solution.
    pub fn shortfall(&self) -> Option<u32> {
        match self {
            Self::FullMatch { .. } => Some(0),
            Self::PartialMatch { missing, .. } => Some(missing.sum()),
            Self::NoSolution => None,
        }
    }
}

#[derive(Debug, Clone)]
struct SearchNode {
    pool: Stats,
    path: Vec<usize>,
}

#[derive(Debug, Clone)]
struct BestPartial {
    pool: Stats,
    path: Vec<usize>,
    shortfall: u32,
}

#[derive(Debug, Clone)]
pub struct TrainingSolver {
    actions: TrainingActions,
    max_depth: usize,
}

impl Default for TrainingSolver {
    fn default() -> Self {
        Self::new(TrainingActions::standard())
    }
}

impl TrainingSolver {
    pub fn new(actions: TrainingActions) -> Self {
        Self {
            actions,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn actions(&self) -> &TrainingActions {
        &self.actions
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Shortest action sequence bringing `effective + pool` to the requirement.
    ///
    /// Falls back to the best 2-of-3 state (fewest steps, then smallest total
    /// deficit) when no full match is reachable within the depth bound.
    pub fn solve(
        &self,
        effective: Stats,
        initial_pool: Stats,
        requirement: Stats,
        capacity: u32,
    ) -> SolveResult {
        let match_count = |pool: Stats| (effective + pool).match_count(&requirement);

        let start = SearchNode {
            pool: initial_pool,
            path: Vec::new(),
        };
        let mut best_partial = None;
        match match_count(initial_pool) {
            3 => return self.full_match(start),
            2 => best_partial = Some(self.partial_candidate(&start, effective, requirement)),
            _ => {}
        }

        let mut visited: HashSet<Stats> = HashSet::new();
        visited.insert(initial_pool);
        let mut frontier = VecDeque::from([start]);

        while let Some(current) = frontier.pop_front() {
            if current.path.len() >= self.max_depth {
                continue;
            }

            for (index, action) in self.actions.iter().enumerate() {
                let Some(next_pool) = apply_training_step(current.pool, action, capacity) else {
                    continue;
                };
                if visited.contains(&next_pool) {
                    continue;
                }

                let mut path = current.path.clone();
                path.push(index);
                let next = SearchNode {
                    pool: next_pool,
                    path,
                };

                match match_count(next_pool) {
                    3 => return self.full_match(next),
                    2 => {
                        let candidate = self.partial_candidate(&next, effective, requirement);
                        if is_better_partial(&candidate, best_partial.as_ref()) {
                            best_partial = Some(candidate);
                        }
                    }
                    _ => {}
                }

                visited.insert(next_pool);
                frontier.push_back(next);
            }
        }

        match best_partial {
            Some(best) => {
                let totals = effective + best.pool;
                SolveResult::PartialMatch {
                    path: self.action_ids(&best.path),
                    final_pool: best.pool,
                    matched: totals.meets(&requirement),
                    missing: totals.missing(&requirement),
                }
            }
            None => SolveResult::NoSolution,
        }
    }

    fn full_match(&self, node: SearchNode) -> SolveResult {
        SolveResult::FullMatch {
            path: self.action_ids(&node.path),
            final_pool: node.pool,
        }
    }

    fn partial_candidate(
        &self,
        node: &SearchNode,
        effective: Stats,
        requirement: Stats,
    ) -> BestPartial {
        BestPartial {
            pool: node.pool,
            path: node.path.clone(),
            shortfall: (effective + node.pool).missing(&requirement).sum(),
        }
    }

    fn action_ids(&self, path: &[usize]) -> Vec<String> {
        path.iter()
            .filter_map(|index| self.actions.get(*index))
            .map(|action| action.id.clone())
            .collect()
    }
}

fn is_better_partial(candidate: &BestPartial, best: Option<&BestPartial>) -> bool {
    match best {
        None => true,
        Some(best) => {
            candidate.path.len() < best.path.len()
                || (candidate.path.len() == best.path.len() && candidate.shortfall < best.shortfall)
        }
    }
}

/// [TrainingSolver::solve] with the standard six trainings and depth 9.
pub fn solve(
    effective: Stats,
    initial_pool: Stats,
    requirement: Stats,
    capacity: u32,
) -> SolveResult {
    TrainingSolver::default().solve(effective, initial_pool, requirement, capacity)
}
