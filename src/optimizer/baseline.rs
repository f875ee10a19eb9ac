//! Baseline sweep: every squad of the unmodified roster.

use serde::Serialize;

use crate::error::Result;
use crate::optimizer::ranking::{by_shortfall_then_steps, by_steps, MatchKind};
use crate::optimizer::{Planner, Scenario, SquadPlan};
use crate::parallel::batch_ranges;

/// Number of progress-reporting batches for [Planner::baseline_with_progress].
const BASELINE_PROGRESS_BATCH_COUNT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaselineReport {
    /// Full when any squad fully matches, otherwise Partial or None.
    pub kind: MatchKind,
    pub plans: Vec<SquadPlan>,
    pub squads_evaluated: usize,
    /// 0 with a full match, else the smallest partial shortfall. Level-up
    /// and reclass suggestions must beat this.
    pub baseline_shortfall: Option<u32>,
}

impl BaselineReport {
    fn from_plans(plans: Vec<SquadPlan>, top: usize) -> Self {
        let squads_evaluated = plans.len();
        let (mut full, mut partial): (Vec<_>, Vec<_>) = plans
            .into_iter()
            .filter(|plan| plan.kind() != MatchKind::None)
            .partition(|plan| plan.kind() == MatchKind::Full);

        let baseline_shortfall = if full.is_empty() {
            partial.iter().filter_map(|plan| plan.result.shortfall()).min()
        } else {
            Some(0)
        };

        let (kind, mut ranked) = if !full.is_empty() {
            full.sort_by(by_steps);
            (MatchKind::Full, full)
        } else if !partial.is_empty() {
            partial.sort_by(by_shortfall_then_steps);
            (MatchKind::Partial, partial)
        } else {
            (MatchKind::None, Vec::new())
        };
        ranked.truncate(top);

        Self {
            kind,
            plans: ranked,
            squads_evaluated,
            baseline_shortfall,
        }
    }

    pub fn best(&self) -> Option<&SquadPlan> {
        self.plans.first()
    }
}

impl Planner {
    /// Solves every 4-member squad; full matches are preferred over partial
    /// ones and only the better group is reported.
    pub fn baseline(&self, scenario: &Scenario) -> Result<BaselineReport> {
        self.baseline_with_progress(scenario, |_, _| {})
    }

    /// Like [Planner::baseline] but runs in batches and invokes
    /// `on_progress(done, total)` after each one.
    pub fn baseline_with_progress<F>(
        &self,
        scenario: &Scenario,
        mut on_progress: F,
    ) -> Result<BaselineReport>
    where
        F: FnMut(usize, usize),
    {
        let squads = self.candidate_squads(scenario.roster())?;
        let total = squads.len();
        on_progress(0, total);

        let mut plans = Vec::with_capacity(total);
        let mut remaining = squads.into_iter();
        for (start, end) in batch_ranges(total, BASELINE_PROGRESS_BATCH_COUNT) {
            let batch: Vec<_> = remaining.by_ref().take(end - start).collect();
            plans.extend(self.plan_all(batch, scenario));
            on_progress(end, total);
        }

        let report = BaselineReport::from_plans(plans, self.limits.baseline_top);
        tracing::debug!(
            squads = report.squads_evaluated,
            kind = ?report.kind,
            shortfall = ?report.baseline_shortfall,
            "baseline sweep finished"
        );
        Ok(report)
    }
}
