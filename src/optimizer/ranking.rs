//! Deterministic orderings for planned squads.
//!
//! Every comparator ends in a total order over values that do not depend on
//! which worker finished first; callers sort with the stable `sort_by`, so
//! remaining ties keep enumeration order.

use std::cmp::Ordering;

use serde::Serialize;

use crate::optimizer::SquadPlan;

/// How far a planned squad got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Full,
    Partial,
    None,
}

/// Full matches by number of training steps.
pub fn by_steps(left: &SquadPlan, right: &SquadPlan) -> Ordering {
    left.result.steps().cmp(&right.result.steps())
}

/// Partial matches by total shortfall, then steps.
pub fn by_shortfall_then_steps(left: &SquadPlan, right: &SquadPlan) -> Ordering {
    shortfall_key(left)
        .cmp(&shortfall_key(right))
        .then_with(|| by_steps(left, right))
}

/// Successful plans first, then shortfall, then steps.
pub fn by_outcome(left: &SquadPlan, right: &SquadPlan) -> Ordering {
    left.kind()
        .cmp(&right.kind())
        .then_with(|| by_shortfall_then_steps(left, right))
}

/// Whether `plan` is worth suggesting against the baseline bar: a full match
/// always is; a partial match only when its shortfall is strictly below the
/// bar (any partial qualifies when the baseline found nothing at all).
pub fn improves_on(plan: &SquadPlan, bar: Option<u32>) -> bool {
    match (plan.kind(), plan.result.shortfall(), bar) {
        (MatchKind::Full, _, _) => true,
        (MatchKind::Partial, Some(_), None) => true,
        (MatchKind::Partial, Some(shortfall), Some(bar)) => shortfall < bar,
        _ => false,
    }
}

fn shortfall_key(plan: &SquadPlan) -> u32 {
    plan.result.shortfall().unwrap_or(u32::MAX)
}
