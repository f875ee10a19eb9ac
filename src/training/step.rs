//! Training actions and the "fill then spill" pool transition.

use serde::{Deserialize, Serialize};

use crate::data::stats::Stats;
use crate::error::{Result, SquadronError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingAction {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Signed Physical / Mental / Tactical change when the pool is full.
    pub delta: [i32; 3],
}

impl TrainingAction {
    pub fn new(id: impl Into<String>, delta: [i32; 3]) -> Self {
        Self {
            id: id.into(),
            name: None,
            delta,
        }
    }

    pub fn delta_sum(&self) -> i32 {
        self.delta.iter().sum()
    }
}

/// Applies one training action to `pool`.
///
/// Returns `None` when the action is not available from this pool: any raw
/// delta would take a coordinate below zero, or the result would exceed
/// `capacity` in one coordinate or in total. Below capacity only the positive
/// components are added; at capacity the full signed delta is applied.
pub fn apply_training_step(pool: Stats, action: &TrainingAction, capacity: u32) -> Option<Stats> {
    let current = pool.to_array().map(i64::from);
    let delta = action.delta.map(i64::from);
    let cap = i64::from(capacity);

    if current.iter().zip(delta).any(|(value, change)| value + change < 0) {
        return None;
    }

    let filled = current.iter().sum::<i64>() >= cap;
    let mut next = [0i64; 3];
    for (slot, (value, change)) in next.iter_mut().zip(current.iter().zip(delta)) {
        *slot = if filled {
            value + change
        } else {
            value + change.max(0)
        };
    }

    if next.iter().any(|value| *value > cap) || next.iter().sum::<i64>() > cap {
        return None;
    }

    let [p, m, t] = next.map(|value| u32::try_from(value).ok());
    Some(Stats::new(p?, m?, t?))
}

/// Validated, ordered action list. Order is the solver's expansion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingActions {
    actions: Vec<TrainingAction>,
}

impl TrainingActions {
    pub fn new(actions: Vec<TrainingAction>) -> Result<Self> {
        if actions.is_empty() {
            return Err(SquadronError::EmptyActionSet);
        }
        if let Some(action) = actions.iter().find(|action| action.delta_sum() != 0) {
            return Err(SquadronError::UnbalancedAction {
                id: action.id.clone(),
                sum: action.delta_sum(),
            });
        }
        Ok(Self { actions })
    }

    /// The six standard trainings: one attribute +40 against the other two
    /// -20, or two attributes +20 against the third -40.
    pub fn standard() -> Self {
        let named = |id: &str, name: &str, delta: [i32; 3]| TrainingAction {
            id: id.to_string(),
            name: Some(name.to_string()),
            delta,
        };
        Self {
            actions: vec![
                named("phy", "Physical Training", [40, -20, -20]),
                named("men", "Mental Training", [-20, 40, -20]),
                named("tac", "Tactical Training", [-20, -20, 40]),
                named("phy_men", "Physical and Mental Training", [20, 20, -40]),
                named("phy_tac", "Physical and Tactical Training", [20, -40, 20]),
                named("men_tac", "Mental and Tactical Training", [-40, 20, 20]),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TrainingAction> {
        self.actions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrainingAction> {
        self.actions.iter()
    }

    pub fn find(&self, id: &str) -> Option<&TrainingAction> {
        self.actions.iter().find(|action| action.id == id)
    }

    /// Applies the action named `id`; an unknown id is an unavailable action.
    pub fn apply_by_id(&self, pool: Stats, id: &str, capacity: u32) -> Option<Stats> {
        self.find(id)
            .and_then(|action| apply_training_step(pool, action, capacity))
    }
}
