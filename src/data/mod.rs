pub mod game_data;
pub mod member;
pub mod plan;
pub mod stats;
pub mod validate;

pub use game_data::GameData;
pub use member::{ChemistryCondition, ChemistryEffect, ChemistryRule, EffectScope, Member};
pub use plan::{load_plan, PlanFile};
pub use stats::{Attribute, StatTable, Stats};
