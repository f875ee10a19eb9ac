pub mod chemistry;
pub mod combinations;

pub use chemistry::{evaluate_squad, ActiveRule, Squad, SquadEvaluation, SQUAD_SIZE};
pub use combinations::combinations;
