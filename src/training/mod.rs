pub mod solver;
pub mod step;

pub use solver::{solve, SolveResult, TrainingSolver};
pub use step::{apply_training_step, TrainingAction, TrainingActions};
