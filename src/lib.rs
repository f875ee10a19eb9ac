//! Squadron planner: picks 4-member squads from a recruit roster and finds the
//! shortest run of training actions that lets them meet a mission's
//! physical/mental/tactical requirement.

pub mod cli;
pub mod data;
pub mod error;
pub mod optimizer;
pub mod parallel;
pub mod squad;
pub mod training;

pub use error::{Result, SquadronError};
