use thiserror::Error;

/// Structural and configuration failures. Bad data tags (unknown class,
/// unknown chemistry condition) are not errors; they degrade to neutral values.
#[derive(Debug, Error)]
pub enum SquadronError {
    #[error("roster has {active} active member(s); at least {required} are needed to form a squad")]
    RosterTooSmall { active: usize, required: usize },

    #[error("member {member_id} has level {level}; levels must be within 1..=60")]
    InvalidLevel { member_id: u32, level: u8 },

    #[error("member id {0} appears more than once")]
    DuplicateMember(u32),

    #[error("a squad needs exactly 4 members, got {0}")]
    SquadSize(usize),

    #[error("training action list is empty")]
    EmptyActionSet,

    #[error("training action '{id}' does not sum to zero (sum {sum})")]
    UnbalancedAction { id: String, sum: i32 },

    #[error("unknown squadron rank {0}")]
    UnknownRank(u32),

    #[error("recruit key '{0}' is not a numeric id")]
    InvalidRecruitKey(String),

    #[error("plan has neither a rank nor a capacity")]
    MissingCapacity,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, SquadronError>;
