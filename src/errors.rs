use crate::player::BattlerIndex;
use schema::{Move, Species};
use thiserror::Error;

/// Main error type for the Pokemon Arena battle engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BattleEngineError {
    /// Error related to invalid battle state
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),
    /// Error related to invalid player actions
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
    /// Error related to a supplied turn order
    #[error("Turn order error: {0}")]
    TurnOrder(#[from] TurnOrderError),
    /// Error related to engine or scenario configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to battle state validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    /// No combatant occupies the given battler index
    #[error("Unknown battler: {0}")]
    UnknownBattler(BattlerIndex),
    /// A side was given no combatants at battle start
    #[error("Side {0} has no combatants")]
    EmptySide(&'static str),
    /// A combatant's level is outside 1..=100
    #[error("{species} has invalid level {level}")]
    InvalidLevel { species: Species, level: u8 },
    /// Every combatant on a side starts the battle fainted
    #[error("Side {0} has no standing combatants")]
    SideAlreadyDefeated(&'static str),
    /// Battle has already ended
    #[error("Battle is already over")]
    BattleOver,
}

/// Errors related to player actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Move index is out of bounds
    #[error("Invalid move index {index} for {battler}")]
    InvalidMoveIndex { battler: BattlerIndex, index: usize },
    /// The acting combatant has fainted
    #[error("{0} has fainted and cannot act")]
    FaintedCombatant(BattlerIndex),
    /// The combatant already has an action this round
    #[error("{0} already submitted an action this round")]
    AlreadySubmitted(BattlerIndex),
    /// Target does not exist or is on the wrong side
    #[error("{battler} cannot target {target} with {move_used}")]
    InvalidTarget {
        battler: BattlerIndex,
        target: BattlerIndex,
        move_used: Move,
    },
}

/// Errors related to an explicitly supplied turn order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnOrderError {
    /// A combatant that will act this round is missing from the order
    #[error("Turn order is missing {0}")]
    Missing(BattlerIndex),
    /// A combatant appears more than once
    #[error("Turn order lists {0} more than once")]
    Duplicate(BattlerIndex),
    /// A listed combatant will not act this round
    #[error("Turn order lists {0}, which is not acting this round")]
    NotActing(BattlerIndex),
}

/// Errors related to loading configuration and scenarios
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },
    #[error("Malformed RON: {0}")]
    Parse(String),
    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(err: ron::error::SpannedError) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
