//! Pokemon Arena Battle Engine
//!
//! A turn-based battle engine built around a phase pipeline. Each round is a
//! sequence of phases (turn start, command, move, hit, effect, faint, turn end)
//! that read the battle state and emit commands; the pipeline applies those
//! commands and can be stopped before or after any phase for inspection.
//!
//! Type effectiveness is resolved by an ordered chain of rules, including
//! forced effectiveness (Freeze-Dry against Water).

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod combatant;
pub mod config;
pub mod errors;
pub mod move_data;
pub mod player;
pub mod scenario;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    Ability, Move, MoveCategory, MoveEffect, MoveFlag, PokemonType, Species, StatType,
    StatusType, TypeChart, TypeSet,
};

// --- From this crate's modules (`src/`) ---

// Pipeline, state and events.
pub use battle::effectiveness::{Effectiveness, EffectivenessResolver, EffectivenessRule};
pub use battle::phases::PhaseKind;
pub use battle::pipeline::{AdvanceOutcome, PhasePipeline};
pub use battle::state::{BattleEvent, BattleState, EventBus, GameState, TurnRng};

// Battle participants and their actions.
pub use combatant::{Combatant, CombatantTemplate};
pub use player::{BattlerIndex, PlayerAction, Side};

// Configuration and scripted battles.
pub use config::{EngineConfig, ForcedEffectivenessConfig, TieBreak};
pub use scenario::{Scenario, ScenarioOutcome};

pub use move_data::{get_move_data, MoveData};

// Crate-specific error and result types.
pub use errors::{
    ActionError, BattleEngineError, BattleResult, BattleStateError, ConfigError, ConfigResult,
    TurnOrderError,
};
