use crate::pokemon_types::PokemonType;
use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// Flags that change how a move interacts with type effectiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveFlag {
    /// The designated defending type always takes the forced multiplier,
    /// whatever the chart or the defender's ability says (Freeze-Dry vs Water).
    ForcedEffectiveness(PokemonType),
    /// The move takes the user's primary current type instead of its own.
    MatchesUserType,
    /// Chart immunities (0x) against this move are read as neutral.
    IgnoresTypeImmunity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum StatusType {
    Burn,
    Poison,
    Paralysis,
}

/// Follow-up effect applied after a move lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveEffect {
    /// Replaces the target's current types with a single type (Soak).
    ChangeTargetType(PokemonType),
    /// Inflicts a major status with the given percent chance.
    InflictStatus { status: StatusType, chance: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum StatType {
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}
