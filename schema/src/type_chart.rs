//! Directional type effectiveness table.
//!
//! The chart is data: each attacking type lists the defending types it hits
//! for 2x, 0.5x and 0x. Every other pairing is neutral. The lists are folded
//! into a dense table once, so a lookup is a single index operation.

use crate::pokemon_types::PokemonType;
use std::sync::OnceLock;
use strum::EnumCount;

pub const NO_EFFECT: f64 = 0.0;
pub const NOT_VERY_EFFECTIVE: f64 = 0.5;
pub const NEUTRAL: f64 = 1.0;
pub const SUPER_EFFECTIVE: f64 = 2.0;

/// Relationships of one attacking type against the defending types it does
/// not hit neutrally.
pub struct TypeRelations {
    pub attacking: PokemonType,
    pub super_effective: &'static [PokemonType],
    pub not_very_effective: &'static [PokemonType],
    pub no_effect: &'static [PokemonType],
}

use PokemonType::*;

pub const TYPE_RELATIONS: &[TypeRelations] = &[
    TypeRelations {
        attacking: Normal,
        super_effective: &[],
        not_very_effective: &[Rock, Steel],
        no_effect: &[Ghost],
    },
    TypeRelations {
        attacking: Fighting,
        super_effective: &[Normal, Ice, Rock, Dark, Steel],
        not_very_effective: &[Poison, Flying, Psychic, Bug, Fairy],
        no_effect: &[Ghost],
    },
    TypeRelations {
        attacking: Flying,
        super_effective: &[Grass, Fighting, Bug],
        not_very_effective: &[Electric, Rock, Steel],
        no_effect: &[],
    },
    TypeRelations {
        attacking: Poison,
        super_effective: &[Grass, Fairy],
        not_very_effective: &[Poison, Ground, Rock, Ghost],
        no_effect: &[Steel],
    },
    TypeRelations {
        attacking: Ground,
        super_effective: &[Fire, Electric, Poison, Rock, Steel],
        not_very_effective: &[Grass, Bug],
        no_effect: &[Flying],
    },
    TypeRelations {
        attacking: Rock,
        super_effective: &[Fire, Ice, Flying, Bug],
        not_very_effective: &[Fighting, Ground, Steel],
        no_effect: &[],
    },
    TypeRelations {
        attacking: Bug,
        super_effective: &[Grass, Psychic, Dark],
        not_very_effective: &[Fire, Fighting, Poison, Flying, Ghost, Steel, Fairy],
        no_effect: &[],
    },
    TypeRelations {
        attacking: Ghost,
        super_effective: &[Psychic, Ghost],
        not_very_effective: &[Dark],
        no_effect: &[Normal],
    },
    TypeRelations {
        attacking: Steel,
        super_effective: &[Ice, Rock, Fairy],
        not_very_effective: &[Fire, Water, Electric, Steel],
        no_effect: &[],
    },
    TypeRelations {
        attacking: Fire,
        super_effective: &[Grass, Ice, Bug, Steel],
        not_very_effective: &[Fire, Water, Rock, Dragon],
        no_effect: &[],
    },
    TypeRelations {
        attacking: Water,
        super_effective: &[Fire, Ground, Rock],
        not_very_effective: &[Water, Grass, Dragon],
        no_effect: &[],
    },
    TypeRelations {
        attacking: Grass,
        super_effective: &[Water, Ground, Rock],
        not_very_effective: &[Fire, Grass, Poison, Flying, Bug, Dragon, Steel],
        no_effect: &[],
    },
    TypeRelations {
        attacking: Electric,
        super_effective: &[Water, Flying],
        not_very_effective: &[Electric, Grass, Dragon],
        no_effect: &[Ground],
    },
    TypeRelations {
        attacking: Psychic,
        super_effective: &[Fighting, Poison],
        not_very_effective: &[Psychic, Steel],
        no_effect: &[Dark],
    },
    TypeRelations {
        attacking: Ice,
        super_effective: &[Grass, Ground, Flying, Dragon],
        not_very_effective: &[Fire, Water, Ice, Steel],
        no_effect: &[],
    },
    TypeRelations {
        attacking: Dragon,
        super_effective: &[Dragon],
        not_very_effective: &[Steel],
        no_effect: &[Fairy],
    },
    TypeRelations {
        attacking: Dark,
        super_effective: &[Psychic, Ghost],
        not_very_effective: &[Fighting, Dark, Fairy],
        no_effect: &[],
    },
    TypeRelations {
        attacking: Fairy,
        super_effective: &[Fighting, Dragon, Dark],
        not_very_effective: &[Fire, Poison, Steel],
        no_effect: &[],
    },
];

/// Dense attacker -> defender multiplier table.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeChart {
    table: [[f64; PokemonType::COUNT]; PokemonType::COUNT],
}

impl TypeChart {
    /// A chart where every pairing is neutral.
    pub fn neutral() -> Self {
        Self {
            table: [[NEUTRAL; PokemonType::COUNT]; PokemonType::COUNT],
        }
    }

    /// Builds a chart from relationship data on top of a neutral table.
    pub fn from_relations(relations: &[TypeRelations]) -> Self {
        let mut chart = Self::neutral();
        for relation in relations {
            let groups = [
                (relation.super_effective, SUPER_EFFECTIVE),
                (relation.not_very_effective, NOT_VERY_EFFECTIVE),
                (relation.no_effect, NO_EFFECT),
            ];
            for (defending_types, multiplier) in groups {
                for defending in defending_types {
                    chart.set(relation.attacking, *defending, multiplier);
                }
            }
        }
        chart
    }

    /// The standard modern chart.
    pub fn standard() -> &'static TypeChart {
        static STANDARD: OnceLock<TypeChart> = OnceLock::new();
        STANDARD.get_or_init(|| TypeChart::from_relations(TYPE_RELATIONS))
    }

    /// Multiplier of `attacking` against a single `defending` type.
    pub fn lookup(&self, attacking: PokemonType, defending: PokemonType) -> f64 {
        self.table[attacking.index()][defending.index()]
    }

    /// Returns a copy of this chart with one relationship replaced.
    pub fn with_relationship(
        mut self,
        attacking: PokemonType,
        defending: PokemonType,
        multiplier: f64,
    ) -> Self {
        self.set(attacking, defending, multiplier);
        self
    }

    fn set(&mut self, attacking: PokemonType, defending: PokemonType, multiplier: f64) {
        self.table[attacking.index()][defending.index()] = multiplier;
    }
}

impl Default for TypeChart {
    fn default() -> Self {
        Self::standard().clone()
    }
}
