use crate::abilities::Ability;
use crate::pokemon_types::{PokemonType, TypeSet};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use PokemonType::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}

impl BaseStats {
    const fn new(hp: u8, attack: u8, defense: u8, sp_attack: u8, sp_defense: u8, speed: u8) -> Self {
        Self {
            hp,
            attack,
            defense,
            sp_attack,
            sp_defense,
            speed,
        }
    }
}

/// Static template of a species: the battle-start defaults for a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PokemonSpecies {
    pub name: &'static str,
    pub types: &'static [PokemonType],
    pub base_stats: BaseStats,
    pub ability: Ability,
    /// Species whose HP stat is always 1 regardless of level (Shedinja).
    pub fixed_one_hp: bool,
}

impl PokemonSpecies {
    pub fn type_set(&self) -> TypeSet {
        // Every entry in the species table lists one or two types.
        TypeSet::from_slice(self.types).unwrap_or(TypeSet::single(Normal))
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Species {
    Feebas,
    Magikarp,
    Wingull,
    Pelipper,
    Volcanion,
    Vaporeon,
    Lanturn,
    Shedinja,
    Pikachu,
    Snorlax,
    Kangaskhan,
    Gengar,
    Bronzong,
    Garchomp,
    Sylveon,
    Machamp,
}

impl Species {
    pub fn name(self) -> &'static str {
        self.data().name
    }

    pub fn data(self) -> PokemonSpecies {
        let entry = match self {
            Species::Feebas => species_entry(
                "Feebas",
                &[Water],
                BaseStats::new(20, 15, 20, 10, 55, 80),
                Ability::BallFetch,
            ),
            Species::Magikarp => species_entry(
                "Magikarp",
                &[Water],
                BaseStats::new(20, 10, 55, 15, 20, 80),
                Ability::BallFetch,
            ),
            Species::Wingull => species_entry(
                "Wingull",
                &[Water, Flying],
                BaseStats::new(40, 30, 30, 55, 30, 85),
                Ability::BallFetch,
            ),
            Species::Pelipper => species_entry(
                "Pelipper",
                &[Water, Flying],
                BaseStats::new(60, 50, 100, 95, 70, 65),
                Ability::BallFetch,
            ),
            Species::Volcanion => species_entry(
                "Volcanion",
                &[Fire, Water],
                BaseStats::new(80, 110, 120, 130, 90, 70),
                Ability::BallFetch,
            ),
            Species::Vaporeon => species_entry(
                "Vaporeon",
                &[Water],
                BaseStats::new(130, 65, 60, 110, 95, 65),
                Ability::WaterAbsorb,
            ),
            Species::Lanturn => species_entry(
                "Lanturn",
                &[Water, Electric],
                BaseStats::new(125, 58, 58, 76, 76, 67),
                Ability::VoltAbsorb,
            ),
            Species::Shedinja => species_entry(
                "Shedinja",
                &[Bug, Ghost],
                BaseStats::new(1, 90, 45, 30, 30, 40),
                Ability::WonderGuard,
            ),
            Species::Pikachu => species_entry(
                "Pikachu",
                &[Electric],
                BaseStats::new(35, 55, 40, 50, 50, 90),
                Ability::BallFetch,
            ),
            Species::Snorlax => species_entry(
                "Snorlax",
                &[Normal],
                BaseStats::new(160, 110, 65, 65, 110, 30),
                Ability::BallFetch,
            ),
            Species::Kangaskhan => species_entry(
                "Kangaskhan",
                &[Normal],
                BaseStats::new(105, 95, 80, 40, 80, 90),
                Ability::Scrappy,
            ),
            Species::Gengar => species_entry(
                "Gengar",
                &[Ghost, Poison],
                BaseStats::new(60, 65, 60, 130, 75, 110),
                Ability::Levitate,
            ),
            Species::Bronzong => species_entry(
                "Bronzong",
                &[Steel, Psychic],
                BaseStats::new(67, 89, 116, 79, 116, 33),
                Ability::Levitate,
            ),
            Species::Garchomp => species_entry(
                "Garchomp",
                &[Dragon, Ground],
                BaseStats::new(108, 130, 95, 80, 85, 102),
                Ability::BallFetch,
            ),
            Species::Sylveon => species_entry(
                "Sylveon",
                &[Fairy],
                BaseStats::new(95, 65, 65, 110, 130, 60),
                Ability::Pixilate,
            ),
            Species::Machamp => species_entry(
                "Machamp",
                &[Fighting],
                BaseStats::new(90, 130, 80, 65, 85, 55),
                Ability::BallFetch,
            ),
        };

        PokemonSpecies {
            fixed_one_hp: self == Species::Shedinja,
            ..entry
        }
    }
}

const fn species_entry(
    name: &'static str,
    types: &'static [PokemonType],
    base_stats: BaseStats,
    ability: Ability,
) -> PokemonSpecies {
    PokemonSpecies {
        name,
        types,
        base_stats,
        ability,
        fixed_one_hp: false,
    }
}
